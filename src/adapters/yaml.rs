// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML codec adapter.
//!
//! This module provides a [`TreeCodec`] that reads and writes block-style YAML
//! documents through `serde_yaml`.

use crate::domain::{ConstructError, Result, Value};
use crate::ports::TreeCodec;

/// YAML codec implementation.
///
/// An empty document decodes to `Null`, which loads as an empty construct.
///
/// # Examples
///
/// ```rust
/// use construct::adapters::YamlCodec;
/// use construct::ports::TreeCodec;
///
/// let codec = YamlCodec::new();
/// let tree = codec.decode(b"database:\n  host: localhost\n  port: 5432").unwrap();
/// assert!(tree.as_mapping().is_some());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct YamlCodec;

impl YamlCodec {
    /// Creates a new YAML codec.
    pub fn new() -> Self {
        YamlCodec
    }
}

impl Default for YamlCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeCodec for YamlCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_yaml::from_slice(bytes).map_err(|e| ConstructError::Decode {
            message: format!("Failed to parse YAML: {}", e),
            source: Some(Box::new(e)),
        })
    }

    fn encode(&self, tree: &Value) -> Result<Vec<u8>> {
        let text = serde_yaml::to_string(tree).map_err(|e| ConstructError::Encode {
            message: format!("Failed to emit YAML: {}", e),
            source: Some(Box::new(e)),
        })?;
        Ok(text.into_bytes())
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}
