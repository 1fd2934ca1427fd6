// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tree codec trait definition.
//!
//! This module defines the `TreeCodec` trait, the interface to a textual byte
//! format (YAML, JSON, ...) that can turn bytes into a plain value tree and back.

use crate::domain::{Result, Value};

/// A trait for encoding and decoding plain value trees.
///
/// A tree is made of `Null`, `Bool`, `Number`, `String`, `Sequence` and
/// `Mapping` values; `encode` must be the inverse of `decode` for any such
/// tree with text keys. Codecs never see constructs: the loader flattens
/// them to trees first.
///
/// # Examples
///
/// ```rust
/// use construct::domain::{Result, Value};
/// use construct::ports::TreeCodec;
///
/// struct NullCodec;
///
/// impl TreeCodec for NullCodec {
///     fn decode(&self, _bytes: &[u8]) -> Result<Value> {
///         Ok(Value::Null)
///     }
///
///     fn encode(&self, _tree: &Value) -> Result<Vec<u8>> {
///         Ok(b"~".to_vec())
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["null"]
///     }
/// }
///
/// let codec = NullCodec;
/// assert_eq!(codec.decode(b"anything").unwrap(), Value::Null);
/// ```
pub trait TreeCodec {
    /// Decodes raw bytes into a plain tree.
    ///
    /// Malformed input must be reported as `ConstructError::Decode`.
    fn decode(&self, bytes: &[u8]) -> Result<Value>;

    /// Encodes a plain tree into raw bytes.
    fn encode(&self, tree: &Value) -> Result<Vec<u8>>;

    /// Returns the file extensions (without the leading dot) this codec reads.
    fn supported_extensions(&self) -> &[&str];
}
