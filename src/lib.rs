// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extensible, persistent, structured configuration.
//!
//! A [`Construct`](domain::Construct) is a tree-shaped configuration store. Any
//! key may carry an assigned value, a schema-declared default, or both. Nested
//! sections are constructs themselves, and plain text-keyed mappings are
//! promoted to constructs when they are assigned.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: keys, values, schemas, default materialization, and the
//!   construct itself
//! - **Ports**: the `TreeCodec` trait through which bytes become trees
//! - **Adapters**: codec implementations (YAML)
//! - **Service**: the kind registry, the construct builder, and the loader
//!
//! # Defaults
//!
//! Reading a key that has no data falls back to the schema default. A default
//! that is itself a construct is cloned into the instance on first read, so two
//! instances of a kind never share a nested section. Deleting a key removes its
//! data only; the schema default shows through again.
//!
//! # Feature Flags
//!
//! - `yaml`: Enable the YAML codec and the `load`/`load_file`/`dump` helpers
//!   (default)
//!
//! # Quick Start
//!
//! ```rust
//! use construct::prelude::*;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let mut conf = construct::load(b"foo: hi\nbar:\n  baz: 2\n")?;
//! conf.section_mut("bar")?
//!     .expect("bar is a section")
//!     .set("zoom", vec![1, 2, 3])?;
//!
//! let yaml = construct::dump(&conf)?;
//! assert!(yaml.contains("zoom"));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(feature = "yaml")]
use crate::adapters::YamlCodec;
#[cfg(feature = "yaml")]
use crate::domain::{Construct, ConstructError, Result};
#[cfg(feature = "yaml")]
use crate::service::Loader;
#[cfg(feature = "yaml")]
use std::path::Path;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        AsKey, Construct, ConstructError, Field, Key, Mapping, Result, Schema, Value,
    };
    pub use crate::ports::TreeCodec;
    pub use crate::service::{ConstructBuilder, Kind, KindRegistry, Loader};

    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlCodec;
}

/// Loads a construct from YAML bytes.
#[cfg(feature = "yaml")]
pub fn load(yaml: &[u8]) -> Result<Construct> {
    Loader::new(YamlCodec::new()).decode(yaml)
}

/// Loads a construct from a YAML file.
#[cfg(feature = "yaml")]
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Construct> {
    Loader::new(YamlCodec::new()).load_file(path)
}

/// Dumps a construct to a YAML string. Keys are written as strings.
#[cfg(feature = "yaml")]
pub fn dump(construct: &Construct) -> Result<String> {
    let bytes = Loader::new(YamlCodec::new()).encode(construct)?;
    String::from_utf8(bytes).map_err(|e| ConstructError::Encode {
        message: "YAML output is not valid UTF-8".to_string(),
        source: Some(Box::new(e)),
    })
}
