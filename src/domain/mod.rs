// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing the construct and its supporting types.
//!
//! This module is independent of any byte format or storage concern. It
//! defines keys, values, schemas, default materialization, and the construct
//! itself.

pub mod access;
pub mod construct;
pub mod errors;
pub mod key;
pub mod materialize;
pub mod schema;
pub mod value;

// Re-export commonly used types
pub use construct::Construct;
pub use errors::{ConstructError, Result};
pub use key::{AsKey, Key};
pub use schema::{Field, Schema};
pub use value::{coerce, Mapping, Number, Value};
