// SPDX-License-Identifier: MIT OR Apache-2.0

//! Default materialization.
//!
//! When a key has no value of its own, its schema default is resolved here.
//! Construct defaults are deep-cloned so that each instance writes to a private
//! copy and the schema's default is never mutated. Every other default is read
//! in place. Storing the clone is left to the caller.

use crate::domain::schema::Field;
use crate::domain::value::Value;

/// How a schema default resolves for a key that has no data.
#[derive(Debug, PartialEq)]
pub enum Resolution<'a> {
    /// A private clone that must be stored under the key before it is used.
    Materialize(Value),
    /// The default itself, readable in place.
    ReadThrough(&'a Value),
}

/// Resolves the default declared by `field` for a shared read.
///
/// Returns `None` if the field declares no default.
///
/// # Examples
///
/// ```
/// use construct::domain::materialize::{resolve, Resolution};
/// use construct::domain::{Construct, Field, Value};
///
/// let scalar = Field::with_default("hello world");
/// assert_eq!(resolve(&scalar), Some(Resolution::ReadThrough(&Value::from("hello world"))));
///
/// let nested = Field::with_default(Construct::new());
/// assert!(matches!(resolve(&nested), Some(Resolution::Materialize(_))));
/// ```
pub fn resolve(field: &Field) -> Option<Resolution<'_>> {
    match field.default_value()? {
        Value::Construct(c) => Some(Resolution::Materialize(Value::Construct(c.clone()))),
        other => Some(Resolution::ReadThrough(other)),
    }
}

/// Clones the default declared by `field` for a mutable access.
///
/// Any value handed out mutably must belong to the instance, so every default
/// kind is cloned here, sequences included.
pub fn materialize_owned(field: &Field) -> Option<Value> {
    field.default_value().cloned()
}
