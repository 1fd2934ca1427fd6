// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field descriptors and schemas.
//!
//! A [`Schema`] maps keys to [`Field`] descriptors. A field may carry a default
//! value and a human readable description. Constructs copy their schema on
//! creation, so instance-level definitions never leak into sibling instances or
//! back into the kind they were created from.

use crate::domain::errors::Result;
use crate::domain::key::{AsKey, Key};
use crate::domain::value::{coerce, Value};
use std::collections::BTreeMap;

/// Describes one schema key.
///
/// # Examples
///
/// ```
/// use construct::domain::schema::Field;
///
/// let field = Field::with_default("127.0.0.1").describe("Database host");
/// assert!(field.has_default());
/// assert_eq!(field.description(), Some("Database host"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Field {
    default: Option<Value>,
    description: Option<String>,
}

impl Field {
    /// Creates a field with neither a default nor a description.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a field with a default value.
    ///
    /// Text-keyed mappings are promoted to constructs, the same way they are
    /// on assignment.
    pub fn with_default(default: impl Into<Value>) -> Self {
        Field {
            default: Some(coerce(default.into())),
            description: None,
        }
    }

    /// Attaches a description to the field.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the default value, if any.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Returns `true` if the field declares a default.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Returns the description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A mapping from key to field descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Schema {
    fields: BTreeMap<Key, Field>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or overwrites the descriptor for `key`.
    pub fn define(&mut self, key: impl AsKey, field: Field) -> Result<Option<Field>> {
        let key = key.to_key()?;
        Ok(self.fields.insert(key, field))
    }

    /// Builder-style variant of [`Schema::define`].
    pub fn with(mut self, key: impl AsKey, field: Field) -> Result<Self> {
        self.define(key, field)?;
        Ok(self)
    }

    /// Removes the descriptor for `key` entirely.
    pub fn remove(&mut self, key: impl AsKey) -> Result<Option<Field>> {
        let key = key.to_key()?;
        Ok(self.fields.remove(&key))
    }

    /// Returns the descriptor for `key`.
    pub fn field(&self, key: &Key) -> Option<&Field> {
        self.fields.get(key)
    }

    /// Returns the default for `key`, if the field declares one.
    pub fn default_for(&self, key: &Key) -> Option<&Value> {
        self.fields.get(key).and_then(Field::default_value)
    }

    /// Returns `true` if `key` is described by the schema.
    pub fn contains_key(&self, key: &Key) -> bool {
        self.fields.contains_key(key)
    }

    /// Returns `true` if `key` is described with a default.
    pub fn has_default(&self, key: &Key) -> bool {
        self.default_for(key).is_some()
    }

    /// Iterates over the described keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.fields.keys()
    }

    /// Iterates over the descriptors in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Field)> {
        self.fields.iter()
    }

    /// Returns the number of described keys.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if nothing is described.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns this schema with every descriptor of `overrides` laid on top.
    pub fn merged(mut self, overrides: Schema) -> Schema {
        self.fields.extend(overrides.fields);
        self
    }
}
