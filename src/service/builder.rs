// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builder for constructing a `Construct` of a kind.

use crate::domain::{Construct, Mapping, Result, Schema, Value};
use crate::service::registry::{Kind, KindRegistry};

/// Builder for a [`Construct`].
///
/// The construct starts with the given data, assigned entry by entry, and a
/// schema made of the kind's schema with any overrides laid on top.
///
/// # Examples
///
/// ```rust
/// use construct::domain::{Field, Schema, Value};
/// use construct::service::{ConstructBuilder, KindRegistry};
///
/// # fn main() -> construct::domain::Result<()> {
/// let registry = KindRegistry::new();
/// registry.define("Server", "port", Field::with_default(8080))?;
///
/// let mut server = ConstructBuilder::with_registry(&registry)
///     .kind("Server")
///     .entry("host", "localhost")
///     .schema(Schema::new().with("port", Field::with_default(9090))?)
///     .build()?;
///
/// assert_eq!(server.get("host")?, Some(&Value::from("localhost")));
/// assert_eq!(server.get("port")?, Some(&Value::from(9090)));
/// # Ok(())
/// # }
/// ```
pub struct ConstructBuilder<'r> {
    registry: &'r KindRegistry,
    kind: Option<String>,
    tree: Value,
    overrides: Schema,
}

impl ConstructBuilder<'static> {
    /// Creates a builder backed by the process-wide registry.
    pub fn new() -> Self {
        Self::with_registry(KindRegistry::global())
    }
}

impl Default for ConstructBuilder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> ConstructBuilder<'r> {
    /// Creates a builder backed by a specific registry.
    pub fn with_registry(registry: &'r KindRegistry) -> Self {
        Self {
            registry,
            kind: None,
            tree: Value::Null,
            overrides: Schema::new(),
        }
    }

    /// Sets the kind whose schema seeds the construct.
    pub fn kind(mut self, name: impl Into<String>) -> Self {
        self.kind = Some(name.into());
        self
    }

    /// Sets the kind from a statically declared [`Kind`].
    pub fn kind_of<K: Kind>(self) -> Self {
        self.kind(K::NAME)
    }

    /// Replaces the initial data with a plain tree.
    ///
    /// The tree must be a mapping (or `Null`); this is checked by `build`.
    pub fn tree(mut self, tree: impl Into<Value>) -> Self {
        self.tree = tree.into();
        self
    }

    /// Adds one entry to the initial data.
    ///
    /// The key is normalized by `build`.
    pub fn entry(mut self, key: impl Into<Value>, value: impl Into<Value>) -> Self {
        match &mut self.tree {
            Value::Mapping(map) => {
                map.insert(key, value);
            }
            _ => {
                let mut map = Mapping::new();
                map.insert(key, value);
                self.tree = Value::Mapping(map);
            }
        }
        self
    }

    /// Lays schema overrides on top of the kind's schema.
    pub fn schema(mut self, overrides: Schema) -> Self {
        self.overrides = std::mem::take(&mut self.overrides).merged(overrides);
        self
    }

    /// Builds the construct.
    pub fn build(self) -> Result<Construct> {
        let schema = match &self.kind {
            Some(kind) => {
                if !self.registry.contains(kind) {
                    tracing::debug!(kind = %kind, "building construct of an undeclared kind");
                }
                self.registry.schema_of(kind)
            }
            None => Schema::new(),
        };
        Construct::from_tree(self.tree, schema.merged(self.overrides))
    }
}
