// SPDX-License-Identifier: MIT OR Apache-2.0

//! Type-level schema registry.
//!
//! A kind is a named configuration type. Its schema is declared once, before
//! any instance is built, and every new instance receives its own copy. Later
//! declarations only affect instances created afterwards.

use crate::domain::{AsKey, Construct, Field, Result, Schema};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

static GLOBAL: Lazy<KindRegistry> = Lazy::new(KindRegistry::new);

/// A statically declared configuration kind.
///
/// # Examples
///
/// ```rust
/// use construct::domain::{Field, Result, Schema, Value};
/// use construct::service::{Kind, KindRegistry};
///
/// struct Conf;
///
/// impl Kind for Conf {
///     const NAME: &'static str = "doc::Conf";
///
///     fn declare(schema: &mut Schema) -> Result<()> {
///         schema.define("people", Field::with_default(Value::Sequence(vec![])))?;
///         Ok(())
///     }
/// }
///
/// let registry = KindRegistry::new();
/// registry.register::<Conf>().unwrap();
/// let mut conf = registry.instantiate(Conf::NAME);
/// assert_eq!(conf.get("people").unwrap(), Some(&Value::Sequence(vec![])));
/// ```
pub trait Kind {
    /// The registry name of the kind.
    const NAME: &'static str;

    /// Declares the fields of the kind.
    fn declare(schema: &mut Schema) -> Result<()>;
}

/// Process-wide mapping from kind name to its declared schema.
#[derive(Debug, Default)]
pub struct KindRegistry {
    kinds: RwLock<HashMap<String, Schema>>,
}

impl KindRegistry {
    /// Creates an empty, independent registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry.
    pub fn global() -> &'static KindRegistry {
        &GLOBAL
    }

    /// Registers or overwrites one field of a kind's schema.
    pub fn define(&self, kind: &str, key: impl AsKey, field: Field) -> Result<()> {
        let key = key.to_key()?;
        tracing::debug!(kind, key = %key, "defining kind field");
        let mut kinds = self.kinds.write().unwrap_or_else(PoisonError::into_inner);
        kinds.entry(kind.to_string()).or_default().define(key, field)?;
        Ok(())
    }

    /// Applies a declaration to a kind's schema.
    ///
    /// The declaration runs against a copy; nothing is stored if it fails.
    pub fn declare<F>(&self, kind: &str, declaration: F) -> Result<()>
    where
        F: FnOnce(&mut Schema) -> Result<()>,
    {
        let mut schema = self.schema_of(kind);
        declaration(&mut schema)?;
        tracing::debug!(kind, fields = schema.len(), "declared kind");
        let mut kinds = self.kinds.write().unwrap_or_else(PoisonError::into_inner);
        kinds.insert(kind.to_string(), schema);
        Ok(())
    }

    /// Declares a statically described kind.
    pub fn register<K: Kind>(&self) -> Result<()> {
        self.declare(K::NAME, K::declare)
    }

    /// Returns a copy of a kind's current schema.
    ///
    /// Undeclared kinds have an empty schema.
    pub fn schema_of(&self, kind: &str) -> Schema {
        let kinds = self.kinds.read().unwrap_or_else(PoisonError::into_inner);
        kinds.get(kind).cloned().unwrap_or_default()
    }

    /// Returns `true` if the kind has been declared.
    pub fn contains(&self, kind: &str) -> bool {
        let kinds = self.kinds.read().unwrap_or_else(PoisonError::into_inner);
        kinds.contains_key(kind)
    }

    /// Creates an empty construct carrying a copy of the kind's schema.
    pub fn instantiate(&self, kind: &str) -> Construct {
        let mut c = Construct::new();
        *c.schema_mut() = self.schema_of(kind);
        c
    }
}
