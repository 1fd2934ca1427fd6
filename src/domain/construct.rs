// SPDX-License-Identifier: MIT OR Apache-2.0

//! The construct: a schema-aware configuration tree node.
//!
//! A [`Construct`] pairs a data mapping with its own copy of a [`Schema`]. A key
//! is present if it has data, or if the schema gives it a default. Reads fall
//! back to schema defaults; construct defaults are cloned into data on first
//! read so instances never share mutable state. Deleting a key only removes its
//! data, so a schema default shows through again afterwards.
//!
//! # Examples
//!
//! ```
//! use construct::domain::{Construct, Field, Value};
//!
//! # fn main() -> construct::domain::Result<()> {
//! let mut c = Construct::new();
//! c.define("foo", Field::with_default("hello world"))?;
//! assert_eq!(c.get("foo")?, Some(&Value::from("hello world")));
//!
//! c.set("foo", "hey")?;
//! assert_eq!(c.get("foo")?, Some(&Value::from("hey")));
//!
//! c.delete("foo")?;
//! assert_eq!(c.get("foo")?, Some(&Value::from("hello world")));
//! # Ok(())
//! # }
//! ```

use crate::domain::errors::{ConstructError, Result};
use crate::domain::key::{AsKey, Key};
use crate::domain::materialize::{self, Resolution};
use crate::domain::schema::{Field, Schema};
use crate::domain::value::{coerce, Mapping, Value};
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// A configuration tree node combining data with a schema.
///
/// Two constructs are equal when both their schemas and their data are deeply
/// equal. `Clone` produces a fully independent deep copy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Construct {
    data: BTreeMap<Key, Value>,
    schema: Schema,
}

impl Construct {
    /// Creates an empty construct with an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a construct by assigning every entry of `initial`, then
    /// installing `schema`.
    ///
    /// Entries go through the same key normalization and hash coercion as
    /// [`Construct::set`]. Nothing is returned if any key is rejected.
    pub fn construct<K, V, I>(initial: I, schema: Schema) -> Result<Self>
    where
        K: AsKey,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut c = Construct::new();
        for (key, value) in initial {
            c.set(key, value)?;
        }
        c.schema = schema;
        Ok(c)
    }

    /// Creates a construct from a plain tree and schema overrides.
    ///
    /// The tree must be a mapping; `Null` is treated as an empty one and a
    /// construct contributes its data.
    pub fn from_tree(tree: Value, schema: Schema) -> Result<Self> {
        let entries = tree_entries(tree)?;
        Construct::construct(entries, schema)
    }

    /// Builds a construct from text-keyed entries with an empty schema.
    pub(crate) fn from_text_entries(entries: Vec<(String, Value)>) -> Self {
        let data = entries
            .into_iter()
            .map(|(k, v)| (Key::from(k), coerce(v)))
            .collect();
        Construct {
            data,
            schema: Schema::new(),
        }
    }

    /// Returns the instance schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the instance schema mutably.
    ///
    /// Use this to remove a key from the schema entirely.
    pub fn schema_mut(&mut self) -> &mut Schema {
        &mut self.schema
    }

    /// Returns the directly held data.
    pub fn data(&self) -> &BTreeMap<Key, Value> {
        &self.data
    }

    /// Defines a field in this instance's schema only.
    pub fn define(&mut self, key: impl AsKey, field: Field) -> Result<()> {
        self.schema.define(key, field)?;
        Ok(())
    }

    /// Looks up a key, falling back to its schema default.
    ///
    /// A construct default is cloned into this instance's data on first read and
    /// the clone is returned. Any other default is returned in place.
    pub fn get(&mut self, key: impl AsKey) -> Result<Option<&Value>> {
        let key = key.to_key()?;
        self.materialize_default(&key);
        Ok(self.data.get(&key).or_else(|| self.schema.default_for(&key)))
    }

    /// Looks up a key for mutation.
    ///
    /// Any default, whatever its kind, is cloned into data before a mutable
    /// reference is handed out.
    pub fn get_mut(&mut self, key: impl AsKey) -> Result<Option<&mut Value>> {
        let key = key.to_key()?;
        if !self.data.contains_key(&key) {
            if let Some(value) = self.schema.field(&key).and_then(materialize::materialize_owned) {
                tracing::trace!(key = %key, "materializing default for mutable access");
                self.data.insert(key.clone(), value);
            }
        }
        Ok(self.data.get_mut(&key))
    }

    /// Looks up a nested construct for mutation.
    ///
    /// Returns `None` if the key is absent or does not hold a construct.
    pub fn section_mut(&mut self, key: impl AsKey) -> Result<Option<&mut Construct>> {
        Ok(self.get_mut(key)?.and_then(Value::as_construct_mut))
    }

    /// Looks up a key without materializing anything.
    pub fn peek(&self, key: impl AsKey) -> Result<Option<&Value>> {
        let key = key.to_key()?;
        Ok(self.data.get(&key).or_else(|| self.schema.default_for(&key)))
    }

    /// Assigns a value, replacing any previous data for the key.
    ///
    /// Text-keyed mappings are promoted to constructs. A rejected key leaves
    /// the construct unchanged.
    pub fn set(&mut self, key: impl AsKey, value: impl Into<Value>) -> Result<()> {
        let key = key.to_key()?;
        self.data.insert(key, coerce(value.into()));
        Ok(())
    }

    /// Returns `true` if the key has data or a schema default.
    pub fn includes(&self, key: impl AsKey) -> Result<bool> {
        let key = key.to_key()?;
        Ok(self.data.contains_key(&key) || self.schema.has_default(&key))
    }

    /// Removes the key's data and returns it. The schema is left untouched.
    pub fn delete(&mut self, key: impl AsKey) -> Result<Option<Value>> {
        let key = key.to_key()?;
        Ok(self.data.remove(&key))
    }

    /// Returns every key with data or a schema entry, in order.
    pub fn keys(&self) -> BTreeSet<Key> {
        self.data
            .keys()
            .chain(self.schema.keys())
            .cloned()
            .collect()
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.keys().len()
    }

    /// Returns `true` if there is neither data nor schema.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.schema.is_empty()
    }

    /// Removes all data. The schema is left untouched.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Returns a fully independent copy of this construct.
    pub fn deep_clone(&self) -> Self {
        self.clone()
    }

    /// Resolves every key, in order.
    ///
    /// Resolution behaves exactly like [`Construct::get`], so construct defaults
    /// are materialized as a side effect. Keys whose field has no default yield
    /// `None`.
    pub fn each(&mut self) -> Vec<(Key, Option<&Value>)> {
        let keys = self.keys();
        for key in &keys {
            self.materialize_default(key);
        }
        keys.into_iter()
            .map(|key| {
                let value = self.data.get(&key).or_else(|| self.schema.default_for(&key));
                (key, value)
            })
            .collect()
    }

    /// Flattens this construct into a plain mapping of every key.
    ///
    /// Nested constructs are flattened recursively and keys without a value
    /// map to `Null`. Nothing is materialized.
    pub fn to_hash(&self) -> Mapping {
        self.keys()
            .into_iter()
            .map(|key| {
                let value = self
                    .data
                    .get(&key)
                    .or_else(|| self.schema.default_for(&key))
                    .map_or(Value::Null, Value::flatten);
                (key.into_string(), value)
            })
            .collect()
    }

    /// Encodes this construct into a plain tree for serialization.
    ///
    /// Non-empty construct defaults that live only in the schema are emitted
    /// first, then the data is laid over them. Scalar defaults are not written.
    pub fn to_tree(&self) -> Mapping {
        let mut tree = Mapping::new();
        for (key, field) in self.schema.iter() {
            if let Some(Value::Construct(default)) = field.default_value() {
                let encoded = default.to_tree();
                if !encoded.is_empty() {
                    tree.insert(key.as_str(), encoded);
                }
            }
        }
        for (key, value) in &self.data {
            tree.insert(key.as_str(), value.encode());
        }
        tree
    }

    /// Assigns every top-level entry of a plain tree into this construct.
    ///
    /// All keys are checked before anything is written.
    pub fn merge_tree(&mut self, tree: Value) -> Result<()> {
        let entries = tree_entries(tree)?
            .into_iter()
            .map(|(k, v)| -> Result<(Key, Value)> { Ok((k.to_key()?, v)) })
            .collect::<Result<Vec<_>>>()?;
        for (key, value) in entries {
            self.data.insert(key, coerce(value));
        }
        Ok(())
    }

    /// Clones a construct default into data if the key has no data yet.
    fn materialize_default(&mut self, key: &Key) {
        if self.data.contains_key(key) {
            return;
        }
        if let Some(Resolution::Materialize(value)) =
            self.schema.field(key).and_then(materialize::resolve)
        {
            tracing::trace!(key = %key, "materializing construct default");
            self.data.insert(key.clone(), value);
        }
    }
}

/// Splits a top-level tree into its entries.
fn tree_entries(tree: Value) -> Result<Vec<(Value, Value)>> {
    match tree {
        Value::Null => Ok(Vec::new()),
        Value::Mapping(map) => Ok(map.into_iter().collect()),
        Value::Construct(c) => Ok(c
            .data
            .into_iter()
            .map(|(k, v)| (Value::String(k.into_string()), v))
            .collect()),
        other => Err(ConstructError::decode(format!(
            "expected a mapping at the top level, got {}",
            other.kind_name()
        ))),
    }
}

impl Serialize for Construct {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_tree().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Construct {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let tree = Value::deserialize(deserializer)?;
        Construct::from_tree(tree, Schema::new()).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complex() -> Construct {
        let mut c = Construct::new();
        c.set("foo", "hi").unwrap();
        c.set("bar", Mapping::from_iter([("baz", 2)])).unwrap();
        c.section_mut("bar")
            .unwrap()
            .unwrap()
            .set("zoom", vec![1, 2, 3])
            .unwrap();
        c
    }

    #[test]
    fn test_unset_key_is_absent() {
        let mut c = Construct::new();
        assert_eq!(c.get("foo").unwrap(), None);
        assert!(!c.includes("foo").unwrap());
    }

    #[test]
    fn test_read_after_write() {
        let mut c = Construct::new();
        c.set("foo", 1).unwrap();
        assert!(c.includes("foo").unwrap());
        assert_eq!(c.get("foo").unwrap(), Some(&Value::from(1)));
    }

    #[test]
    fn test_text_and_symbol_keys_are_indifferent() {
        let mut c = Construct::new();
        c.set(Key::from("foo"), "x").unwrap();
        assert_eq!(c.peek("foo").unwrap(), c.peek(Key::from("foo")).unwrap());
        c.set("foo", "y").unwrap();
        assert_eq!(c.get(Key::from("foo")).unwrap(), Some(&Value::from("y")));
    }

    #[test]
    fn test_invalid_key_leaves_data_unchanged() {
        let mut c = Construct::new();
        c.set("a", 1).unwrap();
        let before = c.clone();

        let err = c.set(Value::from(3.14), "x").unwrap_err();
        assert!(matches!(err, ConstructError::InvalidKeyKind { .. }));
        assert_eq!(c, before);
    }

    #[test]
    fn test_invalid_key_rejected_everywhere() {
        let mut c = Construct::new();
        let bad = Value::from(2);
        assert!(c.get(&bad).is_err());
        assert!(c.peek(&bad).is_err());
        assert!(c.includes(&bad).is_err());
        assert!(c.delete(&bad).is_err());
    }

    #[test]
    fn test_assigned_mapping_becomes_construct() {
        let mut c = Construct::new();
        c.set("people", Mapping::from_iter([("mary", true), ("joe", false)]))
            .unwrap();

        let people = c.get("people").unwrap().unwrap().as_construct().unwrap();
        assert_eq!(people.peek("mary").unwrap(), Some(&Value::Bool(true)));
        assert_eq!(
            people.to_hash(),
            Mapping::from_iter([("mary", true), ("joe", false)])
        );
    }

    #[test]
    fn test_opaque_mapping_is_stored_as_is() {
        let mut c = Construct::new();
        let numbers = Mapping::from_iter([(2, 1)]);
        c.set("numbers", numbers.clone()).unwrap();
        assert_eq!(c.get("numbers").unwrap(), Some(&Value::Mapping(numbers)));
    }

    #[test]
    fn test_scalar_default() {
        let mut c = Construct::new();
        c.define("foo", Field::with_default("hello world").describe("A field for foos."))
            .unwrap();
        assert!(c.includes("foo").unwrap());
        assert_eq!(c.get("foo").unwrap(), Some(&Value::from("hello world")));
        assert!(c.data().is_empty());
    }

    #[test]
    fn test_field_without_default_is_not_included() {
        let mut c = Construct::new();
        c.define("foo", Field::new()).unwrap();
        assert!(!c.includes("foo").unwrap());
        assert_eq!(c.get("foo").unwrap(), None);
        assert!(c.keys().contains(&Key::from("foo")));
    }

    #[test]
    fn test_assignment_overrides_default() {
        let mut c = Construct::new();
        c.define("foo", Field::with_default("hello world")).unwrap();
        c.set("foo", "hey").unwrap();
        assert_eq!(c.get("foo").unwrap(), Some(&Value::from("hey")));
    }

    #[test]
    fn test_delete_falls_back_to_schema() {
        let mut c = Construct::new();
        c.define("foo", Field::with_default("default")).unwrap();
        c.set("foo", "assigned").unwrap();

        assert_eq!(c.delete("foo").unwrap(), Some(Value::from("assigned")));
        assert!(c.includes("foo").unwrap());
        assert_eq!(c.get("foo").unwrap(), Some(&Value::from("default")));
    }

    #[test]
    fn test_construct_default_materializes_on_read() {
        let mut c = Construct::new();
        c.define("db", Field::with_default(Construct::new())).unwrap();
        assert!(c.data().is_empty());

        c.get("db").unwrap();
        assert!(c.data().contains_key("db"));
    }

    #[test]
    fn test_materialized_default_does_not_touch_schema() {
        let mut c = Construct::new();
        c.define("db", Field::with_default(Construct::new())).unwrap();
        c.section_mut("db").unwrap().unwrap().set("host", "zoom").unwrap();

        let default = c.schema().default_for(&Key::from("db")).unwrap();
        assert_eq!(default, &Value::Construct(Construct::new()));
        assert_eq!(
            c.peek("db").unwrap().unwrap().as_construct().unwrap().peek("host").unwrap(),
            Some(&Value::from("zoom"))
        );
    }

    #[test]
    fn test_get_mut_isolates_sequence_default() {
        let mut c = Construct::new();
        c.define("people", Field::with_default(Value::Sequence(vec![])))
            .unwrap();
        c.get_mut("people")
            .unwrap()
            .unwrap()
            .as_sequence_mut()
            .unwrap()
            .push(Value::from("mary"));

        assert_eq!(c.get("people").unwrap(), Some(&Value::from(vec!["mary"])));
        assert_eq!(
            c.schema().default_for(&Key::from("people")),
            Some(&Value::Sequence(vec![]))
        );
    }

    #[test]
    fn test_keys_union() {
        let mut c = Construct::new();
        c.set("a", 1).unwrap();
        c.define("a", Field::with_default(0)).unwrap();
        c.define("b", Field::with_default(2)).unwrap();

        let keys: Vec<_> = c.keys().into_iter().collect();
        assert_eq!(keys, vec![Key::from("a"), Key::from("b")]);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_clear_keeps_schema() {
        let mut c = Construct::new();
        c.define("a", Field::with_default(0)).unwrap();
        c.set("a", 1).unwrap();
        c.set("b", 2).unwrap();

        c.clear();
        assert!(c.data().is_empty());
        assert_eq!(c.get("a").unwrap(), Some(&Value::from(0)));
        assert!(!c.includes("b").unwrap());
    }

    #[test]
    fn test_equality_considers_schema() {
        let mut a = Construct::new();
        let b = Construct::new();
        assert_eq!(a, b);

        a.define("x", Field::new()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_deep_clone_is_independent() {
        let mut original = complex();
        let mut copy = original.deep_clone();
        assert_eq!(copy, original);

        copy.section_mut("bar").unwrap().unwrap().set("baz", 3).unwrap();
        assert_ne!(copy, original);

        original.section_mut("bar").unwrap().unwrap().delete("zoom").unwrap();
        let bar = copy.peek("bar").unwrap().unwrap().as_construct().unwrap();
        assert_eq!(bar.peek("zoom").unwrap(), Some(&Value::from(vec![1, 2, 3])));
    }

    #[test]
    fn test_each_materializes() {
        let mut c = Construct::new();
        c.set("a", 1).unwrap();
        c.define("sub", Field::with_default(Construct::new())).unwrap();
        c.define("bare", Field::new()).unwrap();

        let pairs = c.each();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0], (Key::from("a"), Some(&Value::from(1))));
        assert_eq!(pairs[1], (Key::from("bare"), None));
        assert_eq!(pairs[2].0, Key::from("sub"));

        assert!(c.data().contains_key("sub"));
    }

    #[test]
    fn test_to_hash_is_pure_and_flat() {
        let mut c = complex();
        c.define("sub", Field::with_default(Construct::new())).unwrap();
        c.define("greeting", Field::with_default("hello")).unwrap();

        let hash = c.to_hash();
        assert!(!c.data().contains_key("sub"));

        let expected = Mapping::from_iter([
            ("foo", Value::from("hi")),
            (
                "bar",
                Value::Mapping(Mapping::from_iter([
                    ("baz", Value::from(2)),
                    ("zoom", Value::from(vec![1, 2, 3])),
                ])),
            ),
            ("sub", Value::Mapping(Mapping::new())),
            ("greeting", Value::from("hello")),
        ]);
        assert_eq!(hash, expected);
    }

    #[test]
    fn test_to_tree_complex() {
        let expected = Mapping::from_iter([
            ("foo", Value::from("hi")),
            (
                "bar",
                Value::Mapping(Mapping::from_iter([
                    ("baz", Value::from(2)),
                    ("zoom", Value::from(vec![1, 2, 3])),
                ])),
            ),
        ]);
        assert_eq!(complex().to_tree(), expected);
    }

    #[test]
    fn test_to_tree_skips_empty_and_scalar_defaults() {
        let mut c = Construct::new();
        c.define("empty", Field::with_default(Construct::new())).unwrap();
        c.define("greeting", Field::with_default("hello")).unwrap();
        assert!(c.to_tree().is_empty());
    }

    #[test]
    fn test_to_tree_emits_schema_held_defaults() {
        let mut db = Construct::new();
        db.set("host", "127.0.0.1").unwrap();
        let mut c = Construct::new();
        c.define("db", Field::with_default(db)).unwrap();

        let tree = c.to_tree();
        let expected = Mapping::from_iter([(
            "db",
            Value::Mapping(Mapping::from_iter([("host", "127.0.0.1")])),
        )]);
        assert_eq!(tree, expected);
    }

    #[test]
    fn test_to_tree_data_overrides_schema() {
        let mut db = Construct::new();
        db.set("host", "127.0.0.1").unwrap();
        let mut c = Construct::new();
        c.define("db", Field::with_default(db)).unwrap();
        c.section_mut("db").unwrap().unwrap().set("user", "admin").unwrap();

        let expected = Mapping::from_iter([(
            "db",
            Value::Mapping(Mapping::from_iter([
                ("host", "127.0.0.1"),
                ("user", "admin"),
            ])),
        )]);
        assert_eq!(c.to_tree(), expected);
    }

    #[test]
    fn test_from_tree_rejects_scalars() {
        let err = Construct::from_tree(Value::from(5), Schema::new()).unwrap_err();
        assert!(matches!(err, ConstructError::Decode { .. }));
    }

    #[test]
    fn test_from_tree_null_is_empty() {
        let c = Construct::from_tree(Value::Null, Schema::new()).unwrap();
        assert!(c.is_empty());
    }

    #[test]
    fn test_construct_installs_schema_after_data() {
        let schema = Schema::new().with("a", Field::with_default(0)).unwrap();
        let mut c = Construct::construct([("a", 1)], schema).unwrap();
        assert_eq!(c.get("a").unwrap(), Some(&Value::from(1)));
        c.delete("a").unwrap();
        assert_eq!(c.get("a").unwrap(), Some(&Value::from(0)));
    }

    #[test]
    fn test_merge_tree_is_all_or_nothing() {
        let mut c = Construct::new();
        c.set("keep", 1).unwrap();
        let mut tree = Mapping::new();
        tree.insert("ok", 2);
        tree.insert(3, "bad");

        assert!(c.merge_tree(Value::Mapping(tree)).is_err());
        assert!(!c.includes("ok").unwrap());
        assert_eq!(c.len(), 1);
    }
}
