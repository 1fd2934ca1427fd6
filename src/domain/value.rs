// SPDX-License-Identifier: MIT OR Apache-2.0

//! The recursive value type stored in a construct.
//!
//! A [`Value`] is either a scalar, a sequence, an opaque [`Mapping`], or a nested
//! [`Construct`]. Plain mappings whose keys are all text are promoted to
//! constructs by [`coerce`] whenever they are assigned; mappings with any other
//! key kind stay opaque so callers can store arbitrary lookup tables.

use crate::domain::construct::Construct;
use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A numeric scalar.
///
/// Conversions keep integers that fit in an `i64` as `Integer` and larger ones
/// as `Unsigned`; the two integer forms compare by value. Floats compare and
/// hash by value, with every NaN equal to every other NaN, so numbers can key a
/// [`Mapping`].
#[derive(Clone, Copy, Debug)]
pub enum Number {
    /// A signed integer
    Integer(i64),
    /// An unsigned integer too large for `Integer`
    Unsigned(u64),
    /// A floating point number
    Float(f64),
}

impl Number {
    /// Returns the number as an `i64` if it is an integer in range.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(n) => Some(*n),
            Number::Unsigned(n) => i64::try_from(*n).ok(),
            Number::Float(_) => None,
        }
    }

    /// Returns the number as a `u64` if it is a non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Number::Integer(n) => u64::try_from(*n).ok(),
            Number::Unsigned(n) => Some(*n),
            Number::Float(_) => None,
        }
    }

    /// Returns the number as an `f64`, widening integers.
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(n) => *n as f64,
            Number::Unsigned(n) => *n as f64,
            Number::Float(f) => *f,
        }
    }

    /// Returns `true` if the number is an integer of either sign.
    pub fn is_integer(&self) -> bool {
        !matches!(self, Number::Float(_))
    }

    fn as_i128(&self) -> Option<i128> {
        match self {
            Number::Integer(n) => Some(i128::from(*n)),
            Number::Unsigned(n) => Some(i128::from(*n)),
            Number::Float(_) => None,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Float(a), Number::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Number::Float(_), _) | (_, Number::Float(_)) => false,
            (a, b) => a.as_i128() == b.as_i128(),
        }
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Number::Float(f) => {
                state.write_u8(1);
                // 0.0 and -0.0 compare equal, so they must hash alike
                let bits = if *f == 0.0 {
                    0
                } else if f.is_nan() {
                    f64::NAN.to_bits()
                } else {
                    f.to_bits()
                };
                bits.hash(state);
            }
            integer => {
                state.write_u8(0);
                integer.as_i128().hash(state);
            }
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(n) => write!(f, "{}", n),
            Number::Unsigned(n) => write!(f, "{}", n),
            Number::Float(x) => write!(f, "{}", x),
        }
    }
}

/// A value held by a construct or one of its schema defaults.
///
/// # Examples
///
/// ```
/// use construct::domain::value::Value;
///
/// let value = Value::from(vec![1, 2, 3]);
/// assert_eq!(value.as_sequence().map(|s| s.len()), Some(3));
/// assert_eq!(Value::from("hi").as_str(), Some("hi"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Value {
    /// The absence of a value
    #[default]
    Null,
    /// A boolean
    Bool(bool),
    /// A number
    Number(Number),
    /// A text string
    String(String),
    /// An ordered list of values
    Sequence(Vec<Value>),
    /// A mapping that was not promoted to a construct
    Mapping(Mapping),
    /// A nested construct
    Construct(Construct),
}

impl Value {
    /// Returns a short name for the kind of this value.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(n) if n.is_integer() => "integer",
            Value::Number(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::Construct(_) => "construct",
        }
    }

    /// Returns `true` if the value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if this is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Returns the number as an `f64`, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    /// Returns the string slice, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the sequence, if this is one.
    pub fn as_sequence(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// Returns the sequence mutably, if this is one.
    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// Returns the opaque mapping, if this is one.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the nested construct, if this is one.
    pub fn as_construct(&self) -> Option<&Construct> {
        match self {
            Value::Construct(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the nested construct mutably, if this is one.
    pub fn as_construct_mut(&mut self) -> Option<&mut Construct> {
        match self {
            Value::Construct(c) => Some(c),
            _ => None,
        }
    }

    /// Recursively replaces every nested construct with its flattened form.
    pub(crate) fn flatten(&self) -> Value {
        match self {
            Value::Construct(c) => Value::Mapping(c.to_hash()),
            Value::Sequence(seq) => Value::Sequence(seq.iter().map(Value::flatten).collect()),
            Value::Mapping(map) => Value::Mapping(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.flatten()))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Recursively replaces every nested construct with its encoded tree.
    pub(crate) fn encode(&self) -> Value {
        match self {
            Value::Construct(c) => Value::Mapping(c.to_tree()),
            Value::Sequence(seq) => Value::Sequence(seq.iter().map(Value::encode).collect()),
            Value::Mapping(map) => Value::Mapping(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.encode()))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

/// Promotes a plain mapping with all-text keys into a [`Construct`].
///
/// Every other value, including mappings with any non-text key, is returned
/// unchanged. Nested mappings are promoted recursively as the new construct
/// assigns its entries.
///
/// # Examples
///
/// ```
/// use construct::domain::value::{coerce, Mapping, Value};
///
/// let people: Mapping = [("mary", true), ("joe", false)].into_iter().collect();
/// assert!(coerce(Value::Mapping(people)).as_construct().is_some());
///
/// let numbers: Mapping = [(2, 1)].into_iter().collect();
/// assert!(coerce(Value::Mapping(numbers)).as_mapping().is_some());
/// ```
pub fn coerce(value: Value) -> Value {
    match value {
        Value::Mapping(map) => match map.into_text_entries() {
            Ok(entries) => Value::Construct(Construct::from_text_entries(entries)),
            Err(map) => Value::Mapping(map),
        },
        other => other,
    }
}

/// An insertion-ordered mapping with arbitrary value keys.
///
/// Equality and hashing ignore entry order.
#[derive(Clone, Debug, Default)]
pub struct Mapping {
    entries: IndexMap<Value, Value>,
}

impl Mapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty mapping with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Mapping {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Inserts an entry, returning the value it replaced.
    ///
    /// A replaced entry keeps its original position.
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns `true` if the mapping contains `key`.
    pub fn contains_key(&self, key: &Value) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter()
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.keys()
    }

    /// Splits the mapping into text-keyed entries, or gives it back unchanged
    /// if any key is not text.
    fn into_text_entries(self) -> std::result::Result<Vec<(String, Value)>, Mapping> {
        if !self.keys().all(|k| matches!(k, Value::String(_))) {
            return Err(self);
        }
        Ok(self
            .entries
            .into_iter()
            .filter_map(|(k, v)| match k {
                Value::String(s) => Some((s, v)),
                _ => None,
            })
            .collect())
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Mapping {}

impl Hash for Mapping {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut combined = 0u64;
        for (k, v) in &self.entries {
            let mut hasher = DefaultHasher::new();
            k.hash(&mut hasher);
            v.hash(&mut hasher);
            combined ^= hasher.finish();
        }
        combined.hash(state);
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Mapping::with_capacity(iter.size_hint().0);
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for Mapping {
    type Item = (Value, Value);
    type IntoIter = indexmap::map::IntoIter<Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(Number::Integer(n as i64))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Number::Integer(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(Number::Integer(n as i64))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(n) => Value::Number(Number::Integer(n)),
            Err(_) => Value::Number(Number::Unsigned(n)),
        }
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(Number::Float(f))
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(seq: Vec<T>) -> Self {
        Value::Sequence(seq.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(map)
    }
}

impl From<Construct> for Value {
    fn from(c: Construct) -> Self {
        Value::Construct(c)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Integer(n)) => serializer.serialize_i64(*n),
            Value::Number(Number::Unsigned(n)) => serializer.serialize_u64(*n),
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Sequence(seq) => serializer.collect_seq(seq),
            Value::Mapping(map) => map.serialize(serializer),
            Value::Construct(c) => c.to_tree().serialize(serializer),
        }
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            out.serialize_entry(k, v)?;
        }
        out.end()
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Value, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar, sequence, or mapping")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> std::result::Result<Value, E> {
        Ok(Value::from(n))
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> std::result::Result<Value, E> {
        Ok(Value::from(n))
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> std::result::Result<Value, E> {
        Ok(Value::from(f))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> std::result::Result<Value, E> {
        Ok(Value::from(s))
    }

    fn visit_string<E: de::Error>(self, s: String) -> std::result::Result<Value, E> {
        Ok(Value::String(s))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> std::result::Result<Value, D::Error> {
        Value::deserialize(d)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Value, A::Error> {
        let mut out = Vec::new();
        while let Some(item) = seq.next_element::<Value>()? {
            out.push(item);
        }
        Ok(Value::Sequence(out))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Value, A::Error> {
        let mut out = Mapping::with_capacity(map.size_hint().map_or(0, |n| n.min(4096)));
        while let Some((k, v)) = map.next_entry::<Value, Value>()? {
            out.insert(k, v);
        }
        Ok(Value::Mapping(out))
    }
}
