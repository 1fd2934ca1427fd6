// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key normalization.
//!
//! Every data-mapping operation on a [`Construct`](crate::domain::Construct)
//! accepts its key through the [`AsKey`] trait. Text (`&str`, `String`, a string
//! [`Value`]) and symbolic ([`Key`]) inputs normalize to the same canonical
//! `Key`; any other input kind is rejected with
//! [`ConstructError::InvalidKeyKind`].

use crate::domain::errors::{ConstructError, Result};
use crate::domain::value::Value;
use std::borrow::Borrow;
use std::fmt;

/// The canonical, symbolic form of a construct key.
///
/// # Examples
///
/// ```
/// use construct::domain::key::{AsKey, Key};
///
/// let key = Key::from("host");
/// assert_eq!("host".to_key().unwrap(), key);
/// assert_eq!(key.as_str(), "host");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(String);

impl Key {
    /// Creates a new `Key` from a `String`.
    pub fn new(key: String) -> Self {
        Key(key)
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `Key` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key(s)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key(s.to_string())
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.0
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalizes a key input into a canonical [`Key`].
pub trait AsKey {
    /// Returns the canonical key, or `InvalidKeyKind` for unsupported inputs.
    fn to_key(&self) -> Result<Key>;
}

impl AsKey for Key {
    fn to_key(&self) -> Result<Key> {
        Ok(self.clone())
    }
}

impl AsKey for str {
    fn to_key(&self) -> Result<Key> {
        Ok(Key::from(self))
    }
}

impl AsKey for String {
    fn to_key(&self) -> Result<Key> {
        Ok(Key::from(self.as_str()))
    }
}

impl AsKey for Value {
    fn to_key(&self) -> Result<Key> {
        match self {
            Value::String(s) => Ok(Key::from(s.as_str())),
            other => Err(ConstructError::invalid_key_kind(other.kind_name())),
        }
    }
}

impl<T: AsKey + ?Sized> AsKey for &T {
    fn to_key(&self) -> Result<Key> {
        (**self).to_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_key_from_str() {
        let key = Key::from("foo");
        assert_eq!(key.as_str(), "foo");
    }

    #[test]
    fn test_key_into_string() {
        let key = Key::from("foo");
        let s: String = key.into();
        assert_eq!(s, "foo");
    }

    #[test]
    fn test_key_display() {
        assert_eq!(format!("{}", Key::from("db")), "db");
    }

    #[test]
    fn test_text_and_symbol_normalize_alike() {
        let from_text = "people".to_key().unwrap();
        let from_string = String::from("people").to_key().unwrap();
        let from_symbol = Key::from("people").to_key().unwrap();
        let from_value = Value::from("people").to_key().unwrap();

        assert_eq!(from_text, from_symbol);
        assert_eq!(from_string, from_symbol);
        assert_eq!(from_value, from_symbol);
    }

    #[test]
    fn test_reference_inputs() {
        let key = Key::from("a");
        assert_eq!((&key).to_key().unwrap(), key);
        assert_eq!((&&"a").to_key().unwrap(), key);
    }

    #[test]
    fn test_rejects_other_value_kinds() {
        for value in [
            Value::from(3.14),
            Value::from(2),
            Value::from(true),
            Value::Null,
            Value::Sequence(vec![]),
        ] {
            let err = value.to_key().unwrap_err();
            assert!(matches!(err, ConstructError::InvalidKeyKind { .. }));
        }
    }

    #[test]
    fn test_key_borrow_lookup() {
        let mut map = HashMap::new();
        map.insert(Key::from("x"), 1);
        assert_eq!(map.get("x"), Some(&1));
    }

    #[test]
    fn test_key_ordering() {
        let mut keys = vec![Key::from("zoom"), Key::from("bar"), Key::from("foo")];
        keys.sort();
        assert_eq!(keys, vec![Key::from("bar"), Key::from("foo"), Key::from("zoom")]);
    }
}
