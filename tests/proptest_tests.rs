// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property-based tests using proptest.
//!
//! These tests generate arbitrary construct trees and check that keys, clones
//! and YAML persistence behave the same for all of them.

#![cfg(feature = "yaml")]

use construct::domain::{Construct, ConstructError, Key, Schema, Value};
use proptest::prelude::*;

fn key() -> impl Strategy<Value = String> {
    "k[a-z_]{0,6}"
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        (prop::num::f64::NORMAL | prop::num::f64::ZERO).prop_map(Value::from),
        "s[a-z]{0,8}".prop_map(Value::from),
    ]
}

fn tree() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Sequence),
            prop::collection::btree_map(key(), inner, 0..4)
                .prop_map(|m| Value::Mapping(m.into_iter().collect())),
        ]
    })
}

fn construct() -> impl Strategy<Value = Construct> {
    prop::collection::btree_map(key(), tree(), 0..6)
        .prop_map(|m| Construct::construct(m, Schema::new()).unwrap())
}

// Text and symbolic keys address the same entry
proptest! {
    #[test]
    fn test_text_and_symbol_keys_agree(k in key(), v in leaf()) {
        let mut c = Construct::new();
        c.set(k.as_str(), v.clone()).unwrap();
        prop_assert_eq!(c.get(Key::from(k.as_str())).unwrap(), Some(&v));

        let mut c = Construct::new();
        c.set(Key::from(k.as_str()), v.clone()).unwrap();
        prop_assert_eq!(c.get(k.as_str()).unwrap(), Some(&v));
    }
}

// Reading right after writing returns the written value
proptest! {
    #[test]
    fn test_read_after_write(k in key(), v in tree()) {
        let mut c = Construct::new();
        c.set(k.as_str(), v.clone()).unwrap();
        let read = c.get(k.as_str()).unwrap().unwrap();

        match (&v, read) {
            (Value::Mapping(map), Value::Construct(section)) => {
                prop_assert_eq!(&section.to_hash(), map);
            }
            (_, read) => {
                prop_assert_eq!(read, &v);
            }
        }
    }
}

// A deep clone equals its source and does not share state with it
proptest! {
    #[test]
    fn test_deep_clone_is_equal_and_independent(c in construct(), k in key()) {
        let mut copy = c.deep_clone();
        prop_assert_eq!(&copy, &c);

        copy.set(k.as_str(), "changed").unwrap();
        prop_assert_ne!(c.peek(k.as_str()).unwrap(), Some(&Value::from("changed")));
    }
}

// Dumping and loading gives back an equal construct
proptest! {
    #[test]
    fn test_yaml_round_trip(c in construct()) {
        let yaml = construct::dump(&c).unwrap();
        let loaded = construct::load(yaml.as_bytes()).unwrap();
        prop_assert_eq!(loaded, c);
    }
}

// Non-text keys are always rejected and leave the construct untouched
proptest! {
    #[test]
    fn test_non_text_keys_rejected(c in construct(), n in any::<i64>()) {
        let mut c = c;
        let before = c.clone();
        let result = c.set(Value::from(n), "x");
        prop_assert!(matches!(result, Err(ConstructError::InvalidKeyKind { .. })), "expected InvalidKeyKind error");
        prop_assert_eq!(c, before);
    }
}
