// SPDX-License-Identifier: MIT OR Apache-2.0

//! Attribute-style access.
//!
//! [`Construct::access`] dispatches a name and its arguments the way a dynamic
//! attribute call would: `name=` with one argument assigns, a bare `name` reads
//! a key that is present, and anything else fails with an error naming the key.

use crate::domain::construct::Construct;
use crate::domain::errors::{ConstructError, Result};
use crate::domain::key::Key;
use crate::domain::value::Value;

/// Suffix that turns an attribute name into an assignment.
pub const ASSIGNMENT_MARKER: char = '=';

impl Construct {
    /// Reads or assigns a key through an attribute-style name.
    ///
    /// # Errors
    ///
    /// - `Arity` if an assignment does not get exactly one argument, or a read
    ///   gets any.
    /// - `UndefinedKey` if a read targets a key with neither data nor default.
    ///
    /// # Examples
    ///
    /// ```
    /// use construct::domain::{Construct, ConstructError, Value};
    ///
    /// # fn main() -> construct::domain::Result<()> {
    /// let mut c = Construct::new();
    /// c.access("bar=", vec![Value::from(2)])?;
    /// assert_eq!(c.access("bar", vec![])?, &Value::from(2));
    ///
    /// let missing = c.access("foo", vec![]);
    /// assert!(matches!(missing, Err(ConstructError::UndefinedKey { .. })));
    /// # Ok(())
    /// # }
    /// ```
    pub fn access(&mut self, name: &str, args: Vec<Value>) -> Result<&Value> {
        if let Some(key) = name.strip_suffix(ASSIGNMENT_MARKER) {
            let given = args.len();
            let [value]: [Value; 1] = args.try_into().map_err(|_| ConstructError::Arity {
                name: name.to_string(),
                expected: 1,
                given,
            })?;
            let key = Key::from(key);
            self.set(&key, value)?;
            return self.get(&key)?.ok_or_else(|| undefined(&key));
        }

        if !args.is_empty() {
            return Err(ConstructError::Arity {
                name: name.to_string(),
                expected: 0,
                given: args.len(),
            });
        }

        let key = Key::from(name);
        if !self.includes(&key)? {
            return Err(undefined(&key));
        }
        self.get(&key)?.ok_or_else(|| undefined(&key))
    }
}

fn undefined(key: &Key) -> ConstructError {
    ConstructError::UndefinedKey {
        key: key.to_string(),
    }
}
