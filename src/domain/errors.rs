// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the construct crate.
//!
//! This module defines the errors that can occur while reading, writing, or
//! persisting a [`Construct`](crate::domain::Construct). All errors use
//! `thiserror` and are surfaced immediately to the caller; nothing is retried or
//! recovered internally.

use thiserror::Error;

/// The main error type for construct operations.
///
/// It is marked as `#[non_exhaustive]` to allow for future additions without
/// breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use construct::domain::errors::ConstructError;
///
/// fn lookup() -> Result<String, ConstructError> {
///     Err(ConstructError::UndefinedKey {
///         key: "database".to_string(),
///     })
/// }
///
/// assert!(lookup().is_err());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConstructError {
    /// A key was neither text nor a symbolic [`Key`](crate::domain::Key).
    #[error("construct only accepts strings and symbols as keys, got {kind}")]
    InvalidKeyKind {
        /// A short name for the rejected input kind
        kind: String,
    },

    /// An attribute-style read targeted a key with no value and no default.
    #[error("no such key {key} in construct")]
    UndefinedKey {
        /// The key that was not found
        key: String,
    },

    /// An attribute-style call received the wrong number of arguments.
    #[error("{name} takes exactly {expected} argument(s), {given} given")]
    Arity {
        /// The attribute name as it was called
        name: String,
        /// Number of arguments the call requires
        expected: usize,
        /// Number of arguments that were passed
        given: usize,
    },

    /// The byte codec rejected its input.
    #[error("Failed to decode construct: {message}")]
    Decode {
        /// The error message
        message: String,
        /// The underlying codec error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The byte codec could not encode a tree.
    #[error("Failed to encode construct: {message}")]
    Encode {
        /// The error message
        message: String,
        /// The underlying codec error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading or writing bytes.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConstructError {
    /// Creates an `InvalidKeyKind` error naming the rejected input kind.
    pub fn invalid_key_kind(kind: impl Into<String>) -> Self {
        ConstructError::InvalidKeyKind { kind: kind.into() }
    }

    /// Creates a `Decode` error without an underlying source.
    pub fn decode(message: impl Into<String>) -> Self {
        ConstructError::Decode {
            message: message.into(),
            source: None,
        }
    }
}

/// A specialized Result type for construct operations.
pub type Result<T> = std::result::Result<T, ConstructError>;
