// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing codec implementations.
//!
//! This module contains concrete implementations of the traits defined in the
//! ports layer.

#[cfg(feature = "yaml")]
pub mod yaml;

#[cfg(feature = "yaml")]
pub use yaml::YamlCodec;
