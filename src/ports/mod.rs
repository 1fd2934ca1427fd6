// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the interfaces the construct core uses to reach the
//! outside world. They are implemented by adapters in the adapters layer.

pub mod codec;

// Re-export commonly used types
pub use codec::TreeCodec;
