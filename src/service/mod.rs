// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer: kind registry, construction, and persistence.

pub mod builder;
pub mod loader;
pub mod registry;

pub use builder::ConstructBuilder;
pub use loader::Loader;
pub use registry::{Kind, KindRegistry};
