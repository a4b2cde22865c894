//! CLI command implementations.

pub mod common;
pub mod gates;
pub mod propagate;
pub mod validate;
pub mod version;
