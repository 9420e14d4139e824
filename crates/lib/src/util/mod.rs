//! Shared utilities.
//!
//! Path key handling and scoped file replacement used by the manifest models.

pub mod fs;
pub mod path;
