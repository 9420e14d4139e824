//! Errors shared by the solution and project manifest models.
//!
//! Both models distinguish a manifest that does not exist from one whose
//! structure cannot be recovered; callers treat the two differently depending
//! on whether the failing manifest is the solution or a single project.

mod types;

pub use types::*;
