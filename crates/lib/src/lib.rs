//! slnstrip-lib: removing files from Visual Studio solutions
//!
//! This crate keeps the three places a source file lives in sync when a build
//! variant drops it:
//! - `solution`: the `.sln` project list
//! - `project`: each `.vcxproj` compile and include list (plus `.filters`)
//! - `disk`: the file itself
//!
//! `strip` drives the manifest side; `disk` is run separately by the caller.

pub mod disk;
pub mod grammar;
pub mod manifest;
pub mod profile;
pub mod project;
pub mod solution;
pub mod strip;
pub mod util;
