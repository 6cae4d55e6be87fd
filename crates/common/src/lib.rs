//! Shared plumbing for the workspace crates: logging setup and
//! runtime environment checks.

pub mod env;
pub mod utils;
