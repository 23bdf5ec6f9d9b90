//! CLI command implementations.

pub mod exec;
pub mod install;
