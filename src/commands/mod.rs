//! Command implementations for the local-store CLI

pub mod install;
pub mod validate;
