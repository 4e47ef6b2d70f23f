//! CLI command implementations

pub mod bootstrap;
