//! # kickstart-core
//!
//! Core library for the kickstart CLI providing:
//! - The error taxonomy shared by every crate, with exit-code mapping
//! - The fixed toolchain descriptor (scripts, hooks, dev dependencies)
//! - Bundled template files and their destination names
//! - Layered runtime configuration (embedded defaults, user file, environment)

pub mod config;
pub mod error;
pub mod templates;
pub mod types;

pub use config::{ConfigLoader, ResolveMode, RuntimeConfig};
pub use error::{Error, ErrorKind, Result};
pub use types::{DependencySpec, PackageManager, TemplateFile, TemplateKind, ToolchainDescriptor};
