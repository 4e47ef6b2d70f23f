//! Type definitions for kickstart

pub mod package_manager;
pub mod template;
pub mod toolchain;

pub use package_manager::PackageManager;
pub use template::{TemplateFile, TemplateKind};
pub use toolchain::{DependencySpec, ScriptEntry, ToolchainDescriptor};
