//! Runtime configuration

mod loader;
mod runtime;

pub use loader::{ConfigLoader, ENV_PREFIX};
pub use runtime::{ConfigOverlay, InstallConfig, RegistryConfig, ResolveMode, RuntimeConfig};
