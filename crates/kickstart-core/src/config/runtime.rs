//! Runtime configuration types

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::PackageManager;

/// How dependency versions are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveMode {
    /// Query the registry for the current `latest` tag
    #[default]
    Live,
    /// Use the bundled `static-versions` table
    Static,
}

impl FromStr for ResolveMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "live" => Ok(Self::Live),
            "static" => Ok(Self::Static),
            other => Err(format!(
                "unknown resolve mode '{}' (expected live or static)",
                other
            )),
        }
    }
}

impl std::fmt::Display for ResolveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Static => write!(f, "static"),
        }
    }
}

/// Fully resolved runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Package registry settings
    pub registry: RegistryConfig,
    /// Version resolution mode
    pub resolve: ResolveMode,
    /// Installer candidates in priority order
    pub installers: Vec<PackageManager>,
    /// Installer process settings
    pub install: InstallConfig,
    /// Manifest file name inside the target directory
    pub manifest: String,
    /// Bundled versions for static resolution
    pub static_versions: BTreeMap<String, String>,
}

/// Package registry settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RegistryConfig {
    /// Registry base URL
    pub url: String,
    /// Per-request timeout
    pub http_timeout_secs: u64,
    /// User-Agent header sent with registry requests
    pub user_agent: String,
}

impl RegistryConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Installer process settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InstallConfig {
    /// Kill the installer after this many seconds; `None` waits indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl InstallConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Partial configuration read from a user file
///
/// Every key is optional; present keys replace the values beneath them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigOverlay {
    #[serde(default)]
    pub registry: Option<RegistryOverlay>,
    #[serde(default)]
    pub resolve: Option<ResolveMode>,
    #[serde(default)]
    pub installers: Option<Vec<PackageManager>>,
    #[serde(default)]
    pub install: Option<InstallConfig>,
    #[serde(default)]
    pub manifest: Option<String>,
    #[serde(default)]
    pub static_versions: Option<BTreeMap<String, String>>,
}

/// Partial registry settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RegistryOverlay {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl RuntimeConfig {
    /// Apply a partial overlay on top of this configuration
    pub fn merge(mut self, overlay: ConfigOverlay) -> Self {
        if let Some(registry) = overlay.registry {
            if let Some(url) = registry.url {
                self.registry.url = url;
            }
            if let Some(secs) = registry.http_timeout_secs {
                self.registry.http_timeout_secs = secs;
            }
            if let Some(agent) = registry.user_agent {
                self.registry.user_agent = agent;
            }
        }
        if let Some(resolve) = overlay.resolve {
            self.resolve = resolve;
        }
        if let Some(installers) = overlay.installers {
            self.installers = installers;
        }
        if let Some(install) = overlay.install {
            self.install = install;
        }
        if let Some(manifest) = overlay.manifest {
            self.manifest = manifest;
        }
        // Static versions merge per package
        if let Some(versions) = overlay.static_versions {
            self.static_versions.extend(versions);
        }
        self
    }
}
