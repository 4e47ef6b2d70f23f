//! Layered configuration loader
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. User config (~/.kickstart/config.yaml, or an explicit `--config` file)
//! 3. Environment variables (KICKSTART_* prefix)
//! 4. CLI flags (handled by caller)

use std::env;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use tracing::debug;

use super::runtime::{ConfigOverlay, RuntimeConfig};
use crate::error::{Error, Result};
use crate::types::PackageManager;

/// Prefix shared by every environment override
pub const ENV_PREFIX: &str = "KICKSTART_";

const DEFAULTS_FILE: &str = "defaults.yaml";

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/embedded/"]
struct EmbeddedConfigs;

/// Where the user layer comes from
#[derive(Debug, Clone)]
enum UserLayer {
    /// Optional file; skipped when absent
    Default(Option<Utf8PathBuf>),
    /// File named on the command line; must exist
    Explicit(Utf8PathBuf),
    /// No user layer
    Disabled,
}

/// Configuration hierarchy loader
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    user: UserLayer,
}

impl ConfigLoader {
    /// Loader that reads ~/.kickstart/config.yaml when it exists
    pub fn new() -> Self {
        let path = dirs::home_dir()
            .and_then(|home| Utf8PathBuf::from_path_buf(home).ok())
            .map(|home| home.join(".kickstart").join("config.yaml"));
        Self {
            user: UserLayer::Default(path),
        }
    }

    /// Loader that reads an explicit config file
    pub fn with_file(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            user: UserLayer::Explicit(path.into()),
        }
    }

    /// Loader with no user file layer
    pub fn without_user_file() -> Self {
        Self {
            user: UserLayer::Disabled,
        }
    }

    /// Load configuration from every layer, reading overrides from the process environment
    pub fn load(&self) -> Result<RuntimeConfig> {
        self.load_with_env(|key| env::var(key).ok())
    }

    /// Load configuration with a caller-supplied environment lookup
    pub fn load_with_env<F>(&self, lookup: F) -> Result<RuntimeConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::load_embedded()?;

        match &self.user {
            UserLayer::Default(Some(path)) if path.exists() => {
                config = config.merge(Self::load_overlay(path)?);
            }
            UserLayer::Explicit(path) => {
                if !path.exists() {
                    return Err(Error::config_not_found(path.as_str()));
                }
                config = config.merge(Self::load_overlay(path)?);
            }
            _ => {}
        }

        let config = Self::apply_env_overrides(config, lookup)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load the embedded defaults alone
    pub fn load_embedded() -> Result<RuntimeConfig> {
        let embedded_file = EmbeddedConfigs::get(DEFAULTS_FILE).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", DEFAULTS_FILE))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", DEFAULTS_FILE))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                DEFAULTS_FILE, e
            ))
        })
    }

    fn load_overlay(path: &Utf8Path) -> Result<ConfigOverlay> {
        debug!("Loading user config from {}", path);
        let content = fs::read_to_string(path)
            .map_err(|e| Error::invalid_config(format!("Failed to read {}: {}", path, e)))?;
        if content.trim().is_empty() {
            return Ok(ConfigOverlay::default());
        }
        serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
    }

    /// Apply environment variable overrides to runtime config
    fn apply_env_overrides<F>(mut config: RuntimeConfig, lookup: F) -> Result<RuntimeConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(val) = var("REGISTRY_URL") {
            config.registry.url = val;
        }

        if let Some(val) = var("HTTP_TIMEOUT_SECS") {
            config.registry.http_timeout_secs = val.parse().map_err(|_| {
                Error::invalid_config("KICKSTART_HTTP_TIMEOUT_SECS must be a valid number")
            })?;
        }

        if let Some(val) = var("RESOLVE") {
            config.resolve = val.parse().map_err(Error::invalid_config)?;
        }

        if let Some(val) = var("INSTALL_TIMEOUT_SECS") {
            let secs = val.parse().map_err(|_| {
                Error::invalid_config("KICKSTART_INSTALL_TIMEOUT_SECS must be a valid number")
            })?;
            config.install.timeout_secs = Some(secs);
        }

        if let Some(val) = var("INSTALLERS") {
            config.installers = val
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(str::parse::<PackageManager>)
                .collect::<std::result::Result<_, _>>()
                .map_err(Error::invalid_config)?;
        }

        Ok(config)
    }

    fn validate(config: &RuntimeConfig) -> Result<()> {
        if config.installers.is_empty() {
            return Err(Error::invalid_config(
                "at least one installer candidate is required",
            ));
        }
        if config.registry.url.trim().is_empty() {
            return Err(Error::invalid_config("registry url must not be empty"));
        }
        if config.manifest.trim().is_empty() {
            return Err(Error::invalid_config("manifest file name must not be empty"));
        }
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolveMode;
    use serial_test::serial;
    use std::collections::HashMap;
    use std::time::Duration;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_config(content: &str) -> (Utf8PathBuf, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(temp_dir.path().join("config.yaml"))
            .expect("Invalid UTF-8 path");
        fs::write(&path, content).unwrap();
        (path, temp_dir)
    }

    #[test]
    fn test_embedded_defaults() {
        let config = ConfigLoader::load_embedded().unwrap();
        assert_eq!(config.registry.url, "https://registry.npmjs.org");
        assert_eq!(config.resolve, ResolveMode::Live);
        assert_eq!(
            config.installers,
            vec![PackageManager::Pnpm, PackageManager::Npm]
        );
        assert_eq!(config.install.timeout(), None);
        assert_eq!(config.manifest, "package.json");
        for name in ["standard", "snazzy", "tap", "pre-commit"] {
            assert!(config.static_versions.contains_key(name), "missing {}", name);
        }
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let (path, _temp) = write_config(
            r#"
resolve: static
install:
  timeout-secs: 90
"#,
        );

        let config = ConfigLoader::with_file(path).load_with_env(no_env).unwrap();
        assert_eq!(config.resolve, ResolveMode::Static);
        assert_eq!(config.install.timeout(), Some(Duration::from_secs(90)));
        assert_eq!(config.registry.url, "https://registry.npmjs.org");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let loader = ConfigLoader::with_file("/nonexistent/kickstart.yaml");
        let err = loader.load_with_env(no_env).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_names_the_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(temp_dir.path().join("config.yaml"))
            .expect("Invalid UTF-8 path");
        // A directory exists but cannot be read as a file
        fs::create_dir(&path).unwrap();

        let err = ConfigLoader::with_file(path.clone())
            .load_with_env(no_env)
            .unwrap_err();

        assert!(matches!(err, Error::InvalidConfig { .. }));
        assert!(err.to_string().contains(path.as_str()));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let (path, _temp) = write_config("installers: [bun]\n");
        let err = ConfigLoader::with_file(path)
            .load_with_env(no_env)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_empty_file_is_accepted() {
        let (path, _temp) = write_config("");
        let config = ConfigLoader::with_file(path).load_with_env(no_env).unwrap();
        assert_eq!(config, ConfigLoader::load_embedded().unwrap());
    }

    #[test]
    fn test_env_overrides_file() {
        let (path, _temp) = write_config("resolve: static\n");
        let env = env_from(&[
            ("KICKSTART_RESOLVE", "live"),
            ("KICKSTART_REGISTRY_URL", "http://127.0.0.1:4873"),
            ("KICKSTART_INSTALLERS", "npm"),
            ("KICKSTART_INSTALL_TIMEOUT_SECS", "600"),
        ]);

        let config = ConfigLoader::with_file(path).load_with_env(env).unwrap();
        assert_eq!(config.resolve, ResolveMode::Live);
        assert_eq!(config.registry.url, "http://127.0.0.1:4873");
        assert_eq!(config.installers, vec![PackageManager::Npm]);
        assert_eq!(config.install.timeout_secs, Some(600));
    }

    #[test]
    fn test_invalid_env_number() {
        let env = env_from(&[("KICKSTART_HTTP_TIMEOUT_SECS", "soon")]);
        let err = ConfigLoader::without_user_file()
            .load_with_env(env)
            .unwrap_err();
        assert!(err.to_string().contains("KICKSTART_HTTP_TIMEOUT_SECS"));
    }

    #[test]
    fn test_empty_installer_list_rejected() {
        let env = env_from(&[("KICKSTART_INSTALLERS", " , ")]);
        let err = ConfigLoader::without_user_file()
            .load_with_env(env)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    #[serial]
    fn test_load_reads_process_environment() {
        env::set_var("KICKSTART_RESOLVE", "static");
        let result = ConfigLoader::without_user_file().load();
        env::remove_var("KICKSTART_RESOLVE");

        assert_eq!(result.unwrap().resolve, ResolveMode::Static);
    }
}
