//! Registry version resolution
//!
//! Resolves the current `latest` version of each toolchain package. The
//! live resolver queries the registry once per package, concurrently; the
//! static resolver reads a bundled table. Either way the result is all or
//! nothing: one failed lookup fails the whole set.

use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::future::try_join_all;
use kickstart_core::config::RegistryConfig;
use kickstart_core::{Error, ResolveMode, Result, RuntimeConfig};
use serde::Deserialize;
use tracing::debug;

/// Resolves package names to their latest published versions
#[async_trait]
pub trait VersionResolver: Send + Sync {
    /// Resolve every name, or fail as a unit
    async fn resolve_latest(&self, names: &[&str]) -> Result<BTreeMap<String, String>>;
}

/// Build the resolver selected by the configuration
pub fn resolver_for(config: &RuntimeConfig) -> Result<Box<dyn VersionResolver>> {
    match config.resolve {
        ResolveMode::Live => Ok(Box::new(RegistryResolver::new(&config.registry)?)),
        ResolveMode::Static => Ok(Box::new(StaticResolver::new(
            config.static_versions.clone(),
        ))),
    }
}

/// The slice of the registry's version document that we read
#[derive(Debug, Deserialize)]
struct LatestVersion {
    version: String,
}

/// Resolver that queries an npm-compatible registry
pub struct RegistryResolver {
    client: reqwest::Client,
    base_url: String,
}

impl RegistryResolver {
    /// Create a resolver from registry settings
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| Error::registry_unavailable(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self::with_client(client, &config.url))
    }

    /// Create a resolver with a preconfigured client
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL of the `latest` dist-tag document for a package
    fn latest_url(&self, name: &str) -> String {
        // Scoped names keep their `@` but the separator must be escaped
        format!("{}/{}/latest", self.base_url, name.replace('/', "%2F"))
    }

    async fn fetch_latest(&self, name: &str) -> Result<(String, String)> {
        let url = self.latest_url(name);
        debug!("Fetching latest version from: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::registry_unavailable(format!("failed to query {}: {}", name, e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::package_not_found(name));
        }
        if !status.is_success() {
            return Err(Error::registry_unavailable(format!(
                "{} returned {}",
                url, status
            )));
        }

        let latest: LatestVersion = response.json().await.map_err(|e| {
            Error::registry_unavailable(format!("malformed response for {}: {}", name, e))
        })?;

        let version = validate_version(name, &latest.version)?;
        debug!("{} latest is {}", name, version);
        Ok((name.to_string(), version))
    }
}

#[async_trait]
impl VersionResolver for RegistryResolver {
    async fn resolve_latest(&self, names: &[&str]) -> Result<BTreeMap<String, String>> {
        let lookups = names.iter().map(|name| self.fetch_latest(name));
        let resolved = try_join_all(lookups).await?;
        Ok(resolved.into_iter().collect())
    }
}

/// Resolver backed by a bundled version table
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    versions: BTreeMap<String, String>,
}

impl StaticResolver {
    pub fn new(versions: BTreeMap<String, String>) -> Self {
        Self { versions }
    }
}

#[async_trait]
impl VersionResolver for StaticResolver {
    async fn resolve_latest(&self, names: &[&str]) -> Result<BTreeMap<String, String>> {
        names
            .iter()
            .map(|name| -> Result<(String, String)> {
                let version = self
                    .versions
                    .get(*name)
                    .ok_or_else(|| Error::package_not_found(*name))?;
                Ok((name.to_string(), validate_version(name, version)?))
            })
            .collect()
    }
}

fn validate_version(name: &str, version: &str) -> Result<String> {
    let trimmed = version.trim();
    semver::Version::parse(trimmed)
        .map(|v| v.to_string())
        .map_err(|_| Error::invalid_version(name, version))
}
