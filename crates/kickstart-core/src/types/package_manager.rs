//! Installer identities

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Package managers kickstart knows how to drive
///
/// Both share the `<binary> install` invocation, so the identity only
/// affects which binary is probed and what is reported to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    /// pnpm (content-addressed store, preferred)
    Pnpm,
    /// npm (ships with Node.js)
    Npm,
}

impl PackageManager {
    /// Default probe order: fast and disk-efficient first, universal fallback last
    pub const DEFAULT_PRIORITY: &'static [PackageManager] =
        &[PackageManager::Pnpm, PackageManager::Npm];

    /// Executable name looked up on the search path
    pub fn binary(&self) -> &'static str {
        match self {
            Self::Pnpm => "pnpm",
            Self::Npm => "npm",
        }
    }

    /// Subcommand that installs the manifest's dependencies
    pub fn install_args(&self) -> &'static [&'static str] {
        &["install"]
    }
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.binary())
    }
}

impl FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pnpm" => Ok(Self::Pnpm),
            "npm" => Ok(Self::Npm),
            other => Err(format!("unknown package manager '{}' (expected pnpm or npm)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_priority_prefers_pnpm() {
        assert_eq!(
            PackageManager::DEFAULT_PRIORITY,
            &[PackageManager::Pnpm, PackageManager::Npm]
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("npm".parse::<PackageManager>(), Ok(PackageManager::Npm));
        assert_eq!(" PNPM ".parse::<PackageManager>(), Ok(PackageManager::Pnpm));
        assert!("yarn".parse::<PackageManager>().is_err());
    }

    #[test]
    fn test_shared_install_subcommand() {
        assert_eq!(PackageManager::Pnpm.install_args(), PackageManager::Npm.install_args());
    }
}
