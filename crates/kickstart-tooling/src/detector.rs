//! Package manager detection
//!
//! Probes the executable search path for each installer candidate in
//! priority order. The first hit wins; remaining candidates are not probed.

use std::ffi::OsString;
use std::path::PathBuf;

use kickstart_core::{Error, PackageManager, Result};
use tracing::{debug, info};

/// Capability to resolve an executable name to a path
pub trait BinaryLookup: Send + Sync {
    /// Resolve `binary` to an executable path, or `None` if it is not installed
    fn lookup(&self, binary: &str) -> Option<PathBuf>;
}

/// Looks binaries up on the process `PATH`
#[derive(Debug, Clone, Copy, Default)]
pub struct PathLookup;

impl BinaryLookup for PathLookup {
    fn lookup(&self, binary: &str) -> Option<PathBuf> {
        which::which(binary).ok()
    }
}

/// Looks binaries up on an explicit search path
#[derive(Debug, Clone)]
pub struct SearchPathLookup {
    paths: OsString,
    cwd: PathBuf,
}

impl SearchPathLookup {
    /// Search `paths` (PATH syntax), resolving relative entries against `cwd`
    pub fn new(paths: impl Into<OsString>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            paths: paths.into(),
            cwd: cwd.into(),
        }
    }
}

impl BinaryLookup for SearchPathLookup {
    fn lookup(&self, binary: &str) -> Option<PathBuf> {
        which::which_in(binary, Some(&self.paths), &self.cwd).ok()
    }
}

/// A resolved installer binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerHandle {
    /// Which package manager this is
    pub manager: PackageManager,
    /// Resolved executable path
    pub path: PathBuf,
}

/// Pick the first candidate that resolves on the search path
pub fn detect(lookup: &dyn BinaryLookup, candidates: &[PackageManager]) -> Result<InstallerHandle> {
    for manager in candidates {
        debug!("Probing for {}", manager.binary());
        if let Some(path) = lookup.lookup(manager.binary()) {
            info!("Using {} ({})", manager, path.display());
            return Ok(InstallerHandle {
                manager: *manager,
                path,
            });
        }
    }

    Err(Error::no_installer_found(candidates))
}
