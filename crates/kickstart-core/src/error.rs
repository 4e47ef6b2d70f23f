//! Error types for kickstart-core

use thiserror::Error;

/// Result type alias using kickstart-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Broad failure classes, one per exit-relevant category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No manifest where one is required
    ConfigurationMissing,
    /// No usable installer binary on the host
    EnvironmentUnsatisfied,
    /// Registry unreachable, package absent, or unusable version data
    RemoteUnavailable,
    /// Manifest could not be written
    PersistenceFailure,
    /// Installer exited non-zero, died from a signal, or timed out
    ChildProcessFailure,
    /// A template file could not be written
    WriteError,
    /// Runtime configuration is invalid
    Configuration,
}

/// A single template copy that failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFailure {
    /// Destination file name (e.g. `.gitignore`)
    pub destination: String,
    /// Underlying I/O error message
    pub message: String,
}

/// Core error types for kickstart
#[derive(Error, Debug)]
pub enum Error {
    /// Manifest file is absent
    #[error("Manifest not found: {path}")]
    ManifestNotFound { path: String },

    /// Manifest exists but is not a structured document
    #[error("Manifest {path} is unreadable: {message}")]
    ManifestUnreadable { path: String, message: String },

    /// Manifest could not be persisted
    #[error("Failed to write manifest {path}")]
    ManifestWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// None of the installer candidates resolved on the search path
    #[error("No package manager found (tried: {candidates})")]
    NoInstallerFound { candidates: String },

    /// Registry could not be queried
    #[error("Registry unavailable: {message}")]
    RegistryUnavailable { message: String },

    /// Registry has no such package
    #[error("Package not found in registry: {name}")]
    PackageNotFound { name: String },

    /// Registry returned a version that is not semver
    #[error("Registry returned invalid version '{version}' for {name}")]
    InvalidVersion { name: String, version: String },

    /// Installer process could not be started
    #[error("Failed to start {manager}")]
    InstallerSpawn {
        manager: String,
        #[source]
        source: std::io::Error,
    },

    /// Installer exited unsuccessfully
    #[error("{manager} install failed: {status}")]
    InstallerFailed {
        manager: String,
        code: Option<i32>,
        status: String,
    },

    /// Installer ran past the configured timeout
    #[error("{manager} install timed out after {secs}s")]
    InstallerTimedOut { manager: String, secs: u64 },

    /// One or more template copies failed
    #[error("Failed to write {} template file(s): {}", .failures.len(), summarize(.failures))]
    TemplateWrite { failures: Vec<TemplateFailure> },

    /// Template is not bundled with this build
    #[error("Template not found: {name}")]
    TemplateNotFound { name: String },

    /// Invalid runtime configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn summarize(failures: &[TemplateFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} ({})", f.destination, f.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Create a manifest not found error
    pub fn manifest_not_found(path: impl Into<String>) -> Self {
        Self::ManifestNotFound { path: path.into() }
    }

    /// Create a manifest unreadable error
    pub fn manifest_unreadable(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ManifestUnreadable {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a manifest write error
    pub fn manifest_write(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::ManifestWrite {
            path: path.into(),
            source,
        }
    }

    /// Create a no installer found error from the candidates that were probed
    pub fn no_installer_found<T: std::fmt::Display>(candidates: &[T]) -> Self {
        Self::NoInstallerFound {
            candidates: candidates
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Create a registry unavailable error
    pub fn registry_unavailable(message: impl Into<String>) -> Self {
        Self::RegistryUnavailable {
            message: message.into(),
        }
    }

    /// Create a package not found error
    pub fn package_not_found(name: impl Into<String>) -> Self {
        Self::PackageNotFound { name: name.into() }
    }

    /// Create an invalid version error
    pub fn invalid_version(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::InvalidVersion {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Create an installer spawn error
    pub fn installer_spawn(manager: impl Into<String>, source: std::io::Error) -> Self {
        Self::InstallerSpawn {
            manager: manager.into(),
            source,
        }
    }

    /// Create an installer failure from its exit code (`None` when killed by a signal)
    pub fn installer_failed(
        manager: impl Into<String>,
        code: Option<i32>,
        status: impl Into<String>,
    ) -> Self {
        Self::InstallerFailed {
            manager: manager.into(),
            code,
            status: status.into(),
        }
    }

    /// Create an installer timeout error
    pub fn installer_timed_out(manager: impl Into<String>, secs: u64) -> Self {
        Self::InstallerTimedOut {
            manager: manager.into(),
            secs,
        }
    }

    /// Create a template write error
    pub fn template_write(failures: Vec<TemplateFailure>) -> Self {
        Self::TemplateWrite { failures }
    }

    /// Create a template not found error
    pub fn template_not_found(name: impl Into<String>) -> Self {
        Self::TemplateNotFound { name: name.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ManifestNotFound { .. } | Self::ManifestUnreadable { .. } => {
                ErrorKind::ConfigurationMissing
            }
            Self::ManifestWrite { .. } => ErrorKind::PersistenceFailure,
            Self::NoInstallerFound { .. } => ErrorKind::EnvironmentUnsatisfied,
            Self::RegistryUnavailable { .. }
            | Self::PackageNotFound { .. }
            | Self::InvalidVersion { .. } => ErrorKind::RemoteUnavailable,
            Self::InstallerSpawn { .. }
            | Self::InstallerFailed { .. }
            | Self::InstallerTimedOut { .. } => ErrorKind::ChildProcessFailure,
            Self::TemplateWrite { .. } | Self::TemplateNotFound { .. } | Self::Io(_) => {
                ErrorKind::WriteError
            }
            Self::InvalidConfig { .. } | Self::ConfigNotFound { .. } => ErrorKind::Configuration,
        }
    }

    /// Process exit code for this error
    ///
    /// Installer exit codes in `1..=255` are passed through; everything else is `1`.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InstallerFailed {
                code: Some(code), ..
            } => u8::try_from(*code)
                .ok()
                .filter(|c| *c != 0)
                .unwrap_or(1),
            _ => 1,
        }
    }
}
