//! Toolchain descriptor
//!
//! The fixed set of scripts, pre-commit hooks and development dependencies
//! that kickstart writes into every project manifest.

use serde::Serialize;

/// A script name and the command it runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptEntry {
    /// Script name (key under `scripts`)
    pub name: &'static str,
    /// Shell command string
    pub command: &'static str,
}

/// Static table of what kickstart always installs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolchainDescriptor {
    /// Scripts written under `scripts`
    pub scripts: &'static [ScriptEntry],
    /// Script names run as pre-commit hooks, in order
    pub hooks: &'static [&'static str],
    /// Development dependencies written under `devDependencies`
    pub dev_dependencies: &'static [&'static str],
}

/// The standard/tap toolchain
pub static STANDARD_TOOLCHAIN: ToolchainDescriptor = ToolchainDescriptor {
    scripts: &[
        ScriptEntry {
            name: "lint",
            command: "standard --verbose | snazzy",
        },
        ScriptEntry {
            name: "lint-ci",
            command: "standard --verbose",
        },
        ScriptEntry {
            name: "test",
            command: "tap test/*.js",
        },
        ScriptEntry {
            name: "test-ci",
            command: "tap --reporter=tap test/*.js",
        },
    ],
    hooks: &["lint", "test"],
    dev_dependencies: &["standard", "snazzy", "tap", "pre-commit"],
};

impl ToolchainDescriptor {
    /// The toolchain installed by default
    pub fn standard() -> &'static Self {
        &STANDARD_TOOLCHAIN
    }
}

/// A dependency name with its version range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencySpec {
    /// Package name
    pub name: String,
    /// Version range, e.g. `^14.2.0`
    pub range: String,
}

impl DependencySpec {
    /// Pin a resolved version with a caret range
    pub fn caret(name: impl Into<String>, version: &str) -> Self {
        Self {
            name: name.into(),
            range: format!("^{}", version.trim_start_matches('^')),
        }
    }
}

impl std::fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.range)
    }
}
