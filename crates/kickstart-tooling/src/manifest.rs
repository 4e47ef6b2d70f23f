//! Project manifest model and mutation
//!
//! The manifest is read into a typed document: the keys kickstart controls
//! (`scripts`, `pre-commit`, `dependencies`, `devDependencies`) are typed
//! fields, and every other key lands in an ordered bag that is written back
//! untouched.
//!
//! Serialized key order is: unrecognized keys in their original order, then
//! `scripts`, `pre-commit`, `dependencies` (if present) and `devDependencies`.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use kickstart_core::{DependencySpec, Error, Result, ToolchainDescriptor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Ordered list of script names run as pre-commit hooks
///
/// Reads the list form, a comma-separated string, or an object with a
/// `run` list; any other value reads as empty. Always writes the list form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HookList(pub Vec<String>);

impl HookList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for HookList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        fn names(items: &[Value]) -> Vec<String> {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        }

        let hooks = match Value::deserialize(deserializer)? {
            Value::String(s) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Value::Array(items) => names(&items),
            Value::Object(obj) => match obj.get("run") {
                Some(Value::Array(items)) => names(items),
                Some(Value::String(s)) => vec![s.clone()],
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        Ok(HookList(hooks))
    }
}

/// Read a mapping field, treating `null` or any non-object value as empty
fn map_or_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Map<String, Value>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => {
            warn!("Replacing non-object manifest field value {}", other);
            Ok(Map::new())
        }
    }
}

/// Read a field verbatim, keeping an explicit `null` distinct from absence
fn present<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// A project manifest (`package.json`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Keys kickstart does not manage, in document order
    #[serde(flatten)]
    pub fields: Map<String, Value>,

    /// Named scripts
    #[serde(default, deserialize_with = "map_or_empty")]
    pub scripts: Map<String, Value>,

    /// Scripts run by the pre-commit hook
    #[serde(rename = "pre-commit", default, skip_serializing_if = "HookList::is_empty")]
    pub pre_commit: HookList,

    /// Runtime dependencies, kept verbatim; `None` when the key is absent
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Value>,

    /// Development dependencies
    #[serde(rename = "devDependencies", default, deserialize_with = "map_or_empty")]
    pub dev_dependencies: Map<String, Value>,
}

impl Manifest {
    /// Read and parse the manifest at `path`
    pub fn load(path: &Utf8Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::manifest_not_found(path.as_str()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::manifest_unreadable(path.as_str(), e.to_string()))?;

        Self::parse(path.as_str(), &content)
    }

    /// Parse manifest text; `origin` names the source in errors
    pub fn parse(origin: &str, content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::manifest_unreadable(origin, e.to_string()))
    }

    /// Apply the toolchain: scripts, pre-commit hooks and dev dependencies
    ///
    /// Toolchain scripts and dependencies overwrite entries of the same name
    /// in place; other entries are left as they are. Runtime dependencies
    /// are not touched.
    pub fn apply(&mut self, toolchain: &ToolchainDescriptor, dev_dependencies: &[DependencySpec]) {
        for script in toolchain.scripts {
            self.scripts.insert(
                script.name.to_string(),
                Value::String(script.command.to_string()),
            );
        }

        self.pre_commit = HookList(toolchain.hooks.iter().map(|h| h.to_string()).collect());

        for spec in dev_dependencies {
            self.dev_dependencies
                .insert(spec.name.clone(), Value::String(spec.range.clone()));
        }
    }

    /// Serialize with 2-space indentation and a trailing newline
    pub fn to_pretty_string(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(self)
            .map_err(|e| Error::manifest_unreadable("manifest", e.to_string()))?;
        out.push('\n');
        Ok(out)
    }

    /// Write the manifest to `path` atomically
    ///
    /// The document is written to a temporary file in the same directory
    /// and renamed over the original, which keeps its permissions. A
    /// symlinked manifest is written through to the link target.
    pub fn save(&self, path: &Utf8Path) -> Result<()> {
        let content = self.to_pretty_string()?;
        let write_err = |e: std::io::Error| Error::manifest_write(path.as_str(), e);

        let target = fs::canonicalize(path)
            .ok()
            .and_then(|p| Utf8PathBuf::from_path_buf(p).ok())
            .unwrap_or_else(|| path.to_path_buf());

        let dir = match target.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;

        if let Ok(metadata) = fs::metadata(&target) {
            fs::set_permissions(tmp.path(), metadata.permissions()).map_err(write_err)?;
        }

        tmp.persist(&target).map_err(|e| write_err(e.error))?;
        debug!("Wrote {} ({} bytes)", target, content.len());
        Ok(())
    }
}

/// Pair each toolchain dependency with its resolved version as a caret range
///
/// Specs come back in toolchain order. A name missing from `versions` is an
/// error rather than a silently dropped entry.
pub fn dependency_specs(
    toolchain: &ToolchainDescriptor,
    versions: &BTreeMap<String, String>,
) -> Result<Vec<DependencySpec>> {
    toolchain
        .dev_dependencies
        .iter()
        .map(|name| {
            versions
                .get(*name)
                .map(|version| DependencySpec::caret(*name, version))
                .ok_or_else(|| Error::package_not_found(*name))
        })
        .collect()
}
