//! Install workflow orchestration
//!
//! Drives one pass of the toolchain install:
//!
//! ```text
//! Idle -> ManifestLocated -> VersionsResolved -> ManifestWritten
//!      -> ManagerDetected -> InstallRunning -> InstallSucceeded -> FilesDeployed
//!                                           \-> InstallFailed
//! ```
//!
//! Any failure ends the run. Nothing is resumable: a re-run starts from
//! `Idle` and repeats every step, each of which is idempotent. The manifest
//! is durably written before the installer is spawned, and templates are
//! deployed only after the installer exits successfully.

use std::collections::BTreeSet;

use camino::{Utf8Path, Utf8PathBuf};
use kickstart_core::{DependencySpec, PackageManager, Result, TemplateKind, ToolchainDescriptor};
use tracing::debug;

use crate::deployer::FileDeployer;
use crate::detector::{detect, BinaryLookup, InstallerHandle};
use crate::manifest::{dependency_specs, Manifest};
use crate::resolver::VersionResolver;
use crate::runner::InstallRunner;

const DEFAULT_MANIFEST: &str = "package.json";

/// Steps of the install workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowState {
    Idle,
    ManifestLocated,
    VersionsResolved,
    ManifestWritten,
    ManagerDetected,
    InstallRunning,
    InstallSucceeded,
    InstallFailed,
    FilesDeployed,
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ManifestLocated => "manifest located",
            Self::VersionsResolved => "versions resolved",
            Self::ManifestWritten => "manifest written",
            Self::ManagerDetected => "package manager detected",
            Self::InstallRunning => "install running",
            Self::InstallSucceeded => "install succeeded",
            Self::InstallFailed => "install failed",
            Self::FilesDeployed => "files deployed",
        };
        f.write_str(name)
    }
}

/// Callback invoked on every state transition
pub type StateObserver = Box<dyn Fn(WorkflowState) + Send + Sync>;

/// Outcome of a successful workflow run
#[derive(Debug, Clone)]
pub struct WorkflowReport {
    /// Installer that ran
    pub installer: InstallerHandle,
    /// Dev dependencies written to the manifest
    pub dependencies: Vec<DependencySpec>,
    /// Manifest that was rewritten
    pub manifest_path: Utf8PathBuf,
    /// Template files written after the install
    pub deployed: Vec<Utf8PathBuf>,
    /// States visited, in order
    pub trail: Vec<WorkflowState>,
}

/// Records transitions and notifies the observer
struct Progress<'a> {
    trail: Vec<WorkflowState>,
    observer: Option<&'a StateObserver>,
}

impl<'a> Progress<'a> {
    fn new(observer: Option<&'a StateObserver>) -> Self {
        let mut progress = Self {
            trail: Vec::new(),
            observer,
        };
        progress.enter(WorkflowState::Idle);
        progress
    }

    fn enter(&mut self, state: WorkflowState) {
        debug!("Workflow: {}", state);
        self.trail.push(state);
        if let Some(observer) = self.observer {
            observer(state);
        }
    }
}

/// The dependency/scripts install path
pub struct InstallWorkflow {
    toolchain: &'static ToolchainDescriptor,
    manifest_name: String,
    candidates: Vec<PackageManager>,
    resolver: Box<dyn VersionResolver>,
    lookup: Box<dyn BinaryLookup>,
    runner: Box<dyn InstallRunner>,
    deployer: FileDeployer,
    observer: Option<StateObserver>,
}

impl InstallWorkflow {
    /// Create a workflow for the standard toolchain with default candidates
    pub fn new(
        resolver: Box<dyn VersionResolver>,
        lookup: Box<dyn BinaryLookup>,
        runner: Box<dyn InstallRunner>,
    ) -> Self {
        Self {
            toolchain: ToolchainDescriptor::standard(),
            manifest_name: DEFAULT_MANIFEST.to_string(),
            candidates: PackageManager::DEFAULT_PRIORITY.to_vec(),
            resolver,
            lookup,
            runner,
            deployer: FileDeployer::new(),
            observer: None,
        }
    }

    /// Use a different manifest file name
    pub fn with_manifest_name(mut self, name: impl Into<String>) -> Self {
        self.manifest_name = name.into();
        self
    }

    /// Probe installers in this order
    pub fn with_candidates(mut self, candidates: Vec<PackageManager>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Observe state transitions (e.g. to drive a progress display)
    pub fn with_observer(mut self, observer: StateObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Run the workflow against `target_dir`, deploying `files` on success
    pub async fn run(
        &self,
        target_dir: &Utf8Path,
        files: &BTreeSet<TemplateKind>,
    ) -> Result<WorkflowReport> {
        let mut progress = Progress::new(self.observer.as_ref());

        let manifest_path = target_dir.join(&self.manifest_name);
        let mut manifest = Manifest::load(&manifest_path)?;
        progress.enter(WorkflowState::ManifestLocated);

        let versions = self
            .resolver
            .resolve_latest(self.toolchain.dev_dependencies)
            .await?;
        let dependencies = dependency_specs(self.toolchain, &versions)?;
        progress.enter(WorkflowState::VersionsResolved);

        manifest.apply(self.toolchain, &dependencies);
        manifest.save(&manifest_path)?;
        progress.enter(WorkflowState::ManifestWritten);

        let installer = detect(self.lookup.as_ref(), &self.candidates)?;
        progress.enter(WorkflowState::ManagerDetected);

        progress.enter(WorkflowState::InstallRunning);
        if let Err(e) = self.runner.run(&installer, target_dir).await {
            progress.enter(WorkflowState::InstallFailed);
            return Err(e);
        }
        progress.enter(WorkflowState::InstallSucceeded);

        let deployed = self.deployer.deploy(files, target_dir).await?;
        progress.enter(WorkflowState::FilesDeployed);

        Ok(WorkflowReport {
            installer,
            dependencies,
            manifest_path,
            deployed,
            trail: progress.trail,
        })
    }
}
