//! # kickstart-tooling
//!
//! The dependency and script installation workflow behind `kickstart`:
//!
//! - **Detection**: find the first available package manager on the search path
//! - **Resolution**: look up the latest published versions of the toolchain,
//!   live from the registry or from a bundled table
//! - **Mutation**: rewrite the project manifest's scripts, pre-commit hooks and
//!   dev dependencies while preserving every other key
//! - **Installation**: run `<manager> install` and treat its exit status as final
//! - **Deployment**: copy bundled template files into the project
//!
//! # Example
//!
//! ```rust,no_run
//! use std::collections::BTreeSet;
//!
//! use camino::Utf8Path;
//! use kickstart_core::{ConfigLoader, TemplateKind};
//! use kickstart_tooling::{resolver_for, InstallWorkflow, PathLookup, ProcessRunner};
//!
//! # async fn example() -> kickstart_core::Result<()> {
//! let config = ConfigLoader::new().load()?;
//! let workflow = InstallWorkflow::new(
//!     resolver_for(&config)?,
//!     Box::new(PathLookup),
//!     Box::new(ProcessRunner::new(config.install.timeout())),
//! )
//! .with_candidates(config.installers.clone());
//!
//! let files: BTreeSet<_> = TemplateKind::ALL.into_iter().collect();
//! let report = workflow.run(Utf8Path::new("."), &files).await?;
//! println!("installed with {}", report.installer.manager);
//! # Ok(())
//! # }
//! ```

mod deployer;
mod detector;
mod manifest;
mod resolver;
mod runner;
mod workflow;

pub use deployer::FileDeployer;
pub use detector::{detect, BinaryLookup, InstallerHandle, PathLookup, SearchPathLookup};
pub use manifest::{dependency_specs, HookList, Manifest};
pub use resolver::{resolver_for, RegistryResolver, StaticResolver, VersionResolver};
pub use runner::{InstallRunner, ProcessRunner};
pub use workflow::{InstallWorkflow, WorkflowReport, WorkflowState};
