//! Bootstrap command - install the toolchain and deploy template files
//!
//! Two paths share this command. The install path rewrites the manifest,
//! runs the package manager and only then deploys templates. The files-only
//! path copies templates and never touches the manifest.

use std::collections::BTreeSet;

use anyhow::{bail, Result};
use camino::Utf8Path;
use kickstart_core::{ConfigLoader, RuntimeConfig, TemplateKind};
use kickstart_tooling::{
    resolver_for, FileDeployer, InstallWorkflow, PathLookup, ProcessRunner, WorkflowReport,
    WorkflowState,
};
use tracing::debug;

use crate::cli::Cli;
use crate::output;

/// What a single invocation will do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Run the manifest and installer steps
    pub install: bool,
    /// Templates to deploy
    pub files: BTreeSet<TemplateKind>,
}

impl Plan {
    /// Derive the plan from the mode flags
    ///
    /// No mode flag, or an explicit `--all`, means install and deploy every
    /// template. File flags alone deploy just those files. `--scripts` turns
    /// on the install path and deploys whichever files were also named.
    pub fn from_cli(cli: &Cli) -> Self {
        let mut files = BTreeSet::new();
        if cli.all_files {
            files.extend(TemplateKind::ALL);
        }
        if cli.editorconfig {
            files.insert(TemplateKind::EditorConfig);
        }
        if cli.gitignore {
            files.insert(TemplateKind::GitIgnore);
        }
        if cli.travis {
            files.insert(TemplateKind::Travis);
        }

        if cli.all || (!cli.scripts && files.is_empty()) {
            return Self {
                install: true,
                files: TemplateKind::ALL.into_iter().collect(),
            };
        }

        Self {
            install: cli.scripts,
            files,
        }
    }
}

/// Run the bootstrap command
pub async fn run(cli: Cli) -> Result<()> {
    let plan = Plan::from_cli(&cli);
    debug!("Plan: {:?}", plan);

    if !cli.dir.is_dir() {
        bail!("Target directory does not exist: {}", cli.dir);
    }

    let config = load_config(&cli)?;

    if plan.install {
        let report = install(&config, &cli.dir, &plan.files, cli.quiet).await?;
        if !cli.quiet {
            print_report(&report);
        }
    } else {
        let written = FileDeployer::new().deploy(&plan.files, &cli.dir).await?;
        if !cli.quiet {
            for path in &written {
                output::success(&format!("Wrote {}", path));
            }
        }
    }

    Ok(())
}

/// Load layered configuration and apply command-line overrides
fn load_config(cli: &Cli) -> Result<RuntimeConfig> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::with_file(path.clone()),
        None => ConfigLoader::new(),
    };
    let mut config = loader.load()?;

    if let Some(mode) = cli.resolve {
        config.resolve = mode;
    }
    if let Some(secs) = cli.install_timeout {
        config.install.timeout_secs = Some(secs);
    }

    debug!(
        "Resolve mode: {}, installers: {:?}",
        config.resolve, config.installers
    );
    Ok(config)
}

async fn install(
    config: &RuntimeConfig,
    dir: &Utf8Path,
    files: &BTreeSet<TemplateKind>,
    quiet: bool,
) -> Result<WorkflowReport> {
    let spinner = output::spinner("Reading manifest...", quiet);
    let progress = spinner.clone();

    let workflow = InstallWorkflow::new(
        resolver_for(config)?,
        Box::new(PathLookup),
        Box::new(ProcessRunner::new(config.install.timeout())),
    )
    .with_manifest_name(config.manifest.clone())
    .with_candidates(config.installers.clone())
    .with_observer(Box::new(move |state| match state {
        WorkflowState::ManifestLocated => {
            progress.set_message("Resolving latest versions...");
        }
        // The installer writes to the terminal from here on
        WorkflowState::VersionsResolved => progress.finish_and_clear(),
        _ => {}
    }));

    let result = workflow.run(dir, files).await;
    spinner.finish_and_clear();
    Ok(result?)
}

fn print_report(report: &WorkflowReport) {
    output::success(&format!(
        "Installed dev dependencies with {}",
        report.installer.manager
    ));
    for dep in &report.dependencies {
        output::kv(&dep.name, &dep.range);
    }
    output::info(&format!("Updated {}", report.manifest_path));
    for path in &report.deployed {
        output::success(&format!("Wrote {}", path));
    }
}
