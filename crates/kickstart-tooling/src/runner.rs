//! Installer process execution
//!
//! Spawns `<manager> install` in the target directory with inherited stdio
//! and waits for it to exit. The exit status is authoritative: anything other
//! than success fails the workflow.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use camino::Utf8Path;
use kickstart_core::{Error, Result};
use tokio::process::Command;
use tracing::{debug, info};

use crate::detector::InstallerHandle;

/// Runs the installer against a project directory
#[async_trait]
pub trait InstallRunner: Send + Sync {
    /// Install the manifest's dependencies in `dir`
    async fn run(&self, installer: &InstallerHandle, dir: &Utf8Path) -> Result<()>;
}

/// Runs the installer as a child process
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    /// Kill the installer after this long; `None` waits indefinitely
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl InstallRunner for ProcessRunner {
    async fn run(&self, installer: &InstallerHandle, dir: &Utf8Path) -> Result<()> {
        let manager = installer.manager.to_string();
        let args = installer.manager.install_args();

        info!("Running: {} {}", manager, args.join(" "));

        let mut child = Command::new(&installer.path)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::installer_spawn(&manager, e))?;

        let status = match self.timeout {
            Some(limit) => {
                let waited = tokio::time::timeout(limit, child.wait()).await;
                match waited {
                    Ok(status) => status,
                    Err(_) => {
                        // Best effort; the child may have exited in the meantime
                        let _ = child.kill().await;
                        return Err(Error::installer_timed_out(&manager, limit.as_secs()));
                    }
                }
            }
            None => child.wait().await,
        }
        .map_err(|e| Error::installer_spawn(&manager, e))?;

        check_status(&manager, status)
    }
}

fn check_status(manager: &str, status: ExitStatus) -> Result<()> {
    debug!("{} exited with {}", manager, status);
    if status.success() {
        Ok(())
    } else {
        Err(Error::installer_failed(manager, status.code(), status.to_string()))
    }
}
