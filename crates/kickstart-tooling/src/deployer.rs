//! Template deployment
//!
//! Copies bundled template files into a target directory. Copies run
//! concurrently and independently: a failed copy is reported but does not
//! stop the others, and files already written are not rolled back.

use std::collections::BTreeSet;

use camino::{Utf8Path, Utf8PathBuf};
use futures::future::join_all;
use kickstart_core::error::TemplateFailure;
use kickstart_core::{templates, Error, Result, TemplateFile, TemplateKind};
use tracing::{debug, warn};

/// Writes bundled templates into a project directory
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDeployer;

impl FileDeployer {
    pub fn new() -> Self {
        Self
    }

    /// Copy each requested template into `target_dir`, overwriting existing files
    ///
    /// Returns the written paths in deployment order. Fails with
    /// [`Error::TemplateWrite`] listing every copy that failed.
    pub async fn deploy(
        &self,
        files: &BTreeSet<TemplateKind>,
        target_dir: &Utf8Path,
    ) -> Result<Vec<Utf8PathBuf>> {
        let copies = files
            .iter()
            .map(|kind| Self::copy(kind.file(), target_dir));
        let results = join_all(copies).await;

        let mut written = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(path) => written.push(path),
                Err(failure) => {
                    warn!(
                        "Failed to write {}: {}",
                        failure.destination, failure.message
                    );
                    failures.push(failure);
                }
            }
        }

        if failures.is_empty() {
            Ok(written)
        } else {
            Err(Error::template_write(failures))
        }
    }

    async fn copy(
        file: TemplateFile,
        target_dir: &Utf8Path,
    ) -> std::result::Result<Utf8PathBuf, TemplateFailure> {
        let failure = |message: String| TemplateFailure {
            destination: file.destination.to_string(),
            message,
        };

        let data = templates::contents(&file).map_err(|e| failure(e.to_string()))?;
        let dest = target_dir.join(file.destination);

        tokio::fs::write(&dest, data)
            .await
            .map_err(|e| failure(e.to_string()))?;

        debug!("Wrote {}", dest);
        Ok(dest)
    }
}
