use std::io;
use std::path::{Path, PathBuf};

use reqwest::Client;
use tracing::{debug, error, info};

use crate::download;
use crate::error::{InstallError, Result};
use crate::extract;
use crate::request::InstallRequest;

/// Downloads and unpacks the analyzer release.
///
/// Holds the HTTP client it was constructed with; callers are expected to
/// build one client per process and share it, rather than reaching for a
/// global.
pub struct Installer {
    client: Client,
}

impl Installer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Ensure the requested executable is present on disk and return its
    /// absolute path.
    ///
    /// Idempotent: when the executable already exists, no network or
    /// filesystem work happens. Otherwise the archive is downloaded to a
    /// per-call temporary directory, extracted under the install root, and
    /// the temporary directory is removed on every exit path.
    pub async fn ensure_installed(&self, request: &InstallRequest) -> Result<PathBuf> {
        let executable = request.executable_path();
        if executable.exists() {
            debug!(path = %executable.display(), "analyzer already installed, skipping download");
            return Ok(executable);
        }

        info!(uri = %request.download_uri, "installing analyzer");

        let workspace = tempfile::Builder::new()
            .prefix("infera-download-")
            .tempdir()
            .map_err(InstallError::Io)?;
        let workspace_dir = workspace.path().to_path_buf();

        let result = self
            .download_and_extract(request, workspace.path(), &executable)
            .await;

        // Cleanup runs on every exit path. A cleanup failure is reported in
        // its own right and never silently replaces the in-flight error.
        match workspace.close() {
            Ok(()) => result,
            Err(source) => {
                let primary = result.err();
                if let Some(primary) = &primary {
                    error!(%primary, "install failed before cleanup");
                }
                Err(InstallError::Cleanup {
                    dir: workspace_dir,
                    source,
                    primary: primary.map(Box::new),
                })
            }
        }
    }

    async fn download_and_extract(
        &self,
        request: &InstallRequest,
        workspace: &Path,
        executable: &Path,
    ) -> Result<PathBuf> {
        let archive_path = workspace.join(request.download_file_name());
        download::fetch_to_file(&self.client, &request.download_uri, &archive_path).await?;

        tokio::fs::create_dir_all(&request.install_root).await?;

        let install_root = request.install_root.clone();
        let archive = archive_path.clone();
        let report = tokio::task::spawn_blocking(move || {
            extract::extract_tar_xz(&archive, &install_root)
        })
        .await
        .map_err(|join| InstallError::Extraction {
            path: archive_path,
            source: io::Error::other(join),
        })??;

        info!(
            entries = report.entry_count,
            bytes = report.total_bytes,
            "extraction complete"
        );

        if !executable.exists() {
            return Err(InstallError::MissingExecutable {
                path: executable.to_path_buf(),
            });
        }
        Ok(executable.to_path_buf())
    }
}
