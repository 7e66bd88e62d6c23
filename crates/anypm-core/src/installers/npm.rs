//! npm installer with no-op detection.
//!
//! `npm install` exits zero for already-satisfied or silently rejected
//! requests, so the dependency store is fingerprinted before and after the
//! run and an unchanged store is reported as a failure.

use std::path::PathBuf;
use std::sync::Arc;

use anypm_schema::{Ecosystem, PackageRequest};
use async_trait::async_trait;

use super::{Installer, SubprocessInstaller};
use crate::error::InstallFailure;
use crate::fingerprint::{Fingerprint, fingerprint};
use crate::process::CommandRunner;
use crate::settings::Settings;

pub struct NpmInstaller {
    inner: SubprocessInstaller,
    node_modules: PathBuf,
}

impl std::fmt::Debug for NpmInstaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NpmInstaller")
            .field("node_modules", &self.node_modules)
            .finish_non_exhaustive()
    }
}

impl NpmInstaller {
    /// Runs `npm` in the settings' project directory and watches its
    /// dependency store.
    pub fn new(runner: Arc<dyn CommandRunner>, settings: &Settings) -> Self {
        Self {
            node_modules: settings.node_modules(),
            inner: SubprocessInstaller::new(
                Ecosystem::Npm,
                "npm",
                runner,
                settings.project_dir.clone(),
            ),
        }
    }

    async fn snapshot(&self) -> Result<Fingerprint, InstallFailure> {
        let dir = self.node_modules.clone();
        tokio::task::spawn_blocking(move || fingerprint(&dir))
            .await
            .map_err(InstallFailure::fatal)
    }
}

#[async_trait]
impl Installer for NpmInstaller {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }

    async fn install(&self, request: &PackageRequest) -> Result<Option<String>, InstallFailure> {
        let before = self.snapshot().await?;
        self.inner.run(request.payload()).await?;
        let after = self.snapshot().await?;

        if before == after {
            tracing::warn!(
                identifier = request.raw_identifier(),
                fingerprint = %after,
                "npm exited cleanly but node_modules is unchanged"
            );
            return Err(InstallFailure::NoChanges);
        }
        tracing::debug!(%before, %after, "node_modules changed");
        Ok(None)
    }
}
