//! GitHub release installer.
//!
//! Runs the acquisition pipeline from [`crate::release`] and hands the
//! verified asset off to the cache. Unpacking is left to the caller.

use anypm_schema::{Ecosystem, PackageRequest};
use async_trait::async_trait;

use super::Installer;
use crate::context::Context;
use crate::error::InstallFailure;
use crate::release::{self, download_with_retry, resolve_release, verify_checksum};
use crate::spec;

#[derive(Debug, Clone)]
pub struct ReleaseInstaller {
    ctx: Context,
}

impl ReleaseInstaller {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Installer for ReleaseInstaller {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::GitHubRelease
    }

    async fn install(&self, request: &PackageRequest) -> Result<Option<String>, InstallFailure> {
        let settings = &self.ctx.settings;
        let transport = self.ctx.transport.as_ref();
        let reporter = &self.ctx.reporter;
        let id = request.raw_identifier();

        let (repo, version) = spec::release_target(request.payload())?;

        let meta = resolve_release(
            transport,
            &settings.github_api,
            &repo,
            &version,
            settings.request_timeout,
        )
        .await?;
        if !release::is_plain_name(&meta.tag) {
            tracing::warn!(%repo, tag = %meta.tag, "release tag is not a plain name");
            return Err(InstallFailure::ReleaseNotFound);
        }

        let asset = meta.select_asset().ok_or_else(|| {
            let names: Vec<&str> = meta.assets.iter().map(|a| a.name.as_str()).collect();
            tracing::warn!(%repo, tag = %meta.tag, ?names, "no .tar.gz or .zip asset");
            InstallFailure::NoSupportedAsset
        })?;
        if !release::is_plain_name(&asset.name) {
            tracing::warn!(
                %repo,
                tag = %meta.tag,
                asset = %asset.name,
                "asset name is not a plain file name"
            );
            return Err(InstallFailure::NoSupportedAsset);
        }
        tracing::info!(%repo, tag = %meta.tag, asset = %asset.name, "selected asset");

        let tmp_root = settings.tmp_dir();
        tokio::fs::create_dir_all(&tmp_root)
            .await
            .map_err(InstallFailure::fatal)?;
        // Dropped (and deleted) on every early return below.
        let staging = tempfile::Builder::new()
            .prefix("anypm-")
            .tempdir_in(&tmp_root)
            .map_err(InstallFailure::fatal)?;
        let staged = staging.path().join(&asset.name);

        download_with_retry(
            transport,
            &asset.download_url,
            &staged,
            settings.retry,
            &|current, total| reporter.downloading(id, current, total),
            &|attempt, delay| reporter.retrying(id, attempt, delay),
        )
        .await?;

        reporter.verifying(id);
        verify_checksum(
            transport,
            &settings.github_raw,
            &repo,
            &meta.tag,
            &staged,
            settings.request_timeout,
        )
        .await?;

        let cached = release::persist(
            &staged,
            &settings.cache_dir(),
            &repo,
            &meta.tag,
            &asset.name,
        )
        .await?;
        Ok(Some(cached.display().to_string()))
    }
}
