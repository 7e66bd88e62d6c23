//! Hosted-release acquisition.
//!
//! ```text
//! resolve ──► select asset ──► download (retry) ──► verify ──► cache
//! ```
//!
//! Each stage has a single failure it maps to; the first failing stage
//! decides the outcome and nothing after it runs.

pub mod download;
pub mod resolve;
pub mod verify;

use std::path::{Component, Path, PathBuf};

use anypm_schema::RepoPath;
use reqwest::Url;

use crate::error::InstallFailure;

pub use download::{RetryPolicy, download_with_retry};
pub use resolve::{release_url, resolve_release};
pub use verify::{CHECKSUM_FILE, checksum_url, sha256_file, verify_checksum};

/// Append `segments` to `base`, percent-encoding each one, so a tag such as
/// `v1/x#y` stays a single path segment. `None` if `base` is not a usable URL.
pub fn endpoint(base: &str, segments: &[&str]) -> Option<String> {
    let mut url = Url::parse(base).ok()?;
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(segments);
    Some(url.into())
}

/// Whether a name from release metadata is safe to use as one path
/// component: a single normal file name with no separators.
pub fn is_plain_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Move a verified asset into `<cache>/<owner>/<repo>/<tag>/<asset>`.
///
/// Falls back to a copy when the staging area is on another filesystem.
///
/// # Errors
///
/// I/O failures are fatal: the asset was good, the machine is not.
pub async fn persist(
    staged: &Path,
    cache_dir: &Path,
    repo: &RepoPath,
    tag: &str,
    asset_name: &str,
) -> Result<PathBuf, InstallFailure> {
    if !is_plain_name(tag) || !is_plain_name(asset_name) {
        return Err(InstallFailure::fatal(format!(
            "refusing to cache {asset_name:?} for tag {tag:?}"
        )));
    }
    let dir = cache_dir.join(repo.owner()).join(repo.name()).join(tag);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(InstallFailure::fatal)?;

    let dest = dir.join(asset_name);
    if tokio::fs::rename(staged, &dest).await.is_err() {
        tokio::fs::copy(staged, &dest)
            .await
            .map_err(InstallFailure::fatal)?;
    }
    tracing::debug!(dest = %dest.display(), "asset cached");
    Ok(dest)
}
