//! Release metadata lookup, by tag or latest.

use std::time::Duration;

use anypm_schema::{ReleaseMetadata, ReleaseVersion, RepoPath};

use crate::error::{InstallFailure, NetError};
use crate::net::Transport;

/// Release-by-latest or release-by-tag endpoint for `repo`. The tag is
/// percent-encoded as a single path segment.
pub fn release_url(api_base: &str, repo: &RepoPath, version: &ReleaseVersion) -> Option<String> {
    match version {
        ReleaseVersion::Latest => super::endpoint(
            api_base,
            &["repos", repo.owner(), repo.name(), "releases", "latest"],
        ),
        ReleaseVersion::Tag(tag) => super::endpoint(
            api_base,
            &["repos", repo.owner(), repo.name(), "releases", "tags", tag],
        ),
    }
}

/// Fetch release metadata with a single read. Not retried.
///
/// # Errors
///
/// Any transport error, timeout, non-success status, or unparsable body is
/// [`InstallFailure::ReleaseNotFound`].
pub async fn resolve_release(
    transport: &dyn Transport,
    api_base: &str,
    repo: &RepoPath,
    version: &ReleaseVersion,
    timeout: Duration,
) -> Result<ReleaseMetadata, InstallFailure> {
    let Some(url) = release_url(api_base, repo, version) else {
        tracing::warn!(api_base, "GitHub API base is not a valid URL");
        return Err(InstallFailure::ReleaseNotFound);
    };

    let body = match tokio::time::timeout(timeout, transport.get_text(&url)).await {
        Ok(Ok(body)) => body,
        Ok(Err(e)) => {
            tracing::warn!(%repo, %version, error = %e, "release metadata fetch failed");
            return Err(InstallFailure::ReleaseNotFound);
        }
        Err(_) => {
            let e = NetError::Timeout(timeout);
            tracing::warn!(%repo, %version, error = %e, "release metadata fetch failed");
            return Err(InstallFailure::ReleaseNotFound);
        }
    };

    serde_json::from_str::<ReleaseMetadata>(&body).map_err(|e| {
        tracing::warn!(%repo, %version, error = %e, "release metadata unparsable");
        InstallFailure::ReleaseNotFound
    })
}
