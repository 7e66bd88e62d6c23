//! Checksum verification against the published `checksum.sha256`.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anypm_schema::{ExpectedDigest, RepoPath, Sha256Hash};
use sha2::{Digest, Sha256};

use crate::error::{InstallFailure, NetError};
use crate::net::Transport;

/// Name of the digest file published alongside each release.
pub const CHECKSUM_FILE: &str = "checksum.sha256";

/// Raw-content URL of the digest file for `repo` at `tag`.
pub fn checksum_url(raw_base: &str, repo: &RepoPath, tag: &str) -> Option<String> {
    super::endpoint(raw_base, &[repo.owner(), repo.name(), tag, CHECKSUM_FILE])
}

/// SHA-256 of a file, hex-encoded in lowercase. Blocking.
pub fn sha256_file(path: &Path) -> std::io::Result<Sha256Hash> {
    let mut hasher = Sha256::new();
    let mut file = std::fs::File::open(path)?;
    let mut buffer = [0u8; 8192];
    loop {
        let count = file.read(&mut buffer)?;
        if count == 0 {
            break;
        }
        hasher.update(&buffer[..count]);
    }
    Ok(Sha256Hash::new(hex::encode(hasher.finalize())))
}

/// Check `file` against the digest published for `repo` at `tag`.
///
/// The published digest is trimmed and compared exactly; there is no case
/// folding.
///
/// # Errors
///
/// Every failure, including an unreachable or malformed digest file, is
/// [`InstallFailure::IntegrityFailed`].
pub async fn verify_checksum(
    transport: &dyn Transport,
    raw_base: &str,
    repo: &RepoPath,
    tag: &str,
    file: &Path,
    timeout: Duration,
) -> Result<(), InstallFailure> {
    let Some(url) = checksum_url(raw_base, repo, tag) else {
        tracing::warn!(raw_base, "raw-content base is not a valid URL");
        return Err(InstallFailure::IntegrityFailed);
    };

    let body = match tokio::time::timeout(timeout, transport.get_text(&url)).await {
        Ok(Ok(body)) => body,
        Ok(Err(e)) => {
            tracing::warn!(%repo, tag, error = %e, "checksum fetch failed");
            return Err(InstallFailure::IntegrityFailed);
        }
        Err(_) => {
            tracing::warn!(%repo, tag, error = %NetError::Timeout(timeout), "checksum fetch failed");
            return Err(InstallFailure::IntegrityFailed);
        }
    };

    let expected = ExpectedDigest::parse(&body).map_err(|e| {
        tracing::warn!(%repo, tag, error = %e, "checksum file rejected");
        InstallFailure::IntegrityFailed
    })?;

    let path: PathBuf = file.to_path_buf();
    let actual = tokio::task::spawn_blocking(move || sha256_file(&path))
        .await
        .map_err(InstallFailure::fatal)?
        .map_err(|e| {
            tracing::warn!(file = %file.display(), error = %e, "cannot hash download");
            InstallFailure::IntegrityFailed
        })?;

    if actual.matches(&expected) {
        Ok(())
    } else {
        tracing::warn!(
            %repo,
            tag,
            expected = expected.as_str(),
            actual = actual.as_str(),
            "checksum mismatch"
        );
        Err(InstallFailure::IntegrityFailed)
    }
}
