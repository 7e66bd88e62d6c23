//! Domain-specific errors for install operations

use anypm_schema::{Ecosystem, FailureKind, InstallOutcome};
use thiserror::Error;

/// Why a single request failed.
///
/// Every variant is terminal for its request only; the batch carries on.
/// Display strings are the user-facing reasons, so they stay short and
/// stable; diagnostic detail goes to the log instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstallFailure {
    #[error("empty package name")]
    EmptyIdentifier,

    #[error("malformed identifier: {0}")]
    Malformed(String),

    #[error("could not determine ecosystem")]
    Undetected,

    #[error("'{0}' is a system tool; install it with your OS package manager")]
    SystemTool(String),

    #[error("release not found")]
    ReleaseNotFound,

    #[error("no supported asset types")]
    NoSupportedAsset,

    #[error("download failed")]
    DownloadFailed,

    #[error("downloaded file is empty or missing")]
    TruncatedDownload,

    #[error("integrity failed")]
    IntegrityFailed,

    #[error("{0} install failed")]
    Subprocess(Ecosystem),

    #[error("no changes detected")]
    NoChanges,

    #[error("fatal: {0}")]
    Fatal(String),
}

impl InstallFailure {
    /// Create a fatal failure from any displayable internal error.
    pub fn fatal(err: impl std::fmt::Display) -> Self {
        Self::Fatal(err.to_string())
    }

    /// Stable classification of this failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::EmptyIdentifier => FailureKind::EmptyIdentifier,
            Self::Malformed(_) => FailureKind::MalformedIdentifier,
            Self::Undetected => FailureKind::EcosystemDetectionFailure,
            Self::SystemTool(_) => FailureKind::SystemToolNotInstallable,
            Self::ReleaseNotFound => FailureKind::ReleaseNotFound,
            Self::NoSupportedAsset => FailureKind::NoSupportedAsset,
            Self::DownloadFailed => FailureKind::DownloadFailed,
            Self::TruncatedDownload => FailureKind::TruncatedOrEmptyDownload,
            Self::IntegrityFailed => FailureKind::IntegrityFailed,
            Self::Subprocess(_) => FailureKind::SubprocessNonzeroExit,
            Self::NoChanges => FailureKind::EmptyInstallDetected,
            Self::Fatal(_) => FailureKind::Fatal,
        }
    }

    /// Convert into the outcome recorded for `identifier`.
    pub fn into_outcome(self, identifier: &str) -> InstallOutcome {
        InstallOutcome::failed(identifier, self.kind(), self.to_string())
    }
}

/// Errors from the network transport.
#[derive(Error, Debug)]
pub enum NetError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reasons_are_stable() {
        assert_eq!(InstallFailure::NoChanges.to_string(), "no changes detected");
        assert_eq!(
            InstallFailure::Subprocess(Ecosystem::Pip).to_string(),
            "pip install failed"
        );
        assert_eq!(
            InstallFailure::fatal("boom").to_string(),
            "fatal: boom"
        );
    }

    #[test]
    fn test_outcome_carries_kind_and_reason() {
        let outcome = InstallFailure::IntegrityFailed.into_outcome("gh:acme/tool@v1.2.0");
        assert!(!outcome.success());
        assert_eq!(outcome.identifier(), "gh:acme/tool@v1.2.0");
        assert_eq!(outcome.failure_kind(), Some(FailureKind::IntegrityFailed));
        assert_eq!(outcome.failure_reason(), Some("integrity failed"));
    }
}
