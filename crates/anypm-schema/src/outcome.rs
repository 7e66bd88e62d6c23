//! Per-request install outcomes and the failure taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable classification of why a request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// Nothing left after stripping the prefix.
    EmptyIdentifier,
    /// The payload does not have the shape its ecosystem requires.
    MalformedIdentifier,
    /// No probe recognised the identifier.
    EcosystemDetectionFailure,
    /// The identifier names a system tool.
    SystemToolNotInstallable,
    /// Release metadata could not be fetched or parsed.
    ReleaseNotFound,
    /// The release has no `.tar.gz` or `.zip` asset.
    NoSupportedAsset,
    /// Every download attempt failed.
    DownloadFailed,
    /// The download reported success but left an empty or missing file.
    TruncatedOrEmptyDownload,
    /// The checksum was unavailable, unusable, or did not match.
    IntegrityFailed,
    /// A native install command exited unsuccessfully or could not start.
    SubprocessNonzeroExit,
    /// A native install command succeeded without changing the dependency store.
    EmptyInstallDetected,
    /// An unexpected internal error while servicing the request.
    Fatal,
}

impl FailureKind {
    /// Kebab-case code, identical to the serialized form.
    pub fn code(self) -> &'static str {
        match self {
            Self::EmptyIdentifier => "empty-identifier",
            Self::MalformedIdentifier => "malformed-identifier",
            Self::EcosystemDetectionFailure => "ecosystem-detection-failure",
            Self::SystemToolNotInstallable => "system-tool-not-installable",
            Self::ReleaseNotFound => "release-not-found",
            Self::NoSupportedAsset => "no-supported-asset",
            Self::DownloadFailed => "download-failed",
            Self::TruncatedOrEmptyDownload => "truncated-or-empty-download",
            Self::IntegrityFailed => "integrity-failed",
            Self::SubprocessNonzeroExit => "subprocess-nonzero-exit",
            Self::EmptyInstallDetected => "empty-install-detected",
            Self::Fatal => "fatal",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The result of servicing one input identifier.
///
/// Exactly one is produced per input and it is never updated afterwards, so
/// the fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallOutcome {
    identifier: String,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure_kind: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl InstallOutcome {
    /// A successful install, with an optional note (e.g. the cached artifact path).
    pub fn succeeded(identifier: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            identifier: identifier.into(),
            success: true,
            failure_kind: None,
            failure_reason: None,
            detail,
        }
    }

    /// A failed install with its classification and human-readable reason.
    pub fn failed(identifier: impl Into<String>, kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            success: false,
            failure_kind: Some(kind),
            failure_reason: Some(reason.into()),
            detail: None,
        }
    }

    /// The identifier as supplied by the user.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Whether the install succeeded.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Classification of the failure, if any.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure_kind
    }

    /// Human-readable failure reason, if any.
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    /// Extra information attached to a success.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}
