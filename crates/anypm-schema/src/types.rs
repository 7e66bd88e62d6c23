//! Core request types: ecosystems, parsed requests, and release versions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The package source an identifier belongs to.
///
/// This is a closed set: every request resolves to exactly one variant, and
/// only the installable ones ever reach an installer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ecosystem {
    /// The npm registry, installed with `npm install`.
    Npm,
    /// A GitHub repository's published releases.
    #[serde(rename = "github-release")]
    GitHubRelease,
    /// The Python Package Index, installed with `pip install`.
    Pip,
    /// crates.io, installed with `cargo install`.
    Cargo,
    /// Go modules, installed with `go install`.
    Go,
    /// Homebrew formulae, installed with `brew install`.
    Homebrew,
    /// A well-known system tool that this installer refuses to manage.
    SystemTool,
    /// No probe recognised the identifier.
    Invalid,
}

impl Ecosystem {
    /// Explicit prefix tokens, paired with the ecosystem they select.
    ///
    /// Matching is exact and case-sensitive.
    pub const PREFIXES: &'static [(&'static str, Ecosystem)] = &[
        ("npm", Ecosystem::Npm),
        ("gh", Ecosystem::GitHubRelease),
        ("github", Ecosystem::GitHubRelease),
        ("pip", Ecosystem::Pip),
        ("cargo", Ecosystem::Cargo),
        ("go", Ecosystem::Go),
        ("brew", Ecosystem::Homebrew),
    ];

    /// Look up the ecosystem selected by an explicit prefix token.
    pub fn from_prefix(token: &str) -> Option<Self> {
        Self::PREFIXES
            .iter()
            .find(|(prefix, _)| *prefix == token)
            .map(|(_, eco)| *eco)
    }

    /// Human-readable name used in messages (e.g. "pip install failed").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::GitHubRelease => "github",
            Self::Pip => "pip",
            Self::Cargo => "cargo",
            Self::Go => "go",
            Self::Homebrew => "brew",
            Self::SystemTool => "system tool",
            Self::Invalid => "invalid",
        }
    }

    /// Returns `true` if some installer can service this ecosystem.
    pub fn is_installable(&self) -> bool {
        !matches!(self, Self::SystemTool | Self::Invalid)
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single install request, as parsed from one raw identifier.
///
/// Immutable once constructed: the parser builds it, the detector and
/// dispatcher only read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageRequest {
    raw_identifier: String,
    ecosystem_hint: Option<Ecosystem>,
    payload: String,
}

impl PackageRequest {
    /// Create a request from its raw identifier, the explicit prefix (if any),
    /// and the remaining payload.
    pub fn new(
        raw_identifier: impl Into<String>,
        ecosystem_hint: Option<Ecosystem>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            raw_identifier: raw_identifier.into(),
            ecosystem_hint,
            payload: payload.into(),
        }
    }

    /// The identifier exactly as the user supplied it.
    pub fn raw_identifier(&self) -> &str {
        &self.raw_identifier
    }

    /// The ecosystem named by an explicit prefix, if one was present.
    pub fn ecosystem_hint(&self) -> Option<Ecosystem> {
        self.ecosystem_hint
    }

    /// The identifier with any explicit prefix removed.
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

/// The release a hosted-release request asks for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseVersion {
    /// The repository's latest published release.
    Latest,
    /// An exact release tag, e.g. `v1.2.0`.
    Tag(String),
}

impl ReleaseVersion {
    /// Sentinel spelling of [`ReleaseVersion::Latest`].
    pub const LATEST: &'static str = "latest";

    /// Interpret an optional `@version` suffix. Absent, empty, or the literal
    /// `latest` all mean the latest release.
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            None | Some("" | Self::LATEST) => Self::Latest,
            Some(tag) => Self::Tag(tag.to_string()),
        }
    }

    /// Returns `true` for [`ReleaseVersion::Latest`].
    pub fn is_latest(&self) -> bool {
        matches!(self, Self::Latest)
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str(Self::LATEST),
            Self::Tag(tag) => f.write_str(tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_lookup_is_case_sensitive() {
        assert_eq!(Ecosystem::from_prefix("npm"), Some(Ecosystem::Npm));
        assert_eq!(Ecosystem::from_prefix("github"), Some(Ecosystem::GitHubRelease));
        assert_eq!(Ecosystem::from_prefix("gh"), Some(Ecosystem::GitHubRelease));
        assert_eq!(Ecosystem::from_prefix("NPM"), None);
        assert_eq!(Ecosystem::from_prefix("https"), None);
    }

    #[test]
    fn test_only_real_ecosystems_are_installable() {
        assert!(Ecosystem::Homebrew.is_installable());
        assert!(!Ecosystem::SystemTool.is_installable());
        assert!(!Ecosystem::Invalid.is_installable());
    }

    #[test]
    fn test_release_version_defaults_to_latest() {
        assert_eq!(ReleaseVersion::parse(None), ReleaseVersion::Latest);
        assert_eq!(ReleaseVersion::parse(Some("")), ReleaseVersion::Latest);
        assert_eq!(ReleaseVersion::parse(Some("latest")), ReleaseVersion::Latest);
        assert_eq!(
            ReleaseVersion::parse(Some("v1.2.0")),
            ReleaseVersion::Tag("v1.2.0".to_string())
        );
        assert_eq!(ReleaseVersion::Latest.to_string(), "latest");
    }

    #[test]
    fn test_ecosystem_serializes_kebab_case() {
        let json = serde_json::to_string(&Ecosystem::GitHubRelease).unwrap();
        assert_eq!(json, "\"github-release\"");
    }
}
