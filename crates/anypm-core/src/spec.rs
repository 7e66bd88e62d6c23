//! Identifier parsing.
//!
//! An identifier is `[prefix:]payload`. The prefix is only stripped when it
//! is an exact, case-sensitive match for a known ecosystem token, so
//! `NPM:left-pad` or `https://...` are left whole and go through detection.
//! Parsing never touches the network.

use std::sync::LazyLock;

use anypm_schema::{Ecosystem, PackageRequest, ReleaseVersion, RepoPath};
use regex::Regex;

use crate::error::InstallFailure;

/// Separator between an ecosystem prefix and the payload.
pub const PREFIX_SEPARATOR: char = ':';

/// Separator between a repository path and a release tag.
pub const VERSION_SEPARATOR: char = '@';

/// npm's published limit on package name length.
const NPM_NAME_MAX: usize = 214;

static NPM_NAME: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(?:@[a-z0-9][a-z0-9._~-]*/)?[a-z0-9][a-z0-9._~-]*$").ok()
});

/// Split a raw identifier into its explicit ecosystem (if any) and payload.
///
/// # Errors
///
/// Returns [`InstallFailure::EmptyIdentifier`] if nothing remains once the
/// prefix is removed.
pub fn parse(raw: &str) -> Result<PackageRequest, InstallFailure> {
    let trimmed = raw.trim();
    let (hint, payload) = match trimmed.split_once(PREFIX_SEPARATOR) {
        Some((token, rest)) => match Ecosystem::from_prefix(token) {
            Some(eco) => (Some(eco), rest.trim()),
            None => (None, trimmed),
        },
        None => (None, trimmed),
    };

    if payload.is_empty() {
        return Err(InstallFailure::EmptyIdentifier);
    }
    Ok(PackageRequest::new(raw, hint, payload))
}

/// Split a hosted-release payload (`owner/repo[@tag]`) into repository and version.
///
/// # Errors
///
/// [`InstallFailure::EmptyIdentifier`] when the repository part is empty,
/// [`InstallFailure::Malformed`] when it is not an `owner/repo` path.
pub fn release_target(payload: &str) -> Result<(RepoPath, ReleaseVersion), InstallFailure> {
    let (repo, version) = match payload.split_once(VERSION_SEPARATOR) {
        Some((repo, version)) => (repo, Some(version)),
        None => (payload, None),
    };
    if repo.is_empty() {
        return Err(InstallFailure::EmptyIdentifier);
    }
    let repo = RepoPath::parse(repo).map_err(|e| InstallFailure::Malformed(e.to_string()))?;
    Ok((repo, ReleaseVersion::parse(version)))
}

/// The repository part of an unprefixed payload, if it has the right shape.
pub fn repo_candidate(payload: &str) -> Option<RepoPath> {
    let repo = payload
        .split_once(VERSION_SEPARATOR)
        .map_or(payload, |(repo, _)| repo);
    RepoPath::parse(repo).ok()
}

/// The npm package name with any `@version` suffix removed. The leading `@`
/// of a scoped name is kept.
pub fn npm_name(payload: &str) -> &str {
    let search_from = usize::from(payload.starts_with('@'));
    match payload[search_from..].find(VERSION_SEPARATOR) {
        Some(idx) => &payload[..search_from + idx],
        None => payload,
    }
}

/// Whether `name` could ever be published to npm.
pub fn is_valid_npm_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= NPM_NAME_MAX
        && NPM_NAME.as_ref().is_some_and(|re| re.is_match(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_prefix_is_stripped() {
        let req = parse("npm:left-pad").unwrap();
        assert_eq!(req.ecosystem_hint(), Some(Ecosystem::Npm));
        assert_eq!(req.payload(), "left-pad");
        assert_eq!(req.raw_identifier(), "npm:left-pad");

        let req = parse("gh:acme/tool@v1.2.0").unwrap();
        assert_eq!(req.ecosystem_hint(), Some(Ecosystem::GitHubRelease));
        assert_eq!(req.payload(), "acme/tool@v1.2.0");
    }

    #[test]
    fn test_unknown_or_miscased_prefix_is_kept() {
        let req = parse("NPM:left-pad").unwrap();
        assert_eq!(req.ecosystem_hint(), None);
        assert_eq!(req.payload(), "NPM:left-pad");

        let req = parse("ripgrep").unwrap();
        assert_eq!(req.ecosystem_hint(), None);
        assert_eq!(req.payload(), "ripgrep");
    }

    #[test]
    fn test_empty_payload_is_rejected() {
        for raw in ["pip:", "cargo:  ", "", "   "] {
            assert_eq!(parse(raw), Err(InstallFailure::EmptyIdentifier), "{raw:?}");
        }
    }

    #[test]
    fn test_release_target_defaults_to_latest() {
        let (repo, version) = release_target("acme/tool").unwrap();
        assert_eq!(repo.to_string(), "acme/tool");
        assert!(version.is_latest());

        let (_, version) = release_target("acme/tool@v1.2.0").unwrap();
        assert_eq!(version, ReleaseVersion::Tag("v1.2.0".to_string()));

        let (_, version) = release_target("acme/tool@").unwrap();
        assert!(version.is_latest());
    }

    #[test]
    fn test_release_target_errors() {
        assert_eq!(release_target("@v1"), Err(InstallFailure::EmptyIdentifier));
        assert!(matches!(
            release_target("tool@v1"),
            Err(InstallFailure::Malformed(_))
        ));
    }

    #[test]
    fn test_repo_candidate() {
        assert!(repo_candidate("acme/tool@v1").is_some());
        assert!(repo_candidate("@types/node").is_none());
        assert!(repo_candidate("left-pad").is_none());
    }

    #[test]
    fn test_npm_name_strips_version() {
        assert_eq!(npm_name("left-pad"), "left-pad");
        assert_eq!(npm_name("left-pad@1.3.0"), "left-pad");
        assert_eq!(npm_name("@types/node"), "@types/node");
        assert_eq!(npm_name("@types/node@20.1.0"), "@types/node");
    }

    #[test]
    fn test_npm_name_validation() {
        assert!(is_valid_npm_name("left-pad"));
        assert!(is_valid_npm_name("@types/node"));
        assert!(is_valid_npm_name("lodash.merge"));
        assert!(!is_valid_npm_name("bogus$$name"));
        assert!(!is_valid_npm_name("Upper"));
        assert!(!is_valid_npm_name(".hidden"));
        assert!(!is_valid_npm_name(&"a".repeat(215)));
    }
}
