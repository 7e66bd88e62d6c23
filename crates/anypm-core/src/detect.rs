//! Ecosystem detection for unprefixed identifiers.
//!
//! Probes run in a fixed order and stop at the first hit:
//!
//! 1. system-tool allow-list (local, case-insensitive)
//! 2. GitHub repository probe, for `owner/repo` shapes
//! 3. npm registry probe, for names npm could ever accept
//!
//! A probe that errors or times out counts as a miss, so network trouble
//! degrades detection instead of aborting it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anypm_schema::{Ecosystem, PackageRequest, RepoPath};

use crate::net::Transport;
use crate::settings::Settings;
use crate::spec;

/// Tools that belong to the OS package manager, never to us.
pub const SYSTEM_TOOLS: &[&str] = &[
    "git", "curl", "wget", "make", "gcc", "clang", "node", "npm", "python", "python3", "pip",
    "cargo", "rustc", "go", "brew", "docker",
];

/// Whether `identifier` names an allow-listed system tool.
pub fn is_system_tool(identifier: &str) -> bool {
    SYSTEM_TOOLS
        .iter()
        .any(|tool| tool.eq_ignore_ascii_case(identifier))
}

/// Resolves a request to exactly one [`Ecosystem`].
pub struct Detector {
    transport: Arc<dyn Transport>,
    settings: Arc<Settings>,
}

impl std::fmt::Debug for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detector").finish_non_exhaustive()
    }
}

impl Detector {
    pub fn new(transport: Arc<dyn Transport>, settings: Arc<Settings>) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// Classify `request`. An explicit prefix always wins and costs no I/O.
    pub async fn detect(&self, request: &PackageRequest) -> Ecosystem {
        if let Some(eco) = request.ecosystem_hint() {
            return eco;
        }
        let payload = request.payload();

        if is_system_tool(payload) {
            return Ecosystem::SystemTool;
        }

        if let Some(repo) = spec::repo_candidate(payload) {
            if self.probe("github", &self.repo_url(&repo)).await {
                return Ecosystem::GitHubRelease;
            }
        }

        let name = spec::npm_name(payload);
        if spec::is_valid_npm_name(name) {
            if self.probe("npm", &self.npm_url(name)).await {
                return Ecosystem::Npm;
            }
        } else {
            tracing::debug!(name, "not a valid npm name; skipping registry probe");
        }

        Ecosystem::Invalid
    }

    fn repo_url(&self, repo: &RepoPath) -> String {
        format!(
            "{}/repos/{}/{}",
            self.settings.github_api.trim_end_matches('/'),
            repo.owner(),
            repo.name()
        )
    }

    fn npm_url(&self, name: &str) -> String {
        format!(
            "{}/{}",
            self.settings.npm_registry.trim_end_matches('/'),
            name.replace('/', "%2F")
        )
    }

    async fn probe(&self, which: &'static str, url: &str) -> bool {
        bounded(which, url, self.settings.probe_timeout, self.transport.probe(url)).await
    }
}

async fn bounded<F>(which: &'static str, url: &str, limit: Duration, fut: F) -> bool
where
    F: Future<Output = Result<bool, crate::error::NetError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(Ok(found)) => {
            tracing::debug!(probe = which, url, found, "probe finished");
            found
        }
        Ok(Err(e)) => {
            tracing::debug!(probe = which, url, error = %e, "probe failed; treating as miss");
            false
        }
        Err(_) => {
            tracing::debug!(probe = which, url, ?limit, "probe timed out; treating as miss");
            false
        }
    }
}
