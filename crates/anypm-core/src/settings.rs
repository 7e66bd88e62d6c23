//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then `<home>/config.toml` if it
//! exists, then environment overrides. Every key in the file is optional.
//!
//! ```toml
//! github_api = "https://github.example.com/api/v3"
//! probe_timeout_ms = 2000
//! download_attempts = 5
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::paths;
use crate::release::RetryPolicy;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("could not determine home directory; set {} to override", paths::HOME_ENV)]
    NoHome,

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Resolved settings shared by every component of a run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// anypm home (cache, scratch space, config file).
    pub home: PathBuf,
    /// Directory whose `node_modules` npm installs into.
    pub project_dir: PathBuf,
    /// Base URL of the GitHub REST API.
    pub github_api: String,
    /// Base URL for raw repository content.
    pub github_raw: String,
    /// Base URL of the npm registry.
    pub npm_registry: String,
    /// Sent as a bearer token on GitHub API requests when present.
    pub github_token: Option<String>,
    /// Bound on each detection probe.
    pub probe_timeout: Duration,
    /// Bound on metadata and checksum reads.
    pub request_timeout: Duration,
    /// Download retry budget and backoff.
    pub retry: RetryPolicy,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    github_api: Option<String>,
    github_raw: Option<String>,
    npm_registry: Option<String>,
    github_token: Option<String>,
    probe_timeout_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
    download_attempts: Option<u32>,
    retry_base_delay_ms: Option<u64>,
}

impl Settings {
    /// Built-in defaults rooted at `home`.
    pub fn new(home: impl Into<PathBuf>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            project_dir: project_dir.into(),
            github_api: "https://api.github.com".to_string(),
            github_raw: "https://raw.githubusercontent.com".to_string(),
            npm_registry: "https://registry.npmjs.org".to_string(),
            github_token: None,
            probe_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }

    /// Load settings for a run in `project_dir`.
    ///
    /// # Errors
    ///
    /// Fails if no home directory can be determined, or if a config file
    /// exists but cannot be read or parsed.
    pub fn load(project_dir: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let home = paths::try_anypm_home().ok_or(SettingsError::NoHome)?;
        let mut settings = Self::new(home, project_dir);

        let config = paths::config_path(&settings.home);
        if config.exists() {
            settings.apply_file(&config)?;
        }
        settings.apply_env(|key| std::env::var(key).ok());

        tracing::debug!(home = %settings.home.display(), "settings loaded");
        Ok(settings)
    }

    fn apply_file(&mut self, path: &Path) -> Result<(), SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileSettings = toml::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(v) = file.github_api {
            self.github_api = v;
        }
        if let Some(v) = file.github_raw {
            self.github_raw = v;
        }
        if let Some(v) = file.npm_registry {
            self.npm_registry = v;
        }
        if file.github_token.is_some() {
            self.github_token = file.github_token;
        }
        if let Some(ms) = file.probe_timeout_ms {
            self.probe_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = file.request_timeout_ms {
            self.request_timeout = Duration::from_millis(ms);
        }
        if let Some(n) = file.download_attempts {
            self.retry.max_attempts = n.max(1);
        }
        if let Some(ms) = file.retry_base_delay_ms {
            self.retry.base_delay = Duration::from_millis(ms);
        }
        Ok(())
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("ANYPM_GITHUB_API") {
            self.github_api = v;
        }
        if let Some(v) = lookup("ANYPM_GITHUB_RAW") {
            self.github_raw = v;
        }
        if let Some(v) = lookup("ANYPM_NPM_REGISTRY") {
            self.npm_registry = v;
        }
        if let Some(v) = lookup("GITHUB_TOKEN").filter(|t| !t.is_empty()) {
            self.github_token = Some(v);
        }
    }

    /// Where verified release artifacts are kept.
    pub fn cache_dir(&self) -> PathBuf {
        paths::cache_path(&self.home)
    }

    /// Scratch space for in-flight downloads.
    pub fn tmp_dir(&self) -> PathBuf {
        paths::tmp_path(&self.home)
    }

    /// The npm dependency store for the current project.
    pub fn node_modules(&self) -> PathBuf {
        paths::node_modules(&self.project_dir)
    }
}
