//! On-disk layout under the anypm home directory.

use dirs::home_dir;
use std::path::{Path, PathBuf};

/// Environment variable overriding the anypm home directory.
pub const HOME_ENV: &str = "ANYPM_HOME";

/// Returns the anypm home directory, or None if the user's home cannot be resolved.
pub fn try_anypm_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var(HOME_ENV) {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".anypm"))
}

/// Config file: <home>/config.toml
pub fn config_path(home: &Path) -> PathBuf {
    home.join("config.toml")
}

/// Verified release artifacts: <home>/cache
pub fn cache_path(home: &Path) -> PathBuf {
    home.join("cache")
}

/// Download scratch space: <home>/tmp (same volume as the cache)
pub fn tmp_path(home: &Path) -> PathBuf {
    home.join("tmp")
}

/// The npm dependency store for a project.
pub fn node_modules(project_dir: &Path) -> PathBuf {
    project_dir.join("node_modules")
}
