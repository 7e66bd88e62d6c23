//! Dependency-store fingerprints for no-op install detection.
//!
//! A fingerprint hashes the sorted listing of a directory two levels deep
//! (enough to see `@scope/name` packages). Each entry contributes its
//! relative path and size. Top-level dotfiles such as `.package-lock.json`
//! are npm bookkeeping, rewritten on every run, and are skipped. A missing
//! directory hashes as an empty listing.

use std::path::Path;

use walkdir::WalkDir;

/// Opaque summary of a directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint(blake3::Hash);

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

/// Fingerprint `dir`. Blocking; call from `spawn_blocking` in async code.
pub fn fingerprint(dir: &Path) -> Fingerprint {
    let mut hasher = blake3::Hasher::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.depth() == 1 && e.file_name().to_string_lossy().starts_with('.')))
        .filter_map(Result::ok)
    {
        let rel = entry.path().strip_prefix(dir).unwrap_or(entry.path());
        hasher.update(rel.to_string_lossy().as_bytes());
        hasher.update(&[0]);

        if let Ok(meta) = entry.metadata() {
            hasher.update(&meta.len().to_le_bytes());
        }
    }

    Fingerprint(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;
    use tempfile::TempDir;

    #[test]
    fn test_stable_for_unchanged_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("left-pad")).unwrap();
        std::fs::write(dir.path().join("left-pad/package.json"), "{}").unwrap();

        assert_eq!(fingerprint(dir.path()), fingerprint(dir.path()));
    }

    #[test]
    fn test_changes_when_package_added() {
        let dir = TempDir::new().unwrap();
        let before = fingerprint(dir.path());
        std::fs::create_dir(dir.path().join("left-pad")).unwrap();
        assert_ne!(before, fingerprint(dir.path()));
    }

    #[test]
    fn test_sees_scoped_packages() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("@types")).unwrap();
        let before = fingerprint(dir.path());
        std::fs::create_dir(dir.path().join("@types/node")).unwrap();
        assert_ne!(before, fingerprint(dir.path()));
    }

    #[test]
    fn test_missing_dir_is_empty_listing() {
        let dir = TempDir::new().unwrap();
        let empty = TempDir::new().unwrap();
        assert_eq!(
            fingerprint(&dir.path().join("node_modules")),
            fingerprint(empty.path())
        );
    }

    #[test]
    fn test_ignores_top_level_bookkeeping() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("left-pad")).unwrap();
        let lock = dir.path().join(".package-lock.json");
        std::fs::write(&lock, r#"{"lockfileVersion":3}"#).unwrap();
        let before = fingerprint(dir.path());

        std::fs::write(&lock, r#"{"lockfileVersion":3,"packages":{"node_modules/left-pad":{}}}"#)
            .unwrap();
        std::fs::create_dir(dir.path().join(".cache")).unwrap();
        assert_eq!(before, fingerprint(dir.path()));

        std::fs::create_dir(dir.path().join("is-odd")).unwrap();
        assert_ne!(before, fingerprint(dir.path()));
    }

    #[test]
    fn test_ignores_touch_without_content_change() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("left-pad/package.json");
        std::fs::create_dir(dir.path().join("left-pad")).unwrap();
        std::fs::write(&manifest, "{}").unwrap();
        let before = fingerprint(dir.path());

        let file = std::fs::File::options().write(true).open(&manifest).unwrap();
        file.set_modified(UNIX_EPOCH).unwrap();
        assert_eq!(before, fingerprint(dir.path()));
    }
}
