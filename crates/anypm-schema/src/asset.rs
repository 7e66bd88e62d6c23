//! Release metadata as returned by the hosting API, and asset selection.
//!
//! Selection is deliberately strict: only archive formats the downstream
//! unpacker understands are ever chosen, and there is no fallback to an
//! arbitrary first asset.

use serde::{Deserialize, Serialize};

/// A single downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// File name as published, e.g. `tool-1.2.0-x86_64-linux.tar.gz`.
    pub name: String,
    /// Direct download URL.
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
}

/// Release metadata, read once from the hosting API and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseMetadata {
    /// The resolved release tag (for `latest`, the tag it currently points at).
    #[serde(rename = "tag_name")]
    pub tag: String,
    /// Assets in the order the API returned them.
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl ReleaseMetadata {
    /// Choose the asset to download. See [`ArchiveKind::select`].
    pub fn select_asset(&self) -> Option<&Asset> {
        ArchiveKind::select(&self.assets)
    }
}

/// Archive formats accepted for release downloads, in preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveKind {
    /// Gzip-compressed tar archive (`.tar.gz`).
    #[serde(rename = "tar.gz")]
    TarGz,
    /// Zip archive (`.zip`).
    Zip,
}

impl ArchiveKind {
    /// Accepted kinds, most preferred first.
    pub const PREFERENCE: [ArchiveKind; 2] = [ArchiveKind::TarGz, ArchiveKind::Zip];

    /// File suffix for this kind.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::TarGz => ".tar.gz",
            Self::Zip => ".zip",
        }
    }

    /// Classify a file name by its exact (case-sensitive) suffix.
    #[allow(clippy::case_sensitive_file_extension_comparisons)]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::PREFERENCE
            .into_iter()
            .find(|kind| name.ends_with(kind.suffix()))
    }

    /// Pick the first `.tar.gz` asset, else the first `.zip` asset, else nothing.
    ///
    /// Pure and deterministic in the asset order.
    pub fn select(assets: &[Asset]) -> Option<&Asset> {
        Self::PREFERENCE.into_iter().find_map(|kind| {
            assets
                .iter()
                .find(|a| Self::from_name(&a.name) == Some(kind))
        })
    }
}
