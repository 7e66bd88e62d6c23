//! Shared types for anypm.
//!
//! Everything here is created fresh per invocation from process input and is
//! never mutated after construction. The core (`anypm-core`) produces these
//! values; the CLI only reads and renders them.

pub mod asset;
pub mod hash;
pub mod outcome;
pub mod repo;
pub mod types;

// Re-exports
pub use asset::{ArchiveKind, Asset, ReleaseMetadata};
pub use hash::{DigestError, ExpectedDigest, Sha256Hash};
pub use outcome::{FailureKind, InstallOutcome};
pub use repo::{RepoPath, RepoPathError};
pub use types::{Ecosystem, PackageRequest, ReleaseVersion};
