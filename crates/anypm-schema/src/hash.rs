//! Computed and published SHA256 digests.

use serde::{Deserialize, Serialize};

/// Newtype for a computed SHA256 digest, rendered as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Sha256Hash(String);

impl Sha256Hash {
    /// Wrap an already-encoded hex digest.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Return the inner hex string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact, case-sensitive comparison against a published digest.
    pub fn matches(&self, expected: &ExpectedDigest) -> bool {
        self.0 == expected.0
    }
}

impl std::fmt::Display for Sha256Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Sha256Hash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Why a published checksum body was refused before any comparison.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DigestError {
    /// The body was empty after trimming whitespace.
    #[error("checksum body is empty")]
    Empty,

    /// The body was too short to be a digest (likely an error page or truncation).
    #[error("checksum body too short: {0} chars")]
    TooShort(usize),
}

/// A digest as published alongside a release, trimmed but otherwise verbatim.
///
/// No case folding or hex validation happens here: verification is an exact
/// string match against the computed digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExpectedDigest(String);

impl ExpectedDigest {
    /// Shortest body accepted as a digest.
    pub const MIN_LEN: usize = 32;

    /// Validate a fetched checksum body.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::Empty`] for a blank body and
    /// [`DigestError::TooShort`] for fewer than [`Self::MIN_LEN`] characters.
    pub fn parse(body: &str) -> Result<Self, DigestError> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Err(DigestError::Empty);
        }
        let len = trimmed.chars().count();
        if len < Self::MIN_LEN {
            return Err(DigestError::TooShort(len));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Return the digest text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

    #[test]
    fn test_expected_digest_is_trimmed() {
        let d = ExpectedDigest::parse(&format!("  {DIGEST}\n")).unwrap();
        assert_eq!(d.as_str(), DIGEST);
    }

    #[test]
    fn test_expected_digest_rejects_empty_and_short() {
        assert_eq!(ExpectedDigest::parse(""), Err(DigestError::Empty));
        assert_eq!(ExpectedDigest::parse(" \n\t"), Err(DigestError::Empty));
        assert_eq!(ExpectedDigest::parse("Not Found"), Err(DigestError::TooShort(9)));
        assert_eq!(
            ExpectedDigest::parse(&DIGEST[..31]),
            Err(DigestError::TooShort(31))
        );
        assert!(ExpectedDigest::parse(&DIGEST[..32]).is_ok());
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let computed = Sha256Hash::new(DIGEST);
        let exact = ExpectedDigest::parse(DIGEST).unwrap();
        assert!(computed.matches(&exact));

        let one_upper = DIGEST.replacen('f', "F", 1);
        assert_ne!(one_upper, DIGEST);
        let shouted = ExpectedDigest::parse(&one_upper).unwrap();
        assert!(!computed.matches(&shouted));
    }
}
