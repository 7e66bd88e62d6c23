//! GitHub repository references.

/// Errors produced when validating a repository path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepoPathError {
    /// The input is not exactly two non-empty `/`-separated components.
    #[error("expected 'owner/repo', got '{0}'")]
    Shape(String),

    /// The owner starts with `@`, which only npm scopes do.
    #[error("'{0}' looks like an npm scope, not a repository owner")]
    ScopedOwner(String),
}

/// A validated GitHub repository reference in `owner/repo` format.
///
/// # Example
///
/// ```
/// use anypm_schema::repo::RepoPath;
///
/// let repo = RepoPath::parse("jqlang/jq").unwrap();
/// assert_eq!(repo.owner(), "jqlang");
/// assert_eq!(repo.name(), "jq");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RepoPath {
    owner: String,
    name: String,
}

impl RepoPath {
    /// Parse and validate an `owner/repo` string.
    ///
    /// # Errors
    ///
    /// Returns [`RepoPathError::Shape`] if `s` does not have exactly two
    /// non-empty components, or [`RepoPathError::ScopedOwner`] if the owner
    /// begins with `@`.
    pub fn parse(s: &str) -> Result<Self, RepoPathError> {
        let mut parts = s.split('/');
        let (Some(owner), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(RepoPathError::Shape(s.to_string()));
        };
        if owner.is_empty() || name.is_empty() {
            return Err(RepoPathError::Shape(s.to_string()));
        }
        if owner.starts_with('@') {
            return Err(RepoPathError::ScopedOwner(s.to_string()));
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Get the owner part.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Get the repo name part.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for RepoPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
