pub mod profile;

/// Primary key of a profile document.
///
/// Compared exactly: no case folding or trimming is ever applied.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProfileId(String);

impl ProfileId {
    pub fn new(id: impl Into<String>) -> Self {
        ProfileId(id.into())
    }

    /// Identifier assigned to the `n`th generated fixture record.
    pub fn fixture(n: usize) -> Self {
        ProfileId(format!("profile-{}", n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
pub enum RepoError {
    StorageError(String),
}

impl std::fmt::Display for RepoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoError::StorageError(e) => write!(f, "Storage error: {}", e),
        }
    }
}

#[derive(Debug)]
pub enum RepoRetrieveError {
    StorageError(String),
    InvalidData(String),
}

impl std::fmt::Display for RepoRetrieveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoRetrieveError::StorageError(e) => write!(f, "Storage error: {}", e),
            RepoRetrieveError::InvalidData(e) => write!(f, "Invalid stored data: {}", e),
        }
    }
}
