use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::GitError;

static COMMIT_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{40}$").expect("commit id regex is valid")
});

/// Full 40-digit object name of a commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(id: impl Into<String>) -> Result<Self, GitError> {
        let id = id.into();
        if !Self::is_valid(&id) {
            return Err(GitError::InvalidArgument(format!("Invalid commit ID '{}'.", id)));
        }
        Ok(CommitId(id))
    }

    pub fn is_valid(id: &str) -> bool {
        COMMIT_ID_RE.is_match(id)
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl FromStr for CommitId {
    type Err = GitError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { CommitId::new(s) }
}

impl AsRef<str> for CommitId {
    fn as_ref(&self) -> &str { &self.0 }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
