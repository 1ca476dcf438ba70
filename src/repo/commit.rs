use chrono::{DateTime, FixedOffset};

use crate::cmd::CommitId;
use crate::error::{GitError, Result};

/// `git log` format read back by [`Commit::parse`]: six header lines, the
/// subject, a blank line, then the body.
pub(crate) const LOG_FORMAT: &str = "--pretty=format:%ae%n%an%n%aI%n%ce%n%cn%n%cI%n%s%n%n%b";

/// Metadata of one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    id: CommitId,
    subject: String,
    body: Option<String>,
    author_email: String,
    author_name: Option<String>,
    author_date: DateTime<FixedOffset>,
    committer_email: String,
    committer_name: Option<String>,
    committer_date: DateTime<FixedOffset>,
}

impl Commit {
    pub(crate) fn parse(id: CommitId, lines: &[String]) -> Result<Self> {
        if lines.len() < 7 {
            return Err(GitError::command_failed(format!("Reading of commit {} failed.", id)));
        }
        let body = lines.get(8..).unwrap_or_default().join("\n");
        let body = body.trim();

        Ok(Commit {
            subject: lines[6].clone(),
            body: (!body.is_empty()).then(|| body.to_string()),
            author_email: lines[0].clone(),
            author_name: non_empty(&lines[1]),
            author_date: parse_date(&lines[2])?,
            committer_email: lines[3].clone(),
            committer_name: non_empty(&lines[4]),
            committer_date: parse_date(&lines[5])?,
            id,
        })
    }

    pub fn id(&self) -> &CommitId { &self.id }
    pub fn subject(&self) -> &str { &self.subject }
    pub fn body(&self) -> Option<&str> { self.body.as_deref() }
    pub fn author_name(&self) -> Option<&str> { self.author_name.as_deref() }
    pub fn author_email(&self) -> &str { &self.author_email }
    pub fn author_date(&self) -> DateTime<FixedOffset> { self.author_date }
    pub fn committer_name(&self) -> Option<&str> { self.committer_name.as_deref() }
    pub fn committer_email(&self) -> &str { &self.committer_email }
    pub fn committer_date(&self) -> DateTime<FixedOffset> { self.committer_date }

    /// Alias for [`Commit::author_date`].
    pub fn date(&self) -> DateTime<FixedOffset> { self.author_date }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Strict ISO 8601 as printed by `%aI`, `%cI` and `--date=iso-strict`.
pub(crate) fn parse_date(raw: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map_err(|e| GitError::InvalidArgument(format!("Invalid commit date '{}': {}", raw.trim(), e)))
}
