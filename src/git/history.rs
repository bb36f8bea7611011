//! Commit history listing for progress analysis.

use serde::{Deserialize, Serialize};

use crate::error::GitError;
use crate::git::runner::GitRunner;

const LOG_FORMAT: &str = "--pretty=format:%H|%an|%ad|%f";

/// One line of `git log`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    pub author: String,
    pub date: String,
    /// Sanitized subject (`%f`): words joined by dashes.
    pub subject: String,
}

/// Full history of HEAD, newest first. Empty when there are no commits.
pub fn commit_history<G: GitRunner>(git: &G) -> Result<Vec<CommitRecord>, GitError> {
    let output = git.run(&["log", LOG_FORMAT])?;
    if !output.success {
        // `git log` fails on an unborn branch
        if crate::git::inspect::has_commits(git) {
            return Err(GitError::CommandFailed {
                command: "log".to_string(),
                stderr: output.diagnostics(),
            });
        }
        return Ok(Vec::new());
    }
    Ok(parse_log(&output.stdout))
}

/// Parse `%H|%an|%ad|%f` lines; blank lines are skipped and missing fields are empty.
pub fn parse_log(raw: &str) -> Vec<CommitRecord> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut fields = line.splitn(4, '|');
            let mut next = || fields.next().unwrap_or_default().to_string();
            CommitRecord {
                hash: next(),
                author: next(),
                date: next(),
                subject: next(),
            }
        })
        .collect()
}
