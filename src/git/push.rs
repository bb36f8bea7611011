//! Publishing with a single bounded retry.

use tracing::warn;

use crate::error::PushError;
use crate::git::inspect::REMOTE;
use crate::git::runner::{GitOutput, GitRunner};
use crate::git::sync::{fetch_remote, rebase_onto_remote};

/// How the push went when it succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushReport {
    /// Whether the first attempt was rejected and a re-sync plus retry was needed.
    pub retried: bool,
}

/// Push `branch` to origin, re-syncing and retrying exactly once on rejection.
///
/// `on_retry` is called before re-synchronizing, for user-facing reporting.
/// A second rejection is returned as [`PushError::RejectedAfterRetry`]; no
/// third attempt is made.
pub fn push_with_retry<G, F>(git: &G, branch: &str, on_retry: F) -> Result<PushReport, PushError>
where
    G: GitRunner,
    F: FnOnce(&str),
{
    let first = push(git, branch)?;
    if first.success {
        return Ok(PushReport { retried: false });
    }

    let reason = first.diagnostics();
    warn!("Push rejected: {}", reason);
    on_retry(&reason);

    fetch_remote(git, branch).map_err(PushError::Resync)?;
    rebase_onto_remote(git, branch).map_err(PushError::Resync)?;

    let second = push(git, branch)?;
    if second.success {
        return Ok(PushReport { retried: true });
    }

    Err(PushError::RejectedAfterRetry {
        branch: branch.to_string(),
        stderr: second.diagnostics(),
    })
}

fn push<G: GitRunner>(git: &G, branch: &str) -> Result<GitOutput, PushError> {
    Ok(git.run(&["push", "-u", REMOTE, branch])?)
}
