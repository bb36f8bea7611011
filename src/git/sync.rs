//! Reconciliation of the local branch with `origin/<branch>`.
//!
//! Fetch, count ahead/behind, then either do nothing, rebase onto the
//! remote, or refuse because the histories diverged. Only entered when the
//! repository already has commits.

use tracing::{debug, warn};

use crate::error::SyncError;
use crate::git::inspect::REMOTE;
use crate::git::runner::GitRunner;

/// Commits the local HEAD has that the remote does not, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncStatus {
    pub ahead: u32,
    pub behind: u32,
}

/// What the counts say must happen next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Nothing to pull; local may be ahead.
    Proceed,
    /// Remote has new commits and local has none of its own.
    Rebase,
    /// Both sides moved; never auto-rebased.
    Abort,
}

impl SyncStatus {
    pub fn action(&self) -> SyncAction {
        match (self.ahead, self.behind) {
            (_, 0) => SyncAction::Proceed,
            (0, _) => SyncAction::Rebase,
            _ => SyncAction::Abort,
        }
    }
}

/// How reconciliation ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    AlreadySynced { ahead: u32 },
    Rebased { behind: u32 },
}

/// Bring the local branch into a pushable relationship with its remote.
pub fn reconcile<G: GitRunner>(git: &G, branch: &str) -> Result<SyncOutcome, SyncError> {
    fetch_remote(git, branch)?;

    let status = sync_status(git, branch);
    debug!(
        "origin/{}: ahead {}, behind {}",
        branch, status.ahead, status.behind
    );

    match status.action() {
        SyncAction::Proceed => Ok(SyncOutcome::AlreadySynced {
            ahead: status.ahead,
        }),
        SyncAction::Rebase => {
            rebase_onto_remote(git, branch)?;
            Ok(SyncOutcome::Rebased {
                behind: status.behind,
            })
        }
        SyncAction::Abort => Err(SyncError::Diverged {
            ahead: status.ahead,
            behind: status.behind,
        }),
    }
}

/// `git fetch origin <branch>`. Failure is fatal to the run.
pub fn fetch_remote<G: GitRunner>(git: &G, branch: &str) -> Result<(), SyncError> {
    let output = git.run(&["fetch", REMOTE, branch])?;
    if !output.success {
        return Err(SyncError::FetchFailed {
            branch: branch.to_string(),
            stderr: output.diagnostics(),
        });
    }
    Ok(())
}

/// Ahead/behind counts against `origin/<branch>`.
///
/// Any failure degrades to zero/zero so an unpublished branch (no remote
/// ref yet) does not block committing.
pub fn sync_status<G: GitRunner>(git: &G, branch: &str) -> SyncStatus {
    let range = format!("HEAD...{}/{}", REMOTE, branch);
    let output = match git.run(&["rev-list", "--left-right", "--count", &range]) {
        Ok(output) => output,
        Err(e) => {
            warn!("Could not count commits against {}: {}", range, e);
            return SyncStatus::default();
        }
    };

    if !output.success {
        warn!(
            "Could not count commits against {}, assuming in sync: {}",
            range,
            output.diagnostics()
        );
        return SyncStatus::default();
    }

    parse_ahead_behind(output.text()).unwrap_or_else(|| {
        warn!("Unexpected rev-list output '{}', assuming in sync", output.text());
        SyncStatus::default()
    })
}

/// Parse `<ahead>\t<behind>` as printed by `rev-list --left-right --count`.
pub fn parse_ahead_behind(text: &str) -> Option<SyncStatus> {
    let mut parts = text.split_whitespace();
    let ahead = parts.next()?.parse().ok()?;
    let behind = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(SyncStatus { ahead, behind })
}

/// Rebase local HEAD onto `origin/<branch>`; a non-zero exit is a conflict.
///
/// `--autostash` keeps the about-to-be-committed work tree changes out of
/// the way. A conflicted rebase is left in progress for the user.
pub fn rebase_onto_remote<G: GitRunner>(git: &G, branch: &str) -> Result<(), SyncError> {
    let upstream = format!("{}/{}", REMOTE, branch);
    let output = git.run(&["rebase", "--autostash", &upstream])?;
    if !output.success {
        return Err(SyncError::RebaseConflict {
            branch: branch.to_string(),
            stderr: output.diagnostics(),
        });
    }
    Ok(())
}
