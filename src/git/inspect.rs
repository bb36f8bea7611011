//! Read-only repository queries plus the two index-mutating steps
//! (stage, commit) the workflow needs.

use std::path::PathBuf;

use tracing::warn;

use crate::error::GitError;
use crate::git::runner::{GitOutput, GitRunner};

/// The remote every sutra operation targets.
pub const REMOTE: &str = "origin";

/// Repository facts captured once at the start of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryState {
    pub has_commits: bool,
    /// `None` while HEAD is unborn (no commits yet).
    pub current_branch: Option<String>,
    /// `None` when no origin remote is configured.
    pub remote_url: Option<String>,
    pub has_uncommitted_changes: bool,
}

impl RepositoryState {
    pub fn capture<G: GitRunner>(git: &G) -> Result<Self, GitError> {
        let has_commits = has_commits(git);
        let current_branch = if has_commits {
            Some(current_branch(git)?)
        } else {
            None
        };

        Ok(Self {
            has_commits,
            current_branch,
            remote_url: remote_url(git).ok(),
            has_uncommitted_changes: has_uncommitted_changes(git)?,
        })
    }
}

/// Whether the runner's directory is inside a git work tree. Never fails.
pub fn is_repository<G: GitRunner>(git: &G) -> bool {
    git.run(&["rev-parse", "--is-inside-work-tree"])
        .map(|o| o.success && o.text() == "true")
        .unwrap_or(false)
}

/// Absolute path of the work tree root, wherever inside it the runner sits.
pub fn toplevel<G: GitRunner>(git: &G) -> Result<PathBuf, GitError> {
    non_empty(git, &["rev-parse", "--show-toplevel"]).map(PathBuf::from)
}

/// Whether HEAD resolves to a commit.
pub fn has_commits<G: GitRunner>(git: &G) -> bool {
    git.run(&["rev-parse", "--verify", "--quiet", "HEAD"])
        .map(|o| o.success)
        .unwrap_or(false)
}

pub fn current_branch<G: GitRunner>(git: &G) -> Result<String, GitError> {
    non_empty(git, &["rev-parse", "--abbrev-ref", "HEAD"])
}

pub fn remote_url<G: GitRunner>(git: &G) -> Result<String, GitError> {
    non_empty(git, &["config", "--get", "remote.origin.url"])
}

/// True iff `git status --porcelain` reports anything.
pub fn has_uncommitted_changes<G: GitRunner>(git: &G) -> Result<bool, GitError> {
    let output = git.run_checked(&["status", "--porcelain"])?;
    Ok(!output.text().is_empty())
}

/// The staged diff, or an empty string if it cannot be read.
pub fn staged_diff<G: GitRunner>(git: &G) -> String {
    match git.run(&["diff", "--staged"]) {
        Ok(output) if output.success => output.stdout,
        Ok(output) => {
            warn!("git diff --staged failed: {}", output.diagnostics());
            String::new()
        }
        Err(e) => {
            warn!("{}", e);
            String::new()
        }
    }
}

/// Newline-joined list of tracked (staged) paths, for the first commit.
pub fn full_file_snapshot<G: GitRunner>(git: &G) -> Result<String, GitError> {
    let output = git.run_checked(&["ls-files"])?;
    Ok(output.stdout)
}

/// Stage every change in the work tree (`git add -A`).
pub fn stage_all<G: GitRunner>(git: &G) -> Result<(), GitError> {
    git.run_checked(&["add", "-A"])?;
    Ok(())
}

/// Create a commit. The message is passed as one argument, never through a shell.
pub fn commit<G: GitRunner>(git: &G, message: &str) -> Result<GitOutput, GitError> {
    git.run(&["commit", "-m", message])
}

fn non_empty<G: GitRunner>(git: &G, args: &[&str]) -> Result<String, GitError> {
    let output = git.run_checked(args)?;
    let text = output.text();
    if text.is_empty() {
        return Err(GitError::EmptyOutput {
            command: args.join(" "),
        });
    }
    Ok(text.to_string())
}
