//! Git operations by driving the system `git` binary.

pub mod history;
pub mod inspect;
pub mod push;
pub mod runner;
pub mod sync;

pub use history::{CommitRecord, commit_history};
pub use inspect::{REMOTE, RepositoryState};
pub use push::{PushReport, push_with_retry};
pub use runner::{GitOutput, GitRunner, SystemGit, git_installed};
pub use sync::{SyncAction, SyncOutcome, SyncStatus, reconcile};
