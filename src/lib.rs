//! sutra - AI-assisted Git commit workflow.
//!
//! # Overview
//!
//! sutra inspects the repository, reconciles the configured branch with its
//! remote, stages everything, asks a local text-generation service for a
//! structured commit message, and commits and pushes it after confirmation.
//! It also produces an AI review of the commit history.

pub mod analyze;
pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod interact;
pub mod llm;
pub mod setup;
pub mod ui;
pub mod workflow;

// Re-export commonly used types
pub use commit::{CommitDraft, CommitType, format_message};
pub use config::{ConfigStore, WorkflowConfig};
pub use error::{
    ConfigError, DraftViolation, GenerationError, GitError, PushError, SetupError, SyncError,
    WorkflowError,
};
pub use git::{GitRunner, SystemGit};
pub use workflow::{CommitOutcome, CommitWorkflow};
