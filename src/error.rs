//! Error types for sutra modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from invoking the `git` subprocess.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to run git {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("git {command} returned no output")]
    EmptyOutput { command: String },
}

/// Errors from the `.sutra` configuration store.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read configuration: {0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to write configuration: {0}")]
    Write(#[source] std::io::Error),

    #[error("Invalid .sutra file: {0}")]
    Invalid(String),

    #[error("Invalid .sutra file: mandatory field {0} is missing or empty")]
    MissingField(&'static str),
}

/// Errors from reconciling the local branch with its remote counterpart.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to fetch origin/{branch}: {stderr}")]
    FetchFailed { branch: String, stderr: String },

    #[error("Branch has diverged from its remote (ahead {ahead}, behind {behind})")]
    Diverged { ahead: u32, behind: u32 },

    #[error("Rebase onto origin/{branch} stopped on a conflict: {stderr}")]
    RebaseConflict { branch: String, stderr: String },

    #[error(transparent)]
    Git(#[from] GitError),
}

/// Errors from publishing the commit.
#[derive(Error, Debug)]
pub enum PushError {
    #[error("Push to origin/{branch} failed after retry: {stderr}")]
    RejectedAfterRetry { branch: String, stderr: String },

    #[error("Push was rejected and re-synchronizing failed: {0}")]
    Resync(#[source] SyncError),

    #[error(transparent)]
    Git(#[from] GitError),
}

/// Ways a well-formed draft can still be unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftViolation {
    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("'type' is missing")]
    MissingType,

    #[error("'type' must be one of feat, fix, refactor, docs, test, chore, perf (got {0})")]
    InvalidType(String),

    #[error("'scope' must be a string or null")]
    InvalidScope,

    #[error("'message' must be a non-empty string")]
    EmptyMessage,
}

/// Errors from the text-generation service and draft handling.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("AI generation failed with status {status}")]
    Service { status: u16 },

    #[error("Could not reach the text-generation service: {0}")]
    Unreachable(String),

    #[error("Text-generation service returned an unexpected body: {0}")]
    MalformedBody(String),

    #[error("Failed to parse AI response as JSON: {0}")]
    Parse(String),

    #[error("AI response failed validation: {0}")]
    Validation(#[from] DraftViolation),

    #[error("AI returned an empty response")]
    EmptyResponse,
}

/// Errors from interactive terminal prompts.
#[derive(Error, Debug)]
pub enum InteractionError {
    #[error("Interactive prompt failed: {0}")]
    Prompt(String),
}

/// Errors caused by the user's environment rather than the workflow itself.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("git executable not found on PATH")]
    GitNotInstalled,

    #[error(".sutra configuration not found")]
    ConfigMissing,

    #[error(".sutra file already exists")]
    AlreadyInitialized,

    #[error("{} is not a Git repository", .0.display())]
    NotARepository(PathBuf),

    #[error("Progress analysis is disabled in .sutra")]
    AnalysisDisabled,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Interaction(#[from] InteractionError),
}

impl SetupError {
    /// Suggested remedial action shown under the error.
    pub fn remedy(&self) -> Option<&'static str> {
        match self {
            SetupError::GitNotInstalled => Some("Install git and make sure it is on your PATH."),
            SetupError::ConfigMissing => Some("Run 'sutra init' first."),
            SetupError::AlreadyInitialized => {
                Some("Use 'sutra reinit' to refresh the repository and branch.")
            }
            SetupError::NotARepository(_) => {
                Some("Run sutra from inside a Git repository, or run 'sutra init'.")
            }
            SetupError::AnalysisDisabled => {
                Some("Set ENABLE_PROGRESS_ANALYSIS = true under [ANALYSIS] in .sutra.")
            }
            SetupError::Config(ConfigError::MissingField(_) | ConfigError::Invalid(_)) => {
                Some("Fix .sutra or delete it and run 'sutra init' again.")
            }
            SetupError::Config(_) | SetupError::Git(_) | SetupError::Interaction(_) => None,
        }
    }
}

/// Terminal errors of the commit workflow.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("You are on '{current}', but the configured branch is '{configured}'")]
    BranchMismatch { current: String, configured: String },

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Nothing to analyze: the staged changes could not be read")]
    NothingToAnalyze,

    #[error("git commit failed:\n{output}")]
    CommitFailed { output: String },

    #[error(transparent)]
    Push(#[from] PushError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Interaction(#[from] InteractionError),
}

impl WorkflowError {
    /// Suggested remedial action shown under the error.
    pub fn remedy(&self) -> Option<&'static str> {
        match self {
            WorkflowError::Setup(e) => e.remedy(),
            WorkflowError::BranchMismatch { .. } => {
                Some("Check out the configured branch, or run 'sutra reinit' to switch the configuration.")
            }
            WorkflowError::Sync(SyncError::Diverged { .. }) => {
                Some("Please manually reconcile (rebase or merge) before using sutra commit.")
            }
            WorkflowError::Sync(SyncError::RebaseConflict { .. }) => Some(
                "Resolve the conflicts manually and run 'git rebase --continue'.",
            ),
            WorkflowError::Sync(SyncError::FetchFailed { .. }) => {
                Some("Check your network connection and the origin remote.")
            }
            WorkflowError::Generation(GenerationError::Service { .. })
            | WorkflowError::Generation(GenerationError::Unreachable(_)) => {
                Some("Make sure the local Ollama server is running (SUTRA_OLLAMA_URL).")
            }
            WorkflowError::Generation(_) => Some("Run 'sutra commit' again to get a new message."),
            WorkflowError::NothingToAnalyze => Some("Check 'git status' and try again."),
            WorkflowError::CommitFailed { .. } => {
                Some("Please check the git output above. Your changes are still staged.")
            }
            WorkflowError::Push(_) => Some(
                "The commit was kept locally. Resolve the conflicts manually and push again.",
            ),
            WorkflowError::Config(_) => Some("Fix .sutra or run 'sutra init' again."),
            WorkflowError::Sync(SyncError::Git(_))
            | WorkflowError::Git(_)
            | WorkflowError::Interaction(_) => None,
        }
    }
}
