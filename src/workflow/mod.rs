//! The `sutra commit` pipeline.
//!
//! Runs as an explicit state machine:
//!
//! ```text
//! ValidateEnvironment -> [ValidateBranch (sync)] -> CheckDirty -> Stage
//!   -> GenerateMessage -> Confirm -> Commit -> Push -> Done
//! ```
//!
//! Every stage either hands the run to the next stage, finishes it early
//! (nothing to commit, user declined), or fails it with a [`WorkflowError`].
//! Nothing is rolled back: a failed push leaves the commit in place.

use tracing::debug;

use crate::commit::generate_commit_draft;
use crate::config::{ConfigStore, WorkflowConfig};
use crate::error::{SetupError, WorkflowError};
use crate::git::inspect::{self, RepositoryState};
use crate::git::{GitRunner, PushReport, SyncOutcome, push_with_retry, reconcile};
use crate::interact::Interaction;
use crate::llm::TextGenerator;
use crate::ui;

pub const CONFIRM_QUESTION: &str = "Do you want to use this commit message?";

/// How a run ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed {
        message: String,
        /// `None` when the repository had no commits to reconcile.
        sync: Option<SyncOutcome>,
        push: PushReport,
    },
    NothingToCommit,
    Declined {
        message: String,
    },
}

/// State carried between stages once the environment is validated.
#[derive(Debug)]
struct Run {
    config: WorkflowConfig,
    repo: RepositoryState,
    sync: Option<SyncOutcome>,
}

#[derive(Debug)]
enum Stage {
    ValidateEnvironment,
    ValidateBranch(Run),
    CheckDirty(Run),
    Stage(Run),
    GenerateMessage(Run),
    Confirm(Run, String),
    Commit(Run, String),
    Push(Run, String),
    Done(CommitOutcome),
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::ValidateEnvironment => "validate-environment",
            Stage::ValidateBranch(_) => "validate-branch",
            Stage::CheckDirty(_) => "check-dirty",
            Stage::Stage(_) => "stage",
            Stage::GenerateMessage(_) => "generate-message",
            Stage::Confirm(..) => "confirm",
            Stage::Commit(..) => "commit",
            Stage::Push(..) => "push",
            Stage::Done(_) => "done",
        }
    }
}

/// Collaborators for one `sutra commit` run.
pub struct CommitWorkflow<'a, G, T, I>
where
    G: GitRunner,
    T: TextGenerator + ?Sized,
    I: Interaction,
{
    pub git: &'a G,
    pub store: &'a ConfigStore,
    pub generator: &'a T,
    pub interaction: &'a I,
}

impl<G, T, I> CommitWorkflow<'_, G, T, I>
where
    G: GitRunner,
    T: TextGenerator + ?Sized,
    I: Interaction,
{
    /// Drive the state machine to completion.
    pub async fn run(&self) -> Result<CommitOutcome, WorkflowError> {
        let mut stage = Stage::ValidateEnvironment;
        loop {
            debug!("commit workflow: {}", stage.name());
            stage = match stage {
                Stage::Done(outcome) => return Ok(outcome),
                Stage::ValidateEnvironment => self.validate_environment()?,
                Stage::ValidateBranch(run) => self.validate_branch(run)?,
                Stage::CheckDirty(run) => check_dirty(run),
                Stage::Stage(run) => self.stage(run)?,
                Stage::GenerateMessage(run) => self.generate_message(run).await?,
                Stage::Confirm(run, message) => self.confirm(run, message)?,
                Stage::Commit(run, message) => self.commit(run, message)?,
                Stage::Push(run, message) => self.push(run, message)?,
            };
        }
    }

    fn validate_environment(&self) -> Result<Stage, WorkflowError> {
        if !self.store.exists() {
            return Err(SetupError::ConfigMissing.into());
        }
        if !inspect::is_repository(self.git) {
            return Err(SetupError::NotARepository(self.store.root().to_path_buf()).into());
        }

        let config = self.store.read().map_err(SetupError::from)?;
        let repo = RepositoryState::capture(self.git)?;
        debug!("Repository state: {:?}", repo);

        let run = Run {
            config,
            repo,
            sync: None,
        };
        if run.repo.has_commits {
            Ok(Stage::ValidateBranch(run))
        } else {
            Ok(Stage::CheckDirty(run))
        }
    }

    fn validate_branch(&self, mut run: Run) -> Result<Stage, WorkflowError> {
        let configured = &run.config.branch_name;
        let current = run.repo.current_branch.clone().unwrap_or_default();
        if &current != configured {
            return Err(WorkflowError::BranchMismatch {
                current,
                configured: configured.clone(),
            });
        }

        ui::step(&format!(
            "Fetching latest changes from origin/{}...",
            configured
        ));
        let outcome = reconcile(self.git, configured)?;
        match outcome {
            SyncOutcome::AlreadySynced { .. } => ui::done("Branch is up to date with origin"),
            SyncOutcome::Rebased { behind } => ui::done(&format!(
                "Rebased onto origin/{} ({} new commit(s))",
                configured, behind
            )),
        }

        run.sync = Some(outcome);
        Ok(Stage::CheckDirty(run))
    }

    fn stage(&self, run: Run) -> Result<Stage, WorkflowError> {
        ui::step("Staging all changes...");
        inspect::stage_all(self.git)?;
        Ok(Stage::GenerateMessage(run))
    }

    async fn generate_message(&self, run: Run) -> Result<Stage, WorkflowError> {
        let is_initial_commit = !run.repo.has_commits;
        let input = if is_initial_commit {
            ui::step("First commit detected. Analyzing full project...");
            inspect::full_file_snapshot(self.git)?
        } else {
            ui::step("Existing repository detected. Analyzing diff...");
            inspect::staged_diff(self.git)
        };

        if input.trim().is_empty() {
            return Err(WorkflowError::NothingToAnalyze);
        }

        ui::step("Generating commit message using AI...");
        let draft = generate_commit_draft(
            self.generator,
            &input,
            &run.config.style,
            is_initial_commit,
        )
        .await?;

        let message = draft.formatted();
        ui::success("AI-generated commit message:");
        ui::highlight(&message);
        Ok(Stage::Confirm(run, message))
    }

    fn confirm(&self, run: Run, message: String) -> Result<Stage, WorkflowError> {
        if self.interaction.confirm(CONFIRM_QUESTION, true)? {
            Ok(Stage::Commit(run, message))
        } else {
            ui::warn("Commit aborted.");
            Ok(Stage::Done(CommitOutcome::Declined { message }))
        }
    }

    fn commit(&self, run: Run, message: String) -> Result<Stage, WorkflowError> {
        let output = inspect::commit(self.git, &message)?;
        if !output.success {
            return Err(WorkflowError::CommitFailed {
                output: output.transcript(),
            });
        }
        ui::done(&format!("Created commit: {}", message));
        Ok(Stage::Push(run, message))
    }

    fn push(&self, run: Run, message: String) -> Result<Stage, WorkflowError> {
        let branch = &run.config.branch_name;
        let push = push_with_retry(self.git, branch, |_| {
            ui::warn("Push rejected. Attempting to sync and retry...");
        })?;
        ui::done(&format!("Pushed to origin/{}", branch));
        ui::success("Changes committed and pushed successfully!");

        Ok(Stage::Done(CommitOutcome::Committed {
            message,
            sync: run.sync,
            push,
        }))
    }
}

fn check_dirty(run: Run) -> Stage {
    if run.repo.has_uncommitted_changes {
        Stage::Stage(run)
    } else {
        ui::warn("No uncommitted changes detected. Nothing to commit.");
        Stage::Done(CommitOutcome::NothingToCommit)
    }
}
