//! `sutra init`, `sutra reinit` and `sutra whoami`.

use tracing::{debug, warn};

use crate::config::{ConfigStore, TargetChange, WorkflowConfig};
use crate::error::{GitError, SetupError};
use crate::git::inspect;
use crate::git::{GitRunner, REMOTE};
use crate::interact::Interaction;
use crate::ui;

pub const DEFAULT_BRANCH: &str = "main";

/// What `init` ended up configuring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub repository_url: String,
    pub branch_name: String,
    /// Both values were read from an existing repository without asking.
    pub detected: bool,
    /// `git init` was run.
    pub created_repository: bool,
}

/// Create `.sutra` for the repository in the store's directory, creating the
/// repository and its origin remote when needed.
pub fn init<G, I>(git: &G, store: &ConfigStore, interaction: &I) -> Result<InitReport, SetupError>
where
    G: GitRunner,
    I: Interaction,
{
    if store.exists() {
        return Err(SetupError::AlreadyInitialized);
    }

    let report = if inspect::is_repository(git) {
        match detect_target(git) {
            Ok((repository_url, branch_name)) => {
                ui::success("Git repository detected.");
                ui::highlight(&format!("Repository: {}", repository_url));
                ui::highlight(&format!("Branch: {}", branch_name));
                InitReport {
                    repository_url,
                    branch_name,
                    detected: true,
                    created_repository: false,
                }
            }
            Err(e) => {
                debug!("Could not read repository details: {}", e);
                ui::warn("Git detected but failed to read details.");
                let (repository_url, branch_name) = ask_target(interaction)?;
                point_remote(git, &repository_url)?;
                git.run_checked(&["checkout", "-B", &branch_name])?;
                InitReport {
                    repository_url,
                    branch_name,
                    detected: false,
                    created_repository: false,
                }
            }
        }
    } else {
        ui::warn("Git repository not detected.");
        let (repository_url, branch_name) = ask_target(interaction)?;
        git.run_checked(&["init"])?;
        git.run_checked(&["remote", "add", REMOTE, &repository_url])?;
        git.run_checked(&["checkout", "-b", &branch_name])?;
        InitReport {
            repository_url,
            branch_name,
            detected: false,
            created_repository: true,
        }
    };

    store.write(&WorkflowConfig::new(
        report.repository_url.clone(),
        report.branch_name.clone(),
    ))?;

    ui::success("Sutra initialized successfully!");
    ui::step("Next steps:");
    ui::step("1. Run 'sutra commit' to generate commit messages and push changes.");
    ui::step("2. Run 'sutra analyze' to get insights on your project progress and commit history.");
    Ok(report)
}

/// What `reinit` changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReinitReport {
    pub repository_url: String,
    pub branch_name: String,
    pub change: TargetChange,
}

/// Re-read origin URL and current branch and store them in `.sutra`.
pub fn reinit<G: GitRunner>(git: &G, store: &ConfigStore) -> Result<ReinitReport, SetupError> {
    if !store.exists() {
        return Err(SetupError::ConfigMissing);
    }
    if !inspect::is_repository(git) {
        return Err(SetupError::NotARepository(store.root().to_path_buf()));
    }

    let (repository_url, branch_name) = detect_target(git)?;
    let change = store.update_target(&repository_url, &branch_name)?;

    if !change.any() {
        ui::warn("Repository and branch are the same as current configuration. No changes made.");
    } else {
        ui::success("Sutra reinitialized successfully!");
        if change.repository_changed {
            ui::highlight(&format!("Repository updated to: {}", repository_url));
        }
        if change.branch_changed {
            ui::highlight(&format!("Branch updated to: {}", branch_name));
        }
    }

    Ok(ReinitReport {
        repository_url,
        branch_name,
        change,
    })
}

/// The configured repository and branch.
pub fn whoami(store: &ConfigStore) -> Result<WorkflowConfig, SetupError> {
    if !store.exists() {
        return Err(SetupError::ConfigMissing);
    }
    let config = store.read()?;

    ui::success("Current user information:");
    ui::highlight(&format!("Repository: {}", config.repository_url));
    ui::highlight(&format!("Branch: {}", config.branch_name));
    Ok(config)
}

fn detect_target<G: GitRunner>(git: &G) -> Result<(String, String), GitError> {
    Ok((inspect::remote_url(git)?, inspect::current_branch(git)?))
}

fn ask_target<I: Interaction>(interaction: &I) -> Result<(String, String), SetupError> {
    let url = interaction.ask("Enter the Git repository URL", None)?;
    let branch = interaction.ask("Enter the branch name", Some(DEFAULT_BRANCH))?;
    Ok((url, branch))
}

/// Add the origin remote, or repoint it if one already exists.
fn point_remote<G: GitRunner>(git: &G, url: &str) -> Result<(), GitError> {
    if inspect::remote_url(git).is_ok() {
        warn!("Replacing existing {} remote URL", REMOTE);
        git.run_checked(&["remote", "set-url", REMOTE, url])?;
    } else {
        git.run_checked(&["remote", "add", REMOTE, url])?;
    }
    Ok(())
}
