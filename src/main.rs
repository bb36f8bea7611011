//! sutra - CLI entry point.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use sutra::analyze::{AnalysisReport, analyze_project, print_analysis};
use sutra::config::ConfigStore;
use sutra::error::{SetupError, WorkflowError};
use sutra::git::{SystemGit, git_installed, inspect};
use sutra::interact::TerminalInteraction;
use sutra::llm::OllamaClient;
use sutra::workflow::CommitWorkflow;
use sutra::{setup, ui};

/// AI-powered Git workflow assistant.
#[derive(Parser, Debug)]
#[command(name = "sutra")]
#[command(about = "AI-powered Git workflow assistant")]
#[command(version)]
struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize Sutra in the current repository
    Init,
    /// Refresh the configured repository and branch
    Reinit,
    /// Generate a commit message, commit and push the changes
    Commit,
    /// Analyze project progress and commit history
    Analyze,
    /// Show the linked repository and branch
    Whoami,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "sutra=debug" } else { "sutra=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(command: Command) -> Result<()> {
    if !git_installed() {
        return Err(SetupError::GitNotInstalled.into());
    }

    let cwd = std::env::current_dir().context("Failed to resolve the working directory")?;
    // Outside a work tree, fall back to the current directory.
    let root = inspect::toplevel(&SystemGit::new(&cwd)).unwrap_or(cwd);
    debug!("Repository root: {}", root.display());
    let git = SystemGit::new(root.clone());
    let store = ConfigStore::in_dir(&root);

    match command {
        Command::Init => {
            setup::init(&git, &store, &TerminalInteraction)?;
        }
        Command::Reinit => {
            setup::reinit(&git, &store)?;
        }
        Command::Whoami => {
            setup::whoami(&store)?;
        }
        Command::Commit => commit(&git, &store).await?,
        Command::Analyze => analyze(&git, &store).await?,
    }
    Ok(())
}

async fn commit(git: &SystemGit, store: &ConfigStore) -> Result<(), WorkflowError> {
    let generator = OllamaClient::from_env();
    let workflow = CommitWorkflow {
        git,
        store,
        generator: &generator,
        interaction: &TerminalInteraction,
    };
    workflow.run().await?;
    Ok(())
}

async fn analyze(git: &SystemGit, store: &ConfigStore) -> Result<(), WorkflowError> {
    ui::step("Analyzing project progress with AI...");
    let generator = OllamaClient::from_env();

    match analyze_project(git, store, &generator).await? {
        AnalysisReport::NoCommits => ui::warn("No commits found in this repository."),
        AnalysisReport::Generated { text, from_cache } => {
            if from_cache {
                ui::skip("HEAD unchanged since the last analysis, using cached result");
            }
            ui::success("Analysis completed successfully");
            print_analysis(&text);
        }
    }
    Ok(())
}

fn report_error(error: &anyhow::Error) {
    let remedy = if let Some(e) = error.downcast_ref::<WorkflowError>() {
        e.remedy()
    } else if let Some(e) = error.downcast_ref::<SetupError>() {
        e.remedy()
    } else {
        None
    };
    ui::error(&format!("{:#}", error), remedy);
}
