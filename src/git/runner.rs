//! The `git` subprocess seam.
//!
//! Every git invocation goes through [`GitRunner`], bound to one repository
//! directory. The default implementation shells out to the system `git`
//! binary, inheriting the user's config, SSH agent, and credential store.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::GitError;

/// Captured result of a finished git process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GitOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    /// Trimmed stdout.
    pub fn text(&self) -> &str {
        self.stdout.trim()
    }

    /// Whatever git said, stderr first, for error reporting.
    pub fn diagnostics(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }

    /// Both streams, stdout then stderr, for failures shown to the user as-is.
    pub fn transcript(&self) -> String {
        [self.stdout.trim(), self.stderr.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Trait for executing git commands against one repository.
///
/// A non-zero exit is *not* an error at this layer; callers inspect
/// [`GitOutput::success`]. `Err` means git could not be run at all.
pub trait GitRunner {
    fn run(&self, args: &[&str]) -> Result<GitOutput, GitError>;

    /// Run and require success, mapping failure to [`GitError::CommandFailed`].
    fn run_checked(&self, args: &[&str]) -> Result<GitOutput, GitError> {
        let output = self.run(args)?;
        if !output.success {
            return Err(GitError::CommandFailed {
                command: args.join(" "),
                stderr: output.diagnostics(),
            });
        }
        Ok(output)
    }
}

/// Runs the system `git` binary inside a fixed working directory.
#[derive(Debug, Clone)]
pub struct SystemGit {
    workdir: PathBuf,
}

impl SystemGit {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }
}

impl GitRunner for SystemGit {
    fn run(&self, args: &[&str]) -> Result<GitOutput, GitError> {
        debug!("git {} (in {})", args.join(" "), self.workdir.display());

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|source| GitError::Spawn {
                command: args.join(" "),
                source,
            })?;

        Ok(GitOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Check that a `git` executable is available on PATH.
pub fn git_installed() -> bool {
    which::which("git").is_ok()
}
