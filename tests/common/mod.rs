//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::process::Command;

use async_trait::async_trait;

use sutra::config::{ConfigStore, WorkflowConfig};
use sutra::error::{GenerationError, GitError, InteractionError};
use sutra::git::{GitOutput, GitRunner};
use sutra::interact::Interaction;
use sutra::llm::{GenerationOptions, TextGenerator};

pub const BRANCH: &str = "main";
pub const REMOTE_URL: &str = "git@example.com:team/app.git";

/// Successful git output with the given stdout.
pub fn ok(stdout: &str) -> GitOutput {
    GitOutput {
        success: true,
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

/// Failed git output with the given stderr.
pub fn fail(stderr: &str) -> GitOutput {
    GitOutput {
        success: false,
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

/// A `GitRunner` that answers from a script and records every invocation.
///
/// Responses are keyed by the full command line. Each key holds a queue; the
/// last queued response repeats. Unscripted commands succeed with no output.
#[derive(Default)]
pub struct ScriptedGit {
    script: RefCell<HashMap<String, VecDeque<GitOutput>>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `output` for the next unanswered invocation of `command`.
    pub fn on(self, command: &str, output: GitOutput) -> Self {
        self.script
            .borrow_mut()
            .entry(command.to_string())
            .or_default()
            .push_back(output);
        self
    }

    /// Replace whatever was scripted for `command`.
    pub fn set(self, command: &str, output: GitOutput) -> Self {
        self.script
            .borrow_mut()
            .insert(command.to_string(), VecDeque::from([output]));
        self
    }

    /// A repository with an origin remote but no commits yet.
    pub fn fresh_repository() -> Self {
        Self::new()
            .on("rev-parse --is-inside-work-tree", ok("true\n"))
            .on("rev-parse --verify --quiet HEAD", fail(""))
            .on("config --get remote.origin.url", ok(REMOTE_URL))
    }

    /// A repository with history, checked out on `branch`.
    pub fn existing_repository(branch: &str) -> Self {
        Self::new()
            .on("rev-parse --is-inside-work-tree", ok("true\n"))
            .on("rev-parse --verify --quiet HEAD", ok("0123abcd\n"))
            .on("rev-parse --abbrev-ref HEAD", ok(&format!("{}\n", branch)))
            .on("config --get remote.origin.url", ok(REMOTE_URL))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Number of invocations whose command line starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

impl GitRunner for ScriptedGit {
    fn run(&self, args: &[&str]) -> Result<GitOutput, GitError> {
        let command = args.join(" ");
        self.calls.borrow_mut().push(command.clone());

        let mut script = self.script.borrow_mut();
        let output = match script.get_mut(&command) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        Ok(output.unwrap_or_else(|| ok("")))
    }
}

/// A `TextGenerator` that always returns the same text and counts calls.
pub struct FixedGenerator {
    response: Result<String, u16>,
    calls: std::sync::atomic::AtomicUsize,
}

impl FixedGenerator {
    pub fn replying(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            calls: Default::default(),
        }
    }

    /// Fails every call with a service error carrying `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            response: Err(status),
            calls: Default::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FixedGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(GenerationError::Service { status: *status }),
        }
    }
}

/// Canned answer to every confirmation; remembers how often it was asked.
pub struct AutoConfirm {
    answer: bool,
    asked: Cell<usize>,
}

impl AutoConfirm {
    pub fn yes() -> Self {
        Self {
            answer: true,
            asked: Cell::new(0),
        }
    }

    pub fn no() -> Self {
        Self {
            answer: false,
            asked: Cell::new(0),
        }
    }

    pub fn asked(&self) -> usize {
        self.asked.get()
    }
}

impl Interaction for AutoConfirm {
    fn confirm(&self, _question: &str, _default: bool) -> Result<bool, InteractionError> {
        self.asked.set(self.asked.get() + 1);
        Ok(self.answer)
    }

    fn ask(&self, _question: &str, default: Option<&str>) -> Result<String, InteractionError> {
        default
            .map(str::to_string)
            .ok_or_else(|| InteractionError::Prompt("no scripted answer".to_string()))
    }
}

/// Write a default `.sutra` for `branch` into `dir`.
pub fn write_config(dir: &Path, branch: &str) -> ConfigStore {
    let store = ConfigStore::in_dir(dir);
    store
        .write(&WorkflowConfig::new(REMOTE_URL, branch))
        .expect("Failed to write .sutra");
    store
}

/// Run git in `dir`, panicking with its stderr on failure. Returns trimmed stdout.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A working clone of a shared bare remote, with a local identity.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
}

impl TestRepo {
    /// Clone `remote` and configure a test identity.
    pub fn clone_of(remote: &Path) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let remote = remote.to_str().expect("Invalid remote path");
        git(dir.path(), &["clone", "--quiet", remote, "."]);
        let repo = Self { dir };
        repo.configure_identity();
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn configure_identity(&self) {
        git(self.path(), &["config", "user.name", "Test User"]);
        git(self.path(), &["config", "user.email", "test@example.com"]);
        git(self.path(), &["config", "commit.gpgsign", "false"]);
    }

    /// Write `file` and commit it. Returns the new HEAD hash.
    pub fn commit_file(&self, file: &str, content: &str, message: &str) -> String {
        std::fs::write(self.path().join(file), content).expect("Failed to write test file");
        git(self.path(), &["add", file]);
        git(self.path(), &["commit", "--quiet", "-m", message]);
        self.head()
    }

    pub fn push(&self) {
        git(self.path(), &["push", "--quiet", "origin", BRANCH]);
    }

    pub fn head(&self) -> String {
        git(self.path(), &["rev-parse", "HEAD"])
    }

    pub fn log_subjects(&self, rev: &str) -> Vec<String> {
        git(self.path(), &["log", "--format=%s", rev])
            .lines()
            .map(str::to_string)
            .collect()
    }
}

/// A bare remote on `main` holding one commit, plus the directory holding it.
pub struct RemoteFixture {
    pub remote: tempfile::TempDir,
}

impl RemoteFixture {
    pub fn new() -> Self {
        let remote = tempfile::tempdir().expect("Failed to create remote dir");
        git(remote.path(), &["init", "--bare", "--quiet"]);
        git(
            remote.path(),
            &["symbolic-ref", "HEAD", &format!("refs/heads/{}", BRANCH)],
        );

        let seed = tempfile::tempdir().expect("Failed to create seed dir");
        git(seed.path(), &["init", "--quiet"]);
        git(
            seed.path(),
            &["symbolic-ref", "HEAD", &format!("refs/heads/{}", BRANCH)],
        );
        let seed_repo = TestRepo { dir: seed };
        seed_repo.configure_identity();
        seed_repo.commit_file("README.md", "hello\n", "initial commit");
        git(
            seed_repo.path(),
            &[
                "remote",
                "add",
                "origin",
                remote.path().to_str().expect("Invalid remote path"),
            ],
        );
        seed_repo.push();

        Self { remote }
    }

    pub fn path(&self) -> &Path {
        self.remote.path()
    }

    pub fn clone_repo(&self) -> TestRepo {
        TestRepo::clone_of(self.path())
    }
}
