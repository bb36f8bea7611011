//! Commit workflow scenarios against a scripted git runner.

mod common;

use sutra::error::{DraftViolation, GenerationError, PushError, SetupError, SyncError, WorkflowError};
use sutra::git::{PushReport, SyncOutcome};
use sutra::workflow::{CommitOutcome, CommitWorkflow};

use common::{AutoConfirm, BRANCH, FixedGenerator, ScriptedGit, fail, ok, write_config};

const SCAFFOLD_DRAFT: &str = r#"{"type": "feat", "scope": null, "message": "scaffold project"}"#;
const PARSER_DRAFT: &str = r#"{"type": "fix", "scope": "parser", "message": "handle empty input"}"#;

/// An existing repository on the configured branch, in sync, with a dirty tree.
fn dirty_existing_repository() -> ScriptedGit {
    ScriptedGit::existing_repository(BRANCH)
        .on("rev-list --left-right --count HEAD...origin/main", ok("0\t0\n"))
        .on("status --porcelain", ok(" M src/parser.rs\n"))
        .on("diff --staged", ok("diff --git a/src/parser.rs b/src/parser.rs\n+fix\n"))
}

async fn run_workflow(
    git: &ScriptedGit,
    generator: &FixedGenerator,
    interaction: &AutoConfirm,
) -> (Result<CommitOutcome, WorkflowError>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = write_config(dir.path(), BRANCH);
    let workflow = CommitWorkflow {
        git,
        store: &store,
        generator,
        interaction,
    };
    (workflow.run().await, dir)
}

#[tokio::test]
async fn test_first_commit_skips_sync_and_pushes_once() {
    let git = ScriptedGit::fresh_repository()
        .on("status --porcelain", ok("?? Cargo.toml\n?? src/main.rs\n"))
        .on("ls-files", ok("Cargo.toml\nsrc/main.rs\n"));
    let generator = FixedGenerator::replying(SCAFFOLD_DRAFT);
    let confirm = AutoConfirm::yes();

    let (outcome, _dir) = run_workflow(&git, &generator, &confirm).await;

    assert_eq!(
        outcome.unwrap(),
        CommitOutcome::Committed {
            message: "[feat] scaffold project".to_string(),
            sync: None,
            push: PushReport { retried: false },
        }
    );
    assert_eq!(git.count("fetch"), 0);
    assert_eq!(git.count("rev-list"), 0);
    assert_eq!(git.count("rebase"), 0);
    assert_eq!(git.count("add -A"), 1);
    assert_eq!(git.count("ls-files"), 1);
    assert_eq!(git.count("diff --staged"), 0);
    assert!(git.calls().contains(&"commit -m [feat] scaffold project".to_string()));
    assert_eq!(git.count("push -u origin main"), 1);
}

#[tokio::test]
async fn test_stages_before_generating_and_commits_before_pushing() {
    let git = dirty_existing_repository();
    let generator = FixedGenerator::replying(PARSER_DRAFT);

    let (outcome, _dir) = run_workflow(&git, &generator, &AutoConfirm::yes()).await;
    assert!(matches!(outcome, Ok(CommitOutcome::Committed { .. })));

    let calls = git.calls();
    let position = |prefix: &str| calls.iter().position(|c| c.starts_with(prefix)).unwrap();
    assert!(position("fetch origin main") < position("add -A"));
    assert!(position("add -A") < position("diff --staged"));
    assert!(position("diff --staged") < position("commit -m"));
    assert!(position("commit -m") < position("push"));
    assert!(calls.contains(&"commit -m [fix(parser)] handle empty input".to_string()));
}

#[tokio::test]
async fn test_branch_mismatch_aborts_before_staging() {
    let git = ScriptedGit::existing_repository("feature/login")
        .on("status --porcelain", ok(" M src/lib.rs\n"));
    let generator = FixedGenerator::replying(PARSER_DRAFT);

    let (outcome, _dir) = run_workflow(&git, &generator, &AutoConfirm::yes()).await;

    match outcome {
        Err(WorkflowError::BranchMismatch {
            current,
            configured,
        }) => {
            assert_eq!(current, "feature/login");
            assert_eq!(configured, "main");
        }
        other => panic!("expected branch mismatch, got {:?}", other),
    }
    for command in ["fetch", "add", "commit", "push"] {
        assert_eq!(git.count(command), 0, "unexpected git {}", command);
    }
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_declining_the_message_commits_nothing() {
    let git = dirty_existing_repository();
    let generator = FixedGenerator::replying(PARSER_DRAFT);
    let confirm = AutoConfirm::no();

    let (outcome, _dir) = run_workflow(&git, &generator, &confirm).await;

    assert_eq!(
        outcome.unwrap(),
        CommitOutcome::Declined {
            message: "[fix(parser)] handle empty input".to_string()
        }
    );
    assert_eq!(confirm.asked(), 1);
    assert_eq!(git.count("commit"), 0);
    assert_eq!(git.count("push"), 0);
}

#[tokio::test]
async fn test_clean_tree_is_a_successful_noop() {
    let git = ScriptedGit::existing_repository(BRANCH)
        .on("rev-list --left-right --count HEAD...origin/main", ok("0\t0\n"))
        .on("status --porcelain", ok(""));
    let generator = FixedGenerator::replying(PARSER_DRAFT);

    let (outcome, _dir) = run_workflow(&git, &generator, &AutoConfirm::yes()).await;

    assert_eq!(outcome.unwrap(), CommitOutcome::NothingToCommit);
    assert_eq!(git.count("add"), 0);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_diverged_branch_aborts_without_rebase() {
    let git = dirty_existing_repository()
        .set("rev-list --left-right --count HEAD...origin/main", ok("1\t2\n"));
    let generator = FixedGenerator::replying(PARSER_DRAFT);

    let (outcome, _dir) = run_workflow(&git, &generator, &AutoConfirm::yes()).await;

    assert!(matches!(
        outcome,
        Err(WorkflowError::Sync(SyncError::Diverged {
            ahead: 1,
            behind: 2
        }))
    ));
    assert_eq!(git.count("rebase"), 0);
    assert_eq!(git.count("add"), 0);
}

#[tokio::test]
async fn test_remote_ahead_rebases_then_commits() {
    let git = dirty_existing_repository()
        .set("rev-list --left-right --count HEAD...origin/main", ok("0\t3\n"));
    let generator = FixedGenerator::replying(PARSER_DRAFT);

    let (outcome, _dir) = run_workflow(&git, &generator, &AutoConfirm::yes()).await;

    match outcome.unwrap() {
        CommitOutcome::Committed { sync, .. } => {
            assert_eq!(sync, Some(SyncOutcome::Rebased { behind: 3 }))
        }
        other => panic!("expected commit, got {:?}", other),
    }
    assert_eq!(git.count("rebase --autostash origin/main"), 1);
}

#[tokio::test]
async fn test_failed_fetch_is_fatal() {
    let git = dirty_existing_repository().on("fetch origin main", fail("could not resolve host"));
    let generator = FixedGenerator::replying(PARSER_DRAFT);

    let (outcome, _dir) = run_workflow(&git, &generator, &AutoConfirm::yes()).await;

    assert!(matches!(
        outcome,
        Err(WorkflowError::Sync(SyncError::FetchFailed { .. }))
    ));
    assert_eq!(git.count("add"), 0);
}

#[tokio::test]
async fn test_failed_ahead_behind_count_is_treated_as_synced() {
    let git = dirty_existing_repository().set(
        "rev-list --left-right --count HEAD...origin/main",
        fail("unknown revision"),
    );
    let generator = FixedGenerator::replying(PARSER_DRAFT);

    let (outcome, _dir) = run_workflow(&git, &generator, &AutoConfirm::yes()).await;

    match outcome.unwrap() {
        CommitOutcome::Committed { sync, .. } => {
            assert_eq!(sync, Some(SyncOutcome::AlreadySynced { ahead: 0 }))
        }
        other => panic!("expected commit, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rejected_push_retries_once_after_rebase() {
    let git = dirty_existing_repository()
        .on("push -u origin main", fail("! [rejected] main -> main (fetch first)"))
        .on("push -u origin main", ok(""));
    let generator = FixedGenerator::replying(PARSER_DRAFT);

    let (outcome, _dir) = run_workflow(&git, &generator, &AutoConfirm::yes()).await;

    match outcome.unwrap() {
        CommitOutcome::Committed { push, .. } => assert!(push.retried),
        other => panic!("expected commit, got {:?}", other),
    }
    assert_eq!(git.count("push"), 2);
    assert_eq!(git.count("rebase --autostash origin/main"), 1);
    // once while syncing, once before the retry
    assert_eq!(git.count("fetch origin main"), 2);
}

#[tokio::test]
async fn test_second_push_rejection_is_fatal_and_keeps_commit() {
    let git = dirty_existing_repository().on("push -u origin main", fail("! [rejected]"));
    let generator = FixedGenerator::replying(PARSER_DRAFT);

    let (outcome, _dir) = run_workflow(&git, &generator, &AutoConfirm::yes()).await;

    let err = outcome.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Push(PushError::RejectedAfterRetry { .. })
    ));
    assert!(err.remedy().is_some());
    assert_eq!(git.count("push"), 2);
    assert_eq!(git.count("commit -m"), 1);
    assert_eq!(git.count("reset"), 0);
}

#[tokio::test]
async fn test_invalid_draft_stops_before_commit() {
    let git = dirty_existing_repository();
    let generator =
        FixedGenerator::replying(r#"{"type": "feature", "scope": null, "message": "x"}"#);
    let confirm = AutoConfirm::yes();

    let (outcome, _dir) = run_workflow(&git, &generator, &confirm).await;

    assert!(matches!(
        outcome,
        Err(WorkflowError::Generation(GenerationError::Validation(
            DraftViolation::InvalidType(_)
        )))
    ));
    assert_eq!(confirm.asked(), 0);
    assert_eq!(git.count("commit"), 0);
}

#[tokio::test]
async fn test_unparseable_draft_is_a_parse_error() {
    let git = dirty_existing_repository();
    let generator = FixedGenerator::replying("Sure! Here is your commit message: fix stuff");

    let (outcome, _dir) = run_workflow(&git, &generator, &AutoConfirm::yes()).await;

    let err = outcome.unwrap_err();
    assert!(matches!(err, WorkflowError::Generation(GenerationError::Parse(_))));
    assert!(err.to_string().contains("Failed to parse AI response as JSON"));
}

#[tokio::test]
async fn test_service_error_carries_status() {
    let git = dirty_existing_repository();
    let generator = FixedGenerator::failing(503);

    let (outcome, _dir) = run_workflow(&git, &generator, &AutoConfirm::yes()).await;

    assert!(matches!(
        outcome,
        Err(WorkflowError::Generation(GenerationError::Service { status: 503 }))
    ));
    assert_eq!(git.count("commit"), 0);
}

#[tokio::test]
async fn test_empty_staged_diff_is_nothing_to_analyze() {
    let git = dirty_existing_repository().set("diff --staged", fail("fatal: bad object"));
    let generator = FixedGenerator::replying(PARSER_DRAFT);

    let (outcome, _dir) = run_workflow(&git, &generator, &AutoConfirm::yes()).await;

    assert!(matches!(outcome, Err(WorkflowError::NothingToAnalyze)));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_failed_commit_reports_git_output() {
    let git = dirty_existing_repository().on(
        "commit -m [fix(parser)] handle empty input",
        fail("pre-commit hook failed"),
    );
    let generator = FixedGenerator::replying(PARSER_DRAFT);

    let (outcome, _dir) = run_workflow(&git, &generator, &AutoConfirm::yes()).await;

    match outcome {
        Err(WorkflowError::CommitFailed { output }) => {
            assert_eq!(output, "pre-commit hook failed")
        }
        other => panic!("expected commit failure, got {:?}", other),
    }
    assert_eq!(git.count("push"), 0);
}

#[tokio::test]
async fn test_failed_commit_keeps_hook_stdout() {
    let hook = sutra::git::GitOutput {
        success: false,
        stdout: "src/parser.rs:3: trailing whitespace\n".to_string(),
        stderr: "pre-commit hook failed\n".to_string(),
    };
    let git = dirty_existing_repository().on("commit -m [fix(parser)] handle empty input", hook);
    let generator = FixedGenerator::replying(PARSER_DRAFT);

    let (outcome, _dir) = run_workflow(&git, &generator, &AutoConfirm::yes()).await;

    match outcome {
        Err(WorkflowError::CommitFailed { output }) => assert_eq!(
            output,
            "src/parser.rs:3: trailing whitespace\npre-commit hook failed"
        ),
        other => panic!("expected commit failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rebase_conflict_aborts_before_staging() {
    let git = dirty_existing_repository()
        .set("rev-list --left-right --count HEAD...origin/main", ok("0\t2\n"))
        .on(
            "rebase --autostash origin/main",
            fail("CONFLICT (content): Merge conflict in src/parser.rs"),
        );
    let generator = FixedGenerator::replying(PARSER_DRAFT);
    let confirm = AutoConfirm::yes();

    let (outcome, _dir) = run_workflow(&git, &generator, &confirm).await;

    let err = outcome.unwrap_err();
    match &err {
        WorkflowError::Sync(SyncError::RebaseConflict { branch, stderr }) => {
            assert_eq!(branch, BRANCH);
            assert!(stderr.contains("CONFLICT"));
        }
        other => panic!("expected rebase conflict, got {:?}", other),
    }
    assert!(err.remedy().unwrap().contains("git rebase --continue"));
    assert_eq!(git.count("rebase"), 1);
    assert_eq!(git.count("add -A"), 0);
    assert_eq!(git.count("commit"), 0);
    assert_eq!(git.count("push"), 0);
    assert_eq!(generator.calls(), 0);
    assert_eq!(confirm.asked(), 0);
}

#[tokio::test]
async fn test_missing_config_is_a_setup_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = sutra::config::ConfigStore::in_dir(dir.path());
    let git = dirty_existing_repository();
    let generator = FixedGenerator::replying(PARSER_DRAFT);
    let confirm = AutoConfirm::yes();

    let workflow = CommitWorkflow {
        git: &git,
        store: &store,
        generator: &generator,
        interaction: &confirm,
    };
    let err = workflow.run().await.unwrap_err();

    assert!(matches!(err, WorkflowError::Setup(SetupError::ConfigMissing)));
    assert_eq!(err.remedy(), Some("Run 'sutra init' first."));
    assert!(git.calls().is_empty());
}

#[tokio::test]
async fn test_outside_repository_is_a_setup_error() {
    let git = ScriptedGit::new().on("rev-parse --is-inside-work-tree", fail("not a git repository"));
    let generator = FixedGenerator::replying(PARSER_DRAFT);

    let (outcome, _dir) = run_workflow(&git, &generator, &AutoConfirm::yes()).await;

    assert!(matches!(
        outcome,
        Err(WorkflowError::Setup(SetupError::NotARepository(_)))
    ));
    assert_eq!(git.calls().len(), 1);
}
