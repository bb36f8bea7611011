//! Prompt construction for AI-generated commit messages.

use crate::config::StyleSettings;

/// Maximum characters of diff or snapshot sent to the model.
pub const MAX_INPUT_CHARS: usize = 5000;

/// Keep at most `max_chars` characters, never splitting a code point.
///
/// Returns the kept prefix and whether anything was cut.
pub fn truncate_chars(input: &str, max_chars: usize) -> (&str, bool) {
    match input.char_indices().nth(max_chars) {
        Some((end, _)) => (&input[..end], true),
        None => (input, false),
    }
}

/// Build the commit prompt.
///
/// `input` is a file listing when `is_initial_commit`, otherwise a staged
/// diff; it is expected to be truncated already.
pub fn build_commit_prompt(input: &str, style: &StyleSettings, is_initial_commit: bool) -> String {
    let (framing, focus, label) = if is_initial_commit {
        (
            "This is the FIRST commit of a new repository.\n\
             Analyze the project snapshot and determine what the project sets up.",
            "- This is an initial project setup commit.\n\
             - Focus on project structure, framework, and setup.",
            "Project Snapshot",
        )
    } else {
        (
            "Analyze the following git diff and summarize ONLY the meaningful changes.",
            "- Focus only on changes shown in the diff.",
            "Git Diff",
        )
    };

    let conventional = if style.uses_conventional_commits {
        "\n- Choose the type by Conventional Commits meaning (feat = new capability, fix = bug fix, \
         refactor = no behavior change, perf = speed, docs, test, chore = tooling)."
    } else {
        ""
    };

    format!(
        r#"You are an expert software engineer.

{framing}

Return ONLY valid JSON in this exact format:

{{
  "type": "feat | fix | refactor | docs | test | chore | perf",
  "scope": "string or null",
  "message": "commit message"
}}

Rules:
{focus}
- Do NOT include explanations.
- Do NOT include markdown.
- Do NOT wrap in backticks.
- The message must follow this tone: {tone}
- Respect detail level: {detail}{conventional}

{label}:
{input}
"#,
        tone = style.tone,
        detail = style.detail_level,
    )
}
