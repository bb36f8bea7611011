//! Commit-history summary and analysis prompt.

use crate::commit::truncate_chars;
use crate::git::CommitRecord;

/// Newest commits included in the summary.
pub const MAX_COMMITS: usize = 50;

/// Character cap on the summary embedded in the prompt.
pub const MAX_SUMMARY_CHARS: usize = 4000;

/// One `- date | author | subject` line per commit, newest first.
pub fn summarize_history(history: &[CommitRecord]) -> String {
    let summary = history
        .iter()
        .take(MAX_COMMITS)
        .map(|c| format!("- {} | {} | {}", c.date, c.author, c.subject))
        .collect::<Vec<_>>()
        .join("\n");

    let (kept, _) = truncate_chars(&summary, MAX_SUMMARY_CHARS);
    kept.to_string()
}

pub fn build_analysis_prompt(summary: &str) -> String {
    format!(
        r#"You are an expert software engineer.

Analyze the following commit history and provide insights on:
- Project progress
- Key milestones
- Potential risks
- Areas of improvement
- Clear next steps

Rules:
- Use emojis
- Do NOT include markdown
- Do NOT wrap in backticks

Commit History:
{summary}
"#
    )
}
