//! Commit draft generation: prompt, call, parse, validate.

use serde_json::Value;
use tracing::debug;

use crate::commit::draft::CommitDraft;
use crate::commit::prompt::{MAX_INPUT_CHARS, build_commit_prompt, truncate_chars};
use crate::config::StyleSettings;
use crate::error::GenerationError;
use crate::llm::{GenerationOptions, TextGenerator, strip_code_fences};

/// Generate a validated commit draft from a diff or file snapshot.
pub async fn generate_commit_draft<T: TextGenerator + ?Sized>(
    generator: &T,
    input: &str,
    style: &StyleSettings,
    is_initial_commit: bool,
) -> Result<CommitDraft, GenerationError> {
    let (input, truncated) = truncate_chars(input, MAX_INPUT_CHARS);
    if truncated {
        debug!("Analysis input truncated to {} characters", MAX_INPUT_CHARS);
    }

    let prompt = build_commit_prompt(input, style, is_initial_commit);
    debug!("Commit prompt length: {} chars", prompt.len());

    let raw = generator
        .generate(&prompt, &GenerationOptions::COMMIT)
        .await?;

    parse_draft(&raw)
}

/// Turn raw model text into a draft. Fences are stripped; nothing else is repaired.
pub fn parse_draft(raw: &str) -> Result<CommitDraft, GenerationError> {
    let content = strip_code_fences(raw);
    let value: Value = serde_json::from_str(&content).map_err(|e| {
        debug!("Raw response: {}", raw);
        GenerationError::Parse(e.to_string())
    })?;

    Ok(CommitDraft::from_value(&value)?)
}
