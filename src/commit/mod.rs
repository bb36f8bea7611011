//! AI-generated commit messages.

pub mod draft;
pub mod generate;
pub mod prompt;

pub use draft::{CommitDraft, CommitType, format_message};
pub use generate::{generate_commit_draft, parse_draft};
pub use prompt::{MAX_INPUT_CHARS, build_commit_prompt, truncate_chars};
