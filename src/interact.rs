//! Interactive questions (confirmation, free-text answers).

use dialoguer::{Confirm, Input};

use crate::error::InteractionError;

/// Asks the user things. Implemented with dialoguer for the terminal and by
/// canned answers in tests.
pub trait Interaction {
    /// Yes/no question; `default` is used when the user just presses enter.
    fn confirm(&self, question: &str, default: bool) -> Result<bool, InteractionError>;

    /// Non-empty free-text answer.
    fn ask(&self, question: &str, default: Option<&str>) -> Result<String, InteractionError>;
}

/// Terminal prompts via dialoguer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalInteraction;

impl Interaction for TerminalInteraction {
    fn confirm(&self, question: &str, default: bool) -> Result<bool, InteractionError> {
        Confirm::new()
            .with_prompt(question)
            .default(default)
            .interact()
            .map_err(|e| InteractionError::Prompt(e.to_string()))
    }

    fn ask(&self, question: &str, default: Option<&str>) -> Result<String, InteractionError> {
        let mut input = Input::<String>::new()
            .with_prompt(question)
            .validate_with(|value: &String| -> Result<(), &str> {
                if value.trim().is_empty() {
                    Err("Value cannot be empty")
                } else {
                    Ok(())
                }
            });
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input
            .interact_text()
            .map(|value| value.trim().to_string())
            .map_err(|e| InteractionError::Prompt(e.to_string()))
    }
}
