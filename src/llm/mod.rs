//! Text-generation service access and response cleanup.

pub mod client;
pub mod json;

pub use client::{GenerationOptions, OllamaClient, TextGenerator};
pub use json::strip_code_fences;
