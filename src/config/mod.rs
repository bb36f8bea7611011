//! The `.sutra` settings file and the types read from it.

pub mod store;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use store::{CONFIG_FILE_NAME, ConfigStore, TargetChange};

/// Grammatical tone of generated commit messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Imperative,
    Past,
    Present,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Imperative => "imperative",
            Tone::Past => "past",
            Tone::Present => "present",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much a generated message should say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Low,
    #[default]
    Moderate,
    High,
}

impl DetailLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailLevel::Low => "low",
            DetailLevel::Moderate => "moderate",
            DetailLevel::High => "high",
        }
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSettings {
    #[serde(rename = "USES_CONVENTIONAL", default = "default_true")]
    pub uses_conventional_commits: bool,
    #[serde(rename = "TONE", default)]
    pub tone: Tone,
    #[serde(rename = "DETAIL_LEVEL", default)]
    pub detail_level: DetailLevel,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            uses_conventional_commits: true,
            tone: Tone::default(),
            detail_level: DetailLevel::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    #[serde(rename = "ENABLE_PROGRESS_ANALYSIS", default = "default_true")]
    pub enable_progress_analysis: bool,
    #[serde(rename = "CACHE_ANALYSIS", default)]
    pub cache_analysis: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            enable_progress_analysis: true,
            cache_analysis: false,
        }
    }
}

/// Everything the workflow reads from `.sutra`. Immutable for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(rename = "REPOSITORY_URL", default)]
    pub repository_url: String,
    /// The only branch the workflow operates on.
    #[serde(rename = "BRANCH_NAME", default)]
    pub branch_name: String,
    #[serde(rename = "STYLE", default)]
    pub style: StyleSettings,
    #[serde(rename = "ANALYSIS", default)]
    pub analysis: AnalysisSettings,
}

impl WorkflowConfig {
    /// Defaults written by `sutra init`.
    pub fn new(repository_url: impl Into<String>, branch_name: impl Into<String>) -> Self {
        Self {
            repository_url: repository_url.into(),
            branch_name: branch_name.into(),
            style: StyleSettings::default(),
            analysis: AnalysisSettings::default(),
        }
    }
}

fn default_true() -> bool {
    true
}
