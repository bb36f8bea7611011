//! `sutra analyze`: AI review of the project's commit history.

pub mod cache;
pub mod prompt;
pub mod render;

pub use cache::{AnalysisCache, CACHE_FILE_NAME, CachedAnalysis};
pub use prompt::{MAX_COMMITS, MAX_SUMMARY_CHARS, build_analysis_prompt, summarize_history};
pub use render::{LineKind, format_analysis_output, print_analysis};

use tracing::{debug, warn};

use crate::config::ConfigStore;
use crate::error::{GenerationError, SetupError, WorkflowError};
use crate::git::{GitRunner, commit_history, inspect};
use crate::llm::{GenerationOptions, TextGenerator};

/// Result of an analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisReport {
    NoCommits,
    Generated { text: String, from_cache: bool },
}

/// Read the history, then ask the generator (or the cache) for an analysis.
pub async fn analyze_project<G, T>(
    git: &G,
    store: &ConfigStore,
    generator: &T,
) -> Result<AnalysisReport, WorkflowError>
where
    G: GitRunner,
    T: TextGenerator + ?Sized,
{
    if !store.exists() {
        return Err(SetupError::ConfigMissing.into());
    }
    if !inspect::is_repository(git) {
        return Err(SetupError::NotARepository(store.root().to_path_buf()).into());
    }

    let config = store.read().map_err(SetupError::from)?;
    if !config.analysis.enable_progress_analysis {
        return Err(SetupError::AnalysisDisabled.into());
    }

    let history = commit_history(git)?;
    let Some(head) = history.first().map(|c| c.hash.clone()) else {
        return Ok(AnalysisReport::NoCommits);
    };
    debug!("Analyzing {} commits (HEAD {})", history.len(), head);

    let cache = if config.analysis.cache_analysis {
        match AnalysisCache::for_repository(git, store.root()) {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!("Analysis cache unavailable: {}", e);
                None
            }
        }
    } else {
        None
    };
    if let Some(cache) = &cache
        && let Some(entry) = cache.lookup(&head)
    {
        debug!("Using cached analysis from {}", entry.generated_at);
        return Ok(AnalysisReport::Generated {
            text: entry.analysis,
            from_cache: true,
        });
    }

    let prompt = build_analysis_prompt(&summarize_history(&history));
    let text = generator
        .generate(&prompt, &GenerationOptions::ANALYSIS)
        .await?
        .trim()
        .to_string();
    if text.is_empty() {
        return Err(GenerationError::EmptyResponse.into());
    }

    if let Some(cache) = &cache {
        cache.store(&head, &text);
    }

    Ok(AnalysisReport::Generated {
        text,
        from_cache: false,
    })
}
