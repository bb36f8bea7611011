//! The last analysis, keyed by the HEAD it was made for.
//!
//! Stored inside the git directory so `git add -A` never picks it up.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::GitError;
use crate::git::GitRunner;

pub const CACHE_FILE_NAME: &str = "sutra-analysis.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedAnalysis {
    pub head: String,
    pub generated_at: DateTime<Utc>,
    pub analysis: String,
}

/// Best-effort cache. Read and write failures are logged, never returned.
#[derive(Debug, Clone)]
pub struct AnalysisCache {
    path: PathBuf,
}

impl AnalysisCache {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The cache file under the repository's git directory.
    ///
    /// `git rev-parse --git-path` may answer relative to `root`, the
    /// directory the runner is bound to.
    pub fn for_repository<G: GitRunner>(git: &G, root: &Path) -> Result<Self, GitError> {
        let args = ["rev-parse", "--git-path", CACHE_FILE_NAME];
        let output = git.run_checked(&args)?;
        let location = output.text();
        if location.is_empty() {
            return Err(GitError::EmptyOutput {
                command: args.join(" "),
            });
        }
        Ok(Self::at(root.join(location)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached analysis if it was produced for `head`.
    pub fn lookup(&self, head: &str) -> Option<CachedAnalysis> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Could not read {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<CachedAnalysis>(&raw) {
            Ok(entry) if entry.head == head => Some(entry),
            Ok(entry) => {
                debug!("Analysis cache is stale (cached for {})", entry.head);
                None
            }
            Err(e) => {
                warn!("Ignoring unreadable analysis cache: {}", e);
                None
            }
        }
    }

    pub fn store(&self, head: &str, analysis: &str) {
        let entry = CachedAnalysis {
            head: head.to_string(),
            generated_at: Utc::now(),
            analysis: analysis.to_string(),
        };

        let result = serde_json::to_string_pretty(&entry)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(&self.path, json).map_err(|e| e.to_string()));
        match result {
            Ok(()) => debug!("Cached analysis for {}", head),
            Err(e) => warn!("Could not write {}: {}", self.path.display(), e),
        }
    }
}
