//! Reading and writing `.sutra`.
//!
//! The file is TOML. Whole-file writes go through a temp file in the same
//! directory so a crash never leaves a half-written config; `reinit` edits
//! the two target keys in place with `toml_edit` to keep user comments.
//!
//! Older `.sutra` files are INI with bare values (`BRANCH_NAME = main`).
//! Those are read by quoting the bare values first, and the next
//! `update_target` writes them back as TOML.

use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use toml_edit::{DocumentMut, value};
use tracing::debug;

use crate::config::WorkflowConfig;
use crate::error::ConfigError;

pub const CONFIG_FILE_NAME: &str = ".sutra";

/// Which of the two target keys an update touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TargetChange {
    pub repository_changed: bool,
    pub branch_changed: bool,
}

impl TargetChange {
    pub fn any(&self) -> bool {
        self.repository_changed || self.branch_changed
    }
}

/// The `.sutra` file of one repository.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    root: PathBuf,
    path: PathBuf,
}

impl ConfigStore {
    /// Store for the `.sutra` file inside `root`.
    pub fn in_dir(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            path: root.join(CONFIG_FILE_NAME),
        }
    }

    /// The repository directory the store belongs to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn read(&self) -> Result<WorkflowConfig, ConfigError> {
        let raw = self.read_raw()?;
        parse_config(&raw)
    }

    pub fn write(&self, config: &WorkflowConfig) -> Result<(), ConfigError> {
        let content =
            toml::to_string(config).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.write_atomic(&content)
    }

    /// Point the config at a new repository URL and branch, keeping everything else.
    pub fn update_target(
        &self,
        repository_url: &str,
        branch_name: &str,
    ) -> Result<TargetChange, ConfigError> {
        let raw = self.read_raw()?;
        let current = parse_config(&raw)?;

        let change = TargetChange {
            repository_changed: current.repository_url != repository_url,
            branch_changed: current.branch_name != branch_name,
        };
        if !change.any() {
            return Ok(change);
        }

        let mut doc: DocumentMut = quote_bare_values(&raw)
            .parse()
            .map_err(|e: toml_edit::TomlError| ConfigError::Invalid(e.to_string()))?;
        doc["REPOSITORY_URL"] = value(repository_url);
        doc["BRANCH_NAME"] = value(branch_name);

        self.write_atomic(&doc.to_string())?;
        Ok(change)
    }

    fn read_raw(&self) -> Result<String, ConfigError> {
        if !self.exists() {
            return Err(ConfigError::NotFound(self.path.clone()));
        }
        fs::read_to_string(&self.path).map_err(ConfigError::Read)
    }

    fn write_atomic(&self, content: &str) -> Result<(), ConfigError> {
        let mut file = NamedTempFile::new_in(&self.root).map_err(ConfigError::Write)?;
        file.write_all(content.as_bytes())
            .map_err(ConfigError::Write)?;
        file.persist(&self.path)
            .map_err(|e| ConfigError::Write(e.error))?;
        debug!("Wrote {}", self.path.display());
        Ok(())
    }
}

/// Parse `.sutra` contents, enforcing the two mandatory keys.
pub fn parse_config(raw: &str) -> Result<WorkflowConfig, ConfigError> {
    let config: WorkflowConfig = toml::from_str(&quote_bare_values(raw))
        .map_err(|e| ConfigError::Invalid(e.message().to_string()))?;

    if config.repository_url.trim().is_empty() {
        return Err(ConfigError::MissingField("REPOSITORY_URL"));
    }
    if config.branch_name.trim().is_empty() {
        return Err(ConfigError::MissingField("BRANCH_NAME"));
    }
    Ok(config)
}

/// Rewrite INI-style `KEY = bare value` lines as TOML strings.
///
/// Quoted strings, booleans, arrays and inline tables pass through,
/// so a file that is already TOML comes back borrowed and unchanged.
fn quote_bare_values(raw: &str) -> Cow<'_, str> {
    let mut changed = false;
    let lines: Vec<Cow<'_, str>> = raw
        .lines()
        .map(|line| {
            let converted = convert_line(line);
            changed |= matches!(converted, Cow::Owned(_));
            converted
        })
        .collect();

    if !changed {
        return Cow::Borrowed(raw);
    }
    let mut out = lines.join("\n");
    if raw.ends_with('\n') {
        out.push('\n');
    }
    Cow::Owned(out)
}

fn convert_line(line: &str) -> Cow<'_, str> {
    let trimmed = line.trim_start();
    if let Some(comment) = trimmed.strip_prefix(';') {
        return Cow::Owned(format!("#{}", comment));
    }
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('[') {
        return Cow::Borrowed(line);
    }
    let Some((key, rest)) = line.split_once('=') else {
        return Cow::Borrowed(line);
    };

    let bare = rest.trim();
    if is_toml_literal(bare) {
        return Cow::Borrowed(line);
    }
    let escaped = bare.replace('\\', "\\\\").replace('"', "\\\"");
    Cow::Owned(format!("{}= \"{}\"", key, escaped))
}

fn is_toml_literal(value: &str) -> bool {
    value.starts_with(['"', '\'', '[', '{']) || value == "true" || value == "false"
}
