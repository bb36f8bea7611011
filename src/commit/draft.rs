//! The structured commit proposal and its validation.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::DraftViolation;

/// The seven commit kinds a draft may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitType {
    Feat,
    Fix,
    Refactor,
    Docs,
    Test,
    Chore,
    Perf,
}

impl CommitType {
    pub const ALL: [CommitType; 7] = [
        CommitType::Feat,
        CommitType::Fix,
        CommitType::Refactor,
        CommitType::Docs,
        CommitType::Test,
        CommitType::Chore,
        CommitType::Perf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Refactor => "refactor",
            CommitType::Docs => "docs",
            CommitType::Test => "test",
            CommitType::Chore => "chore",
            CommitType::Perf => "perf",
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-sensitive: `"Feat"` is not a commit type.
impl FromStr for CommitType {
    type Err = DraftViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommitType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DraftViolation::InvalidType(s.to_string()))
    }
}

/// A validated commit proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitDraft {
    pub kind: CommitType,
    pub scope: Option<String>,
    pub message: String,
}

impl CommitDraft {
    /// Validate an untrusted parsed response.
    ///
    /// Checks `type`, then `scope`, then `message`, and reports the first
    /// violation.
    pub fn from_value(value: &Value) -> Result<Self, DraftViolation> {
        let object = value.as_object().ok_or(DraftViolation::NotAnObject)?;

        let kind = match object.get("type") {
            Some(Value::String(s)) => s.parse()?,
            None | Some(Value::Null) => return Err(DraftViolation::MissingType),
            Some(other) => return Err(DraftViolation::InvalidType(other.to_string())),
        };

        let scope = match object.get("scope") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err(DraftViolation::InvalidScope),
        };

        let message = match object.get("message") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            _ => return Err(DraftViolation::EmptyMessage),
        };

        Ok(Self {
            kind,
            scope,
            message,
        })
    }

    /// The commit subject, `[type(scope)] message`.
    pub fn formatted(&self) -> String {
        format_message(&self.message, self.kind, self.scope.as_deref())
    }
}

/// Render `[type(scope)] message`; the scope segment is omitted when absent or blank.
pub fn format_message(message: &str, kind: CommitType, scope: Option<&str>) -> String {
    match scope.map(str::trim).filter(|s| !s.is_empty()) {
        Some(scope) => format!("[{kind}({scope})] {message}"),
        None => format!("[{kind}] {message}"),
    }
}
