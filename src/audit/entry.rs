//! Audit log entry types.
//! Used by: audit::sqlite, listview, handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogEntryKind {
    #[default]
    Other,
    Audit,
    Edit,
    Deletion,
    Note,
    Email,
    Warning,
    Error,
}

impl LogEntryKind {
    pub const ALL: [Self; 8] = [
        Self::Other,
        Self::Audit,
        Self::Edit,
        Self::Deletion,
        Self::Note,
        Self::Email,
        Self::Warning,
        Self::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Other => "other",
            Self::Audit => "audit",
            Self::Edit => "edit",
            Self::Deletion => "deletion",
            Self::Note => "note",
            Self::Email => "email",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Other => "Other",
            Self::Audit => "Audit",
            Self::Edit => "Edit",
            Self::Deletion => "Deletion",
            Self::Note => "Note",
            Self::Email => "Email",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// `(value, label)` pairs for the kind filter.
    pub fn choices() -> Vec<(&'static str, &'static str)> {
        Self::ALL.iter().map(|k| (k.as_str(), k.label())).collect()
    }
}

/// A record referenced by a log entry: the acting user or the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: String,
    pub id: String,
    pub label: String,
}

impl EntityRef {
    pub fn new(kind: impl Into<String>, id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub id: i64,
    pub created_on: DateTime<Utc>,
    pub user: Option<EntityRef>,
    pub target: Option<EntityRef>,
    pub message: String,
    pub kind: LogEntryKind,
    pub identifier: String,
    pub extra: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewLogEntry {
    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user: Option<EntityRef>,
    #[serde(default)]
    pub target: Option<EntityRef>,
    pub message: String,
    #[serde(default)]
    pub kind: LogEntryKind,
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub extra: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_its_own_names() {
        for kind in LogEntryKind::ALL {
            assert_eq!(LogEntryKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(LogEntryKind::parse("bogus"), None);
    }

    #[test]
    fn kind_serializes_snake_case() -> crate::error::Result<()> {
        assert_eq!(serde_json::to_string(&LogEntryKind::Deletion)?, "\"deletion\"");
        Ok(())
    }

    #[test]
    fn choices_cover_every_kind() {
        let choices = LogEntryKind::choices();
        assert_eq!(choices.len(), LogEntryKind::ALL.len());
        assert_eq!(choices[0], ("other", "Other"));
    }

    #[test]
    fn new_entry_defaults_optional_fields() -> crate::error::Result<()> {
        let entry: NewLogEntry = serde_json::from_str(r#"{"message": "saved"}"#)?;
        assert_eq!(entry.kind, LogEntryKind::Other);
        assert!(entry.identifier.is_empty());
        assert!(entry.extra.is_none());
        assert!(entry.target.is_none());
        Ok(())
    }
}
