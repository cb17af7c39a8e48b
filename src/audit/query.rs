//! Filter, sort and pagination parameters for listing log entries.
//! Used by: audit::sqlite, listview::params.

use chrono::NaiveDate;

use crate::audit::entry::LogEntryKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedOn,
    User,
    Target,
    Message,
    Kind,
    Identifier,
    Extra,
}

impl SortKey {
    pub fn from_column(column: &str) -> Option<Self> {
        Some(match column {
            "created_on" => Self::CreatedOn,
            "user" => Self::User,
            "target" => Self::Target,
            "message" => Self::Message,
            "kind" => Self::Kind,
            "identifier" => Self::Identifier,
            "extra" => Self::Extra,
            _ => return None,
        })
    }

    pub(crate) fn sql_column(self) -> &'static str {
        match self {
            Self::CreatedOn => "created_on",
            Self::User => "user_label",
            Self::Target => "target_label",
            Self::Message => "message",
            Self::Kind => "kind",
            Self::Identifier => "identifier",
            Self::Extra => "extra",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub key: SortKey,
    pub descending: bool,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            key: SortKey::CreatedOn,
            descending: true,
        }
    }
}

/// Substring filters match case-insensitively; date bounds are inclusive days.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub created_from: Option<NaiveDate>,
    pub created_to: Option<NaiveDate>,
    pub user: Option<String>,
    pub target: Option<String>,
    pub message: Option<String>,
    pub identifier: Option<String>,
    pub kind: Option<LogEntryKind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub filter: LogFilter,
    pub sort: Sort,
    /// 1-based.
    pub page: u32,
    pub per_page: u32,
}

impl Default for LogQuery {
    fn default() -> Self {
        Self {
            filter: LogFilter::default(),
            sort: Sort::default(),
            page: 1,
            per_page: 20,
        }
    }
}

impl LogQuery {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}
