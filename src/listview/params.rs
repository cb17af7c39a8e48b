//! Query-string parameters of the list endpoint.
//! Used by: handlers::logs.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::audit::entry::LogEntryKind;
use crate::audit::query::{LogFilter, LogQuery, Sort, SortKey};
use crate::error::{Error, Result};

pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// `column` ascending, `-column` descending.
    pub sort: Option<String>,
    pub created_from: Option<String>,
    pub created_to: Option<String>,
    pub user: Option<String>,
    pub target: Option<String>,
    pub message: Option<String>,
    pub identifier: Option<String>,
    pub kind: Option<String>,
}

impl ListParams {
    pub fn into_query(self, default_per_page: u32) -> Result<LogQuery> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(Error::Validation("page must be >= 1".into()));
        }
        let per_page = self.per_page.unwrap_or(default_per_page);
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(Error::Validation(format!("per_page must be 1-{MAX_PER_PAGE}")));
        }

        let sort = match non_empty(self.sort) {
            Some(raw) => parse_sort(&raw)?,
            None => Sort::default(),
        };

        let kind = match non_empty(self.kind) {
            Some(raw) => Some(
                LogEntryKind::parse(&raw)
                    .ok_or_else(|| Error::Validation(format!("unknown kind {raw:?}")))?,
            ),
            None => None,
        };

        let filter = LogFilter {
            created_from: parse_date("created_from", self.created_from)?,
            created_to: parse_date("created_to", self.created_to)?,
            user: non_empty(self.user),
            target: non_empty(self.target),
            message: non_empty(self.message),
            identifier: non_empty(self.identifier),
            kind,
        };

        Ok(LogQuery {
            filter,
            sort,
            page,
            per_page,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_sort(raw: &str) -> Result<Sort> {
    let (column, descending) = match raw.strip_prefix('-') {
        Some(column) => (column, true),
        None => (raw, false),
    };
    let key = SortKey::from_column(column)
        .ok_or_else(|| Error::Validation(format!("cannot sort by {column:?}")))?;
    Ok(Sort { key, descending })
}

fn parse_date(field: &str, value: Option<String>) -> Result<Option<NaiveDate>> {
    non_empty(value)
        .map(|raw| {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|e| Error::Validation(format!("{field} must be YYYY-MM-DD: {e}")))
        })
        .transpose()
}
