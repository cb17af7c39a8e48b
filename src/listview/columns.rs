//! Column definitions for the audit log list view.
//! Used by: listview::render, handlers::logs, state.

use serde::Serialize;

use crate::audit::entry::LogEntryKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnId {
    CreatedOn,
    User,
    Target,
    Message,
    Kind,
    Identifier,
    Extra,
    ExtraChanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterConfig {
    DateRange,
    Text { placeholder: &'static str },
    Choices { choices: Vec<Choice> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: &'static str,
    pub ordering: u8,
    pub sortable: bool,
    /// Cell holds markup and must not be escaped again by the host.
    pub raw: bool,
    pub filter: Option<FilterConfig>,
}

impl Column {
    fn new(id: ColumnId, title: &'static str, ordering: u8) -> Self {
        Self {
            id,
            title,
            ordering,
            sortable: true,
            raw: false,
            filter: None,
        }
    }

    fn raw(mut self) -> Self {
        self.raw = true;
        self
    }

    fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    fn filter(mut self, filter: FilterConfig) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Every column the view knows, in display order.
pub fn all_columns() -> Vec<Column> {
    let kind_choices = LogEntryKind::choices()
        .into_iter()
        .map(|(value, label)| Choice { value, label })
        .collect();
    vec![
        Column::new(ColumnId::CreatedOn, "Created on", 1).filter(FilterConfig::DateRange),
        Column::new(ColumnId::User, "User", 2)
            .raw()
            .filter(FilterConfig::Text { placeholder: "Filter by user..." }),
        Column::new(ColumnId::Target, "Target", 3)
            .raw()
            .filter(FilterConfig::Text { placeholder: "Filter by target..." }),
        Column::new(ColumnId::Message, "Message", 4)
            .filter(FilterConfig::Text { placeholder: "Filter by message..." }),
        Column::new(ColumnId::Kind, "Kind", 5).filter(FilterConfig::Choices { choices: kind_choices }),
        Column::new(ColumnId::Identifier, "Identifier", 6)
            .filter(FilterConfig::Text { placeholder: "Filter by identifier..." }),
        Column::new(ColumnId::Extra, "Extra", 7),
        Column::new(ColumnId::ExtraChanged, "Change in extra", 8).raw().unsortable(),
    ]
}

/// Which optional columns a particular log view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListViewConfig {
    pub hide_extra: bool,
    pub hide_extra_changed: bool,
}

impl ListViewConfig {
    pub fn visible_columns(&self) -> Vec<Column> {
        all_columns()
            .into_iter()
            .filter(|c| match c.id {
                ColumnId::Extra => !self.hide_extra,
                ColumnId::ExtraChanged => !self.hide_extra_changed,
                _ => true,
            })
            .collect()
    }
}
