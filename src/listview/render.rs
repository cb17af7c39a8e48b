//! Per-row cell rendering for the audit log list view.
//! Used by: handlers::logs.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::audit::entry::LogEntry;
use crate::audit::RecordStore;
use crate::diff::narrate::{self, ChangeStyle, Narration};
use crate::error::Result;
use crate::links::{render_link, LinkResolver};
use crate::listview::columns::{Column, ColumnId};
use crate::markup::{self, DASH};

#[derive(Debug, Clone, Serialize)]
pub struct Row {
    pub id: i64,
    pub cells: BTreeMap<ColumnId, String>,
}

/// Narration of what changed in `entry.extra` since the previous entry for
/// the same target and identifier.
///
/// The store is only queried when the entry carries a non-empty payload.
pub fn extra_change<S: ChangeStyle>(
    style: &S,
    entry: &LogEntry,
    store: &dyn RecordStore,
) -> Result<Narration> {
    let Some(current) = entry.extra.as_ref().filter(|v| !narrate::is_empty_payload(v)) else {
        return Ok(Narration::NoChanges);
    };
    let previous = store.previous_entry(entry.target.as_ref(), &entry.identifier, entry.id)?;
    let previous_extra = previous.as_ref().and_then(|p| p.extra.as_ref());
    Ok(narrate::narrate_with(style, previous_extra, Some(current)))
}

pub struct RowRenderer<'a> {
    columns: &'a [Column],
    store: &'a dyn RecordStore,
    links: &'a dyn LinkResolver,
}

impl<'a> RowRenderer<'a> {
    pub fn new(columns: &'a [Column], store: &'a dyn RecordStore, links: &'a dyn LinkResolver) -> Self {
        Self {
            columns,
            store,
            links,
        }
    }

    /// Cells for the visible columns only; hidden columns cost nothing.
    pub fn render(&self, entry: &LogEntry) -> Result<Row> {
        let mut cells = BTreeMap::new();
        for column in self.columns {
            cells.insert(column.id, self.cell(column.id, entry)?);
        }
        Ok(Row { id: entry.id, cells })
    }

    fn cell(&self, id: ColumnId, entry: &LogEntry) -> Result<String> {
        Ok(match id {
            ColumnId::CreatedOn => entry.created_on.format("%Y-%m-%d %H:%M:%S").to_string(),
            ColumnId::User => render_link(entry.user.as_ref(), self.links),
            ColumnId::Target => render_link(entry.target.as_ref(), self.links),
            ColumnId::Message => markup::escape(&entry.message),
            ColumnId::Kind => entry.kind.label().to_string(),
            ColumnId::Identifier => markup::escape(&entry.identifier),
            ColumnId::Extra => match &entry.extra {
                Some(extra) => markup::escape(&extra.to_string()),
                None => DASH.to_string(),
            },
            ColumnId::ExtraChanged => extra_change(&narrate::Html, entry, self.store)?.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::{EntityRef, LogEntryKind, NewLogEntry};
    use crate::audit::sqlite::LogStore;
    use crate::diff::narrate::PlainText;
    use crate::links::RouteTable;
    use crate::listview::columns::ListViewConfig;
    use serde_json::{json, Value};

    fn product() -> EntityRef {
        EntityRef::new("product", "4", "Blue Mug")
    }

    fn append(store: &LogStore, identifier: &str, extra: Option<Value>) -> Result<LogEntry> {
        let id = store.append(&NewLogEntry {
            user: Some(EntityRef::new("user", "1", "admin")),
            target: Some(product()),
            message: "Product <b>edited</b>".into(),
            kind: LogEntryKind::Edit,
            identifier: identifier.into(),
            extra,
            ..NewLogEntry::default()
        })?;
        Ok(store.get(id)?.expect("just appended"))
    }

    #[test]
    fn first_entry_has_no_change() -> Result<()> {
        let store = LogStore::open_in_memory()?;
        let entry = append(&store, "price", Some(json!({"price": 10})))?;
        assert_eq!(extra_change(&PlainText, &entry, &store)?.to_string(), "-");
        Ok(())
    }

    #[test]
    fn change_against_previous_entry() -> Result<()> {
        let store = LogStore::open_in_memory()?;
        append(&store, "price", Some(json!({"price": 10, "currency": "EUR"})))?;
        append(&store, "stock", Some(json!({"price": 99})))?;
        let entry = append(&store, "price", Some(json!({"price": 12, "currency": "EUR"})))?;
        assert_eq!(
            extra_change(&PlainText, &entry, &store)?.to_string(),
            "Change price from 10 to 12"
        );
        Ok(())
    }

    #[test]
    fn previous_without_extra_has_no_change() -> Result<()> {
        let store = LogStore::open_in_memory()?;
        append(&store, "price", None)?;
        let entry = append(&store, "price", Some(json!({"price": 12})))?;
        assert_eq!(extra_change(&PlainText, &entry, &store)?, Narration::NoChanges);
        Ok(())
    }

    #[test]
    fn entry_without_extra_skips_lookup() -> Result<()> {
        struct FailingStore;
        impl RecordStore for FailingStore {
            fn previous_entry(&self, _: Option<&EntityRef>, _: &str, _: i64) -> Result<Option<LogEntry>> {
                Err(crate::error::Error::Lock("should not be called".into()))
            }
        }
        let store = LogStore::open_in_memory()?;
        let entry = append(&store, "price", None)?;
        assert_eq!(extra_change(&PlainText, &entry, &FailingStore)?, Narration::NoChanges);
        Ok(())
    }

    #[test]
    fn renders_visible_cells() -> Result<()> {
        let store = LogStore::open_in_memory()?;
        append(&store, "price", Some(json!({"price": 10})))?;
        let entry = append(&store, "price", Some(json!({"price": 11})))?;

        let columns = ListViewConfig::default().visible_columns();
        let routes = RouteTable::default();
        let row = RowRenderer::new(&columns, &store, &routes).render(&entry)?;

        assert_eq!(row.id, entry.id);
        assert_eq!(row.cells.len(), 8);
        assert_eq!(
            row.cells[&ColumnId::Target],
            r#"<a href="/admin/products/4" target="_blank">Blue Mug</a>"#
        );
        assert_eq!(
            row.cells[&ColumnId::User],
            r#"<a href="/admin/users/1" target="_blank">admin</a>"#
        );
        assert_eq!(row.cells[&ColumnId::Message], "Product &lt;b&gt;edited&lt;/b&gt;");
        assert_eq!(row.cells[&ColumnId::Kind], "Edit");
        assert_eq!(row.cells[&ColumnId::Extra], "{&quot;price&quot;:11}");
        assert_eq!(
            row.cells[&ColumnId::ExtraChanged],
            r#"Change <code>price</code> from <em style="color: red;">10</em> to <em style="color: green;">11</em>"#
        );
        Ok(())
    }

    #[test]
    fn hidden_columns_are_not_rendered() -> Result<()> {
        let store = LogStore::open_in_memory()?;
        let entry = append(&store, "price", None)?;
        let columns = ListViewConfig { hide_extra: true, hide_extra_changed: true }.visible_columns();
        let routes = RouteTable::default();
        let row = RowRenderer::new(&columns, &store, &routes).render(&entry)?;
        assert!(!row.cells.contains_key(&ColumnId::Extra));
        assert!(!row.cells.contains_key(&ColumnId::ExtraChanged));
        Ok(())
    }

    #[test]
    fn unroutable_target_shows_identifier() -> Result<()> {
        let store = LogStore::open_in_memory()?;
        let id = store.append(&NewLogEntry {
            target: Some(EntityRef::new("gift_card", "GC-1", "Gift card")),
            message: "issued".into(),
            ..NewLogEntry::default()
        })?;
        let entry = store.get(id)?.expect("just appended");
        let columns = ListViewConfig::default().visible_columns();
        let routes = RouteTable::default();
        let row = RowRenderer::new(&columns, &store, &routes).render(&entry)?;
        assert_eq!(row.cells[&ColumnId::Target], "GC-1");
        assert_eq!(row.cells[&ColumnId::User], "-");
        assert_eq!(row.cells[&ColumnId::Extra], "-");
        assert_eq!(row.cells[&ColumnId::ExtraChanged], "-");
        Ok(())
    }
}
