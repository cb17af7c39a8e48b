//! Audit log entries and their storage.
//! Used by: state, listview, handlers.

pub mod entry;
pub mod query;
pub mod sqlite;

use crate::error::Result;
use entry::{EntityRef, LogEntry};

/// Lookup of the entry an extra payload is diffed against.
pub trait RecordStore {
    /// Most recent entry with `id < before_id` sharing `target` and `identifier`,
    /// ordered by descending id. An absent target matches only absent targets.
    fn previous_entry(
        &self,
        target: Option<&EntityRef>,
        identifier: &str,
        before_id: i64,
    ) -> Result<Option<LogEntry>>;
}
