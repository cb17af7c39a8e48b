//! SQLite-backed store of audit log entries.
//! Used by: state, listview::render, handlers::logs.

use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};

use crate::audit::entry::{EntityRef, LogEntry, LogEntryKind, NewLogEntry};
use crate::audit::query::{LogFilter, LogQuery, Page};
use crate::audit::RecordStore;
use crate::error::{lock_err, Result};

const COLUMNS: &str = "id, created_on, user_kind, user_id, user_label, \
    target_kind, target_id, target_label, message, kind, identifier, extra";

pub struct LogStore {
    conn: Mutex<Connection>,
}

impl LogStore {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS log_entry (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_on TEXT NOT NULL,
                user_kind TEXT,
                user_id TEXT,
                user_label TEXT,
                target_kind TEXT,
                target_id TEXT,
                target_label TEXT,
                message TEXT NOT NULL,
                kind TEXT NOT NULL,
                identifier TEXT NOT NULL DEFAULT '',
                extra TEXT
            );
            CREATE INDEX IF NOT EXISTS log_entry_target_identifier
                ON log_entry (target_kind, target_id, identifier, id);
            CREATE INDEX IF NOT EXISTS log_entry_created_on ON log_entry (created_on);",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    /// Stores a new entry and returns its primary key.
    pub fn append(&self, entry: &NewLogEntry) -> Result<i64> {
        let created_on = entry.created_on.unwrap_or_else(Utc::now);
        let extra = entry.extra.as_ref().map(serde_json::to_string).transpose()?;
        let user = entry.user.as_ref();
        let target = entry.target.as_ref();

        let conn = self.conn.lock().map_err(lock_err("log store"))?;
        conn.execute(
            "INSERT INTO log_entry (created_on, user_kind, user_id, user_label,
                target_kind, target_id, target_label, message, kind, identifier, extra)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                format_timestamp(created_on),
                user.map(|u| u.kind.as_str()),
                user.map(|u| u.id.as_str()),
                user.map(|u| u.label.as_str()),
                target.map(|t| t.kind.as_str()),
                target.map(|t| t.id.as_str()),
                target.map(|t| t.label.as_str()),
                entry.message,
                entry.kind.as_str(),
                entry.identifier,
                extra,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn get(&self, id: i64) -> Result<Option<LogEntry>> {
        let conn = self.conn.lock().map_err(lock_err("log store"))?;
        let entry = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM log_entry WHERE id = ?1"),
                [id],
                read_entry,
            )
            .optional()?;
        Ok(entry)
    }

    pub fn count(&self) -> Result<u64> {
        let conn = self.conn.lock().map_err(lock_err("log store"))?;
        let total: i64 = conn.query_row("SELECT COUNT(*) FROM log_entry", [], |row| row.get(0))?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    pub fn list(&self, query: &LogQuery) -> Result<Page<LogEntry>> {
        let (where_sql, params) = where_clause(&query.filter);
        let direction = if query.sort.descending { "DESC" } else { "ASC" };

        let conn = self.conn.lock().map_err(lock_err("log store"))?;
        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM log_entry{where_sql}"),
            params_from_iter(params.iter()),
            |row| row.get(0),
        )?;

        let sql = format!(
            "SELECT {COLUMNS} FROM log_entry{where_sql} ORDER BY {col} {dir}, id {dir} LIMIT {limit} OFFSET {offset}",
            col = query.sort.key.sql_column(),
            dir = direction,
            limit = query.per_page,
            offset = query.offset(),
        );
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map(params_from_iter(params.iter()), read_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            page: query.page,
            per_page: query.per_page,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }
}

impl RecordStore for LogStore {
    fn previous_entry(
        &self,
        target: Option<&EntityRef>,
        identifier: &str,
        before_id: i64,
    ) -> Result<Option<LogEntry>> {
        let conn = self.conn.lock().map_err(lock_err("log store"))?;
        let entry = conn
            .query_row(
                &format!(
                    "SELECT {COLUMNS} FROM log_entry
                     WHERE id < ?1 AND target_kind IS ?2 AND target_id IS ?3 AND identifier = ?4
                     ORDER BY id DESC LIMIT 1"
                ),
                (
                    before_id,
                    target.map(|t| t.kind.as_str()),
                    target.map(|t| t.id.as_str()),
                    identifier,
                ),
                read_entry,
            )
            .optional()?;
        Ok(entry)
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn where_clause(filter: &LogFilter) -> (String, Vec<String>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<String> = Vec::new();

    if let Some(from) = filter.created_from {
        clauses.push("created_on >= ?".into());
        params.push(format!("{from}T00:00:00"));
    }
    if let Some(next_day) = filter.created_to.and_then(|to| to.succ_opt()) {
        clauses.push("created_on < ?".into());
        params.push(format!("{next_day}T00:00:00"));
    }
    let text_filters = [
        ("user_label", &filter.user),
        ("target_label", &filter.target),
        ("message", &filter.message),
        ("identifier", &filter.identifier),
    ];
    for (column, needle) in text_filters {
        if let Some(needle) = needle {
            clauses.push(format!("{column} LIKE ? ESCAPE '\\'"));
            params.push(like_pattern(needle));
        }
    }
    if let Some(kind) = filter.kind {
        clauses.push("kind = ?".into());
        params.push(kind.as_str().to_string());
    }

    if clauses.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), params)
    }
}

fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn conversion_err(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, message.into())
}

fn read_entity(row: &Row<'_>, first: usize) -> rusqlite::Result<Option<EntityRef>> {
    let Some(id) = row.get::<_, Option<String>>(first + 1)? else {
        return Ok(None);
    };
    let kind: Option<String> = row.get(first)?;
    let label: Option<String> = row.get(first + 2)?;
    Ok(Some(EntityRef {
        kind: kind.unwrap_or_default(),
        label: label.unwrap_or_else(|| id.clone()),
        id,
    }))
}

fn read_entry(row: &Row<'_>) -> rusqlite::Result<LogEntry> {
    let created_on: String = row.get(1)?;
    let created_on = DateTime::parse_from_rfc3339(&created_on)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| conversion_err(1, format!("bad timestamp {created_on:?}: {e}")))?;

    let kind: String = row.get(9)?;
    let kind = LogEntryKind::parse(&kind)
        .ok_or_else(|| conversion_err(9, format!("unknown log entry kind {kind:?}")))?;

    let extra = row
        .get::<_, Option<String>>(11)?
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(|e| conversion_err(11, format!("extra is not valid JSON: {e}")))?;

    Ok(LogEntry {
        id: row.get(0)?,
        created_on,
        user: read_entity(row, 2)?,
        target: read_entity(row, 5)?,
        message: row.get(8)?,
        kind,
        identifier: row.get(10)?,
        extra,
    })
}
