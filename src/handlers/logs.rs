//! Audit log list, detail and append endpoints.
//! Used by: server.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::audit::entry::{LogEntry, NewLogEntry};
use crate::diff::narrate::{Html, PlainText};
use crate::error::{Error, Result};
use crate::listview::columns::Column;
use crate::listview::params::ListParams;
use crate::listview::render::{extra_change as narrate_extra_change, Row, RowRenderer};
use crate::state::AppState;

const MAX_MESSAGE_LEN: usize = 1024;
const MAX_IDENTIFIER_LEN: usize = 64;

#[derive(Serialize)]
pub struct ListResponse {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

#[derive(Serialize)]
pub struct ExtraChangeResponse {
    pub id: i64,
    pub html: String,
    pub text: String,
    pub lines: Vec<String>,
}

#[derive(Serialize)]
pub struct AppendResponse {
    pub id: i64,
}

fn validate_entry(entry: &NewLogEntry) -> Result<()> {
    if entry.message.trim().is_empty() || entry.message.chars().count() > MAX_MESSAGE_LEN {
        return Err(Error::Validation(format!(
            "message must be 1-{MAX_MESSAGE_LEN} characters"
        )));
    }
    if entry.identifier.chars().count() > MAX_IDENTIFIER_LEN {
        return Err(Error::Validation(format!(
            "identifier must be at most {MAX_IDENTIFIER_LEN} characters"
        )));
    }
    if entry.identifier.chars().any(|c| c.is_control()) {
        return Err(Error::Validation("identifier contains control characters".into()));
    }
    for entity in [&entry.user, &entry.target].into_iter().flatten() {
        if entity.kind.is_empty() || entity.id.is_empty() {
            return Err(Error::Validation("referenced entities need a kind and an id".into()));
        }
    }
    Ok(())
}

fn load(state: &AppState, id: i64) -> Result<LogEntry> {
    state.store.get(id)?.ok_or(Error::NotFound(id))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>> {
    let query = params
        .into_query(state.page_size)
        .inspect_err(|_| state.metrics.record_validation_failure())?;
    let page = state.store.list(&query)?;

    let renderer = RowRenderer::new(&state.columns, &state.store, &state.routes);
    let rows = page
        .items
        .iter()
        .map(|entry| renderer.render(entry))
        .collect::<Result<Vec<_>>>()?;

    state.metrics.record_list(rows.len());
    tracing::info!(page = page.page, rows = rows.len(), total = page.total, "log list rendered");

    Ok(Json(ListResponse {
        columns: state.columns.clone(),
        rows,
        page: page.page,
        per_page: page.per_page,
        total: page.total,
    }))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Row>> {
    let entry = load(&state, id)?;
    let row = RowRenderer::new(&state.columns, &state.store, &state.routes).render(&entry)?;
    Ok(Json(row))
}

pub async fn extra_change(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ExtraChangeResponse>> {
    let entry = load(&state, id)?;
    let html = narrate_extra_change(&Html, &entry, &state.store)?;
    let text = narrate_extra_change(&PlainText, &entry, &state.store)?;
    state.metrics.record_extra_change();
    tracing::debug!(
        id,
        changed = text.has_changes(),
        changes = text.lines().len(),
        "extra change narrated"
    );

    Ok(Json(ExtraChangeResponse {
        id,
        html: html.to_string(),
        lines: text.lines().to_vec(),
        text: text.to_string(),
    }))
}

pub async fn append(
    State(state): State<AppState>,
    Json(entry): Json<NewLogEntry>,
) -> Result<(StatusCode, Json<AppendResponse>)> {
    validate_entry(&entry).inspect_err(|_| state.metrics.record_validation_failure())?;
    let id = state.store.append(&entry)?;
    state.metrics.record_append();
    tracing::info!(
        id,
        kind = entry.kind.as_str(),
        identifier = %entry.identifier,
        target = ?entry.target.as_ref().map(|t| (&t.kind, &t.id)),
        "log entry appended"
    );
    Ok((StatusCode::CREATED, Json(AppendResponse { id })))
}
