//! Health check endpoint.
//! Used by: server.

use axum::extract::State;
use axum::http::StatusCode;

use crate::state::AppState;

/// 200 while the log store answers queries.
pub async fn health(State(state): State<AppState>) -> StatusCode {
    match state.store.get(0) {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "log store unavailable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
