//! Audit log list view: columns, query parameters and row rendering.
//! Used by: handlers::logs, state.

pub mod columns;
pub mod params;
pub mod render;
