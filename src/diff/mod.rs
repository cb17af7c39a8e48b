//! Structural diffing and narration of log entry extra payloads.
//! Used by: listview, handlers.

pub mod engine;
pub mod narrate;
