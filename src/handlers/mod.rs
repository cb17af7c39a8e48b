//! HTTP handler modules.
//! Used by: server.

pub mod health;
pub mod logs;
pub mod metrics;
