//! HTML fragment helpers for rendered list cells.
//! Used by: diff::narrate, links.

/// Placeholder shown when a cell has nothing to display.
pub const DASH: &str = "-";

/// Escape HTML special characters
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
