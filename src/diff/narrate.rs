//! Turns change records between two extra payloads into readable lines.
//! Used by: listview::render, handlers::logs.

use std::fmt;

use serde_json::Value;

use crate::diff::engine::{self, ChangeRecord, DottedPath};
use crate::markup::{self, DASH};

/// Rendered result of one narration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Narration {
    NoChanges,
    Lines {
        lines: Vec<String>,
        separator: &'static str,
    },
}

impl Narration {
    pub fn lines(&self) -> &[String] {
        match self {
            Self::NoChanges => &[],
            Self::Lines { lines, .. } => lines,
        }
    }

    pub fn has_changes(&self) -> bool {
        matches!(self, Self::Lines { .. })
    }
}

impl fmt::Display for Narration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoChanges => f.write_str(DASH),
            Self::Lines { lines, separator } => f.write_str(&lines.join(*separator)),
        }
    }
}

/// How a single change record becomes one line of output.
pub trait ChangeStyle {
    fn separator(&self) -> &'static str;
    fn added(&self, path: &DottedPath, value: &Value) -> String;
    fn removed(&self, path: &DottedPath, value: &Value) -> String;
    fn changed(&self, path: &DottedPath, old: &Value, new: &Value) -> String;

    fn render(&self, record: &ChangeRecord) -> String {
        match record {
            ChangeRecord::Added { path, value } => self.added(path, value),
            ChangeRecord::Removed { path, value } => self.removed(path, value),
            ChangeRecord::Changed { path, old, new } => self.changed(path, old, new),
        }
    }
}

/// `Add b 2`, lines joined with newlines.
pub struct PlainText;

impl ChangeStyle for PlainText {
    fn separator(&self) -> &'static str {
        "\n"
    }

    fn added(&self, path: &DottedPath, value: &Value) -> String {
        format!("Add {} {}", path, display_value(value))
    }

    fn removed(&self, path: &DottedPath, value: &Value) -> String {
        format!("Remove {} {}", path, display_value(value))
    }

    fn changed(&self, path: &DottedPath, old: &Value, new: &Value) -> String {
        format!("Change {} from {} to {}", path, display_or_dash(old), display_or_dash(new))
    }
}

/// Markup for the list cell: green for additions, red for removals.
pub struct Html;

impl Html {
    fn em(color: &str, text: &str) -> String {
        format!(r#"<em style="color: {};">{}</em>"#, color, markup::escape(text))
    }

    fn code(path: &DottedPath) -> String {
        format!("<code>{}</code>", markup::escape(&path.to_string()))
    }
}

impl ChangeStyle for Html {
    fn separator(&self) -> &'static str {
        "<br>"
    }

    fn added(&self, path: &DottedPath, value: &Value) -> String {
        format!("Add {} {}", Self::code(path), Self::em("green", &display_value(value)))
    }

    fn removed(&self, path: &DottedPath, value: &Value) -> String {
        format!("Remove {} {}", Self::code(path), Self::em("red", &display_value(value)))
    }

    fn changed(&self, path: &DottedPath, old: &Value, new: &Value) -> String {
        format!(
            "Change {} from {} to {}",
            Self::code(path),
            Self::em("red", &display_or_dash(old)),
            Self::em("green", &display_or_dash(new)),
        )
    }
}

/// Plain-text narration of what changed from `previous` to `current`.
///
/// `previous` is the extra payload of the prior entry for the same target and
/// identifier; pass `None` when there is no prior entry or it has no payload.
/// Returns [`Narration::NoChanges`] (displayed as `-`) when either side is
/// missing or empty, or when both payloads are equal.
pub fn narrate(previous: Option<&Value>, current: Option<&Value>) -> Narration {
    narrate_with(&PlainText, previous, current)
}

pub fn narrate_html(previous: Option<&Value>, current: Option<&Value>) -> Narration {
    narrate_with(&Html, previous, current)
}

pub fn narrate_with<S: ChangeStyle>(
    style: &S,
    previous: Option<&Value>,
    current: Option<&Value>,
) -> Narration {
    let lines: Vec<String> = changes_between(previous, current)
        .iter()
        .map(|record| style.render(record))
        .collect();
    if lines.is_empty() {
        return Narration::NoChanges;
    }
    Narration::Lines {
        lines,
        separator: style.separator(),
    }
}

/// Change records between two payloads, empty when there is no baseline.
pub fn changes_between(previous: Option<&Value>, current: Option<&Value>) -> Vec<ChangeRecord> {
    let Some(current) = current.filter(|v| !is_empty_payload(v)) else {
        return Vec::new();
    };
    let Some(previous) = previous.filter(|v| !is_empty_payload(v)) else {
        return Vec::new();
    };
    engine::diff(previous, current)
}

/// Falsy payloads count as "no extra data": null, `false`, zero, `""`, `[]`
/// and `{}`.
pub fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn display_or_dash(value: &Value) -> String {
    match value {
        Value::Null => DASH.to_string(),
        other => display_value(other),
    }
}
