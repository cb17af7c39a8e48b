//! Structural diff between two JSON-like trees.
//! Used by: diff::narrate.
//!
//! Mapping keys and sequence positions are both path segments. Containers of
//! the same variant are recursed into; anything else is compared as a leaf.
//! Within one container the output order is: changes (recursing in place),
//! then additions, then removals, each in key/position order. Mapping keys
//! iterate sorted because `serde_json::Map` is a `BTreeMap` here.

use std::fmt;

use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(i) => write!(f, "{}", i),
        }
    }
}

/// Ordered path from the payload root, displayed joined with `.`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DottedPath(Vec<PathSegment>);

impl DottedPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    #[cfg(test)]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl fmt::Display for DottedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChangeRecord {
    Added { path: DottedPath, value: Value },
    Removed { path: DottedPath, value: Value },
    Changed { path: DottedPath, old: Value, new: Value },
}

impl ChangeRecord {
    #[cfg(test)]
    pub fn path(&self) -> &DottedPath {
        match self {
            Self::Added { path, .. } | Self::Removed { path, .. } | Self::Changed { path, .. } => {
                path
            }
        }
    }
}

/// Computes the ordered change records turning `previous` into `current`.
pub fn diff(previous: &Value, current: &Value) -> Vec<ChangeRecord> {
    let mut out = Vec::new();
    diff_into(&DottedPath::root(), previous, current, &mut out);
    out
}

fn diff_into(path: &DottedPath, previous: &Value, current: &Value, out: &mut Vec<ChangeRecord>) {
    match (previous, current) {
        (Value::Object(old), Value::Object(new)) => diff_mappings(path, old, new, out),
        (Value::Array(old), Value::Array(new)) => diff_sequences(path, old, new, out),
        (old, new) if !leaf_eq(old, new) => out.push(ChangeRecord::Changed {
            path: path.clone(),
            old: old.clone(),
            new: new.clone(),
        }),
        _ => {}
    }
}

fn diff_mappings(
    path: &DottedPath,
    old: &Map<String, Value>,
    new: &Map<String, Value>,
    out: &mut Vec<ChangeRecord>,
) {
    for (key, old_value) in old {
        if let Some(new_value) = new.get(key) {
            diff_into(&path.child(PathSegment::Key(key.clone())), old_value, new_value, out);
        }
    }
    for (key, value) in new.iter().filter(|(key, _)| !old.contains_key(*key)) {
        out.push(ChangeRecord::Added {
            path: path.child(PathSegment::Key(key.clone())),
            value: value.clone(),
        });
    }
    for (key, value) in old.iter().filter(|(key, _)| !new.contains_key(*key)) {
        out.push(ChangeRecord::Removed {
            path: path.child(PathSegment::Key(key.clone())),
            value: value.clone(),
        });
    }
}

fn diff_sequences(path: &DottedPath, old: &[Value], new: &[Value], out: &mut Vec<ChangeRecord>) {
    let shared = old.len().min(new.len());
    for (i, (old_value, new_value)) in old.iter().zip(new).enumerate() {
        diff_into(&path.child(PathSegment::Index(i)), old_value, new_value, out);
    }
    for (i, value) in new.iter().enumerate().skip(shared) {
        out.push(ChangeRecord::Added {
            path: path.child(PathSegment::Index(i)),
            value: value.clone(),
        });
    }
    for (i, value) in old.iter().enumerate().skip(shared) {
        out.push(ChangeRecord::Removed {
            path: path.child(PathSegment::Index(i)),
            value: value.clone(),
        });
    }
}

// 1 and 1.0 are the same amount.
fn leaf_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_eq(x, y),
        _ => a == b,
    }
}

fn numbers_eq(x: &Number, y: &Number) -> bool {
    if x == y {
        return true;
    }
    match (x.is_f64(), y.is_f64()) {
        (true, false) => x.as_f64().is_some_and(|f| float_eq_integer(f, y)),
        (false, true) => y.as_f64().is_some_and(|f| float_eq_integer(f, x)),
        _ => false,
    }
}

// Compared as integers once the float is known to be integral and in range.
fn float_eq_integer(f: f64, n: &Number) -> bool {
    if f.fract() != 0.0 {
        return false;
    }
    let two_pow_63 = -(i64::MIN as f64);
    if let Some(i) = n.as_i64() {
        return (-two_pow_63..two_pow_63).contains(&f) && f as i64 == i;
    }
    if let Some(u) = n.as_u64() {
        return (0.0..2.0 * two_pow_63).contains(&f) && f as u64 == u;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(k: &str) -> PathSegment {
        PathSegment::Key(k.into())
    }

    fn path(segments: &[PathSegment]) -> DottedPath {
        DottedPath(segments.to_vec())
    }

    #[test]
    fn equal_values_have_no_changes() {
        let v = json!({"a": 1, "b": [1, {"c": null}], "d": "x"});
        assert!(diff(&v, &v).is_empty());
    }

    #[test]
    fn changed_leaf() {
        let changes = diff(&json!({"a": 1}), &json!({"a": 2}));
        assert_eq!(
            changes,
            vec![ChangeRecord::Changed { path: path(&[key("a")]), old: json!(1), new: json!(2) }]
        );
    }

    #[test]
    fn added_and_removed_keys() {
        let changes = diff(&json!({"a": 1, "gone": true}), &json!({"a": 1, "b": 2}));
        assert_eq!(
            changes,
            vec![
                ChangeRecord::Added { path: path(&[key("b")]), value: json!(2) },
                ChangeRecord::Removed { path: path(&[key("gone")]), value: json!(true) },
            ]
        );
    }

    #[test]
    fn nested_mappings_are_recursed() {
        let changes = diff(&json!({"a": {"x": 1, "y": 1}}), &json!({"a": {"x": 2, "y": 1}}));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path().to_string(), "a.x");
    }

    #[test]
    fn missing_subtree_is_one_record() {
        let changes = diff(&json!({}), &json!({"a": {"x": 1, "y": [1, 2]}}));
        assert_eq!(
            changes,
            vec![ChangeRecord::Added { path: path(&[key("a")]), value: json!({"x": 1, "y": [1, 2]}) }]
        );
    }

    #[test]
    fn sequences_compare_positionally() {
        let changes = diff(&json!({"tags": ["a", "b", "c"]}), &json!({"tags": ["a", "x"]}));
        assert_eq!(
            changes,
            vec![
                ChangeRecord::Changed {
                    path: path(&[key("tags"), PathSegment::Index(1)]),
                    old: json!("b"),
                    new: json!("x"),
                },
                ChangeRecord::Removed {
                    path: path(&[key("tags"), PathSegment::Index(2)]),
                    value: json!("c"),
                },
            ]
        );
    }

    #[test]
    fn grown_sequence_reports_additions() {
        let changes = diff(&json!([1]), &json!([1, 2, 3]));
        let paths: Vec<String> = changes.iter().map(|c| c.path().to_string()).collect();
        assert_eq!(paths, vec!["1", "2"]);
        assert!(changes.iter().all(|c| matches!(c, ChangeRecord::Added { .. })));
    }

    #[test]
    fn variant_mismatch_is_a_single_change() {
        let changes = diff(&json!({"a": {"x": 1}}), &json!({"a": [1]}));
        assert_eq!(
            changes,
            vec![ChangeRecord::Changed { path: path(&[key("a")]), old: json!({"x": 1}), new: json!([1]) }]
        );
    }

    #[test]
    fn null_to_value_is_a_change() {
        let changes = diff(&json!({"a": null}), &json!({"a": "set"}));
        assert!(matches!(&changes[..], [ChangeRecord::Changed { old: Value::Null, .. }]));
    }

    #[test]
    fn integer_and_float_of_same_amount_are_equal() {
        assert!(diff(&json!({"n": 1}), &json!({"n": 1.0})).is_empty());
        assert_eq!(diff(&json!({"n": 1}), &json!({"n": 1.5})).len(), 1);
    }

    #[test]
    fn large_integer_differs_from_nearby_float() {
        let changes = diff(&json!({"n": 9007199254740993u64}), &json!({"n": 9007199254740992.0}));
        assert_eq!(changes.len(), 1);
        let negative = diff(&json!({"n": -9007199254740993i64}), &json!({"n": -9007199254740992.0}));
        assert_eq!(negative.len(), 1);
        assert!(diff(&json!({"n": 9007199254740994u64}), &json!({"n": 9007199254740994.0})).is_empty());
        assert_eq!(diff(&json!({"n": u64::MAX}), &json!({"n": 18446744073709551616.0})).len(), 1);
    }

    #[test]
    fn changes_come_before_additions_and_removals() {
        let changes = diff(
            &json!({"a": 1, "c": 1, "z": 1}),
            &json!({"a": 2, "b": 1, "z": 2}),
        );
        let rendered: Vec<(&str, String)> = changes
            .iter()
            .map(|c| {
                let kind = match c {
                    ChangeRecord::Added { .. } => "add",
                    ChangeRecord::Removed { .. } => "remove",
                    ChangeRecord::Changed { .. } => "change",
                };
                (kind, c.path().to_string())
            })
            .collect();
        assert_eq!(
            rendered,
            vec![
                ("change", "a".to_string()),
                ("change", "z".to_string()),
                ("add", "b".to_string()),
                ("remove", "c".to_string()),
            ]
        );
    }

    #[test]
    fn root_path_displays_empty() {
        assert_eq!(DottedPath::root().to_string(), "");
        assert!(DottedPath::root().segments().is_empty());
    }
}
