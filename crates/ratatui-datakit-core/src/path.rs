//! Dotted-path access into row records.
//!
//! Components address row fields with strings like `"category.ref"`. Missing keys,
//! non-object intermediates, and `null` segments all yield `None` rather than
//! panicking; display text for a missing field is the empty string.

use serde_json::Value;

/// Resolves a dotted path against a row, yielding the addressed value.
///
/// A `null` leaf is returned as-is so callers can distinguish "present but null"
/// from "absent"; [`path_text`] treats both as empty.
pub fn get_path<'a>(row: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    let mut current = row;
    for segment in path.split('.') {
        match current {
            Value::Object(map) => current = map.get(segment)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Display text for the value addressed by `path`.
///
/// Strings render unquoted; other scalars via their JSON form; missing or null
/// fields as the empty string.
pub fn path_text(row: &Value, path: &str) -> String {
    match get_path(row, path) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_nested_fields() {
        let row = json!({ "category": { "ref": "abc", "rank": 3 } });
        assert_eq!(get_path(&row, "category.ref"), Some(&json!("abc")));
        assert_eq!(path_text(&row, "category.rank"), "3");
    }

    #[test]
    fn missing_segments_yield_none() {
        let row = json!({ "category": null });
        assert_eq!(get_path(&row, "category.ref"), None);
        assert_eq!(get_path(&row, "nope"), None);
        assert_eq!(get_path(&row, ""), None);
        assert_eq!(path_text(&row, "category.ref"), "");
    }

    #[test]
    fn null_leaf_is_present_but_empty() {
        let row = json!({ "name": null });
        assert_eq!(get_path(&row, "name"), Some(&Value::Null));
        assert_eq!(path_text(&row, "name"), "");
    }
}
