//! Change summaries for audit entries
//!
//! Compares the JSON form of a record before and after an edit and lists
//! the fields that differ. Nested objects (expense details, loan payment
//! kinds) are walked with dotted paths; arrays are summarised by length.

use serde_json::Value;

const MAX_STRING_LEN: usize = 40;

/// Describe the differences between two JSON values
///
/// Returns `None` when nothing changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let mut changes = Vec::new();
    collect_changes(before, after, "", &mut changes);
    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn collect_changes(before: &Value, after: &Value, prefix: &str, changes: &mut Vec<String>) {
    match (before, after) {
        (Value::Object(old), Value::Object(new)) => {
            for (key, old_val) in old {
                let path = join_path(prefix, key);
                match new.get(key) {
                    Some(new_val) => collect_changes(old_val, new_val, &path, changes),
                    None => changes.push(format!("{}: {} -> (removed)", path, render(old_val))),
                }
            }
            for (key, new_val) in new {
                if !old.contains_key(key) {
                    let path = join_path(prefix, key);
                    changes.push(format!("{}: (added) -> {}", path, render(new_val)));
                }
            }
        }
        _ if before != after => {
            let label = if prefix.is_empty() { "value" } else { prefix };
            changes.push(format!("{}: {} -> {}", label, render(before), render(after)));
        }
        _ => {}
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > MAX_STRING_LEN => {
            let head: String = s.chars().take(MAX_STRING_LEN - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
        other => other.to_string(),
    }
}
