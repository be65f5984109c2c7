//! Recursive flattening of nested record data into a single log line.
//!
//! Used by the Loki formatter to build the log line that accompanies
//! the stream labels: nested map keys are joined with a separator and
//! each scalar leaf renders as `key="value"` (strings, quotes escaped)
//! or `key=value` (numbers, booleans). Arrays and nulls are skipped.

use serde_json::Value;

/// Flatten `value` into a space-separated `key=value` line.
///
/// `{"a": {"b": 1, "c": "x"}}` with separator `_` produces
/// `a_b=1 a_c="x"`. Key order follows map insertion order.
pub fn flatten(value: &Value, prefix: &str, sep: &str) -> String {
    let mut parts = Vec::new();
    flatten_into(value, prefix, sep, &mut parts);
    parts.join(" ")
}

fn flatten_into(value: &Value, prefix: &str, sep: &str, parts: &mut Vec<String>) {
    match value {
        Value::Object(obj) => {
            for (key, val) in obj {
                let child = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}{}{}", prefix, sep, key)
                };
                flatten_into(val, &child, sep, parts);
            }
        }
        Value::String(s) => {
            parts.push(format!("{}=\"{}\"", prefix, s.replace('"', "\\\"")));
        }
        Value::Number(n) => {
            parts.push(format!("{}={}", prefix, n));
        }
        Value::Bool(b) => {
            parts.push(format!("{}={}", prefix, b));
        }
        // Arrays and nulls are not scalar leaves; skip them.
        _ => {}
    }
}
