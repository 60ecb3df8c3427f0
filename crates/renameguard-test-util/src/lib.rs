//! Shared test utilities for the renameguard workspace.
//!
//! This crate exists because `xtask` needs `normalize_nondeterministic` at
//! runtime (not behind `#[cfg(test)]`), so a `#[cfg(test)]` module inside
//! `renameguard-types` would not suffice.

use serde_json::Value;

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// Two concerns are handled separately:
///
/// 1. **Root-only** — `tool.version` is replaced with `"__VERSION__"` only
///    when the *root* object looks like a preflight envelope (has all five
///    keys: `schema`, `tool`, `started_at`, `outcome`, `data`). This
///    prevents false normalization of nested objects that happen to share
///    the same shape.
///
/// 2. **Recursive** — timestamp keys (`started_at`, `finished_at`,
///    `timestamp`) are normalized at any depth because their placeholder
///    value is fixed and cannot collide with real data.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = obj.contains_key("schema")
            && obj.contains_key("tool")
            && obj.contains_key("started_at")
            && obj.contains_key("outcome")
            && obj.contains_key("data");
        if is_envelope
            && let Some(tool) = obj.get_mut("tool")
            && let Some(tool_obj) = tool.as_object_mut()
            && tool_obj.contains_key("name")
            && tool_obj.contains_key("version")
        {
            tool_obj.insert(
                "version".to_string(),
                Value::String("__VERSION__".to_string()),
            );
        }
    }
    normalize_timestamps_recursive(&mut value);
    value
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in ["started_at", "finished_at", "timestamp"] {
                if map.contains_key(key) {
                    map.insert(
                        key.to_string(),
                        Value::String("__TIMESTAMP__".to_string()),
                    );
                }
            }
            for val in map.values_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_only_touches_envelope_tool_version() {
        let input = json!({
            "schema": "renameguard.preflight.v1",
            "tool": { "name": "renameguard", "version": "0.1.0" },
            "started_at": "2026-01-01T00:00:00Z",
            "finished_at": "2026-01-01T00:00:01Z",
            "outcome": "completed",
            "data": {
                "notes": [],
                "nested": { "tool": { "name": "other", "version": "9.9.9" } }
            }
        });

        let result = normalize_nondeterministic(input);

        assert_eq!(result["tool"]["version"], "__VERSION__");
        assert_eq!(result["started_at"], "__TIMESTAMP__");
        assert_eq!(result["finished_at"], "__TIMESTAMP__");
        // Nested tool objects are not envelopes and stay untouched.
        assert_eq!(result["data"]["nested"]["tool"]["version"], "9.9.9");
    }

    #[test]
    fn audit_timestamps_normalize_at_any_depth() {
        let input = json!([
            { "kind": "pending", "timestamp": "2026-01-01T00:00:00Z" },
            { "kind": "approved", "timestamp": "2026-01-01T00:00:05Z" }
        ]);
        let result = normalize_nondeterministic(input);
        assert_eq!(result[0]["timestamp"], "__TIMESTAMP__");
        assert_eq!(result[1]["timestamp"], "__TIMESTAMP__");
    }

    #[test]
    fn root_without_envelope_keys_not_normalized() {
        let input = json!({
            "tool": { "name": "other", "version": "2.0.0" }
        });
        let result = normalize_nondeterministic(input);
        assert_eq!(result["tool"]["version"], "2.0.0");
    }
}
