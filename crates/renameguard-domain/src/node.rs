//! Canonical view over declaration-tree node values.
//!
//! A node value is a JSON object that may be wrapped one level inside a
//! `{"node": {...}}` container. The wrapper's other child-bearing fields are
//! still valid descent paths, so unwrapping must never hide them. All reads
//! and writes of node state go through this module; callers never touch the
//! field names directly.

use renameguard_types::Protection;
use serde_json::Value;

/// Child-bearing relation fields. A node may carry several at once and all
/// of them are equally valid descent paths.
pub const RELATION_FIELDS: &[&str] = &["members", "children", "extensions"];

/// Single-field container holding the canonical node.
pub const WRAP_FIELD: &str = "node";

pub const NAME_FIELD: &str = "name";
pub const KIND_FIELD: &str = "kind";
pub const PROTECTED_FIELD: &str = "protected";

/// Stamped on a node once it has been matched and updated with
/// cascade-prevention active; later stages must not propagate the parent's
/// protection value into its children.
pub const NO_CASCADE_FIELD: &str = "no_cascade";

/// Resolve the canonical node: unwrap a single `node` container, otherwise
/// the value itself.
pub fn canonical(value: &Value) -> &Value {
    match value.get(WRAP_FIELD) {
        Some(inner) if inner.is_object() => inner,
        _ => value,
    }
}

pub fn canonical_mut(value: &mut Value) -> &mut Value {
    if value.get(WRAP_FIELD).is_some_and(Value::is_object) {
        &mut value[WRAP_FIELD]
    } else {
        value
    }
}

pub fn is_wrapped(value: &Value) -> bool {
    value.get(WRAP_FIELD).is_some_and(Value::is_object)
}

/// The node's declared name, trimmed; `None` when absent or empty.
pub fn name(value: &Value) -> Option<&str> {
    let name = canonical(value).get(NAME_FIELD)?.as_str()?.trim();
    if name.is_empty() { None } else { Some(name) }
}

pub fn kind(value: &Value) -> Option<&str> {
    canonical(value).get(KIND_FIELD)?.as_str()
}

pub fn protection(value: &Value) -> Protection {
    Protection::from_field(canonical(value).get(PROTECTED_FIELD).and_then(Value::as_i64))
}

pub fn set_protection(value: &mut Value, protection: Protection) {
    let Some(obj) = canonical_mut(value).as_object_mut() else {
        return;
    };
    match protection.as_field() {
        Some(encoded) => {
            obj.insert(PROTECTED_FIELD.to_string(), Value::from(encoded));
        }
        None => {
            obj.remove(PROTECTED_FIELD);
        }
    }
}

pub fn stamp_no_cascade(value: &mut Value) {
    if let Some(obj) = canonical_mut(value).as_object_mut() {
        obj.insert(NO_CASCADE_FIELD.to_string(), Value::Bool(true));
    }
}

pub fn has_no_cascade(value: &Value) -> bool {
    canonical(value)
        .get(NO_CASCADE_FIELD)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Every descent path from this value: relation fields on the canonical node
/// plus, for a wrapped node, the wrapper's own relation fields.
pub fn children(value: &Value) -> Vec<&Value> {
    let mut out = Vec::new();
    let current = canonical(value);
    for field in RELATION_FIELDS {
        push_relation(current.get(field), &mut out);
    }
    if !std::ptr::eq(current, value) {
        for field in RELATION_FIELDS {
            push_relation(value.get(field), &mut out);
        }
    }
    out
}

fn push_relation<'a>(field: Option<&'a Value>, out: &mut Vec<&'a Value>) {
    match field {
        Some(Value::Array(items)) => out.extend(items.iter().filter(|v| v.is_object())),
        Some(item) if item.is_object() => out.push(item),
        _ => {}
    }
}
