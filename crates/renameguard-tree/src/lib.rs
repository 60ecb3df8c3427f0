//! Document adapters: load, normalize, and write back declaration-tree
//! documents.
//!
//! This crate is allowed to do filesystem IO. A malformed or missing tree
//! document degrades to an empty tree with a reason attached — downstream
//! stages must be able to proceed with "nothing protected" as an explicit,
//! visible state. Write-back is atomic and only the caller decides when it
//! happens.

#![forbid(unsafe_code)]

mod identifiers;

pub use identifiers::{parse_identifier_list, read_identifier_list};

use anyhow::Context;
use camino::Utf8Path;
use serde_json::Value;
use std::io::Write;

/// An in-memory declaration-tree document: the ordered top-level node
/// records, mutated in place between load and save.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeclTree {
    pub nodes: Vec<Value>,
}

/// Result of loading a tree document.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome {
    Tree(DeclTree),
    /// The document is unusable; the run continues with an empty tree.
    Malformed { reason: String },
}

pub fn load_tree(path: &Utf8Path) -> LoadOutcome {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            return LoadOutcome::Malformed {
                reason: format!("read {path}: {err}"),
            };
        }
    };
    parse_tree(&text)
}

/// Parse document text. The top-level value must be a sequence of node
/// records; anything else is malformed, never a panic.
pub fn parse_tree(text: &str) -> LoadOutcome {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(err) => {
            return LoadOutcome::Malformed {
                reason: format!("parse declaration tree: {err}"),
            };
        }
    };
    match value {
        Value::Array(nodes) => LoadOutcome::Tree(DeclTree { nodes }),
        other => LoadOutcome::Malformed {
            reason: format!(
                "top-level value must be a sequence, got {}",
                json_type_name(&other)
            ),
        },
    }
}

/// Atomic write-back: serialize next to the target, then rename over it.
/// No partial writes on a failed pass; failure here is fatal to the run.
pub fn save_tree(path: &Utf8Path, tree: &DeclTree) -> anyhow::Result<()> {
    let data =
        serde_json::to_string_pretty(&tree.nodes).context("serialize declaration tree")?;
    let dir = path.parent().unwrap_or(Utf8Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir.as_std_path())
        .with_context(|| format!("create temp file in {dir}"))?;
    tmp.write_all(data.as_bytes())
        .and_then(|()| tmp.write_all(b"\n"))
        .context("write declaration tree")?;
    tmp.persist(path.as_std_path())
        .with_context(|| format!("replace {path}"))?;
    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
