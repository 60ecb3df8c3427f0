use crate::node;
use serde_json::Value;
use std::collections::BTreeSet;

/// Name indexes over a declaration tree, rebuilt fresh on every invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameIndex {
    /// Every declared name (duplicates collapsed).
    pub all: BTreeSet<String>,
    /// Names whose node carries explicit `protected = 1`.
    pub protected: BTreeSet<String>,
}

impl NameIndex {
    pub fn build(nodes: &[Value]) -> Self {
        let mut index = NameIndex::default();
        for value in nodes {
            index.visit(value);
        }
        index
    }

    fn visit(&mut self, value: &Value) {
        if !value.is_object() {
            return;
        }
        if let Some(name) = node::name(value) {
            self.all.insert(name.to_string());
            if node::protection(value).is_on() {
                self.protected.insert(name.to_string());
            }
        }
        for child in node::children(value) {
            self.visit(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collects_names_and_protected_subset() {
        let nodes = vec![json!({
            "name": "Session",
            "kind": "class",
            "members": [
                {"name": "token", "kind": "property", "protected": 1},
                {"name": "refresh", "kind": "function", "protected": 0}
            ]
        })];

        let index = NameIndex::build(&nodes);
        assert_eq!(
            index.all,
            ["Session", "refresh", "token"]
                .iter()
                .map(|s| s.to_string())
                .collect()
        );
        assert_eq!(
            index.protected,
            ["token"].iter().map(|s| s.to_string()).collect()
        );
    }

    #[test]
    fn visits_wrapper_sibling_relations() {
        // The same name may appear under several relation kinds at once;
        // all of them count.
        let nodes = vec![json!({
            "node": {
                "name": "Outer",
                "kind": "class",
                "members": [{"name": "inner", "kind": "function"}]
            },
            "extensions": [{"name": "OuterExt", "kind": "extension", "protected": 1}]
        })];

        let index = NameIndex::build(&nodes);
        assert!(index.all.contains("Outer"));
        assert!(index.all.contains("inner"));
        assert!(index.all.contains("OuterExt"));
        assert!(index.protected.contains("OuterExt"));
    }

    #[test]
    fn duplicate_names_collapse() {
        let nodes = vec![
            json!({"name": "helper", "kind": "function"}),
            json!({"name": "helper", "kind": "variable", "protected": 1}),
        ];
        let index = NameIndex::build(&nodes);
        assert_eq!(index.all.len(), 1);
        // Protection is tracked per name: any protected occurrence counts.
        assert!(index.protected.contains("helper"));
    }
}
