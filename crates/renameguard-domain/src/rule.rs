//! Rule-spec grammar: `[kind:]Parent.Path.leaf`.
//!
//! The optional kind hint runs up to the first colon. The remainder splits
//! on `.`; the final segment is the leaf (literal, or a wildcard when it
//! contains `*`, `?`, `[`, `]`), all preceding segments form the parent path
//! in order. A spec with no parent path matches a satisfying name anywhere
//! in the tree, not only at the top level.

use globset::{Glob, GlobMatcher};
use std::collections::BTreeSet;

const WILDCARD_CHARS: &[char] = &['*', '?', '[', ']'];

/// Leaf pattern of a rule spec. Wildcards use case-sensitive glob semantics.
#[derive(Clone, Debug)]
pub enum Leaf {
    Literal(String),
    Wildcard { pattern: String, matcher: GlobMatcher },
}

impl Leaf {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Leaf::Literal(literal) => literal == name,
            Leaf::Wildcard { matcher, .. } => matcher.is_match(name),
        }
    }

    pub fn display(&self) -> &str {
        match self {
            Leaf::Literal(literal) => literal,
            Leaf::Wildcard { pattern, .. } => pattern,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Leaf::Wildcard { .. })
    }
}

#[derive(Clone, Debug)]
pub struct RuleSpec {
    pub kind_hint: Option<String>,
    /// Ordered ancestor names; must match the ancestor-stack suffix exactly.
    pub parent_path: Vec<String>,
    pub leaf: Leaf,
}

impl RuleSpec {
    /// Parse one rule string. Malformed or empty specs yield `None` and are
    /// dropped silently by callers.
    pub fn parse(raw: &str) -> Option<RuleSpec> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let (kind_hint, rest) = match raw.split_once(':') {
            Some((kind, rest)) => {
                let kind = kind.trim();
                if kind.is_empty() {
                    return None;
                }
                (Some(kind.to_string()), rest)
            }
            None => (None, raw),
        };

        let mut segments: Vec<&str> = rest.split('.').map(str::trim).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        let leaf_raw = segments.pop()?;

        let leaf = if leaf_raw.contains(WILDCARD_CHARS) {
            let matcher = Glob::new(leaf_raw).ok()?.compile_matcher();
            Leaf::Wildcard {
                pattern: leaf_raw.to_string(),
                matcher,
            }
        } else {
            Leaf::Literal(leaf_raw.to_string())
        };

        Some(RuleSpec {
            kind_hint,
            parent_path: segments.into_iter().map(str::to_string).collect(),
            leaf,
        })
    }

    /// Parse a rule collection; returns the surviving specs and the number
    /// of strings dropped as malformed.
    pub fn parse_all(raw: &[String]) -> (Vec<RuleSpec>, usize) {
        let specs: Vec<RuleSpec> = raw.iter().filter_map(|s| RuleSpec::parse(s)).collect();
        let dropped = raw.len() - specs.len();
        (specs, dropped)
    }

    /// A spec that matches exactly one name anywhere in the tree. Used when
    /// applying an already-expanded name set.
    pub fn literal(name: &str) -> RuleSpec {
        RuleSpec {
            kind_hint: None,
            parent_path: Vec::new(),
            leaf: Leaf::Literal(name.to_string()),
        }
    }

    pub fn literals<I, S>(names: I) -> Vec<RuleSpec>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|n| RuleSpec::literal(n.as_ref()))
            .collect()
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.leaf.matches(name)
    }

    /// An empty parent path matches any ancestry; a non-empty one must equal
    /// the last N entries of the ancestor stack.
    pub fn matches_ancestors(&self, stack: &[String]) -> bool {
        if self.parent_path.is_empty() {
            return true;
        }
        stack.len() >= self.parent_path.len() && stack.ends_with(&self.parent_path)
    }

    pub fn matches_kind(&self, kind: Option<&str>) -> bool {
        match self.kind_hint.as_deref() {
            Some(hint) => kind == Some(hint),
            None => true,
        }
    }

    /// A bare `*` rule: matches every identifier. Surfaced as a high-risk
    /// signal before any policy logic runs.
    pub fn is_bare_star(&self) -> bool {
        self.kind_hint.is_none()
            && self.parent_path.is_empty()
            && matches!(&self.leaf, Leaf::Wildcard { pattern, .. } if pattern == "*")
    }

    /// Expand this spec's leaf against a name set: literals pass through
    /// as-is, wildcards contribute every matching entry.
    pub fn expand_leaf(&self, names: &BTreeSet<String>, out: &mut BTreeSet<String>) {
        match &self.leaf {
            Leaf::Literal(literal) => {
                out.insert(literal.clone());
            }
            Leaf::Wildcard { matcher, .. } => {
                out.extend(names.iter().filter(|n| matcher.is_match(n)).cloned());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name_parses_to_unscoped_literal() {
        let spec = RuleSpec::parse("secretKey").expect("parse");
        assert_eq!(spec.kind_hint, None);
        assert!(spec.parent_path.is_empty());
        assert!(spec.matches_name("secretKey"));
        assert!(!spec.matches_name("secretKey2"));
        assert!(spec.matches_ancestors(&[]));
        assert!(spec.matches_ancestors(&["Anything".to_string()]));
    }

    #[test]
    fn dotted_path_splits_into_parents_and_leaf() {
        let spec = RuleSpec::parse("Outer.Middle.inner").expect("parse");
        assert_eq!(spec.parent_path, vec!["Outer", "Middle"]);
        assert_eq!(spec.leaf.display(), "inner");
    }

    #[test]
    fn kind_hint_consumes_up_to_first_colon() {
        let spec = RuleSpec::parse("function:Session.login").expect("parse");
        assert_eq!(spec.kind_hint.as_deref(), Some("function"));
        assert_eq!(spec.parent_path, vec!["Session"]);
        assert!(spec.matches_kind(Some("function")));
        assert!(!spec.matches_kind(Some("class")));
        assert!(!spec.matches_kind(None));
    }

    #[test]
    fn wildcard_leaf_uses_glob_semantics() {
        let spec = RuleSpec::parse("Bar*").expect("parse");
        assert!(spec.leaf.is_wildcard());
        assert!(spec.matches_name("Barista"));
        assert!(spec.matches_name("Bar"));
        // Case-sensitive, like the original matcher.
        assert!(!spec.matches_name("barista"));
    }

    #[test]
    fn parent_path_matches_stack_suffix_only() {
        let spec = RuleSpec::parse("Outer.inner").expect("parse");
        let to_stack = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert!(spec.matches_ancestors(&to_stack(&["Root", "Outer"])));
        assert!(spec.matches_ancestors(&to_stack(&["Outer"])));
        assert!(!spec.matches_ancestors(&to_stack(&["Other"])));
        assert!(!spec.matches_ancestors(&to_stack(&["Outer", "Deeper"])));
        assert!(!spec.matches_ancestors(&[]));
    }

    #[test]
    fn malformed_specs_are_dropped() {
        assert!(RuleSpec::parse("").is_none());
        assert!(RuleSpec::parse("   ").is_none());
        assert!(RuleSpec::parse(":leaf").is_none());
        assert!(RuleSpec::parse("A..b").is_none());
        assert!(RuleSpec::parse("trailing.").is_none());
        // Unclosed character class fails glob compilation.
        assert!(RuleSpec::parse("[abc").is_none());
    }

    #[test]
    fn parse_all_counts_dropped() {
        let raw = vec![
            "Foo".to_string(),
            "".to_string(),
            "Bar*".to_string(),
            "A..b".to_string(),
        ];
        let (specs, dropped) = RuleSpec::parse_all(&raw);
        assert_eq!(specs.len(), 2);
        assert_eq!(dropped, 2);
    }

    #[test]
    fn bare_star_detection() {
        assert!(RuleSpec::parse("*").expect("parse").is_bare_star());
        assert!(!RuleSpec::parse("A*").expect("parse").is_bare_star());
        assert!(!RuleSpec::parse("Outer.*").expect("parse").is_bare_star());
    }
}
