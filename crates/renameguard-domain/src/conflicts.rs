//! Conflict detection and candidate discovery over name sets.
//!
//! Set logic only consults rule leaves: parent paths scope tree updates, not
//! name-set membership. Literal leaves pass through as-is; wildcard leaves
//! expand against the supplied name set with case-sensitive glob semantics.

use crate::rule::RuleSpec;
use std::collections::BTreeSet;

/// Expand rule leaves against a name set.
pub fn expand_against(specs: &[RuleSpec], names: &BTreeSet<String>) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for spec in specs {
        spec.expand_leaf(names, &mut out);
    }
    out
}

/// Names the include rules want obfuscated that are currently protected.
pub fn detect_conflicts(
    includes: &[RuleSpec],
    protected: &BTreeSet<String>,
) -> BTreeSet<String> {
    expand_against(includes, protected)
        .intersection(protected)
        .cloned()
        .collect()
}

/// Names the exclude rules want protected that exist in the project but are
/// not yet flagged. The project identifier set comes from the external
/// parser's output, not from this engine's tree.
pub fn discover_candidates(
    excludes: &[RuleSpec],
    project_names: &BTreeSet<String>,
    protected: &BTreeSet<String>,
) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for spec in excludes {
        match spec.leaf.is_wildcard() {
            true => spec.expand_leaf(project_names, &mut out),
            false => {
                if project_names.contains(spec.leaf.display()) {
                    out.insert(spec.leaf.display().to_string());
                }
            }
        }
    }
    out.retain(|name| !protected.contains(name));
    out
}

/// Rule collections carrying a bare `*` entry, in presentation order. A bare
/// star matches everything and is surfaced before any policy logic runs.
pub fn bare_star_sections(includes: &[RuleSpec], excludes: &[RuleSpec]) -> Vec<&'static str> {
    let mut out = Vec::new();
    if includes.iter().any(RuleSpec::is_bare_star) {
        out.push("include");
    }
    if excludes.iter().any(RuleSpec::is_bare_star) {
        out.push("exclude");
    }
    out
}
