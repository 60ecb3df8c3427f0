//! Fuzz target for rule-spec parsing and leaf expansion.
//!
//! Goal: Parsing and expansion should **never panic** on any input.
//! Malformed specs are dropped, invalid globs are rejected, but panics are
//! unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_rule_parser
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use renameguard_domain::rule::RuleSpec;
use std::collections::BTreeSet;

/// Structured input so libFuzzer generates meaningful rule/name pairs.
#[derive(Arbitrary, Debug)]
struct RuleInput {
    /// Rule strings (e.g. "kind:Parent.leaf", "Bar*")
    rules: Vec<String>,
    /// Candidate names to expand against
    names: Vec<String>,
}

fuzz_target!(|input: RuleInput| {
    // Limit input size to keep fuzzing fast
    if input.rules.len() > 20 || input.names.len() > 100 {
        return;
    }

    let rules: Vec<String> = input
        .rules
        .into_iter()
        .filter(|r| r.len() <= 256)
        .collect();

    let names: BTreeSet<String> = input
        .names
        .into_iter()
        .filter(|n| n.len() <= 256)
        .collect();

    let (specs, _dropped) = RuleSpec::parse_all(&rules);

    let mut expanded = BTreeSet::new();
    for spec in &specs {
        spec.expand_leaf(&names, &mut expanded);
        for name in &names {
            let _ = spec.matches_name(name);
        }
    }
});
