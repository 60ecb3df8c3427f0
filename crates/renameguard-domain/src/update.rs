//! The Matcher/Updater: one pass of protection updates over the tree.
//!
//! The walk keeps a stack of ancestor names. At each node every spec is
//! checked for leaf, ancestor-suffix, and kind agreement. Matches update the
//! protection value subject to explicit-zero gating, and with
//! cascade-prevention active a matched node's subtree is not revisited for
//! the remainder of the pass while sibling branches continue normally.

use crate::node;
use crate::rule::RuleSpec;
use renameguard_types::{Protection, UpdateCounters};
use serde_json::Value;
use std::collections::BTreeSet;

/// One protection update over the tree.
#[derive(Clone, Copy, Debug)]
pub struct UpdateRequest<'a> {
    pub specs: &'a [RuleSpec],
    pub target: Protection,
    /// Global kind allow-list; `None` leaves every kind eligible.
    pub allowed_kinds: Option<&'a BTreeSet<String>>,
    /// Cascade-prevention: a matched node's subtree is skipped this pass and
    /// the node is stamped `no_cascade` for later stages.
    pub lock_children: bool,
    /// Automated-source gating: apply `On` only over an explicit `Off`,
    /// never over `Unset`.
    pub only_when_explicit_off: bool,
}

/// Per-change log entry for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeEntry {
    /// Ancestor names, outermost first.
    pub path: Vec<String>,
    pub name: String,
    pub kind: String,
    pub from: Protection,
    pub to: Protection,
}

#[derive(Clone, Debug, Default)]
pub struct UpdateOutcome {
    pub changed: u32,
    pub already: u32,
    /// Leaf names of specs that matched nothing anywhere in the tree.
    pub missing: Vec<String>,
    pub changes: Vec<ChangeEntry>,
}

impl UpdateOutcome {
    pub fn counters(&self) -> UpdateCounters {
        UpdateCounters {
            changed: self.changed,
            already: self.already,
            missing: self.missing.len() as u32,
        }
    }
}

struct Walk<'a> {
    request: &'a UpdateRequest<'a>,
    stack: Vec<String>,
    spec_matched: Vec<bool>,
    outcome: UpdateOutcome,
}

/// Apply one update pass. The caller is responsible for writing the tree
/// back, and should do so only when `changed > 0`.
pub fn apply_update(nodes: &mut [Value], request: &UpdateRequest<'_>) -> UpdateOutcome {
    let mut walk = Walk {
        request,
        stack: Vec::new(),
        spec_matched: vec![false; request.specs.len()],
        outcome: UpdateOutcome::default(),
    };
    for value in nodes.iter_mut() {
        walk.visit(value);
    }
    for (spec, matched) in request.specs.iter().zip(&walk.spec_matched) {
        if !matched {
            walk.outcome.missing.push(spec.leaf.display().to_string());
        }
    }
    walk.outcome
}

impl Walk<'_> {
    fn visit(&mut self, value: &mut Value) {
        if !value.is_object() {
            return;
        }

        let name = node::name(value).map(str::to_string);
        let kind = node::kind(value).map(str::to_string);

        let mut matched_here = false;
        if let Some(name) = name.as_deref() {
            for (i, spec) in self.request.specs.iter().enumerate() {
                if spec.matches_name(name)
                    && spec.matches_ancestors(&self.stack)
                    && spec.matches_kind(kind.as_deref())
                    && kind_in_allow_list(kind.as_deref(), self.request.allowed_kinds)
                {
                    self.spec_matched[i] = true;
                    matched_here = true;
                }
            }
        }

        if matched_here {
            self.update_node(value, kind.as_deref().unwrap_or_default());
            if self.request.lock_children {
                node::stamp_no_cascade(value);
                // Siblings are the caller's concern; this subtree is done.
                return;
            }
        }

        match name {
            Some(name) => {
                self.stack.push(name);
                self.descend(value);
                self.stack.pop();
            }
            None => self.descend(value),
        }
    }

    fn update_node(&mut self, value: &mut Value, kind: &str) {
        let current = node::protection(value);
        if current == self.request.target {
            self.outcome.already += 1;
            return;
        }
        let gated = self.request.only_when_explicit_off
            && self.request.target == Protection::On
            && current != Protection::Off;
        if gated {
            return;
        }
        node::set_protection(value, self.request.target);
        self.outcome.changed += 1;
        self.outcome.changes.push(ChangeEntry {
            path: self.stack.clone(),
            name: node::name(value).unwrap_or_default().to_string(),
            kind: kind.to_string(),
            from: current,
            to: self.request.target,
        });
    }

    fn descend(&mut self, value: &mut Value) {
        if node::is_wrapped(value) {
            if let Some(inner) = value.get_mut(node::WRAP_FIELD) {
                self.descend_relations(inner);
            }
        }
        self.descend_relations(value);
    }

    fn descend_relations(&mut self, obj: &mut Value) {
        for field in node::RELATION_FIELDS {
            match obj.get_mut(*field) {
                Some(Value::Array(items)) => {
                    for item in items.iter_mut() {
                        self.visit(item);
                    }
                }
                Some(item) if item.is_object() => self.visit(item),
                _ => {}
            }
        }
    }
}

fn kind_in_allow_list(kind: Option<&str>, allowed: Option<&BTreeSet<String>>) -> bool {
    match allowed {
        None => true,
        Some(allowed) => kind.is_some_and(|k| allowed.contains(k)),
    }
}
