//! The preflight use case: reconcile analysis results, user rules, and
//! conflict policies into a deterministic protection state.
//!
//! Pipeline order: load tree -> analyzer pass -> fresh indexes -> bare-`*`
//! gate -> include-conflict stage -> exclude-candidate stage -> write-back.
//! Audit records bracket every resolution: the pending record is written
//! before any confirmation is solicited, the approved/skipped record after.

use crate::{analyzer, audit};
use anyhow::Context;
use camino::Utf8Path;
use renameguard_domain::conflicts;
use renameguard_domain::index::NameIndex;
use renameguard_domain::policy::{self, Confirm, Resolution};
use renameguard_domain::rule::RuleSpec;
use renameguard_domain::update::{apply_update, UpdateOutcome, UpdateRequest};
use renameguard_tree::LoadOutcome;
use renameguard_types::{
    ids, AuditKind, Outcome, PreflightData, PreflightReport, Protection, ToolMeta,
    SCHEMA_PREFLIGHT_V1,
};
use std::collections::BTreeSet;
use time::OffsetDateTime;

const SAMPLE_LIMIT: usize = 10;

/// Input for the preflight use case.
#[derive(Clone, Debug)]
pub struct PreflightInput<'a> {
    /// Declaration-tree document (mutated in place on success).
    pub tree_path: &'a Utf8Path,
    /// Config file contents (empty string if not found; defaults apply).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: renameguard_settings::Overrides,
    /// Project identifier set from the external parser stage; `None` skips
    /// exclude-candidate discovery.
    pub project_identifiers: Option<BTreeSet<String>>,
    /// Where audit records are written.
    pub audit_dir: &'a Utf8Path,
}

/// Run the preflight use case. Policy aborts are reported through
/// `Outcome::Aborted` in the returned report; `Err` is reserved for runtime
/// failures (unresolvable config, tree write-back).
pub fn run_preflight(
    input: PreflightInput<'_>,
    confirm: &mut dyn Confirm,
) -> anyhow::Result<PreflightReport> {
    let started_at = OffsetDateTime::now_utc();

    let cfg = if input.config_text.trim().is_empty() {
        renameguard_settings::RenameguardConfigV1::default()
    } else {
        renameguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let rules = renameguard_settings::resolve_rules(cfg, input.overrides.clone())
        .context("resolve rules")?;

    let mut data = PreflightData {
        tree_path: input.tree_path.to_string(),
        dropped_rules: rules.dropped as u32,
        ..Default::default()
    };

    let mut tree = match renameguard_tree::load_tree(input.tree_path) {
        LoadOutcome::Tree(tree) => tree,
        LoadOutcome::Malformed { reason } => {
            data.tree_malformed = true;
            data.notes.push(format!(
                "declaration tree unusable ({reason}); continuing with nothing protected"
            ));
            return Ok(finish(started_at, Outcome::Completed, data));
        }
    };

    // Analyzer pass: automated source, so transitions are gated on an
    // explicit 0 and failures degrade to "no additional candidates".
    if let Some(analyzer_cfg) = &rules.analyzer {
        match analyzer::run_analyzer(analyzer_cfg) {
            Ok(names) if names.is_empty() => {}
            Ok(names) => {
                data.analyzer_names = names.len() as u32;
                let specs = RuleSpec::literals(&names);
                let outcome = apply_update(
                    &mut tree.nodes,
                    &UpdateRequest {
                        specs: &specs,
                        target: Protection::On,
                        allowed_kinds: None,
                        lock_children: false,
                        only_when_explicit_off: true,
                    },
                );
                absorb(&mut data, &outcome);
            }
            Err(err) => data.notes.push(format!(
                "analyzer unavailable ({err:#}); continuing without additional candidates"
            )),
        }
    }

    // Indexes are rebuilt fresh on every invocation.
    let index = NameIndex::build(&tree.nodes);
    data.names_indexed = index.all.len() as u32;
    data.protected_indexed = index.protected.len() as u32;

    // A bare `*` matches everything; surface it before any policy logic.
    let star_sections = conflicts::bare_star_sections(&rules.include, &rules.exclude);
    if !star_sections.is_empty() {
        let prompt = format!(
            "A bare '*' rule is present in: {}. It applies to every identifier.\nContinue? [y/N]",
            star_sections.join(", ")
        );
        match confirm.confirm(&prompt) {
            Ok(true) => {}
            Ok(false) => {
                return Ok(abort(started_at, data, "bare '*' rule declined by user"));
            }
            Err(err) => return Ok(abort(started_at, data, &err.to_string())),
        }
    }

    // Include-vs-protected conflicts.
    let conflict_set = conflicts::detect_conflicts(&rules.include, &index.protected);
    data.conflicts_found = conflict_set.len() as u32;
    if !conflict_set.is_empty() {
        let policy = rules.include_conflict_policy;
        audit::write_audit_record(
            input.audit_dir,
            &audit::pending_record(
                ids::CATEGORY_INCLUDE_CONFLICT,
                policy.as_str(),
                &conflict_set,
                input.tree_path,
            ),
        )
        .context("write pending audit record")?;

        let prompt = format!(
            "The include rules conflict with currently protected identifiers.\n  \
             - {} conflicting (e.g. {})\nObfuscate these identifiers anyway? [y/N]",
            conflict_set.len(),
            sample(&conflict_set)
        );
        match policy::resolve(policy, &conflict_set, &prompt, confirm) {
            Resolution::Apply { names, source } => {
                let specs = RuleSpec::literals(&names);
                let callable = policy::callable_kinds();
                let outcome = apply_update(
                    &mut tree.nodes,
                    &UpdateRequest {
                        specs: &specs,
                        target: Protection::Off,
                        allowed_kinds: Some(&callable),
                        lock_children: true,
                        only_when_explicit_off: false,
                    },
                );
                absorb(&mut data, &outcome);
                data.conflicts_applied = names.len() as u32;
                audit::write_audit_record(
                    input.audit_dir,
                    &audit::new_record(
                        AuditKind::Approved,
                        ids::CATEGORY_INCLUDE_CONFLICT,
                        policy.as_str(),
                        &names,
                        source,
                        input.tree_path,
                    ),
                )
                .context("write approved audit record")?;
            }
            Resolution::Skipped => {
                audit::write_audit_record(
                    input.audit_dir,
                    &audit::new_record(
                        AuditKind::Skipped,
                        ids::CATEGORY_INCLUDE_CONFLICT,
                        policy.as_str(),
                        &conflict_set,
                        ids::SOURCE_POLICY_SKIP,
                        input.tree_path,
                    ),
                )
                .context("write skipped audit record")?;
                data.notes
                    .push("include conflicts left in place by policy".to_string());
            }
            Resolution::Aborted { reason } => return Ok(abort(started_at, data, &reason)),
        }
    }

    // Exclude candidates: names the exclude rules want protected that exist
    // in the project but are not yet flagged.
    match &input.project_identifiers {
        None => data.notes.push(
            "no project identifier list; skipping exclude-candidate discovery".to_string(),
        ),
        Some(project_names) => {
            let candidates =
                conflicts::discover_candidates(&rules.exclude, project_names, &index.protected);
            data.candidates_found = candidates.len() as u32;
            if !candidates.is_empty() {
                let policy = rules.exclude_candidate_policy;
                audit::write_audit_record(
                    input.audit_dir,
                    &audit::pending_record(
                        ids::CATEGORY_EXCLUDE_CANDIDATE,
                        policy.as_str(),
                        &candidates,
                        input.tree_path,
                    ),
                )
                .context("write pending audit record")?;

                let prompt = format!(
                    "{} identifiers are named by exclude rules but not yet protected \
                     (e.g. {}).\nProtect them all from obfuscation? [y/N]",
                    candidates.len(),
                    sample(&candidates)
                );
                match policy::resolve(policy, &candidates, &prompt, confirm) {
                    Resolution::Apply { names, source } => {
                        let specs = RuleSpec::literals(&names);
                        let outcome = apply_update(
                            &mut tree.nodes,
                            &UpdateRequest {
                                specs: &specs,
                                target: Protection::On,
                                allowed_kinds: None,
                                lock_children: false,
                                only_when_explicit_off: false,
                            },
                        );
                        absorb(&mut data, &outcome);
                        data.candidates_applied = names.len() as u32;
                        audit::write_audit_record(
                            input.audit_dir,
                            &audit::new_record(
                                AuditKind::Approved,
                                ids::CATEGORY_EXCLUDE_CANDIDATE,
                                policy.as_str(),
                                &names,
                                source,
                                input.tree_path,
                            ),
                        )
                        .context("write approved audit record")?;
                    }
                    Resolution::Skipped => {
                        audit::write_audit_record(
                            input.audit_dir,
                            &audit::new_record(
                                AuditKind::Skipped,
                                ids::CATEGORY_EXCLUDE_CANDIDATE,
                                policy.as_str(),
                                &candidates,
                                ids::SOURCE_POLICY_SKIP,
                                input.tree_path,
                            ),
                        )
                        .context("write skipped audit record")?;
                        data.notes
                            .push("exclude candidates left unprotected by policy".to_string());
                    }
                    Resolution::Aborted { reason } => {
                        return Ok(abort(started_at, data, &reason));
                    }
                }
            }
        }
    }

    // Write the tree back only when at least one node actually flipped.
    if data.counters.changed > 0 {
        renameguard_tree::save_tree(input.tree_path, &tree)
            .context("write declaration tree")?;
    }

    Ok(finish(started_at, Outcome::Completed, data))
}

/// Map outcome to exit code: 0 = completed, 2 = aborted (fail-closed).
pub fn outcome_exit_code(outcome: Outcome) -> i32 {
    match outcome {
        Outcome::Completed => 0,
        Outcome::Aborted => 2,
    }
}

fn absorb(data: &mut PreflightData, outcome: &UpdateOutcome) {
    data.counters.absorb(outcome.counters());
    for leaf in &outcome.missing {
        if data.missing_sample.len() >= SAMPLE_LIMIT {
            break;
        }
        data.missing_sample.push(leaf.clone());
    }
}

fn sample(names: &BTreeSet<String>) -> String {
    let shown: Vec<&str> = names.iter().take(SAMPLE_LIMIT).map(String::as_str).collect();
    let suffix = if names.len() > SAMPLE_LIMIT { ", ..." } else { "" };
    format!("{}{suffix}", shown.join(", "))
}

fn abort(started_at: OffsetDateTime, mut data: PreflightData, reason: &str) -> PreflightReport {
    data.aborted_reason = Some(reason.to_string());
    finish(started_at, Outcome::Aborted, data)
}

fn finish(started_at: OffsetDateTime, outcome: Outcome, data: PreflightData) -> PreflightReport {
    PreflightReport {
        schema: SCHEMA_PREFLIGHT_V1.to_string(),
        tool: ToolMeta {
            name: "renameguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        outcome,
        data,
    }
}
