//! End-to-end preflight tests over temp-dir fixtures.

use camino::{Utf8Path, Utf8PathBuf};
use renameguard_app::{outcome_exit_code, run_preflight, PreflightInput};
use renameguard_domain::policy::{Confirm, ConfirmError};
use renameguard_settings::Overrides;
use renameguard_types::{AuditRecord, Outcome};
use serde_json::Value;
use std::collections::BTreeSet;
use tempfile::TempDir;

struct Scripted(Vec<Result<bool, ConfirmError>>);

impl Confirm for Scripted {
    fn confirm(&mut self, _prompt: &str) -> Result<bool, ConfirmError> {
        assert!(!self.0.is_empty(), "unexpected confirmation prompt");
        self.0.remove(0)
    }
}

struct Fixture {
    _tmp: TempDir,
    root: Utf8PathBuf,
    tree_path: Utf8PathBuf,
    audit_dir: Utf8PathBuf,
}

fn fixture(tree: &Value) -> Fixture {
    let tmp = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path");
    let tree_path = root.join("declarations.json");
    std::fs::write(&tree_path, serde_json::to_string_pretty(tree).expect("fixture json"))
        .expect("write tree fixture");
    let audit_dir = root.join("audit");
    Fixture {
        _tmp: tmp,
        root,
        tree_path,
        audit_dir,
    }
}

fn sample_tree() -> Value {
    serde_json::json!([
        {
            "name": "Session",
            "kind": "class",
            "protected": 1,
            "members": [
                {"name": "Foo", "kind": "function", "protected": 1},
                {"name": "Barista", "kind": "property", "protected": 1},
                {"name": "refresh", "kind": "function"}
            ]
        },
        {"name": "Qux", "kind": "struct", "protected": 1}
    ])
}

fn load_tree(path: &Utf8Path) -> Value {
    let text = std::fs::read_to_string(path).expect("read tree");
    serde_json::from_str(&text).expect("parse tree")
}

fn audit_records(dir: &Utf8Path) -> Vec<AuditRecord> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut records: Vec<AuditRecord> = entries
        .map(|e| e.expect("dir entry").path())
        .map(|p| {
            let text = std::fs::read_to_string(&p).expect("read audit record");
            serde_json::from_str(&text).expect("parse audit record")
        })
        .collect();
    records.sort_by(|a, b| (a.kind.as_str(), &a.category).cmp(&(b.kind.as_str(), &b.category)));
    records
}

fn input<'a>(fx: &'a Fixture, config_text: &'a str) -> PreflightInput<'a> {
    PreflightInput {
        tree_path: &fx.tree_path,
        config_text,
        overrides: Overrides::default(),
        project_identifiers: None,
        audit_dir: &fx.audit_dir,
    }
}

#[test]
fn force_policy_lifts_protection_from_callables_only() {
    let fx = fixture(&sample_tree());
    let config = r#"
include = ["Foo", "Bar*"]

[policy]
conflict = "force"
"#;
    let mut confirm = Scripted(vec![]);
    let report = run_preflight(input(&fx, config), &mut confirm).expect("preflight");

    assert_eq!(report.outcome, Outcome::Completed);
    assert_eq!(report.data.conflicts_found, 2);

    let tree = load_tree(&fx.tree_path);
    // Foo is callable: protection lifted, subtree locked.
    assert_eq!(tree[0]["members"][0]["protected"], 0);
    assert_eq!(tree[0]["members"][0]["no_cascade"], true);
    // Barista is a property: untouched, reported via the missing sample.
    assert_eq!(tree[0]["members"][1]["protected"], 1);
    assert!(report
        .data
        .missing_sample
        .contains(&"Barista".to_string()));

    let records = audit_records(&fx.audit_dir);
    assert_eq!(records.len(), 2);
    let approved = &records[0];
    let pending = &records[1];
    assert_eq!(pending.kind.as_str(), "pending");
    assert_eq!(approved.kind.as_str(), "approved");
    assert_eq!(approved.source, "policy:force");
    // The pending record is a superset (by name) of the approved record.
    let pending_names: BTreeSet<_> = pending.candidates.iter().collect();
    let approved_names: BTreeSet<_> = approved.candidates.iter().collect();
    assert!(pending_names.is_superset(&approved_names));
}

#[test]
fn ask_decline_aborts_without_touching_the_tree() {
    let fx = fixture(&sample_tree());
    let config = "include = [\"Foo\"]\n";
    let mut confirm = Scripted(vec![Ok(false)]);
    let report = run_preflight(input(&fx, config), &mut confirm).expect("preflight");

    assert_eq!(report.outcome, Outcome::Aborted);
    assert_eq!(outcome_exit_code(report.outcome), 2);
    assert!(report.data.aborted_reason.is_some());

    // Fail-closed: the tree document is byte-identical to the fixture.
    let tree = load_tree(&fx.tree_path);
    assert_eq!(tree[0]["members"][0]["protected"], 1);

    // The pending record was still written before the prompt.
    let records = audit_records(&fx.audit_dir);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind.as_str(), "pending");
}

#[test]
fn ask_end_of_input_aborts() {
    let fx = fixture(&sample_tree());
    let config = "include = [\"Foo\"]\n";
    let mut confirm = Scripted(vec![Err(ConfirmError::EndOfInput)]);
    let report = run_preflight(input(&fx, config), &mut confirm).expect("preflight");
    assert_eq!(report.outcome, Outcome::Aborted);
}

#[test]
fn skip_policy_records_the_conflict_and_leaves_the_tree() {
    let fx = fixture(&sample_tree());
    let config = r#"
include = ["Foo"]

[policy]
conflict = "skip"
"#;
    let mut confirm = Scripted(vec![]);
    let report = run_preflight(input(&fx, config), &mut confirm).expect("preflight");

    assert_eq!(report.outcome, Outcome::Completed);
    let tree = load_tree(&fx.tree_path);
    assert_eq!(tree[0]["members"][0]["protected"], 1);

    let records = audit_records(&fx.audit_dir);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].kind.as_str(), "pending");
    assert_eq!(records[1].kind.as_str(), "skipped");
    assert_eq!(records[1].source, "policy:skip");
}

#[test]
fn approved_exclude_candidates_become_protected() {
    let fx = fixture(&sample_tree());
    let config = "exclude = [\"refresh\", \"ghost\"]\n";
    let project: BTreeSet<String> = ["refresh", "Qux", "other"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut confirm = Scripted(vec![Ok(true)]);
    let mut inp = input(&fx, config);
    inp.project_identifiers = Some(project);
    let report = run_preflight(inp, &mut confirm).expect("preflight");

    assert_eq!(report.outcome, Outcome::Completed);
    // `ghost` is not a project identifier, so only `refresh` is a candidate.
    assert_eq!(report.data.candidates_found, 1);
    assert_eq!(report.data.candidates_applied, 1);

    let tree = load_tree(&fx.tree_path);
    assert_eq!(tree[0]["members"][2]["protected"], 1);
    // Exclude application never locks subtrees.
    assert!(tree[0]["members"][2].get("no_cascade").is_none());

    let records = audit_records(&fx.audit_dir);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].kind.as_str(), "approved");
    assert_eq!(records[0].source, "user:confirmation");
    assert_eq!(records[0].category, "exclude_candidate");
}

#[test]
fn bare_star_rule_requires_confirmation_before_policy_logic() {
    let fx = fixture(&sample_tree());
    let config = r#"
exclude = ["*"]

[policy]
conflict = "force"
"#;
    // Even under policy=force the bare star is surfaced first.
    let mut confirm = Scripted(vec![Ok(false)]);
    let report = run_preflight(input(&fx, config), &mut confirm).expect("preflight");

    assert_eq!(report.outcome, Outcome::Aborted);
    assert!(audit_records(&fx.audit_dir).is_empty());
}

#[test]
fn malformed_tree_degrades_to_empty_completed_run() {
    let tmp = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path");
    let tree_path = root.join("declarations.json");
    std::fs::write(&tree_path, "{\"not\": \"a list\"}").expect("write fixture");
    let audit_dir = root.join("audit");

    let inp = PreflightInput {
        tree_path: &tree_path,
        config_text: "include = [\"Foo\"]\n",
        overrides: Overrides::default(),
        project_identifiers: None,
        audit_dir: &audit_dir,
    };
    let mut confirm = Scripted(vec![]);
    let report = run_preflight(inp, &mut confirm).expect("preflight");

    assert_eq!(report.outcome, Outcome::Completed);
    assert!(report.data.tree_malformed);
    assert_eq!(report.data.conflicts_found, 0);
    assert!(!report.data.notes.is_empty());
}

#[test]
fn second_run_with_same_decisions_changes_nothing() {
    let fx = fixture(&sample_tree());
    let config = r#"
include = ["Foo"]

[policy]
conflict = "force"
"#;
    let mut confirm = Scripted(vec![]);
    let first = run_preflight(input(&fx, config), &mut confirm).expect("first run");
    assert_eq!(first.data.counters.changed, 1);

    let mut confirm = Scripted(vec![]);
    let second = run_preflight(input(&fx, config), &mut confirm).expect("second run");
    // Foo is no longer protected, so there is no conflict to resolve.
    assert_eq!(second.data.conflicts_found, 0);
    assert_eq!(second.data.counters.changed, 0);
}

#[test]
fn analyzer_names_apply_only_over_explicit_zero() {
    let fx = fixture(&serde_json::json!([
        {"name": "gated", "kind": "variable", "protected": 0},
        {"name": "untouched", "kind": "variable"}
    ]));
    let exclusions = fx.root.join("exclusions.txt");
    let config = format!(
        "[analyzer]\ncommand = \"printf 'gated\\\\nuntouched\\\\n' > {exclusions}\"\noutput = \"{exclusions}\"\n"
    );

    let mut confirm = Scripted(vec![]);
    let report = run_preflight(input(&fx, &config), &mut confirm).expect("preflight");

    assert_eq!(report.outcome, Outcome::Completed);
    assert_eq!(report.data.analyzer_names, 2);
    assert_eq!(report.data.counters.changed, 1);

    let tree = load_tree(&fx.tree_path);
    assert_eq!(tree[0]["protected"], 1);
    assert!(tree[1].get("protected").is_none());
}

#[test]
fn analyzer_failure_degrades_gracefully() {
    let fx = fixture(&sample_tree());
    let config = "[analyzer]\ncommand = \"exit 7\"\noutput = \"unused.txt\"\n";

    let mut confirm = Scripted(vec![]);
    let report = run_preflight(input(&fx, config), &mut confirm).expect("preflight");

    assert_eq!(report.outcome, Outcome::Completed);
    assert!(report
        .data
        .notes
        .iter()
        .any(|n| n.contains("analyzer unavailable")));
}
