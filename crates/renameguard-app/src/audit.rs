//! Audit persistence: append-only JSON records, never read back.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use renameguard_types::{ids, AuditKind, AuditRecord, SCHEMA_AUDIT_V1};
use std::collections::BTreeSet;
use time::macros::format_description;
use time::OffsetDateTime;

/// Write one record as `{kind}_{category}_{timestamp}.json` under the audit
/// directory.
pub fn write_audit_record(dir: &Utf8Path, record: &AuditRecord) -> anyhow::Result<Utf8PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("create audit directory {dir}"))?;

    let stamp = record
        .timestamp
        .format(format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))
        .context("format audit timestamp")?;
    let path = dir.join(format!(
        "{}_{}_{stamp}.json",
        record.kind.as_str(),
        record.category
    ));

    let mut data = serde_json::to_string_pretty(record).context("serialize audit record")?;
    data.push('\n');
    std::fs::write(&path, data).with_context(|| format!("write audit record {path}"))?;
    Ok(path)
}

pub fn new_record(
    kind: AuditKind,
    category: &str,
    policy: &str,
    candidates: &BTreeSet<String>,
    source: &str,
    tree_path: &Utf8Path,
) -> AuditRecord {
    AuditRecord {
        schema: SCHEMA_AUDIT_V1.to_string(),
        kind,
        timestamp: OffsetDateTime::now_utc(),
        category: category.to_string(),
        policy: policy.to_string(),
        candidates: candidates.iter().cloned().collect(),
        source: source.to_string(),
        tree_path: Some(tree_path.to_string()),
    }
}

pub fn pending_record(
    category: &str,
    policy: &str,
    candidates: &BTreeSet<String>,
    tree_path: &Utf8Path,
) -> AuditRecord {
    new_record(
        AuditKind::Pending,
        category,
        policy,
        candidates,
        ids::SOURCE_PREFLIGHT,
        tree_path,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    #[test]
    fn writes_one_file_per_record() {
        let tmp = TempDir::new().expect("temp dir");
        let dir = utf8_root(&tmp).join("audit");

        let candidates: BTreeSet<String> = ["Foo".to_string()].into_iter().collect();
        let record = pending_record(
            ids::CATEGORY_INCLUDE_CONFLICT,
            ids::POLICY_ASK,
            &candidates,
            Utf8Path::new("declarations.json"),
        );
        let path = write_audit_record(&dir, &record).expect("write record");

        assert!(path.as_str().contains("pending_include_conflict_"));
        let text = std::fs::read_to_string(&path).expect("read record");
        let back: AuditRecord = serde_json::from_str(&text).expect("parse record");
        assert_eq!(back.kind, AuditKind::Pending);
        assert_eq!(back.candidates, vec!["Foo".to_string()]);
    }
}
