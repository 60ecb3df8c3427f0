use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for audit records.
pub const SCHEMA_AUDIT_V1: &str = "renameguard.audit.v1";

/// Where in the confirmation lifecycle a record was written.
///
/// `Pending` is written before any resolution and holds the full candidate
/// set that was considered; `Approved` and `Skipped` are written after and
/// hold the outcome. The pending record is the ground truth for what a run
/// looked at regardless of how it ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuditKind {
    Pending,
    Approved,
    Skipped,
}

impl AuditKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditKind::Pending => "pending",
            AuditKind::Approved => "approved",
            AuditKind::Skipped => "skipped",
        }
    }
}

/// One append-only audit record. Never read back by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AuditRecord {
    /// Versioned schema identifier (`renameguard.audit.v1`).
    pub schema: String,
    pub kind: AuditKind,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Conflict category (`include_conflict` or `exclude_candidate`).
    pub category: String,
    /// Policy active when the record was written (`ask`, `force`, `skip`).
    pub policy: String,
    /// Candidate names, sorted.
    pub candidates: Vec<String>,
    /// What produced this record (`preflight`, `policy:force`,
    /// `user:confirmation`, `policy:skip`).
    pub source: String,
    /// Declaration-tree document the run was operating on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree_path: Option<String>,
}
