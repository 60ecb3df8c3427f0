use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for the preflight report.
pub const SCHEMA_PREFLIGHT_V1: &str = "renameguard.preflight.v1";

/// How the run ended. `Aborted` is the fail-closed path: an indeterminate
/// protection state must never reach the rename stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Completed,
    Aborted,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Counters from the Matcher/Updater, summed over every pass of a run.
///
/// The three counts are disjoint per pass: nodes whose value flipped, nodes
/// already at the target value, and rule leaves that matched nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UpdateCounters {
    pub changed: u32,
    pub already: u32,
    pub missing: u32,
}

impl UpdateCounters {
    pub fn absorb(&mut self, other: UpdateCounters) {
        self.changed += other.changed;
        self.already += other.already;
        self.missing += other.missing;
    }
}

/// Renameguard-specific summary payload for the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct PreflightData {
    pub tree_path: String,

    /// The document could not be used; the run completed with nothing
    /// protected (visible degraded state, not a failure).
    pub tree_malformed: bool,

    pub names_indexed: u32,
    pub protected_indexed: u32,

    pub conflicts_found: u32,
    pub conflicts_applied: u32,
    pub candidates_found: u32,
    pub candidates_applied: u32,

    /// Names contributed by the external analyzer, when configured.
    pub analyzer_names: u32,

    /// Rule strings dropped as malformed.
    pub dropped_rules: u32,

    pub counters: UpdateCounters,

    /// Sample of rule leaves that matched nothing anywhere in the tree.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_sample: Vec<String>,

    /// Human-readable degradation notes (analyzer unavailable, skipped
    /// stages, …). Diagnostics, never control flow.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted_reason: Option<String>,
}

/// The preflight report envelope written at the end of every run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PreflightReport {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub outcome: Outcome,
    pub data: PreflightData,
}
