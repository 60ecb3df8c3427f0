use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `renameguard.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so
/// forward-compat is easy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RenameguardConfigV1 {
    /// Optional schema string for tooling (`renameguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Rules naming identifiers that must be obfuscated, even when analysis
    /// marked them protected.
    #[serde(default)]
    pub include: Vec<String>,

    /// Rules naming identifiers that must be protected from obfuscation.
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub policy: PolicyConfig,

    /// Optional external sensitivity analyzer, run before conflict checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<AnalyzerConfig>,
}

/// Conflict policies, selected independently per conflict category.
/// `conflict` is the unified selector and wins over the per-category keys
/// when both are present.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_conflict: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_candidate: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzerConfig {
    /// Shell command to run. Failure or timeout degrades to "no additional
    /// candidates", never an engine failure.
    pub command: String,

    /// File the analyzer writes its protection names into (one per line).
    pub output: String,

    /// Kill the analyzer after this many seconds.
    #[serde(default = "default_analyzer_timeout")]
    pub timeout_secs: u64,
}

fn default_analyzer_timeout() -> u64 {
    60
}
