//! Rule configuration parsing and policy resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration
//! provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{AnalyzerConfig, PolicyConfig, RenameguardConfigV1};
pub use resolve::{resolve_rules, Overrides, ResolvedRules};

/// Parse `renameguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<RenameguardConfigV1> {
    let cfg: RenameguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}
