use crate::model::{AnalyzerConfig, RenameguardConfigV1};
use anyhow::Context;
use renameguard_domain::policy::Policy;
use renameguard_domain::rule::RuleSpec;

/// CLI overrides. A single policy override applies to both conflict
/// categories.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub policy: Option<String>,
}

/// The effective rule set used by the engine.
#[derive(Clone, Debug)]
pub struct ResolvedRules {
    pub include: Vec<RuleSpec>,
    pub exclude: Vec<RuleSpec>,

    /// Rule strings dropped as malformed (silently, per the rule grammar;
    /// surfaced only as a diagnostic count).
    pub dropped: usize,

    pub include_conflict_policy: Policy,
    pub exclude_candidate_policy: Policy,

    pub analyzer: Option<AnalyzerConfig>,
}

pub fn resolve_rules(
    cfg: RenameguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedRules> {
    let (include, dropped_include) = RuleSpec::parse_all(&cfg.include);
    let (exclude, dropped_exclude) = RuleSpec::parse_all(&cfg.exclude);

    // Precedence per category: CLI override, unified selector, per-category
    // key, then the fail-safe default `ask`.
    let unified = overrides.policy.as_deref().or(cfg.policy.conflict.as_deref());
    let include_conflict_policy = parse_policy(
        unified
            .or(cfg.policy.include_conflict.as_deref())
            .unwrap_or("ask"),
    )
    .context("resolve include-conflict policy")?;
    let exclude_candidate_policy = parse_policy(
        unified
            .or(cfg.policy.exclude_candidate.as_deref())
            .unwrap_or("ask"),
    )
    .context("resolve exclude-candidate policy")?;

    Ok(ResolvedRules {
        include,
        exclude,
        dropped: dropped_include + dropped_exclude,
        include_conflict_policy,
        exclude_candidate_policy,
        analyzer: cfg.analyzer,
    })
}

fn parse_policy(v: &str) -> anyhow::Result<Policy> {
    match v {
        "ask" => Ok(Policy::Ask),
        "force" => Ok(Policy::Force),
        "skip" => Ok(Policy::Skip),
        other => anyhow::bail!("unknown policy: {other} (expected ask|force|skip)"),
    }
}
