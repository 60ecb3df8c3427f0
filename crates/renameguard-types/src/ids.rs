//! Stable identifiers for audit categories and decision sources.
//!
//! `category` names the conflict class a record belongs to. `source` names
//! what produced the decision, so a tree state can be reconstructed from the
//! audit trail alone.

// Conflict categories
pub const CATEGORY_INCLUDE_CONFLICT: &str = "include_conflict";
pub const CATEGORY_EXCLUDE_CANDIDATE: &str = "exclude_candidate";

// Decision sources
pub const SOURCE_PREFLIGHT: &str = "preflight";
pub const SOURCE_POLICY_FORCE: &str = "policy:force";
pub const SOURCE_POLICY_SKIP: &str = "policy:skip";
pub const SOURCE_USER_CONFIRMATION: &str = "user:confirmation";

// Policy selector values (kept as strings in records for forward compat)
pub const POLICY_ASK: &str = "ask";
pub const POLICY_FORCE: &str = "force";
pub const POLICY_SKIP: &str = "skip";
