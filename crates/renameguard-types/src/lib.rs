//! Stable DTOs and IDs used across the renameguard workspace.
//!
//! This crate is intentionally boring:
//! - the tri-state protection value carried by declaration-tree nodes
//! - data types for the emitted preflight report and audit records
//! - stable string IDs for audit categories and decision sources

#![forbid(unsafe_code)]

pub mod audit;
pub mod ids;
pub mod protection;
pub mod report;

pub use audit::{AuditKind, AuditRecord, SCHEMA_AUDIT_V1};
pub use protection::Protection;
pub use report::{
    Outcome, PreflightData, PreflightReport, ToolMeta, UpdateCounters, SCHEMA_PREFLIGHT_V1,
};
