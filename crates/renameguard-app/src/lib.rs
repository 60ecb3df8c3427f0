//! Use case orchestration for renameguard.
//!
//! This crate provides the application layer: the preflight use case that
//! coordinates the tree, domain, and settings layers, plus audit persistence
//! and the external analyzer bridge. It is intentionally thin and delegates
//! heavy lifting to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod analyzer;
mod audit;
mod preflight;

pub use analyzer::run_analyzer;
pub use audit::write_audit_record;
pub use preflight::{outcome_exit_code, run_preflight, PreflightInput};
