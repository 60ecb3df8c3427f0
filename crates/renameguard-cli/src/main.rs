//! CLI entry point for renameguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and
//! exit codes. All business logic lives in the `renameguard-app` crate.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use renameguard_app::{outcome_exit_code, run_preflight, PreflightInput};
use renameguard_domain::policy::{Confirm, ConfirmError};
use renameguard_settings::Overrides;
use renameguard_types::PreflightReport;
use std::io::{BufRead, Write};

#[derive(Parser, Debug)]
#[command(
    name = "renameguard",
    version,
    about = "Protection preflight sensor for identifier-obfuscation pipelines"
)]
struct Cli {
    /// Declaration-tree document produced by the parser stage.
    #[arg(long, default_value = "artifacts/ast/declarations.json")]
    tree: Utf8PathBuf,

    /// Path to renameguard config TOML.
    #[arg(long, default_value = "renameguard.toml")]
    config: Utf8PathBuf,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile rules against the tree, write it back, and emit audit
    /// records plus a preflight report.
    Preflight {
        /// Project identifier list from the parser stage (one name per line).
        #[arg(long)]
        identifiers: Option<Utf8PathBuf>,

        /// Override both conflict policies (ask|force|skip).
        #[arg(long)]
        policy: Option<String>,

        /// Answer yes to every confirmation (non-interactive runs).
        #[arg(long)]
        assume_yes: bool,

        /// Where audit records are written.
        #[arg(long, default_value = "artifacts/renameguard/audit")]
        audit_dir: Utf8PathBuf,

        /// Where to write the JSON preflight report.
        #[arg(long, default_value = "artifacts/renameguard/preflight.json")]
        report_out: Utf8PathBuf,
    },

    /// Print the name index (all names and protected names) for the tree.
    DumpIndex,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Preflight {
            ref identifiers,
            ref policy,
            assume_yes,
            ref audit_dir,
            ref report_out,
        } => cmd_preflight(
            &cli,
            identifiers.clone(),
            policy.clone(),
            assume_yes,
            audit_dir.clone(),
            report_out.clone(),
        ),
        Commands::DumpIndex => cmd_dump_index(&cli),
    }
}

fn cmd_preflight(
    cli: &Cli,
    identifiers: Option<Utf8PathBuf>,
    policy: Option<String>,
    assume_yes: bool,
    audit_dir: Utf8PathBuf,
    report_out: Utf8PathBuf,
) -> anyhow::Result<()> {
    // Missing config is allowed; defaults apply.
    let config_text = std::fs::read_to_string(&cli.config).unwrap_or_default();

    let project_identifiers = match identifiers {
        Some(path) => Some(renameguard_tree::read_identifier_list(&path)?),
        None => None,
    };

    let mut confirm: Box<dyn Confirm> = if assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    };

    let input = PreflightInput {
        tree_path: &cli.tree,
        config_text: &config_text,
        overrides: Overrides { policy },
        project_identifiers,
        audit_dir: &audit_dir,
    };

    let report = run_preflight(input, confirm.as_mut())?;

    write_report_file(&report_out, &report).context("write preflight report")?;

    if report.data.dropped_rules > 0 {
        eprintln!(
            "renameguard: {} malformed rule string(s) dropped",
            report.data.dropped_rules
        );
    }
    for note in &report.data.notes {
        eprintln!("renameguard: {note}");
    }
    if let Some(reason) = &report.data.aborted_reason {
        eprintln!("renameguard: aborted: {reason}");
    }

    let code = outcome_exit_code(report.outcome);
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn cmd_dump_index(cli: &Cli) -> anyhow::Result<()> {
    let tree = match renameguard_tree::load_tree(&cli.tree) {
        renameguard_tree::LoadOutcome::Tree(tree) => tree,
        renameguard_tree::LoadOutcome::Malformed { reason } => {
            eprintln!("renameguard: declaration tree unusable: {reason}");
            return Ok(());
        }
    };
    let index = renameguard_domain::NameIndex::build(&tree.nodes);

    println!("names: {}", index.all.len());
    for name in &index.all {
        let marker = if index.protected.contains(name) {
            " [protected]"
        } else {
            ""
        };
        println!("  {name}{marker}");
    }
    Ok(())
}

fn write_report_file(path: &camino::Utf8Path, report: &PreflightReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    let mut data = serde_json::to_string_pretty(report).context("serialize report")?;
    data.push('\n');
    std::fs::write(path, data).with_context(|| format!("write report: {path}"))?;
    Ok(())
}

/// Interactive confirmation over stdin. Blocks until a line arrives; EOF and
/// interruption surface as channel failures so the engine can fail closed.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool, ConfirmError> {
        eprint!("{prompt} ");
        let _ = std::io::stderr().flush();
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) => Err(ConfirmError::EndOfInput),
            Ok(_) => {
                let answer = line.trim().to_ascii_lowercase();
                Ok(answer == "y" || answer == "yes")
            }
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {
                Err(ConfirmError::Interrupted)
            }
            Err(_) => Err(ConfirmError::EndOfInput),
        }
    }
}

/// Non-interactive runs: every confirmation is approved up front.
struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> Result<bool, ConfirmError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use renameguard_types::Outcome;

    #[test]
    fn exit_codes_map_outcomes() {
        assert_eq!(outcome_exit_code(Outcome::Completed), 0);
        assert_eq!(outcome_exit_code(Outcome::Aborted), 2);
    }
}
