//! External analyzer bridge.
//!
//! The analyzer is an optional, blocking subprocess with a finite timeout.
//! Every failure mode here (spawn failure, non-zero exit, timeout, missing
//! or unreadable output) is recovered by the caller as "no additional
//! candidates" — the engine never fails because an analyzer did.

use anyhow::Context;
use camino::Utf8Path;
use renameguard_settings::AnalyzerConfig;
use std::collections::BTreeSet;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Run the configured analyzer and read the protection names it produced.
pub fn run_analyzer(cfg: &AnalyzerConfig) -> anyhow::Result<BTreeSet<String>> {
    let mut child = Command::new("sh")
        .arg("-c")
        .arg(&cfg.command)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("spawn analyzer: {}", cfg.command))?;

    let deadline = Instant::now() + Duration::from_secs(cfg.timeout_secs);
    let status = loop {
        match child.try_wait().context("wait for analyzer")? {
            Some(status) => break status,
            None if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                anyhow::bail!("analyzer timed out after {}s", cfg.timeout_secs);
            }
            None => std::thread::sleep(Duration::from_millis(50)),
        }
    };

    if !status.success() {
        anyhow::bail!("analyzer exited with {status}");
    }

    renameguard_tree::read_identifier_list(Utf8Path::new(&cfg.output))
        .context("read analyzer output")
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
    fn reads_names_from_analyzer_output() {
        let tmp = TempDir::new().expect("temp dir");
        let out = utf8_root(&tmp).join("exclusions.txt");

        let cfg = AnalyzerConfig {
            command: format!("printf 'secretKey\\n# comment\\napiToken\\n' > {out}"),
            output: out.to_string(),
            timeout_secs: 10,
        };
        let names = run_analyzer(&cfg).expect("analyzer run");
        assert_eq!(names.len(), 2);
        assert!(names.contains("secretKey"));
        assert!(names.contains("apiToken"));
    }

    #[test]
    fn nonzero_exit_is_an_error() {
        let cfg = AnalyzerConfig {
            command: "exit 3".to_string(),
            output: "unused.txt".to_string(),
            timeout_secs: 10,
        };
        assert!(run_analyzer(&cfg).is_err());
    }

    #[test]
    fn timeout_kills_the_analyzer() {
        let cfg = AnalyzerConfig {
            command: "sleep 30".to_string(),
            output: "unused.txt".to_string(),
            timeout_secs: 1,
        };
        let err = run_analyzer(&cfg).expect_err("should time out");
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn missing_output_file_is_an_error() {
        let cfg = AnalyzerConfig {
            command: "true".to_string(),
            output: "does/not/exist.txt".to_string(),
            timeout_secs: 10,
        };
        assert!(run_analyzer(&cfg).is_err());
    }
}
