use anyhow::Context;
use camino::Utf8Path;
use std::collections::BTreeSet;

/// Read a project identifier list produced by the external parser stage (or
/// by the analyzer): one identifier per line, `#` comments and blank lines
/// ignored.
pub fn read_identifier_list(path: &Utf8Path) -> anyhow::Result<BTreeSet<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read identifier list {path}"))?;
    Ok(parse_identifier_list(&text))
}

pub fn parse_identifier_list(text: &str) -> BTreeSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
