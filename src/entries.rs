//! Reading membership lists from entry files.
//!
//! One entry per line. Blank lines and `#` comments are skipped, and a
//! trailing `# comment` after an entry is dropped. Entries themselves are
//! not validated here; ipset decides what it accepts.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Parse the contents of an entry file.
///
/// # Examples
/// ```
/// use ipsetctl::entries::parse_entries;
/// let entries = parse_entries("# blocklist\n10.0.0.1\n\n192.168.0.0/16  # lan\n");
/// assert_eq!(entries, vec!["10.0.0.1", "192.168.0.0/16"]);
/// ```
pub fn parse_entries(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.split_once('#').map(|(before, _)| before).unwrap_or(line).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read entries from `path`, or from stdin when `path` is `-`.
pub fn read_entries(path: &Path) -> Result<Vec<String>> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read entries from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read entries file: {:?}", path))?
    };
    Ok(parse_entries(&content))
}
