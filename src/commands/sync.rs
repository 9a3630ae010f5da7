//! Sync command implementation.

use anyhow::Result;
use std::path::Path;
use tracing::error;

use super::refresh::{print_report, refresh_from_file};
use super::resolve_tool;
use crate::config::Config;
use crate::tool::IpsetTool;

/// Run the sync command
pub fn run(config_path: &Path, ipset_override: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    if config.sets.is_empty() {
        println!("No sets configured in {}", config_path.display());
        return Ok(());
    }

    let tool = resolve_tool(ipset_override.or(config.ipset_path.as_deref()))?;
    sync_sets(&config, tool)
}

/// Refresh every configured set.
///
/// A failing set does not stop the others; the result is an error if any
/// set could not be refreshed.
pub fn sync_sets(config: &Config, tool: IpsetTool) -> Result<()> {
    let mut failures = 0usize;
    for set in &config.sets {
        match refresh_from_file(
            tool.clone(),
            &config.lock_dir,
            &set.name,
            set.set_type.as_str(),
            set.params,
            &set.entries_file,
        ) {
            Ok(report) => print_report(&report),
            Err(e) => {
                error!("Failed to sync set {}: {:#}", set.name, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} sets failed to sync", failures, config.sets.len());
    }
    Ok(())
}
