//! Refresh command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::cli::SetSpec;
use crate::entries::read_entries;
use crate::error::IpsetError;
use crate::lock::SetLock;
use crate::params::SetParameters;
use crate::refresh::RefreshReport;
use crate::set::IpSet;
use crate::tool::IpsetTool;

/// Run the refresh command
pub fn run(tool: IpsetTool, name: &str, file: &Path, spec: &SetSpec, lock_dir: &Path) -> Result<()> {
    let report = refresh_from_file(tool, lock_dir, name, &spec.set_type, spec.params(), file)?;
    print_report(&report);
    Ok(())
}

/// Lock the set, make sure it exists without emptying it, then refresh it
/// from `file`. Entries the tool rejected are returned in the report rather
/// than as an error.
pub fn refresh_from_file(
    tool: IpsetTool,
    lock_dir: &Path,
    name: &str,
    set_type: &str,
    params: SetParameters,
    file: &Path,
) -> Result<RefreshReport> {
    let entries = read_entries(file)?;
    info!("Read {} entries for {} from {}", entries.len(), name, file.display());

    let _lock = SetLock::acquire(lock_dir, name)?;
    let set = IpSet::ensure(tool, name, set_type, params)?;

    match set.refresh(&entries) {
        Ok(report) => Ok(report),
        Err(IpsetError::PartialFailure(report)) => Ok(report),
        Err(e) => Err(e).with_context(|| format!("Failed to refresh set {}", name)),
    }
}

pub(crate) fn print_report(report: &RefreshReport) {
    println!(
        "Refreshed {}: {} of {} entries loaded",
        report.set, report.added, report.requested
    );
    if !report.failed.is_empty() {
        println!("{} entries rejected:", report.failed.len());
        for failed in &report.failed {
            println!("  {:?}: {}", failed.entry, failed.reason);
        }
    }
    if let Some(ref cleanup) = report.cleanup_error {
        warn!("Staging set was left behind: {}", cleanup);
    }
}
