//! CLI command implementations.

pub mod add;
pub mod create;
pub mod del;
pub mod destroy;
pub mod flush;
pub mod refresh;
pub mod swap;
pub mod sync;

use anyhow::Result;
use std::path::Path;
use tracing::warn;

use crate::params::SetParameters;
use crate::set::IpSet;
use crate::tool::IpsetTool;

/// Use the given ipset binary, or fall back to the cached PATH lookup.
pub fn resolve_tool(ipset: Option<&Path>) -> Result<IpsetTool> {
    match ipset {
        Some(path) => Ok(IpsetTool::at(path)),
        None => Ok(IpsetTool::discover()?),
    }
}

/// Handle to an existing set for single-entry and teardown commands.
///
/// The type only matters for refresh, which these commands never run.
pub(crate) fn existing_set(tool: IpsetTool, name: &str) -> Result<IpSet> {
    Ok(IpSet::attach(tool, name, "hash:ip", SetParameters::default())?)
}

/// Warn when not running as root; ipset needs CAP_NET_ADMIN.
///
/// Only a warning since the process may hold the capability without UID 0.
pub fn warn_if_not_root() {
    // SAFETY: geteuid() has no preconditions, never fails, and doesn't
    // modify any state.
    let euid = unsafe { libc::geteuid() };
    if euid != 0 {
        warn!("Not running as root; ipset will fail unless this process has CAP_NET_ADMIN");
    }
}
