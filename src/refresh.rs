//! Atomic bulk replacement of a live set's membership.
//!
//! A refresh stages the new members in a shadow set named `<name>-temp`,
//! swaps it with the live set in one kernel operation, and destroys the
//! shadow name (which by then holds the old members). Filter rules keep
//! matching against the live name the whole time.
//!
//! Everything before the swap is staging and safe to retry. Everything after
//! is cleanup; a leftover shadow is reused by the next refresh since
//! creation is idempotent.

use tracing::{info, warn};

use crate::error::{IpsetError, Operation, Result};
use crate::params::MAX_SET_NAME_LEN;
use crate::set::IpSet;
use crate::tool::IpsetTool;

/// Suffix appended to a live set name to form its shadow.
pub const SHADOW_SUFFIX: &str = "-temp";

/// Name of the staging set used when refreshing `name`.
pub fn shadow_name(name: &str) -> String {
    format!("{}{}", name, SHADOW_SUFFIX)
}

/// An entry that could not be staged, with the tool's reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedEntry {
    pub entry: String,
    pub reason: String,
}

/// What a refresh did.
#[derive(Debug, Clone, Default)]
pub struct RefreshReport {
    /// Live set name.
    pub set: String,
    /// Number of entries supplied by the caller.
    pub requested: usize,
    /// Entries successfully staged and swapped in.
    pub added: usize,
    pub failed: Vec<FailedEntry>,
    /// Set when the old contents could not be destroyed after the swap.
    pub cleanup_error: Option<String>,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Atomically exchange the contents of two existing sets of the same type.
pub fn swap(tool: &IpsetTool, from: &str, to: &str) -> Result<()> {
    tool.run(
        Operation::Swap,
        &format!("{} <-> {}", from, to),
        None,
        &["swap", from, to],
    )?;
    Ok(())
}

impl IpSet {
    /// Replace the membership of this set with `entries`.
    ///
    /// Entries the tool rejects are skipped and listed in the report; the
    /// rest are still swapped in. In that case the report comes back inside
    /// [`IpsetError::PartialFailure`]. A failed swap leaves the live set
    /// untouched and returns the swap error.
    pub fn refresh<I, S>(&self, entries: I) -> Result<RefreshReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let shadow_name = shadow_name(self.name());
        if shadow_name.len() > MAX_SET_NAME_LEN {
            return Err(IpsetError::Validation(format!(
                "set name '{}' leaves no room for the '{}' shadow suffix (limit {} bytes)",
                self.name(),
                SHADOW_SUFFIX,
                MAX_SET_NAME_LEN
            )));
        }

        let shadow = IpSet::create(self.tool().clone(), &shadow_name, self.set_type().clone(), *self.params())?;

        let mut report = RefreshReport {
            set: self.name().to_string(),
            ..Default::default()
        };
        for entry in entries {
            let entry = entry.as_ref();
            report.requested += 1;
            match shadow.add_default_timeout(entry) {
                Ok(()) => report.added += 1,
                Err(e) => {
                    warn!("Skipping entry {:?} for ipset {}: {}", entry, self.name(), e);
                    report.failed.push(FailedEntry {
                        entry: entry.to_string(),
                        reason: e
                            .output()
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(str::to_string)
                            .unwrap_or_else(|| e.to_string()),
                    });
                }
            }
        }

        swap(self.tool(), shadow.name(), self.name())?;

        if let Err(e) = shadow.destroy() {
            warn!("Swapped ipset {} but could not destroy {}: {}", self.name(), shadow.name(), e);
            report.cleanup_error = Some(e.to_string());
        }

        info!(
            "Refreshed ipset {}: {} entries ({} failed)",
            self.name(),
            report.added,
            report.failed.len()
        );

        if report.is_complete() {
            Ok(report)
        } else {
            Err(IpsetError::PartialFailure(report))
        }
    }
}
