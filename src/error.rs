//! Error types for ipsetctl.

use std::fmt;

use thiserror::Error;

use crate::refresh::RefreshReport;

/// Marker printed by ipset when a named set is unknown to the kernel.
const MISSING_SET_MARKER: &str = "does not exist";

/// ipset verb that produced an [`IpsetError::Execution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Flush,
    Add,
    Del,
    Test,
    Swap,
    Destroy,
}

impl Operation {
    pub fn verb(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Flush => "flush",
            Operation::Add => "add",
            Operation::Del => "del",
            Operation::Test => "test",
            Operation::Swap => "swap",
            Operation::Destroy => "destroy",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

#[derive(Error, Debug)]
pub enum IpsetError {
    #[error("ipset utility not found (searched: {searched})")]
    ToolUnavailable { searched: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(
        "ipset {op} failed for {target}{}: {status} ({})",
        .entry.as_deref().map(|e| format!(" entry {}", e)).unwrap_or_default(),
        .output.trim()
    )]
    Execution {
        op: Operation,
        target: String,
        entry: Option<String>,
        status: String,
        output: String,
    },

    #[error(
        "refresh of {} swapped in {} entries but {} failed to populate",
        .0.set,
        .0.added,
        .0.failed.len()
    )]
    PartialFailure(RefreshReport),
}

impl IpsetError {
    /// True when the tool reported that the target set does not exist.
    pub fn is_missing_set(&self) -> bool {
        matches!(self, IpsetError::Execution { output, .. } if output.contains(MISSING_SET_MARKER))
    }

    /// Raw tool output for execution failures.
    pub fn output(&self) -> Option<&str> {
        match self {
            IpsetError::Execution { output, .. } => Some(output),
            _ => None,
        }
    }
}

pub type Result<T, E = IpsetError> = std::result::Result<T, E>;
