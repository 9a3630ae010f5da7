//! Location and invocation of the external `ipset` utility.

use std::env;
use std::ffi::OsStr;
use std::fmt;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::cmd_abstraction::{args_to_strings, CommandExecutor, CommandOutput, RealCommandExecutor};
use crate::error::{IpsetError, Operation, Result};

const IPSET_BINARY: &str = "ipset";

/// Outcome of the one-time PATH lookup. A miss is cached too.
static IPSET_PATH: OnceCell<Option<PathBuf>> = OnceCell::new();

/// Locate `ipset` on `PATH`, once per process.
///
/// The first result is reused for the lifetime of the process, including a
/// failed lookup: installing ipset afterwards requires a restart.
pub fn locate_ipset() -> Result<PathBuf> {
    locate_with(&IPSET_PATH, env::var_os("PATH").as_deref())
}

/// Resolve `ipset` through `cell`, searching `path_var` only on first use.
fn locate_with(cell: &OnceCell<Option<PathBuf>>, path_var: Option<&OsStr>) -> Result<PathBuf> {
    cell.get_or_init(|| {
        let found = find_in_path(IPSET_BINARY, path_var);
        debug!("ipset lookup on PATH: {:?}", found);
        found
    })
    .clone()
    .ok_or_else(|| IpsetError::ToolUnavailable {
        searched: path_var.map(|p| p.to_string_lossy().into_owned()).unwrap_or_default(),
    })
}

/// Search `path_var` (a `PATH`-style list) for an executable named `name`.
pub fn find_in_path(name: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    let path_var = path_var?;
    env::split_paths(path_var)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// A resolved ipset binary plus the executor used to run it.
///
/// Cloning is cheap; every [`crate::IpSet`] holds its own clone.
#[derive(Clone)]
pub struct IpsetTool {
    path: PathBuf,
    executor: Arc<dyn CommandExecutor>,
}

impl IpsetTool {
    /// Use the process-wide cached PATH lookup and real subprocesses.
    pub fn discover() -> Result<Self> {
        Ok(Self::at(locate_ipset()?))
    }

    /// Use an explicit binary path and real subprocesses.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self::with_executor(path, Arc::new(RealCommandExecutor::new()))
    }

    /// Use an explicit binary path and a caller-supplied executor.
    pub fn with_executor(path: impl Into<PathBuf>, executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            path: path.into(),
            executor,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run ipset and return its output regardless of exit status.
    ///
    /// Only a failure to spawn the process is an error here.
    pub fn exec(&self, op: Operation, target: &str, entry: Option<&str>, args: &[&str]) -> Result<CommandOutput> {
        debug!("{} {}", self.path.display(), args.join(" "));
        let program = self.path.to_string_lossy();
        self.executor
            .execute(&program, &args_to_strings(args))
            .map_err(|e| IpsetError::Execution {
                op,
                target: target.to_string(),
                entry: entry.map(str::to_string),
                status: format!("failed to execute {}: {:#}", program, e),
                output: String::new(),
            })
    }

    /// Run ipset and turn a non-zero exit status into [`IpsetError::Execution`].
    pub fn run(&self, op: Operation, target: &str, entry: Option<&str>, args: &[&str]) -> Result<CommandOutput> {
        let output = self.exec(op, target, entry, args)?;
        if output.success {
            Ok(output)
        } else {
            Err(execution_error(op, target, entry, &output))
        }
    }
}

impl fmt::Debug for IpsetTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IpsetTool").field("path", &self.path).finish_non_exhaustive()
    }
}

pub(crate) fn execution_error(op: Operation, target: &str, entry: Option<&str>, output: &CommandOutput) -> IpsetError {
    IpsetError::Execution {
        op,
        target: target.to_string(),
        entry: entry.map(str::to_string),
        status: output.status(),
        output: output.combined(),
    }
}
