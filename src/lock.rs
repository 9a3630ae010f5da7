//! Per-set advisory file locks.
//!
//! The library assumes a single writer per set name. The CLI takes a
//! flock-style lock on `<lock_dir>/<set>.lock` around refreshes so two
//! `ipsetctl` runs on one host do not interleave on the same set and its
//! shadow. Other programs driving ipset directly are not covered.
//!
//! Set names may contain `/`, so `/` and `%` are percent-encoded in the
//! file name. The lock file always sits directly inside the lock directory.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A guard that holds an exclusive lock for one set name.
/// The lock is released when the guard is dropped.
#[derive(Debug)]
pub struct SetLock {
    _file: File,
    path: PathBuf,
}

impl SetLock {
    /// Attempt to acquire the lock for `set_name` without blocking.
    ///
    /// Opens with create+read+write (no truncate) so there is no race
    /// between creating the file and locking it.
    pub fn acquire(lock_dir: &Path, set_name: &str) -> Result<Self> {
        fs::create_dir_all(lock_dir)
            .with_context(|| format!("Failed to create lock directory: {:?}", lock_dir))?;

        let path = lock_dir.join(lock_file_name(set_name));
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .with_context(|| format!("Failed to open lock file: {:?}", path))?;

        fs::set_permissions(&path, fs::Permissions::from_mode(0o600))
            .context("Failed to set lock file permissions")?;

        file.try_lock_exclusive().map_err(|_| {
            anyhow::anyhow!(
                "Another ipsetctl process is already updating set '{}'.\n\
                 If you believe this is an error, remove the lock file: {}",
                set_name,
                path.display()
            )
        })?;

        debug!("Acquired lock {}", path.display());
        Ok(Self { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// File name of the lock for `set_name`, safe to join onto the lock directory.
fn lock_file_name(set_name: &str) -> String {
    let mut name = String::with_capacity(set_name.len() + 5);
    for c in set_name.chars() {
        match c {
            '/' => name.push_str("%2F"),
            '%' => name.push_str("%25"),
            c => name.push(c),
        }
    }
    name.push_str(".lock");
    name
}
