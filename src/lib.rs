//! # ipsetctl - atomic management of ipset hash sets
//!
//! Creates, populates, queries and atomically refreshes named kernel ipset
//! sets by driving the `ipset` utility as a subprocess. Firewall rules keep
//! referencing a set by name while its whole membership is replaced.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        ipsetctl                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap) + Config (serde_yaml) + per-set locks (fs2)     │
//! │    └── Commands: create, add, del, test, refresh, sync...   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  IpSet (set handle)                                         │
//! │    ├── create -exist + flush, add, del, test, destroy       │
//! │    └── refresh: shadow create → add → swap → destroy        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  IpsetTool                                                  │
//! │    ├── PATH lookup cached per process                       │
//! │    └── CommandExecutor trait (real process or test double)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use ipsetctl::{IpSet, IpsetError, SetParameters};
//!
//! fn main() -> anyhow::Result<()> {
//!     let set = IpSet::new("blocklist", "hash:net", SetParameters::default())?;
//!     set.add("203.0.113.0/24", 0)?;
//!     assert!(set.test("203.0.113.7")?);
//!
//!     match set.refresh(["198.51.100.0/24", "192.0.2.1"]) {
//!         Ok(report) => println!("loaded {} entries", report.added),
//!         Err(IpsetError::PartialFailure(report)) => {
//!             for failed in &report.failed {
//!                 eprintln!("rejected {}: {}", failed.entry, failed.reason);
//!             }
//!         }
//!         Err(e) => return Err(e.into()),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency
//!
//! Every operation is a blocking subprocess call and no locking happens in
//! the library. Callers serialize operations per set name. Two processes
//! refreshing the same set at once may interleave; the CLI guards against
//! that for its own runs with a per-set lock file.
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`cmd_abstraction`] - Mockable subprocess boundary
//! - [`commands`] - CLI command implementations
//! - [`config`] - Managed set configuration for `sync`
//! - [`entries`] - Entry file parsing
//! - [`error`] - Error taxonomy
//! - [`lock`] - Per-set file locking
//! - [`params`] - Set types, families and sizing defaults
//! - [`refresh`] - Atomic bulk replacement
//! - [`set`] - Set handle lifecycle
//! - [`tool`] - ipset discovery and invocation

pub mod cli;
pub mod cmd_abstraction;
pub mod commands;
pub mod config;
pub mod entries;
pub mod error;
pub mod lock;
pub mod params;
pub mod refresh;
pub mod set;
pub mod tool;

#[cfg(test)]
mod fake;

pub use error::{IpsetError, Operation};
pub use params::{HashFamily, SetParameters, SetType};
pub use refresh::{FailedEntry, RefreshReport};
pub use set::IpSet;
pub use tool::IpsetTool;
