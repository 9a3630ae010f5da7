//! CLI argument parsing with clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;
use crate::params::{HashFamily, SetParameters};

#[derive(Parser)]
#[command(name = "ipsetctl")]
#[command(author, version, about = "Atomic management of ipset hash sets")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (used by sync)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    /// ipset binary to use instead of searching PATH
    #[arg(long, global = true)]
    pub ipset: Option<PathBuf>,

    /// Quiet mode (for cron/systemd timer)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Set type and creation parameters shared by create and refresh.
#[derive(Args, Debug, Clone)]
pub struct SetSpec {
    /// Set type (hash:ip, hash:net, hash:ip,port, ...)
    #[arg(long = "type", default_value = "hash:ip")]
    pub set_type: String,

    /// Address family (inet, inet6)
    #[arg(long, default_value = "inet")]
    pub family: HashFamily,

    /// Initial hash size (0 = default)
    #[arg(long, default_value_t = 0)]
    pub hashsize: u32,

    /// Maximum number of elements (0 = default)
    #[arg(long, default_value_t = 0)]
    pub maxelem: u32,

    /// Default entry timeout in seconds (0 = never expire)
    #[arg(long, default_value_t = 0)]
    pub timeout: u32,
}

impl SetSpec {
    pub fn params(&self) -> SetParameters {
        SetParameters {
            family: self.family,
            hash_size: self.hashsize,
            max_elements: self.maxelem,
            entry_timeout: self.timeout,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a set (or reuse an existing one) and empty it
    Create {
        /// Set name
        name: String,

        #[command(flatten)]
        spec: SetSpec,
    },

    /// Add an entry to a set
    Add {
        /// Set name
        name: String,

        /// Entry (IP, CIDR, or compound entry matching the set type)
        entry: String,

        /// Entry timeout in seconds (0 = never expire)
        #[arg(long, default_value_t = 0)]
        timeout: u32,
    },

    /// Remove an entry from a set
    Del {
        /// Set name
        name: String,

        /// Entry to remove
        entry: String,
    },

    /// Check whether an entry is in a set
    ///
    /// Exits 0 when present, 1 when absent and 2 when ipset fails
    /// (missing set, malformed entry, ipset not found).
    Test {
        /// Set name
        name: String,

        /// Entry to check
        entry: String,
    },

    /// Remove all entries from a set
    Flush {
        /// Set name
        name: String,
    },

    /// Destroy a set
    Destroy {
        /// Set name
        name: String,
    },

    /// Atomically exchange the contents of two sets of the same type
    Swap {
        /// First set
        from: String,

        /// Second set
        to: String,
    },

    /// Atomically replace a set's entries with the contents of a file
    Refresh {
        /// Set name
        name: String,

        /// Entries file, one entry per line ("-" for stdin)
        #[arg(short, long)]
        file: PathBuf,

        #[command(flatten)]
        spec: SetSpec,

        /// Directory for per-set lock files
        #[arg(long, default_value = crate::config::DEFAULT_LOCK_DIR)]
        lock_dir: PathBuf,
    },

    /// Refresh every set declared in the config file
    Sync,

    /// Show version information
    Version,
}
