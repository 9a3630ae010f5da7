//! Configuration file listing the sets `ipsetctl sync` manages.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::params::{validate_set_name, SetParameters, SetType, MAX_SET_NAME_LEN};
use crate::refresh::{shadow_name, SHADOW_SUFFIX};

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/ipsetctl/sets.yaml";

/// Default directory for per-set lock files.
pub const DEFAULT_LOCK_DIR: &str = "/run/ipsetctl";

fn default_lock_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LOCK_DIR)
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Explicit ipset binary; PATH lookup when unset
    pub ipset_path: Option<PathBuf>,

    /// Directory holding per-set lock files
    pub lock_dir: PathBuf,

    /// Sets kept in sync with their entry files
    pub sets: Vec<ManagedSet>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ipset_path: None,
            lock_dir: default_lock_dir(),
            sets: Vec::new(),
        }
    }
}

/// One set and the file its membership comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedSet {
    pub name: String,

    #[serde(rename = "type", default)]
    pub set_type: SetType,

    #[serde(flatten)]
    pub params: SetParameters,

    pub entries_file: PathBuf,
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for set in &self.sets {
            validate_set_name(&set.name).with_context(|| format!("Invalid set entry '{}'", set.name))?;

            if shadow_name(&set.name).len() > MAX_SET_NAME_LEN {
                anyhow::bail!(
                    "Set name '{}' is too long: refreshing needs room for the '{}' suffix within {} bytes",
                    set.name,
                    SHADOW_SUFFIX,
                    MAX_SET_NAME_LEN
                );
            }

            if !names.insert(set.name.as_str()) {
                anyhow::bail!("Set '{}' is declared more than once", set.name);
            }

            if set.entries_file.as_os_str().is_empty() {
                anyhow::bail!("Set '{}' has an empty entries_file", set.name);
            }
        }

        // A set named like another set's shadow would be clobbered by refresh
        for set in &self.sets {
            if names.contains(shadow_name(&set.name).as_str()) {
                anyhow::bail!(
                    "Set '{}' collides with the refresh staging set of '{}'",
                    shadow_name(&set.name),
                    set.name
                );
            }
        }

        Ok(())
    }

    /// Look up a managed set by name.
    pub fn find(&self, name: &str) -> Option<&ManagedSet> {
        self.sets.iter().find(|s| s.name == name)
    }
}
