//! Set creation parameters and validation.
//!
//! Parameters follow a "zero means default" convention so callers only fill
//! in what they care about:
//!
//! ```
//! use ipsetctl::params::{SetParameters, DEFAULT_HASH_SIZE, DEFAULT_MAX_ELEMENTS};
//! let p = SetParameters { entry_timeout: 300, ..Default::default() }.resolved();
//! assert_eq!(p.hash_size, DEFAULT_HASH_SIZE);
//! assert_eq!(p.max_elements, DEFAULT_MAX_ELEMENTS);
//! assert_eq!(p.entry_timeout, 300);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{IpsetError, Result};

/// Initial hash table size when none is given.
pub const DEFAULT_HASH_SIZE: u32 = 1024;

/// Capacity ceiling when none is given.
pub const DEFAULT_MAX_ELEMENTS: u32 = 65536;

/// Longest set name the kernel accepts (IPSET_MAXNAMELEN minus the NUL).
pub const MAX_SET_NAME_LEN: usize = 31;

const HASH_PREFIX: &str = "hash:";

/// Dimensions allowed in a `hash:` type, e.g. `hash:net,port`.
const HASH_DIMENSIONS: &[&str] = &["ip", "net", "port", "mac", "iface", "mark"];

/// Address family of a hash set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HashFamily {
    #[default]
    Inet,
    Inet6,
}

impl HashFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            HashFamily::Inet => "inet",
            HashFamily::Inet6 => "inet6",
        }
    }
}

impl FromStr for HashFamily {
    type Err = IpsetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "inet" | "ipv4" => Ok(HashFamily::Inet),
            "inet6" | "ipv6" => Ok(HashFamily::Inet6),
            other => Err(IpsetError::Validation(format!(
                "unknown address family '{}' (expected inet or inet6)",
                other
            ))),
        }
    }
}

impl TryFrom<String> for HashFamily {
    type Error = IpsetError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<HashFamily> for String {
    fn from(f: HashFamily) -> Self {
        f.as_str().to_string()
    }
}

impl fmt::Display for HashFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied creation parameters. Zero fields are replaced by defaults
/// in [`SetParameters::resolved`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SetParameters {
    pub family: HashFamily,
    #[serde(rename = "hashsize")]
    pub hash_size: u32,
    #[serde(rename = "maxelem")]
    pub max_elements: u32,
    /// Default per-entry expiry in seconds; 0 means entries never expire.
    #[serde(rename = "timeout")]
    pub entry_timeout: u32,
}

impl SetParameters {
    /// Copy with zero-valued sizing fields replaced by the defaults.
    pub fn resolved(mut self) -> Self {
        if self.hash_size == 0 {
            self.hash_size = DEFAULT_HASH_SIZE;
        }
        if self.max_elements == 0 {
            self.max_elements = DEFAULT_MAX_ELEMENTS;
        }
        self
    }
}

/// A validated `hash:*` set type such as `hash:ip` or `hash:net,port`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SetType(String);

impl SetType {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SetType {
    fn default() -> Self {
        SetType("hash:ip".to_string())
    }
}

impl FromStr for SetType {
    type Err = IpsetError;

    fn from_str(s: &str) -> Result<Self> {
        let dims = s
            .strip_prefix(HASH_PREFIX)
            .ok_or_else(|| IpsetError::Validation(format!("not a hash type: {}", s)))?;

        if dims.is_empty() {
            return Err(IpsetError::Validation(format!("hash type without dimensions: {}", s)));
        }
        if let Some(bad) = dims.split(',').find(|d| !HASH_DIMENSIONS.contains(d)) {
            return Err(IpsetError::Validation(format!(
                "unknown dimension '{}' in set type {} (expected one of: {})",
                bad,
                s,
                HASH_DIMENSIONS.join(", ")
            )));
        }
        Ok(SetType(s.to_string()))
    }
}

impl TryFrom<String> for SetType {
    type Error = IpsetError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<SetType> for String {
    fn from(t: SetType) -> Self {
        t.0
    }
}

impl fmt::Display for SetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check a set name against what the kernel will accept.
pub fn validate_set_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(IpsetError::Validation("set name is empty".to_string()));
    }
    if name.len() > MAX_SET_NAME_LEN {
        return Err(IpsetError::Validation(format!(
            "set name '{}' is {} bytes, the limit is {}",
            name,
            name.len(),
            MAX_SET_NAME_LEN
        )));
    }
    if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(IpsetError::Validation(format!(
            "set name '{}' contains whitespace or control characters",
            name.escape_debug()
        )));
    }
    Ok(())
}
