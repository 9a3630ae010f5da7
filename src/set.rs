//! Lifecycle of one named ipset hash set.

use tracing::{debug, info};

use crate::error::{Operation, Result};
use crate::params::{validate_set_name, SetParameters, SetType};
use crate::tool::{execution_error, IpsetTool};

/// Line printed by `ipset test` when the entry is absent. Exit status alone
/// cannot tell "not a member" apart from other failures: both exit 1 on
/// current releases, and older releases exit 0 with this text.
fn not_member_line(entry: &str, set: &str) -> String {
    format!("{} is NOT in set {}.", entry, set)
}

/// Handle to a named hash set in the kernel.
///
/// Parameters are fixed once the handle exists; only membership changes.
/// After [`IpSet::destroy`] the handle is stale and further calls will fail.
#[derive(Debug, Clone)]
pub struct IpSet {
    name: String,
    set_type: SetType,
    params: SetParameters,
    tool: IpsetTool,
}

impl IpSet {
    /// Create (or reuse) and flush the set `name`, locating ipset on `PATH`.
    ///
    /// The type is checked before anything else, so a bad type never looks
    /// up or runs the tool.
    pub fn new(name: &str, set_type: &str, params: SetParameters) -> Result<Self> {
        let set_type: SetType = set_type.parse()?;
        validate_set_name(name)?;
        let tool = IpsetTool::discover()?;
        Self::create(tool, name, set_type, params)
    }

    /// Same as [`IpSet::new`] with an already resolved tool.
    pub fn with_tool(tool: IpsetTool, name: &str, set_type: &str, params: SetParameters) -> Result<Self> {
        let set_type: SetType = set_type.parse()?;
        validate_set_name(name)?;
        Self::create(tool, name, set_type, params)
    }

    /// Create the set if missing but keep any existing members.
    ///
    /// Use this ahead of [`IpSet::refresh`] on a set that filter rules may
    /// already match against.
    pub fn ensure(tool: IpsetTool, name: &str, set_type: &str, params: SetParameters) -> Result<Self> {
        let set = Self::attach(tool, name, set_type, params)?;
        set.create_exist()?;
        debug!("Ensured ipset {} exists", set.name);
        Ok(set)
    }

    /// Bind to a set created earlier without running any command.
    ///
    /// Existence is not checked here; a missing set shows up as an execution
    /// error on first use.
    pub fn attach(tool: IpsetTool, name: &str, set_type: &str, params: SetParameters) -> Result<Self> {
        let set_type: SetType = set_type.parse()?;
        validate_set_name(name)?;
        Ok(Self {
            name: name.to_string(),
            set_type,
            params: params.resolved(),
            tool,
        })
    }

    /// Issue `create ... -exist` followed by `flush`.
    pub(crate) fn create(tool: IpsetTool, name: &str, set_type: SetType, params: SetParameters) -> Result<Self> {
        let set = Self {
            name: name.to_string(),
            set_type,
            params: params.resolved(),
            tool,
        };
        set.create_exist()?;
        set.flush()?;

        info!("Created ipset {} ({}, {})", set.name, set.set_type, set.params.family);
        Ok(set)
    }

    fn create_exist(&self) -> Result<()> {
        let hash_size = self.params.hash_size.to_string();
        let max_elements = self.params.max_elements.to_string();
        let timeout = self.params.entry_timeout.to_string();
        self.tool.run(
            Operation::Create,
            &self.name,
            None,
            &[
                "create",
                &self.name,
                self.set_type.as_str(),
                "family",
                self.params.family.as_str(),
                "hashsize",
                &hash_size,
                "maxelem",
                &max_elements,
                "timeout",
                &timeout,
                "-exist",
            ],
        )?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_type(&self) -> &SetType {
        &self.set_type
    }

    pub fn params(&self) -> &SetParameters {
        &self.params
    }

    pub(crate) fn tool(&self) -> &IpsetTool {
        &self.tool
    }

    /// Add `entry` with an explicit expiry; an existing entry is not an error.
    pub fn add(&self, entry: &str, timeout_secs: u32) -> Result<()> {
        let timeout = timeout_secs.to_string();
        self.tool.run(
            Operation::Add,
            &self.name,
            Some(entry),
            &["add", &self.name, entry, "timeout", &timeout, "-exist"],
        )?;
        Ok(())
    }

    /// Add `entry` with the set's default expiry.
    pub(crate) fn add_default_timeout(&self, entry: &str) -> Result<()> {
        self.tool.run(
            Operation::Add,
            &self.name,
            Some(entry),
            &["add", &self.name, entry, "-exist"],
        )?;
        Ok(())
    }

    /// Remove `entry`; a missing entry is not an error.
    pub fn remove(&self, entry: &str) -> Result<()> {
        self.tool.run(
            Operation::Del,
            &self.name,
            Some(entry),
            &["del", &self.name, entry, "-exist"],
        )?;
        Ok(())
    }

    /// Report whether `entry` is a member.
    pub fn test(&self, entry: &str) -> Result<bool> {
        let output = self.tool.exec(Operation::Test, &self.name, Some(entry), &["test", &self.name, entry])?;
        // Error text can echo the entry back, so only the whole line counts
        let expected = not_member_line(entry, &self.name);
        let not_member = output.combined().lines().any(|line| line.trim() == expected);

        match (output.success, not_member) {
            (true, false) => Ok(true),
            (_, true) => Ok(false),
            (false, false) => Err(execution_error(Operation::Test, &self.name, Some(entry), &output)),
        }
    }

    /// Remove every member, keeping the set and its parameters.
    pub fn flush(&self) -> Result<()> {
        self.tool.run(Operation::Flush, &self.name, None, &["flush", &self.name])?;
        debug!("Flushed ipset {}", self.name);
        Ok(())
    }

    /// Remove the set from the kernel.
    ///
    /// The kernel refuses while a firewall rule still references the set;
    /// that refusal is returned as an execution error.
    pub fn destroy(&self) -> Result<()> {
        self.tool.run(Operation::Destroy, &self.name, None, &["destroy", &self.name])?;
        info!("Destroyed ipset {}", self.name);
        Ok(())
    }
}
