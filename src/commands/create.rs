//! Create command implementation.

use anyhow::Result;

use crate::cli::SetSpec;
use crate::set::IpSet;
use crate::tool::IpsetTool;

/// Run the create command
pub fn run(tool: IpsetTool, name: &str, spec: &SetSpec) -> Result<()> {
    let set = IpSet::with_tool(tool, name, &spec.set_type, spec.params())?;
    let params = set.params();
    println!(
        "Created {} ({}, family {}, hashsize {}, maxelem {}, timeout {})",
        set.name(),
        set.set_type(),
        params.family,
        params.hash_size,
        params.max_elements,
        params.entry_timeout
    );
    Ok(())
}
