//! Del command implementation.

use anyhow::Result;

use super::existing_set;
use crate::tool::IpsetTool;

/// Run the del command
pub fn run(tool: IpsetTool, name: &str, entry: &str) -> Result<()> {
    existing_set(tool, name)?.remove(entry)?;
    println!("Removed {} from {}", entry, name);
    Ok(())
}
