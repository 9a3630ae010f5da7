//! Add command implementation.

use anyhow::Result;

use super::existing_set;
use crate::tool::IpsetTool;

/// Run the add command
pub fn run(tool: IpsetTool, name: &str, entry: &str, timeout: u32) -> Result<()> {
    existing_set(tool, name)?.add(entry, timeout)?;
    println!("Added {} to {}", entry, name);
    Ok(())
}
