//! Flush command implementation.

use anyhow::Result;

use super::existing_set;
use crate::tool::IpsetTool;

/// Run the flush command
pub fn run(tool: IpsetTool, name: &str) -> Result<()> {
    existing_set(tool, name)?.flush()?;
    println!("Flushed {}", name);
    Ok(())
}
