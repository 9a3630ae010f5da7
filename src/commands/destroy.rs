//! Destroy command implementation.

use anyhow::Result;

use super::existing_set;
use crate::tool::IpsetTool;

/// Run the destroy command
pub fn run(tool: IpsetTool, name: &str) -> Result<()> {
    existing_set(tool, name)?.destroy()?;
    println!("Destroyed {}", name);
    Ok(())
}
