//! Swap command implementation.

use anyhow::Result;

use crate::params::validate_set_name;
use crate::refresh::swap;
use crate::tool::IpsetTool;

/// Run the swap command
pub fn run(tool: IpsetTool, from: &str, to: &str) -> Result<()> {
    validate_set_name(from)?;
    validate_set_name(to)?;
    swap(&tool, from, to)?;
    println!("Swapped {} and {}", from, to);
    Ok(())
}
