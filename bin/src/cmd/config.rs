//! Config command implementation.

use anyhow::Result;
use laggard::RunConfig;

/// Print the effective configuration as TOML.
pub(crate) fn show_config(config: &RunConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
