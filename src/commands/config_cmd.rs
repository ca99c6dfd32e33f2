use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::Config;

/// Print the effective configuration as TOML.
pub fn show(config: &Config) -> Result<()> {
    let text = config
        .to_toml()
        .context("Failed to serialize configuration")?;

    match Config::default_path() {
        Some(path) => eprintln!("{} {}", "# default file:".dimmed(), path.display()),
        None => eprintln!("{}", "# no user config directory".dimmed()),
    }
    print!("{text}");
    Ok(())
}
