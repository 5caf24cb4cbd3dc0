//! `flock config ...`

use anyhow::{Context, Result};
use flock_core::config::{self, Config, paths};

#[derive(clap::Subcommand)]
pub enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Generate a fresh config from Rust defaults (for xtask)
    Generate,
}

/// Runs without loading the config, so a broken file can still be located
/// and regenerated.
pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Path => {
            println!("{}", paths::config_path().display());
            Ok(())
        }
        ConfigCommands::Init => init(),
        ConfigCommands::Generate => {
            print!("{}", Config::generate()?);
            Ok(())
        }
    }
}

fn init() -> Result<()> {
    let config_path = paths::config_path();
    Config::init(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    println!(
        "Feed service: {} (set base_url or {} to change)",
        config::DEFAULT_BASE_URL,
        config::BASE_URL_ENV
    );
    Ok(())
}
