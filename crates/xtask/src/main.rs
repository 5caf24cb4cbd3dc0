use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "flock maintainer tasks")]
struct Cli {
    #[command(subcommand)]
    command: Option<CommandName>,
}

#[derive(Debug, Default, Subcommand)]
enum CommandName {
    /// Rewrite default_config.toml from `flock config generate`.
    #[default]
    UpdateDefaultConfig,
    /// Fail if default_config.toml differs from `flock config generate`.
    CheckDefaultConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = project_root()?;
    let dest = root
        .join("crates")
        .join("flock-core")
        .join("default_config.toml");

    match cli.command.unwrap_or_default() {
        CommandName::UpdateDefaultConfig => {
            let generated = generate_config(&root)?;
            fs::write(&dest, generated)
                .with_context(|| format!("write config to {}", dest.display()))?;
            println!("Updated {}", dest.display());
        }
        CommandName::CheckDefaultConfig => {
            let generated = generate_config(&root)?;
            let current = fs::read_to_string(&dest)
                .with_context(|| format!("read {}", dest.display()))?;
            if current != generated {
                bail!(
                    "{} is stale; run `cargo run -p xtask -- update-default-config`",
                    dest.display()
                );
            }
            println!("{} is up to date", dest.display());
        }
    }
    Ok(())
}

/// Runs `flock config generate` against an empty FLOCK_HOME.
fn generate_config(root: &Path) -> Result<String> {
    let home = tempfile::tempdir().context("create temp dir for FLOCK_HOME")?;

    let output = Command::new("cargo")
        .current_dir(root)
        .env("FLOCK_HOME", home.path())
        .args(["run", "--quiet", "-p", "flock", "--", "config", "generate"])
        .output()
        .context("run `cargo run -p flock -- config generate`")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("config generate failed: {stderr}");
    }
    String::from_utf8(output.stdout).context("config generate printed invalid UTF-8")
}

fn project_root() -> Result<PathBuf> {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let root = manifest_dir
        .ancestors()
        .nth(2)
        .context("locate workspace root from CARGO_MANIFEST_DIR")?;
    Ok(root.to_path_buf())
}
