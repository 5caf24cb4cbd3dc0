//! Configuration management for flock.
//!
//! Loads configuration from ${FLOCK_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default feed service endpoint.
pub const DEFAULT_BASE_URL: &str = "https://chatbackends-1.onrender.com";

/// Environment variable that overrides the configured base URL.
pub const BASE_URL_ENV: &str = "FLOCK_BASE_URL";

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
/// To update, run `cargo run -p xtask -- update-default-config`.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Recursively merges items from source table into target table.
fn merge_items(target: &mut toml_edit::Table, source: &toml_edit::Table) {
    use toml_edit::Item;

    for (key, value) in source.iter() {
        match value {
            Item::Value(v) => {
                target[key] = Item::Value(v.clone());
            }
            Item::Table(src_table) => {
                if let Some(Item::Table(target_table)) = target.get_mut(key) {
                    merge_items(target_table, src_table);
                } else {
                    target[key] = Item::Table(src_table.clone());
                }
            }
            Item::ArrayOfTables(src_arr) => {
                target[key] = Item::ArrayOfTables(src_arr.clone());
            }
            Item::None => {}
        }
    }
}

pub mod paths {
    //! Path resolution for flock configuration and data files.
    //!
    //! FLOCK_HOME resolution order:
    //! 1. FLOCK_HOME environment variable (if set)
    //! 2. ~/.config/flock (default)

    use std::path::PathBuf;

    /// Returns the flock home directory.
    ///
    /// Checks FLOCK_HOME env var first, falls back to ~/.config/flock.
    /// Without a resolvable home directory, uses `.flock` in the working directory.
    pub fn flock_home() -> PathBuf {
        if let Ok(home) = std::env::var("FLOCK_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".flock"),
            |h| h.join(".config").join("flock"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        flock_home().join("config.toml")
    }

    /// Returns the path to the persisted session file.
    pub fn session_path() -> PathBuf {
        flock_home().join("session.json")
    }

    /// Returns the directory holding log files.
    pub fn log_dir() -> PathBuf {
        flock_home().join("logs")
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when FLOCK_LOG is unset.
    pub level: String,
    /// Whether to write logs to `$FLOCK_HOME/logs/flock.log`.
    pub file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: true,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feed service base URL (optional, falls back to the public service)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Delay before refetching the feed after creating a post
    pub refresh_delay_ms: u64,

    /// Logging configuration
    pub log: LogConfig,
}

impl Config {
    const DEFAULT_REFRESH_DELAY_MS: u64 = 500;

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Delay between a successful post and the follow-up feed read.
    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    ///
    /// # Errors
    /// Returns an error if the file exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Generates a fresh config TOML from Rust defaults.
    ///
    /// Uses the embedded template for structure/comments and merges
    /// generated values from `Config::default()` into it.
    ///
    /// # Errors
    /// Returns an error if serialization or template parsing fails.
    pub fn generate() -> Result<String> {
        use toml_edit::DocumentMut;

        let generated_toml = toml::to_string(&Config::default())
            .context("Failed to serialize default config to TOML")?;

        let mut doc: DocumentMut = default_config_template()
            .parse()
            .context("Failed to parse default config template")?;
        let generated_doc: DocumentMut = generated_toml
            .parse()
            .context("Failed to parse generated config")?;

        merge_items(doc.as_table_mut(), generated_doc.as_table());

        Ok(doc.to_string())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            refresh_delay_ms: Self::DEFAULT_REFRESH_DELAY_MS,
            log: LogConfig::default(),
        }
    }
}

/// Resolves the base URL with precedence: override (flag or env) > config >
/// default.
///
/// Blank values are treated as unset. Trailing slashes are removed so paths
/// can be appended directly.
///
/// # Errors
/// Returns an error if the selected URL does not parse.
pub fn resolve_base_url(
    override_value: Option<&str>,
    config_value: Option<&str>,
) -> Result<String> {
    let chosen = [override_value, config_value]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(DEFAULT_BASE_URL);

    url::Url::parse(chosen).with_context(|| format!("Invalid feed service base URL: {chosen}"))?;
    Ok(chosen.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.refresh_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "base_url = \"http://localhost:9000\"\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.refresh_delay_ms, 500);
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_load_nested_log_section() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "[log]\nlevel = \"debug\"\nfile = false\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.log.level, "debug");
        assert!(!config.log.file);
    }

    #[test]
    fn test_load_invalid_toml_is_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "refresh_delay_ms = \"soon\"\n").unwrap();

        assert!(Config::load_from(&config_path).is_err());
    }

    #[test]
    fn test_init_creates_config_with_template() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("# flock Configuration"));
        assert!(contents.contains("# base_url ="));
        assert_eq!(Config::load_from(&config_path).unwrap(), Config::default());
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "").unwrap();

        assert!(Config::init(&config_path).is_err());
    }

    #[test]
    fn test_generate_keeps_comments_and_defaults() {
        let generated = Config::generate().unwrap();

        assert!(generated.contains("# Delay before re-reading the feed"));
        let parsed: Config = toml::from_str(&generated).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_base_url_env_wins_over_config() {
        let url = resolve_base_url(Some("http://env.test"), Some("http://config.test")).unwrap();
        assert_eq!(url, "http://env.test");
    }

    #[test]
    fn test_base_url_blank_values_fall_through() {
        let url = resolve_base_url(Some("   "), Some("http://config.test/")).unwrap();
        assert_eq!(url, "http://config.test");

        let url = resolve_base_url(None, Some("")).unwrap();
        assert_eq!(url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_base_url_invalid_is_error() {
        assert!(resolve_base_url(None, Some("not a url")).is_err());
    }
}
