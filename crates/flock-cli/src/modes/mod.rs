//! Runtime execution modes.
//!
//! - `tui`: full-screen interactive client (optional feature)
//! - everything else lives in `cli::commands` and prints to stdout

#[cfg(feature = "tui")]
pub use flock_tui::run_interactive;

#[cfg(not(feature = "tui"))]
pub async fn run_interactive(
    _config: &flock_core::config::Config,
    _store: std::sync::Arc<dyn flock_core::session::SessionStore>,
    _client: flock_core::api::ApiClient,
) -> anyhow::Result<()> {
    anyhow::bail!("TUI support is disabled in this build (feature \"tui\").");
}
