//! Full-screen TUI for flock.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr};
use std::sync::Arc;

use anyhow::Result;
use flock_core::api::ApiClient;
use flock_core::config::Config;
use flock_core::session::SessionStore;
pub use runtime::TuiRuntime;

/// Runs the interactive client until the user quits.
///
/// Starts on the home screen when `store` holds a token, otherwise on the
/// sign-in form.
///
/// # Errors
/// Returns an error if stderr is not a terminal, the session cannot be read,
/// or terminal I/O fails.
pub async fn run_interactive(
    config: &Config,
    store: Arc<dyn SessionStore>,
    client: ApiClient,
) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The interactive client requires a terminal.\n\
             Use `flock feed` or `flock post` for non-interactive use."
        );
    }

    let session = store.get()?;
    tracing::info!(
        base_url = %client.base_url(),
        authenticated = session.is_authenticated(),
        "starting tui"
    );

    let mut runtime = TuiRuntime::new(config.clone(), session, client, store)?;
    runtime.run()?;
    drop(runtime);

    writeln!(stderr(), "Goodbye!")?;
    Ok(())
}
