//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui Frame, and never
//! mutate state or return effects.

use ratatui::Frame;

use crate::features::{auth, feed};
use crate::overlays::OverlayExt;
use crate::state::{AppState, Screen};

/// Renders the mounted screen, then the overlay on top.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let state = &app.tui;

    match &state.screen {
        Screen::Auth(screen) => auth::render_auth(frame, screen, area),
        Screen::Home(home) => feed::render_home(frame, home, state.session.display_name(), area),
    }

    app.overlay.render(frame, area);
}
