//! Overlay modules for the TUI.
//!
//! Overlays are modal UI components that temporarily take over keyboard input.
//! While one is open, no key reaches the screen underneath.
//!
//! - `alert.rs`: blocking message dialog (follow failures, session store errors)
//! - `render_utils.rs`: shared rendering helpers, also used by full screens

pub mod alert;
pub mod render_utils;

pub use alert::AlertState;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

/// Transition returned by overlay key handlers.
#[derive(Debug)]
pub enum OverlayTransition {
    Stay,
    Close,
}

#[derive(Debug)]
pub enum Overlay {
    Alert(AlertState),
}

impl Overlay {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Overlay::Alert(alert) => alert.render(frame, area),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayTransition {
        match self {
            Overlay::Alert(alert) => alert.handle_key(key),
        }
    }
}

/// Extension trait for `Option<Overlay>` providing convenience helpers.
pub trait OverlayExt {
    /// Renders the overlay if one is active.
    fn render(&self, frame: &mut Frame, area: Rect);

    /// Routes a key to the active overlay. Returns false if none is open.
    fn handle_key(&mut self, key: KeyEvent) -> bool;
}

impl OverlayExt for Option<Overlay> {
    fn render(&self, frame: &mut Frame, area: Rect) {
        if let Some(overlay) = self {
            overlay.render(frame, area);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let Some(overlay) = self.as_mut() else {
            return false;
        };
        if matches!(overlay.handle_key(key), OverlayTransition::Close) {
            *self = None;
        }
        true
    }
}
