//! Blocking alert dialog.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use super::OverlayTransition;
use super::render_utils::{
    InputHint, calculate_overlay_area, render_hints, render_overlay_container,
};

const MAX_WIDTH: u16 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertState {
    pub title: String,
    pub message: String,
}

impl AlertState {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Enter or Esc dismisses; every other key is swallowed.
    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayTransition {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => OverlayTransition::Close,
            _ => OverlayTransition::Stay,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let text_width = MAX_WIDTH.saturating_sub(4);
        let message_rows = (self.message.width() as u16).div_ceil(text_width.max(1)).max(1);
        // Border, blank, message, blank, hints, border.
        let height = message_rows + 5;
        let popup = calculate_overlay_area(area, area.height, MAX_WIDTH, height);
        render_overlay_container(frame, popup, &self.title, Color::Red);

        let inner = Rect::new(
            popup.x + 2,
            popup.y + 1,
            popup.width.saturating_sub(4),
            popup.height.saturating_sub(2),
        );

        let body = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                self.message.clone(),
                Style::default().fg(Color::White),
            )),
        ])
        .wrap(Wrap { trim: true });
        let body_area = Rect::new(
            inner.x,
            inner.y,
            inner.width,
            inner.height.saturating_sub(1),
        );
        frame.render_widget(body, body_area);

        render_hints(frame, inner, &[InputHint::new("Enter", "dismiss")], Color::Red);
    }
}
