//! Auth screen view.

use flock_core::auth::{AuthMode, FormField};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::AuthScreen;
use crate::common::{mask, scroll_to_cursor, truncate_with_ellipsis};
use crate::overlays::render_utils::{
    InputHint, calculate_overlay_area, render_hints, render_overlay_container,
};

const FORM_WIDTH: u16 = 56;

/// Renders the sign-in / sign-up form centered in `area`.
pub fn render_auth(frame: &mut Frame, screen: &AuthScreen, area: Rect) {
    let fields = screen.form.fields();
    // Tabs and heading, three rows per field, submit error, button, hints.
    let height = 2 + 3 * fields.len() as u16 + 2 + 2 + 2;
    let popup = calculate_overlay_area(area, area.height, FORM_WIDTH, height);
    let accent = mode_color(screen.form.mode());
    render_overlay_container(frame, popup, "flock", accent);

    let inner = Rect::new(
        popup.x + 2,
        popup.y + 1,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(2),
    );

    let mut constraints = vec![Constraint::Length(2)];
    constraints.extend(fields.iter().map(|_| Constraint::Length(3)));
    constraints.extend([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Min(0),
    ]);
    let rows = Layout::vertical(constraints).split(inner);

    let mode = screen.form.mode();
    let heading = match mode {
        AuthMode::Login => "Welcome Back! Sign in to continue.",
        AuthMode::Signup => "Join Us Today! Create your account.",
    };
    frame.render_widget(
        Paragraph::new(vec![
            tabs_line(mode),
            Line::from(Span::styled(heading, Style::default().fg(Color::Gray))),
        ]),
        rows[0],
    );

    for (idx, field) in fields.iter().enumerate() {
        let row = rows[idx + 1];
        render_field(frame, screen, *field, row);
    }

    let tail = fields.len() + 1;
    if let Some(message) = screen.form.submit_error() {
        let text = truncate_with_ellipsis(message, rows[tail].width as usize);
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(Color::Red))),
            rows[tail],
        );
    }

    frame.render_widget(Paragraph::new(button_line(screen)), rows[tail + 1]);

    let hints = [
        InputHint::new("Enter", "submit"),
        InputHint::new("Tab", "next"),
        InputHint::new("Ctrl+T", "switch"),
        InputHint::new("Ctrl+P", "password"),
        InputHint::new("Esc", "quit"),
    ];
    render_hints(frame, rows[tail + 2], &hints, accent);
}

fn mode_color(mode: AuthMode) -> Color {
    match mode {
        AuthMode::Login => Color::Cyan,
        AuthMode::Signup => Color::Magenta,
    }
}

fn tabs_line(mode: AuthMode) -> Line<'static> {
    let tab = |tab_mode: AuthMode| {
        let label = format!(" {} ", tab_mode.title());
        if tab_mode == mode {
            Span::styled(
                label,
                Style::default()
                    .fg(Color::Black)
                    .bg(mode_color(mode))
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(label, Style::default().fg(Color::DarkGray))
        }
    };
    Line::from(vec![tab(AuthMode::Login), Span::raw("  "), tab(AuthMode::Signup)])
}

fn render_field(frame: &mut Frame, screen: &AuthScreen, field: FormField, area: Rect) {
    let focused = screen.focused_field() == field;
    let input = screen.input(field);
    let hidden = field == FormField::Password && !screen.show_password;

    let label_style = if focused {
        Style::default()
            .fg(mode_color(screen.form.mode()))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let mut label = vec![Span::styled(field.label(), label_style)];
    if field == FormField::Password {
        let toggle = if screen.show_password { " (shown)" } else { " (hidden)" };
        label.push(Span::styled(toggle, Style::default().fg(Color::DarkGray)));
    }

    let shown = if hidden {
        mask(input.value())
    } else {
        input.value().to_string()
    };
    // Masked text is one column per char.
    let cursor = if hidden {
        input.cursor()
    } else {
        input.cursor_width()
    };
    let value_width = area.width.saturating_sub(2) as usize;
    let (visible, cursor_col) = scroll_to_cursor(&shown, cursor, value_width);
    let value = Line::from(vec![Span::styled("> ", label_style), Span::raw(visible)]);

    let error = screen
        .form
        .error(field)
        .map_or_else(Line::default, |message| {
            Line::from(Span::styled(message, Style::default().fg(Color::Red)))
        });

    frame.render_widget(Paragraph::new(vec![Line::from(label), value, error]), area);

    if focused && value_width > 0 {
        let x = area.x + 2 + cursor_col as u16;
        frame.set_cursor_position((x, area.y + 1));
    }
}

fn button_line(screen: &AuthScreen) -> Line<'static> {
    if screen.form.is_submitting() {
        return Line::from(Span::styled(
            "Processing...",
            Style::default().fg(Color::Yellow),
        ));
    }
    let label = match screen.form.mode() {
        AuthMode::Login => "[ Sign In ]",
        AuthMode::Signup => "[ Create Account ]",
    };
    Line::from(Span::styled(
        label,
        Style::default()
            .fg(mode_color(screen.form.mode()))
            .add_modifier(Modifier::BOLD),
    ))
}
