use flock_core::feed::{FeedView, Post};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use super::{HomeFocus, HomeScreen};
use crate::common::{scroll_to_cursor, truncate_with_ellipsis};
use crate::overlays::render_utils::{InputHint, render_hints};

const ACCENT: Color = Color::Cyan;

/// Renders the home screen: greeting, compose box, feed list, hints.
pub fn render_home(frame: &mut Frame, home: &HomeScreen, display_name: &str, area: Rect) {
    let [header, compose, error, list, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, display_name, header);
    render_compose(frame, home, compose);

    if let Some(message) = home.view.error() {
        let text = truncate_with_ellipsis(message, error.width as usize);
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(Color::Red))),
            error,
        );
    }

    render_feed(frame, home, list);

    let hints = match home.focus {
        HomeFocus::Compose => vec![
            InputHint::new("Enter", "post"),
            InputHint::new("Tab", "feed"),
            InputHint::new("Ctrl+R", "refresh"),
            InputHint::new("Ctrl+S", "filter"),
            InputHint::new("Ctrl+X", "logout"),
        ],
        HomeFocus::Feed => vec![
            InputHint::new("↑↓", "select"),
            InputHint::new("f", "follow"),
            InputHint::new("Tab", "compose"),
            InputHint::new("Ctrl+R", "refresh"),
            InputHint::new("Ctrl+S", "filter"),
            InputHint::new("Ctrl+X", "logout"),
        ],
    };
    render_hints(frame, footer, &hints, ACCENT);
}

fn render_header(frame: &mut Frame, display_name: &str, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            format!("Welcome, {display_name}"),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  (Ctrl+X logout)", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_compose(frame: &mut Frame, home: &HomeScreen, area: Rect) {
    let focused = home.focus == HomeFocus::Compose;
    let title = if home.view.is_posting() {
        " Create a Post (Posting...) "
    } else {
        " Create a Post "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(focused))
        .title(title);
    let inner = block.inner(area);

    let (visible, cursor_col) = scroll_to_cursor(
        home.compose.value(),
        home.compose.cursor_width(),
        inner.width as usize,
    );
    let text = if home.compose.is_empty() && !focused {
        Span::styled("What's on your mind?", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(visible)
    };
    frame.render_widget(Paragraph::new(text).block(block), area);

    if focused && !home.view.is_posting() && inner.width > 0 {
        let x = inner.x + cursor_col as u16;
        frame.set_cursor_position((x, inner.y));
    }
}

fn render_feed(frame: &mut Frame, home: &HomeScreen, area: Rect) {
    let view = &home.view;
    let focused = home.focus == HomeFocus::Feed;

    let mut title = format!(" {} ", view.filter_mode().title());
    if view.is_refreshing() {
        title.push_str("(Refreshing...) ");
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(focused))
        .title(title);

    if view.posts().is_empty() {
        let placeholder = if view.is_refreshing() {
            ""
        } else {
            "No posts to show"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(placeholder, Style::default().fg(Color::DarkGray)))
                .block(block),
            area,
        );
        return;
    }

    let width = block.inner(area).width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = view
        .posts()
        .iter()
        .map(|post| post_item(view, post, width))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol("▌ ")
        .highlight_style(if focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        });

    let mut state = ListState::default().with_selected(Some(home.selected()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn post_item<'a>(view: &FeedView, post: &'a Post, width: usize) -> ListItem<'a> {
    let mut meta = vec![
        Span::styled(
            format!("by {} ({})", post.author_name, post.author_email),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("  {}", post.display_timestamp()),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    if view.can_follow(&post.author_id) {
        let label = if view.is_follow_pending(&post.author_id) {
            "...".to_string()
        } else {
            view.follow_state_of(&post.author_id).action_label().to_string()
        };
        meta.push(Span::styled(
            format!("  [{label}]"),
            Style::default().fg(Color::Yellow),
        ));
    }

    ListItem::new(vec![
        Line::from(truncate_with_ellipsis(&post.body, width)),
        Line::from(meta),
        Line::default(),
    ])
}
