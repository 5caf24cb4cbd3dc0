//! Text utilities for TUI rendering.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncates a string with ellipsis if it exceeds `max_width` terminal columns.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return "…".to_string();
    }
    let mut truncated = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width + 1 > max_width {
            break;
        }
        width += ch_width;
        truncated.push(ch);
    }
    truncated.push('…');
    truncated
}

/// Visible slice of a single-line input `width` columns wide, scrolled so
/// the cursor stays on screen. Returns the slice and the cursor column
/// within it.
///
/// The column after the last char is kept free so the cursor can sit at
/// the end of the text.
pub fn scroll_to_cursor(text: &str, cursor_col: usize, width: usize) -> (String, usize) {
    if width == 0 {
        return (String::new(), 0);
    }

    let mut chars = text.chars();
    let mut skipped = 0;
    while cursor_col.saturating_sub(skipped) >= width {
        let Some(ch) = chars.next() else {
            break;
        };
        skipped += ch.width().unwrap_or(0);
    }

    let mut visible = String::new();
    let mut used = 0;
    for ch in chars {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > width {
            break;
        }
        used += ch_width;
        visible.push(ch);
    }
    (visible, cursor_col.saturating_sub(skipped))
}

/// One mask character per input character.
pub fn mask(text: &str) -> String {
    "•".repeat(text.chars().count())
}
