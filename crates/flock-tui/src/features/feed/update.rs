//! Home screen reducer helpers.
//!
//! These mutate `HomeScreen` through the core `FeedView` and return the
//! effects to run. Logout and quit are handled by the top-level reducer.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use flock_core::api::{ApiError, FeedPage};
use flock_core::feed::{CreateOutcome, FetchOutcome, FetchTicket, FollowOutcome};

use super::{HomeFocus, HomeScreen};
use crate::common::TaskSeq;
use crate::effects::UiEffect;

/// Starts a feed read for the current filter mode.
pub fn start_fetch(home: &mut HomeScreen, seq: &mut TaskSeq, show_loader: bool) -> UiEffect {
    let ticket = home.view.begin_fetch(seq.next_id().0, show_loader);
    UiEffect::FetchFeed { ticket }
}

pub fn handle_key(
    home: &mut HomeScreen,
    seq: &mut TaskSeq,
    authenticated: bool,
    key: KeyEvent,
) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('r') if ctrl => {
            if home.view.is_refreshing() {
                return vec![];
            }
            vec![start_fetch(home, seq, true)]
        }
        KeyCode::Char('s') if ctrl => {
            let mode = home.view.filter_mode().toggled();
            if home.view.set_filter_mode(mode) {
                home.selected = 0;
                vec![start_fetch(home, seq, true)]
            } else {
                vec![]
            }
        }
        KeyCode::Tab | KeyCode::BackTab => {
            home.focus = match home.focus {
                HomeFocus::Compose => HomeFocus::Feed,
                HomeFocus::Feed => HomeFocus::Compose,
            };
            vec![]
        }
        _ => match home.focus {
            HomeFocus::Compose => handle_compose_key(home, seq, authenticated, key),
            HomeFocus::Feed => handle_feed_key(home, seq, key),
        },
    }
}

fn handle_compose_key(
    home: &mut HomeScreen,
    seq: &mut TaskSeq,
    authenticated: bool,
    key: KeyEvent,
) -> Vec<UiEffect> {
    if key.code == KeyCode::Enter {
        let id = seq.next_id().0;
        let text = home.compose.value().to_string();
        return home
            .view
            .begin_create_post(id, authenticated, &text)
            .map(|request| UiEffect::CreatePost {
                id: request.id,
                text: request.text,
            })
            .into_iter()
            .collect();
    }

    // The compose box is disabled while a post is being created.
    if !home.view.is_posting() && home.compose.handle_key(key) {
        home.view.set_draft(home.compose.value());
    }
    vec![]
}

fn handle_feed_key(home: &mut HomeScreen, seq: &mut TaskSeq, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            home.select_prev();
            vec![]
        }
        KeyCode::Down | KeyCode::Char('j') => {
            home.select_next();
            vec![]
        }
        KeyCode::Enter | KeyCode::Char('f') => {
            let Some(author_id) = home.selected_post().map(|p| p.author_id.clone()) else {
                return vec![];
            };
            let id = seq.next_id().0;
            home.view
                .begin_toggle_follow(id, &author_id)
                .map(|request| UiEffect::SetFollow {
                    id: request.id,
                    author_id: request.author_id,
                    target: request.target,
                })
                .into_iter()
                .collect()
        }
        _ => vec![],
    }
}

pub fn handle_paste(home: &mut HomeScreen, text: &str) {
    if home.focus == HomeFocus::Compose && !home.view.is_posting() {
        home.compose.insert_str(text);
        home.view.set_draft(home.compose.value());
    }
}

pub fn handle_feed_loaded(
    home: &mut HomeScreen,
    ticket: FetchTicket,
    result: Result<FeedPage, ApiError>,
) -> FetchOutcome {
    let outcome = home.view.finish_fetch(ticket, result);
    home.clamp_selection();
    outcome
}

/// On success, clears the compose box and schedules the delayed refetch.
pub fn handle_post_created(
    home: &mut HomeScreen,
    id: u64,
    result: Result<(), ApiError>,
    refresh_delay: Duration,
) -> Vec<UiEffect> {
    match home.view.finish_create_post(id, result) {
        CreateOutcome::Posted => {
            home.compose.clear();
            vec![UiEffect::ScheduleRefresh {
                delay: refresh_delay,
            }]
        }
        CreateOutcome::Failed | CreateOutcome::Ignored => vec![],
    }
}

/// Returns the alert message when the toggle failed.
pub fn handle_follow_completed(
    home: &mut HomeScreen,
    id: u64,
    result: Result<(), ApiError>,
) -> Option<String> {
    match home.view.finish_toggle_follow(id, result) {
        FollowOutcome::Failed { alert } => Some(alert),
        FollowOutcome::Applied { .. } | FollowOutcome::Ignored => None,
    }
}

/// Non-loader refetch after a post was created.
pub fn handle_refresh_due(home: &mut HomeScreen, seq: &mut TaskSeq) -> UiEffect {
    start_fetch(home, seq, false)
}
