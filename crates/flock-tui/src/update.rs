//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.
//!
//! Routing is derived from the session: whenever the session changes, the
//! mounted screen is compared against `Route::for_session` and swapped if
//! they disagree. Mounting the home screen starts the initial feed read.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use flock_core::router::Route;
use flock_core::session::Session;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::auth::{self, AuthScreen};
use crate::features::feed::{self, HomeScreen};
use crate::overlays::{AlertState, Overlay, OverlayExt};
use crate::state::{AppState, Screen, TuiState};

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Started => navigate(&mut app.tui),
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),

        UiEvent::AuthCompleted { id, result } => {
            let Some(screen) = app.tui.screen.as_auth_mut() else {
                tracing::debug!("auth result arrived after leaving the auth screen");
                return vec![];
            };
            let Some(session) = auth::handle_auth_completed(screen, id, result) else {
                return vec![];
            };
            tracing::info!("signed in");
            app.tui.session = session.clone();
            let mut effects = vec![UiEffect::PersistSession { session }];
            effects.extend(navigate(&mut app.tui));
            effects
        }
        UiEvent::FeedLoaded { ticket, result } => {
            if let Some(home) = app.tui.screen.as_home_mut() {
                feed::handle_feed_loaded(home, ticket, result);
            }
            vec![]
        }
        UiEvent::PostCreated { id, result } => {
            let delay = app.tui.config.refresh_delay();
            match app.tui.screen.as_home_mut() {
                Some(home) => feed::handle_post_created(home, id, result, delay),
                None => vec![],
            }
        }
        UiEvent::FollowCompleted { id, result } => {
            let alert = app
                .tui
                .screen
                .as_home_mut()
                .and_then(|home| feed::handle_follow_completed(home, id, result));
            if let Some(message) = alert {
                app.overlay = Some(Overlay::Alert(AlertState::new("Follow/unfollow", message)));
            }
            vec![]
        }
        UiEvent::RefreshDue => {
            let TuiState {
                screen, task_seq, ..
            } = &mut app.tui;
            match screen.as_home_mut() {
                Some(home) => vec![feed::handle_refresh_due(home, task_seq)],
                None => vec![],
            }
        }
        UiEvent::SessionStoreFailed { error } => {
            tracing::warn!(%error, "session store failed");
            app.overlay = Some(Overlay::Alert(AlertState::new(
                "Session",
                format!("Could not save session: {error}"),
            )));
            vec![]
        }
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Paste(text) => {
            if app.overlay.is_some() {
                return vec![];
            }
            match &mut app.tui.screen {
                Screen::Auth(screen) => auth::handle_paste(screen, &text),
                Screen::Home(home) => feed::handle_paste(home, &text),
            }
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return vec![UiEffect::Quit];
    }

    if app.overlay.handle_key(key) {
        return vec![];
    }

    if ctrl && key.code == KeyCode::Char('x') && app.tui.screen.route() == Route::Home {
        return logout(&mut app.tui);
    }

    let TuiState {
        screen,
        session,
        task_seq,
        ..
    } = &mut app.tui;
    match screen {
        Screen::Auth(screen) => auth::handle_key(screen, task_seq, key),
        Screen::Home(home) => feed::handle_key(home, task_seq, session.is_authenticated(), key),
    }
}

/// Drops the session and returns to the auth screen. The service is not
/// notified; the token is simply forgotten.
fn logout(tui: &mut TuiState) -> Vec<UiEffect> {
    tracing::info!("signed out");
    tui.session = Session::default();
    let mut effects = vec![UiEffect::ClearSession];
    effects.extend(navigate(tui));
    effects
}

/// Mounts the screen selected by the current session, if it differs from
/// the mounted one.
fn navigate(tui: &mut TuiState) -> Vec<UiEffect> {
    let route = Route::for_session(&tui.session);
    if route == tui.screen.route() {
        return vec![];
    }
    tracing::debug!(?route, "navigating");

    match route {
        Route::Auth => {
            tui.screen = Screen::Auth(AuthScreen::default());
            vec![]
        }
        Route::Home => {
            let mut home = HomeScreen::default();
            let effect = feed::start_fetch(&mut home, &mut tui.task_seq, true);
            tui.screen = Screen::Home(home);
            vec![effect]
        }
    }
}
