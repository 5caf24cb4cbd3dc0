//! TUI runtime: owns the terminal, runs the event loop, executes effects.
//!
//! This is the "Elm runtime" boundary. The reducer stays pure and produces
//! effects; all I/O happens here.
//!
//! Async results come back through an inbox channel: handlers return a
//! `UiEvent`, `spawn_effect` sends it to `inbox_tx`, and the loop drains
//! `inbox_rx` before polling the terminal.

mod handlers;
mod inbox;

use std::future::Future;
use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event;
use flock_core::api::{ApiClient, ApiError};
use flock_core::config::Config;
use flock_core::feed::MSG_LOGIN_REQUIRED;
use flock_core::session::{Session, SessionStore};
use inbox::{UiEventReceiver, UiEventSender};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Poll timeout for terminal input. Inbox events are picked up at least
/// this often.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(50);

/// Full-screen TUI runtime.
///
/// Must be driven from inside a tokio runtime; handlers are spawned onto it.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    client: ApiClient,
    store: Arc<dyn SessionStore>,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
}

impl TuiRuntime {
    /// Sets up the terminal and initial state from the stored session.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be configured.
    pub fn new(
        config: Config,
        session: Session,
        client: ApiClient,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state: AppState::new(config, session),
            client,
            store,
            inbox_tx,
            inbox_rx,
        })
    }

    /// Runs the main event loop until the user quits.
    ///
    /// # Errors
    /// Returns an error if terminal I/O fails.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;
        let result = self.event_loop();
        let _ = terminal::disable_input_features();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        self.dispatch_event(UiEvent::Started);
        let mut dirty = true;

        while !self.state.tui.should_quit {
            if dirty {
                self.terminal.draw(|frame| render::render(&self.state, frame))?;
                dirty = false;
            }

            let events = self.collect_events()?;
            for event in events {
                dirty = true;
                self.dispatch_event(event);
                if self.state.tui.should_quit {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Drains the inbox, then waits briefly for terminal input.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();
        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        let poll_duration = if events.is_empty() {
            IDLE_POLL_DURATION
        } else {
            Duration::ZERO
        };
        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        Ok(events)
    }

    fn dispatch_event(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns an async handler and sends its result event to the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    fn send(&self, event: UiEvent) {
        let _ = self.inbox_tx.send(event);
    }

    /// Token for an outgoing request, or the error event to deliver instead.
    fn token_or<E>(&self, on_missing: E) -> Option<String>
    where
        E: FnOnce(ApiError) -> UiEvent,
    {
        if let Some(token) = self.state.tui.session.token() {
            return Some(token.to_string());
        }
        tracing::warn!("request issued without a session token");
        self.send(on_missing(ApiError::Status {
            status: 401,
            message: Some(MSG_LOGIN_REQUIRED.to_string()),
        }));
        None
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.tui.should_quit = true;
            }

            UiEffect::Authenticate { id, request } => {
                let client = self.client.clone();
                self.spawn_effect(move || handlers::authenticate(client, id, request));
            }
            UiEffect::PersistSession { session } => {
                if let Err(err) = self.store.set(&session) {
                    self.send(UiEvent::SessionStoreFailed {
                        error: format!("{err:#}"),
                    });
                }
            }
            UiEffect::ClearSession => {
                if let Err(err) = self.store.clear() {
                    self.send(UiEvent::SessionStoreFailed {
                        error: format!("{err:#}"),
                    });
                }
            }

            UiEffect::FetchFeed { ticket } => {
                let Some(token) =
                    self.token_or(|err| UiEvent::FeedLoaded { ticket, result: Err(err) })
                else {
                    return;
                };
                let client = self.client.clone();
                self.spawn_effect(move || handlers::fetch_feed(client, token, ticket));
            }
            UiEffect::CreatePost { id, text } => {
                let Some(token) =
                    self.token_or(|err| UiEvent::PostCreated { id, result: Err(err) })
                else {
                    return;
                };
                let client = self.client.clone();
                self.spawn_effect(move || handlers::create_post(client, token, id, text));
            }
            UiEffect::SetFollow {
                id,
                author_id,
                target,
            } => {
                let Some(token) =
                    self.token_or(|err| UiEvent::FollowCompleted { id, result: Err(err) })
                else {
                    return;
                };
                let client = self.client.clone();
                self.spawn_effect(move || {
                    handlers::set_follow(client, token, id, author_id, target)
                });
            }
            UiEffect::ScheduleRefresh { delay } => {
                self.spawn_effect(move || handlers::refresh_after(delay));
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
