//! Application state composition.
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── config: Config          (refresh delay)
//! │   ├── session: Session        (token + display name, mirrors the store)
//! │   ├── screen: Screen          (auth form or home feed)
//! │   └── task_seq: TaskSeq       (request id generator)
//! └── overlay: Option<Overlay>    (blocking alert)
//! ```
//!
//! State is split between `TuiState` and `Option<Overlay>` so overlay key
//! handlers can borrow both at once.

use flock_core::config::Config;
use flock_core::router::Route;
use flock_core::session::Session;

use crate::common::TaskSeq;
use crate::features::auth::AuthScreen;
use crate::features::feed::HomeScreen;
use crate::overlays::Overlay;

/// Combined application state for the TUI.
pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    /// Creates state for the given stored session.
    ///
    /// Starts on the auth screen; `UiEvent::Started` moves to the route the
    /// session selects.
    pub fn new(config: Config, session: Session) -> Self {
        Self {
            tui: TuiState {
                config,
                session,
                screen: Screen::Auth(AuthScreen::default()),
                task_seq: TaskSeq::default(),
                should_quit: false,
            },
            overlay: None,
        }
    }
}

/// Non-overlay UI state.
pub struct TuiState {
    pub config: Config,
    pub session: Session,
    pub screen: Screen,
    pub task_seq: TaskSeq,
    pub should_quit: bool,
}

/// The mounted screen. Each route owns its state; leaving a route drops it.
#[derive(Debug)]
pub enum Screen {
    Auth(AuthScreen),
    Home(HomeScreen),
}

impl Screen {
    pub fn route(&self) -> Route {
        match self {
            Screen::Auth(_) => Route::Auth,
            Screen::Home(_) => Route::Home,
        }
    }

    pub fn as_home_mut(&mut self) -> Option<&mut HomeScreen> {
        match self {
            Screen::Home(home) => Some(home),
            Screen::Auth(_) => None,
        }
    }

    pub fn as_auth_mut(&mut self) -> Option<&mut AuthScreen> {
        match self {
            Screen::Auth(auth) => Some(auth),
            Screen::Home(_) => None,
        }
    }
}
