//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They cover I/O only: HTTP calls, session persistence, and timers.
//!
//! Effects never carry the bearer token. The runtime reads it from the
//! session in state when it executes a request.

use std::time::Duration;

use flock_core::api::AuthRequest;
use flock_core::feed::{FetchTicket, FollowState};
use flock_core::session::Session;

#[derive(Debug, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Send a login or signup request.
    Authenticate { id: u64, request: AuthRequest },

    /// Write the session to the store.
    PersistSession { session: Session },

    /// Remove the stored session.
    ClearSession,

    /// Read the feed selected by the ticket's filter mode.
    FetchFeed { ticket: FetchTicket },

    CreatePost { id: u64, text: String },

    SetFollow {
        id: u64,
        author_id: String,
        target: FollowState,
    },

    /// Send `UiEvent::RefreshDue` after `delay`.
    ScheduleRefresh { delay: Duration },
}
