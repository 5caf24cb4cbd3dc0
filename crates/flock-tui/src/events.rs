//! UI event types.
//!
//! Everything that can change state arrives as a `UiEvent`: terminal input,
//! and the results of async work sent back through the runtime inbox.

use crossterm::event::Event;
use flock_core::api::{ApiError, AuthResponse, FeedPage};
use flock_core::feed::FetchTicket;

#[derive(Debug)]
pub enum UiEvent {
    /// Sent once before the first render; mounts the screen for the stored session.
    Started,
    Terminal(Event),

    AuthCompleted {
        id: u64,
        result: Result<AuthResponse, ApiError>,
    },
    FeedLoaded {
        ticket: FetchTicket,
        result: Result<FeedPage, ApiError>,
    },
    PostCreated {
        id: u64,
        result: Result<(), ApiError>,
    },
    FollowCompleted {
        id: u64,
        result: Result<(), ApiError>,
    },
    /// The post-creation refresh delay elapsed.
    RefreshDue,

    /// Writing or clearing the session file failed.
    SessionStoreFailed {
        error: String,
    },
}
