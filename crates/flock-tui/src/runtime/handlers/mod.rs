//! Effect handlers for the TUI runtime.
//!
//! Handlers are pure async functions that return a `UiEvent`. They perform
//! I/O and never touch state; the runtime spawns them with `spawn_effect`
//! and routes the returned event through the inbox.

pub mod auth;
pub mod feed;

pub use auth::*;
pub use feed::*;
