//! Core flock library (session, service client, controllers, config).
//!
//! Everything here is UI-agnostic. The TUI and the CLI drive the same
//! controllers:
//! - `auth`: login/signup form state machine
//! - `feed`: feed view state and server-response reconciliation
//! - `router`: route selection from the stored session
//! - `session`: persisted bearer token and display name
//! - `api`: HTTP client for the remote feed service

pub mod api;
pub mod auth;
pub mod config;
pub mod feed;
pub mod logging;
pub mod router;
pub mod session;
