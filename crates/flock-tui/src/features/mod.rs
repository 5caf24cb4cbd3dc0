//! Screen slices. Each owns its state, reducer helpers, and view.

pub mod auth;
pub mod feed;
