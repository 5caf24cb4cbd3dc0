use std::time::Duration;

use flock_core::api::ApiClient;
use flock_core::feed::{FetchTicket, FollowState};
use tokio::time;

use crate::events::UiEvent;

pub async fn fetch_feed(client: ApiClient, token: String, ticket: FetchTicket) -> UiEvent {
    tracing::debug!(id = ticket.id, mode = ?ticket.mode, "fetching feed");
    let result = client.fetch_feed(&token, ticket.mode).await;
    UiEvent::FeedLoaded { ticket, result }
}

pub async fn create_post(client: ApiClient, token: String, id: u64, text: String) -> UiEvent {
    let result = client.create_post(&token, &text).await;
    UiEvent::PostCreated { id, result }
}

pub async fn set_follow(
    client: ApiClient,
    token: String,
    id: u64,
    author_id: String,
    target: FollowState,
) -> UiEvent {
    let result = client.set_follow(&token, &author_id, target).await;
    UiEvent::FollowCompleted { id, result }
}

/// Waits out the post-creation delay before the feed is re-read.
pub async fn refresh_after(delay: Duration) -> UiEvent {
    time::sleep(delay).await;
    UiEvent::RefreshDue
}
