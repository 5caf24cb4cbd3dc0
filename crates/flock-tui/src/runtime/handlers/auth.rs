use flock_core::api::{ApiClient, AuthRequest};

use crate::events::UiEvent;

/// Sends the login or signup request.
pub async fn authenticate(client: ApiClient, id: u64, request: AuthRequest) -> UiEvent {
    tracing::debug!(id, endpoint = request.endpoint(), "authenticating");
    let result = client.authenticate(&request).await;
    UiEvent::AuthCompleted { id, result }
}
