//! Feed commands: read the feed, post, follow and unfollow.

use anyhow::{Context, Result, bail};
use flock_core::api::ApiClient;
use flock_core::feed::{
    CreateOutcome, FeedView, FetchOutcome, FilterMode, FollowState, MSG_FEED_FAILED,
    MSG_FOLLOW_FAILED, MSG_FOLLOW_REJECTED, MSG_LOGIN_REQUIRED, MSG_POST_FAILED,
};
use flock_core::session::SessionStore;

// One-shot commands issue a single request per view.
const REQUEST_ID: u64 = 1;

fn require_token(store: &dyn SessionStore) -> Result<String> {
    let session = store.get().context("read session")?;
    match session.token() {
        Some(token) => Ok(token.to_string()),
        None => bail!("{MSG_LOGIN_REQUIRED}"),
    }
}

pub async fn show(client: &ApiClient, store: &dyn SessionStore, following: bool) -> Result<()> {
    let token = require_token(store)?;

    let mut view = FeedView::new();
    if following {
        view.set_filter_mode(FilterMode::FollowingOnly);
    }
    let ticket = view.begin_fetch(REQUEST_ID, false);
    let result = client.fetch_feed(&token, ticket.mode).await;
    if view.finish_fetch(ticket, result) != FetchOutcome::Applied {
        bail!("{}", view.error().unwrap_or(MSG_FEED_FAILED));
    }

    println!("{}", view.filter_mode().title());
    if view.posts().is_empty() {
        println!("No posts to show");
        return Ok(());
    }

    for post in view.posts() {
        println!();
        println!("{}", post.body);
        let mut meta = format!(
            "  by {} ({})  {}",
            post.author_name,
            post.author_email,
            post.display_timestamp()
        );
        if view.can_follow(&post.author_id) {
            let state = match view.follow_state_of(&post.author_id) {
                FollowState::Following => "following",
                FollowState::NotFollowing => "not following",
            };
            meta.push_str(&format!("  [{state}: {}]", post.author_id));
        }
        println!("{meta}");
    }
    Ok(())
}

pub async fn post(client: &ApiClient, store: &dyn SessionStore, text: &str) -> Result<()> {
    let token = require_token(store)?;

    let mut view = FeedView::new();
    let Some(request) = view.begin_create_post(REQUEST_ID, true, text) else {
        bail!("{}", view.error().unwrap_or(MSG_POST_FAILED));
    };
    let result = client.create_post(&token, &request.text).await;
    match view.finish_create_post(request.id, result) {
        CreateOutcome::Posted => {
            println!("Posted.");
            Ok(())
        }
        CreateOutcome::Failed | CreateOutcome::Ignored => {
            bail!("{}", view.error().unwrap_or(MSG_POST_FAILED))
        }
    }
}

/// Sets the follow state for `user_id` directly; the CLI has no loaded
/// feed to toggle against.
pub async fn follow(
    client: &ApiClient,
    store: &dyn SessionStore,
    user_id: &str,
    target: FollowState,
) -> Result<()> {
    let token = require_token(store)?;
    if user_id.trim().is_empty() {
        bail!("User id cannot be empty.");
    }

    if let Err(err) = client.set_follow(&token, user_id, target).await {
        tracing::warn!(error = %err, user_id, "follow request failed");
        let fallback = if err.is_rejected() {
            MSG_FOLLOW_REJECTED
        } else {
            MSG_FOLLOW_FAILED
        };
        bail!("{}", err.service_message().unwrap_or(fallback));
    }

    match target {
        FollowState::Following => println!("Following {user_id}."),
        FollowState::NotFollowing => println!("Unfollowed {user_id}."),
    }
    Ok(())
}
