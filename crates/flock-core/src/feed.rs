//! Feed state and follow-status reconciliation.
//!
//! `FeedView` owns everything the home screen shows. Network calls are split
//! into a synchronous `begin_*` step that updates state and describes the
//! request, and a `finish_*` step that applies the result. Each request
//! carries a caller-supplied id from a single monotonic sequence; results
//! whose id the view does not recognise are ignored.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer};

use crate::api::{ApiError, FeedPage};

pub const MSG_FEED_REJECTED: &str = "Failed to load posts";
pub const MSG_FEED_FAILED: &str = "Error loading posts";
pub const MSG_LOGIN_REQUIRED: &str = "Please log in.";
pub const MSG_EMPTY_POST: &str = "Post cannot be empty.";
pub const MSG_POST_REJECTED: &str = "Post creation failed";
pub const MSG_POST_FAILED: &str = "Error creating post";
pub const MSG_FOLLOW_REJECTED: &str = "Follow/unfollow failed";
pub const MSG_FOLLOW_FAILED: &str = "Error during follow/unfollow";

/// A post as served by the feed service. Read-only on the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Post {
    #[serde(rename = "_id", default, deserialize_with = "nullable_string")]
    pub id: String,
    #[serde(rename = "userID", default, deserialize_with = "nullable_string")]
    pub author_id: String,
    #[serde(rename = "name", default, deserialize_with = "nullable_string")]
    pub author_name: String,
    #[serde(rename = "email", default, deserialize_with = "nullable_string")]
    pub author_email: String,
    #[serde(rename = "post", default, deserialize_with = "nullable_string")]
    pub body: String,
    /// Raw server timestamp.
    #[serde(rename = "createdAt", default, deserialize_with = "nullable_string")]
    pub created_at: String,
}

impl Post {
    /// `created_at` in local time, when it is an RFC 3339 timestamp.
    pub fn created_at_local(&self) -> Option<DateTime<Local>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|t| t.with_timezone(&Local))
    }

    /// Local `YYYY-MM-DD HH:MM`, or the raw server string.
    pub fn display_timestamp(&self) -> String {
        self.created_at_local().map_or_else(
            || self.created_at.clone(),
            |t| t.format("%Y-%m-%d %H:%M").to_string(),
        )
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Which feed endpoint to read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    All,
    FollowingOnly,
}

impl FilterMode {
    /// Path segments under `/user/`.
    pub fn path_segments(self) -> &'static [&'static str] {
        match self {
            FilterMode::All => &["feed"],
            FilterMode::FollowingOnly => &["following", "feed"],
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FilterMode::All => FilterMode::FollowingOnly,
            FilterMode::FollowingOnly => FilterMode::All,
        }
    }

    /// Heading of the feed list.
    pub fn title(self) -> &'static str {
        match self {
            FilterMode::All => "All Posts",
            FilterMode::FollowingOnly => "Following Posts",
        }
    }
}

/// Relationship of the current user to a post author.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowState {
    Following,
    NotFollowing,
}

impl FollowState {
    /// Wire value: `follow` means following, `unfollow` means not following.
    pub fn as_wire(self) -> &'static str {
        match self {
            FollowState::Following => "follow",
            FollowState::NotFollowing => "unfollow",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FollowState::Following => FollowState::NotFollowing,
            FollowState::NotFollowing => FollowState::Following,
        }
    }

    /// Label of the action that would toggle this state.
    pub fn action_label(self) -> &'static str {
        match self {
            FollowState::Following => "Unfollow",
            FollowState::NotFollowing => "Follow",
        }
    }
}

/// Per-author follow state for the loaded feed.
pub type FollowStatus = HashMap<String, FollowState>;

/// Derives the follow map from a freshly loaded feed.
///
/// Authors that are empty or equal to `current_user_id` get no entry. The
/// first post by an author decides its entry; later posts by the same author
/// are not re-evaluated.
pub fn rebuild_follow_status(
    posts: &[Post],
    current_user_id: &str,
    following: &[String],
) -> FollowStatus {
    let mut status = FollowStatus::new();
    for post in posts {
        let author = post.author_id.as_str();
        if author.is_empty() || author == current_user_id || status.contains_key(author) {
            continue;
        }
        let state = if following.iter().any(|id| id == author) {
            FollowState::Following
        } else {
            FollowState::NotFollowing
        };
        status.insert(author.to_string(), state);
    }
    status
}

/// Handle for an issued feed read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub id: u64,
    pub mode: FilterMode,
    pub show_loader: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Failed,
    /// A newer fetch started after this one; its result was dropped.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePostRequest {
    pub id: u64,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The post was accepted; the caller should refetch after the refresh delay.
    Posted,
    Failed,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowRequest {
    pub id: u64,
    pub author_id: String,
    pub target: FollowState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowOutcome {
    Applied {
        author_id: String,
        state: FollowState,
    },
    /// Nothing changed; `alert` must be shown as a blocking message.
    Failed {
        alert: String,
    },
    Ignored,
}

/// State of the home screen.
#[derive(Debug, Clone, Default)]
pub struct FeedView {
    posts: Vec<Post>,
    current_user_id: String,
    follow_status: FollowStatus,
    filter_mode: FilterMode,
    error: Option<String>,
    draft: String,
    loader_fetches: HashSet<u64>,
    latest_fetch: Option<u64>,
    create_in_flight: Option<u64>,
    follow_in_flight: HashMap<u64, (String, FollowState)>,
}

impl FeedView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Posts, newest first.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn current_user_id(&self) -> &str {
        &self.current_user_id
    }

    pub fn follow_status(&self) -> &FollowStatus {
        &self.follow_status
    }

    /// Follow state for `author_id`; absent means not following.
    pub fn follow_state_of(&self, author_id: &str) -> FollowState {
        self.follow_status
            .get(author_id)
            .copied()
            .unwrap_or(FollowState::NotFollowing)
    }

    /// Whether a follow button belongs on a post by `author_id`.
    pub fn can_follow(&self, author_id: &str) -> bool {
        !author_id.is_empty() && author_id != self.current_user_id
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }

    /// True while at least one loader-visible fetch is in flight.
    pub fn is_refreshing(&self) -> bool {
        !self.loader_fetches.is_empty()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Busy flag for post creation.
    pub fn is_posting(&self) -> bool {
        self.create_in_flight.is_some()
    }

    pub fn is_follow_pending(&self, author_id: &str) -> bool {
        self.follow_in_flight
            .values()
            .any(|(author, _)| author == author_id)
    }

    /// Starts a feed read for the current filter mode.
    pub fn begin_fetch(&mut self, id: u64, show_loader: bool) -> FetchTicket {
        self.error = None;
        self.latest_fetch = Some(id);
        if show_loader {
            self.loader_fetches.insert(id);
        }
        FetchTicket {
            id,
            mode: self.filter_mode,
            show_loader,
        }
    }

    /// Applies a feed read result.
    ///
    /// The refreshing flag is always released for loader fetches, even when
    /// the result is dropped because a newer fetch has started.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<FeedPage, ApiError>,
    ) -> FetchOutcome {
        self.loader_fetches.remove(&ticket.id);
        if self.latest_fetch != Some(ticket.id) {
            tracing::debug!(id = ticket.id, "dropping superseded feed response");
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(page) => {
                self.apply_page(page);
                FetchOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(error = %err, "feed fetch failed");
                self.error = Some(
                    if err.is_rejected() {
                        MSG_FEED_REJECTED
                    } else {
                        MSG_FEED_FAILED
                    }
                    .to_string(),
                );
                FetchOutcome::Failed
            }
        }
    }

    fn apply_page(&mut self, page: FeedPage) {
        let mut posts: Vec<Post> = page.posts.into_iter().flatten().collect();
        posts.reverse();

        if let Some(following) = &page.following {
            self.follow_status = rebuild_follow_status(&posts, &page.current_user_id, following);
        }
        self.posts = posts;
        self.current_user_id = page.current_user_id;
    }

    /// Validates and starts a post creation.
    ///
    /// Returns `None` without touching the network when not authenticated,
    /// when `text` is blank, or while another creation is in flight.
    pub fn begin_create_post(
        &mut self,
        id: u64,
        authenticated: bool,
        text: &str,
    ) -> Option<CreatePostRequest> {
        if self.create_in_flight.is_some() {
            return None;
        }
        if !authenticated {
            self.error = Some(MSG_LOGIN_REQUIRED.to_string());
            return None;
        }
        if text.trim().is_empty() {
            self.error = Some(MSG_EMPTY_POST.to_string());
            return None;
        }

        self.error = None;
        self.create_in_flight = Some(id);
        Some(CreatePostRequest {
            id,
            text: text.to_string(),
        })
    }

    pub fn finish_create_post(&mut self, id: u64, result: Result<(), ApiError>) -> CreateOutcome {
        if self.create_in_flight != Some(id) {
            return CreateOutcome::Ignored;
        }
        self.create_in_flight = None;

        match result {
            Ok(()) => {
                self.draft.clear();
                CreateOutcome::Posted
            }
            Err(err) => {
                tracing::warn!(error = %err, "post creation failed");
                let fallback = if err.is_rejected() {
                    MSG_POST_REJECTED
                } else {
                    MSG_POST_FAILED
                };
                self.error = Some(err.service_message().unwrap_or(fallback).to_string());
                CreateOutcome::Failed
            }
        }
    }

    /// Starts a follow toggle for `author_id`; the target is the opposite of
    /// the current state.
    pub fn begin_toggle_follow(&mut self, id: u64, author_id: &str) -> Option<FollowRequest> {
        if !self.can_follow(author_id) || self.is_follow_pending(author_id) {
            return None;
        }

        let target = self.follow_state_of(author_id).toggled();
        self.follow_in_flight
            .insert(id, (author_id.to_string(), target));
        Some(FollowRequest {
            id,
            author_id: author_id.to_string(),
            target,
        })
    }

    /// Applies a follow toggle result. The map changes only on success, and
    /// only for authors still present in the loaded posts.
    pub fn finish_toggle_follow(&mut self, id: u64, result: Result<(), ApiError>) -> FollowOutcome {
        let Some((author_id, target)) = self.follow_in_flight.remove(&id) else {
            return FollowOutcome::Ignored;
        };

        match result {
            Ok(()) => {
                if self.posts.iter().any(|post| post.author_id == author_id) {
                    self.follow_status.insert(author_id.clone(), target);
                }
                FollowOutcome::Applied {
                    author_id,
                    state: target,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, author_id, "follow toggle failed");
                let fallback = if err.is_rejected() {
                    MSG_FOLLOW_REJECTED
                } else {
                    MSG_FOLLOW_FAILED
                };
                FollowOutcome::Failed {
                    alert: err.service_message().unwrap_or(fallback).to_string(),
                }
            }
        }
    }

    /// Returns true if the mode changed, in which case the caller refetches
    /// with the loader.
    pub fn set_filter_mode(&mut self, mode: FilterMode) -> bool {
        if self.filter_mode == mode {
            return false;
        }
        self.filter_mode = mode;
        true
    }
}
