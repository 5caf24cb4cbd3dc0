//! HTTP client for the feed service.
//!
//! Every call is a single request: no timeouts, no retries. Authenticated
//! calls send `Authorization: Bearer <token>`; the token never reaches logs.

mod error;
mod types;

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

pub use self::error::ApiError;
pub use self::types::{AuthRequest, AuthResponse, FeedPage};
use self::types::{CreatePostBody, FeedBody, FollowBody, SUCCESS, StatusBody};
use crate::feed::{FilterMode, FollowState};

/// Standard User-Agent header for flock requests.
pub const CLIENT_USER_AGENT: &str = concat!("flock/", env!("CARGO_PKG_VERSION"));

/// Client for the `/user/*` endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client rooted at `base_url`.
    ///
    /// # Errors
    /// Returns an error if the URL is malformed or cannot carry a path.
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .with_context(|| format!("Invalid feed service base URL: {base_url}"))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("Feed service base URL cannot carry a path: {base_url}");
        }

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { base, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `POST /user/login` or `POST /user/signup`.
    ///
    /// The body `status` is not inspected here; a 2xx response without a
    /// token is reported through `AuthResponse::token` being `None`.
    ///
    /// # Errors
    /// Returns `ApiError` for non-2xx responses, transport failures, or
    /// undecodable bodies.
    pub async fn authenticate(&self, request: &AuthRequest) -> Result<AuthResponse, ApiError> {
        let url = self.endpoint(&[request.endpoint()]);
        tracing::debug!(endpoint = request.endpoint(), "sending auth request");

        let response = self.http.post(url).json(request).send().await;
        read_json(response).await
    }

    /// `GET /user/feed` or `GET /user/following/feed`.
    ///
    /// # Errors
    /// Returns `ApiError::Rejected` when the body status is not `"success"`.
    pub async fn fetch_feed(&self, token: &str, mode: FilterMode) -> Result<FeedPage, ApiError> {
        let url = self.endpoint(mode.path_segments());
        tracing::debug!(?mode, "fetching feed");

        let response = self.http.get(url).header(AUTHORIZATION, bearer(token)).send().await;
        let body: FeedBody = read_json(response).await?;

        if body.status.as_deref() != Some(SUCCESS) {
            tracing::warn!(status = ?body.status, "feed request rejected");
            return Err(ApiError::Rejected {
                message: body.message,
            });
        }

        let page = FeedPage {
            posts: body.data.unwrap_or_default(),
            current_user_id: body.current_user_id.unwrap_or_default(),
            following: body.following,
        };
        tracing::debug!(posts = page.posts.len(), "feed loaded");
        Ok(page)
    }

    /// `POST /user/post` with `{post}`.
    ///
    /// # Errors
    /// Returns `ApiError::Rejected` when the body status is not `"success"`.
    pub async fn create_post(&self, token: &str, text: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["post"]);
        self.send_status(url, token, &CreatePostBody { post: text })
            .await
    }

    /// `POST /user/follow/:userID` with `{status: "follow" | "unfollow"}`.
    ///
    /// # Errors
    /// Returns `ApiError::Rejected` when the body status is not `"success"`.
    pub async fn set_follow(
        &self,
        token: &str,
        user_id: &str,
        target: FollowState,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["follow", user_id]);
        tracing::debug!(user_id, target = target.as_wire(), "sending follow request");
        self.send_status(
            url,
            token,
            &FollowBody {
                status: target.as_wire(),
            },
        )
        .await
    }

    async fn send_status<B: Serialize>(
        &self,
        url: Url,
        token: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, bearer(token))
            .json(body)
            .send()
            .await;
        let body: StatusBody = read_json(response).await?;

        if body.status.as_deref() == Some(SUCCESS) {
            Ok(())
        } else {
            Err(ApiError::Rejected {
                message: body.message,
            })
        }
    }

    /// Builds `<base>/user/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("user").extend(segments);
        }
        url
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Reads the body and decodes it as JSON, mapping non-2xx to `ApiError::Status`.
async fn read_json<T: DeserializeOwned>(
    response: reqwest::Result<reqwest::Response>,
) -> Result<T, ApiError> {
    let response = response.map_err(|e| {
        tracing::warn!(error = %e, "request failed");
        ApiError::Transport(e.to_string())
    })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    if !status.is_success() {
        let message = serde_json::from_str::<StatusBody>(&body)
            .ok()
            .and_then(|b| b.message);
        tracing::warn!(status = status.as_u16(), "service returned error status");
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri()).unwrap()
    }

    #[test]
    fn test_new_rejects_malformed_url() {
        assert!(ApiClient::new("not a url").is_err());
        assert!(ApiClient::new("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_endpoint_encodes_user_id() {
        let client = ApiClient::new("http://localhost:1234/api/").unwrap();
        let url = client.endpoint(&["follow", "a b/c"]);
        assert_eq!(url.as_str(), "http://localhost:1234/api/user/follow/a%20b%2Fc");
    }

    #[tokio::test]
    async fn test_authenticate_login_posts_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/login"))
            .and(body_json(json!({"email": "a@b.com", "password": "secret1"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"token": "t1", "name": "Ada"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = client(&server)
            .await
            .authenticate(&AuthRequest::Login {
                email: "a@b.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.token.as_deref(), Some("t1"));
        assert_eq!(response.name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_authenticate_error_status_keeps_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/signup"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({"message": "User exists"})),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .authenticate(&AuthRequest::Signup {
                email: "a@b.com".to_string(),
                password: "secret1".to_string(),
                name: "Ada".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ApiError::Status {
                status: 409,
                message: Some("User exists".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_feed_sends_bearer_and_selects_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/following/feed"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": [{"_id": "p1", "userID": "u1", "post": "hello"}],
                "currentUserID": "me",
                "following": ["u1"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client(&server)
            .await
            .fetch_feed("tok", FilterMode::FollowingOnly)
            .await
            .unwrap();

        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.current_user_id, "me");
        assert_eq!(page.following, Some(vec!["u1".to_string()]));
    }

    #[tokio::test]
    async fn test_fetch_feed_body_failure_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/feed"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "error", "message": "nope"})),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .fetch_feed("tok", FilterMode::All)
            .await
            .unwrap_err();

        assert!(err.is_rejected());
        assert_eq!(err.service_message(), Some("nope"));
    }

    #[tokio::test]
    async fn test_fetch_feed_garbage_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/feed"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .fetch_feed("tok", FilterMode::All)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_create_post_sends_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/post"))
            .and(header("authorization", "Bearer tok"))
            .and(body_json(json!({"post": "hello world"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .await
            .create_post("tok", "hello world")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_set_follow_sends_target_state() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/follow/u42"))
            .and(body_json(json!({"status": "unfollow"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .await
            .set_follow("tok", "u42", FollowState::NotFollowing)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_transport_failure() {
        // Nothing listens on the discard port.
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let err = client.create_post("tok", "hi").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
