//! Request and response bodies of the feed service.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::feed::Post;

/// Body of a login or signup call.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AuthRequest {
    Login { email: String, password: String },
    Signup {
        email: String,
        password: String,
        name: String,
    },
}

impl AuthRequest {
    /// Path segment under `/user/`.
    pub fn endpoint(&self) -> &'static str {
        match self {
            AuthRequest::Login { .. } => "login",
            AuthRequest::Signup { .. } => "signup",
        }
    }

    pub fn email(&self) -> &str {
        match self {
            AuthRequest::Login { email, .. } | AuthRequest::Signup { email, .. } => email,
        }
    }
}

impl fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthRequest")
            .field("endpoint", &self.endpoint())
            .field("email", &self.email())
            .field("password", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Successful login/signup body. Either field may be missing.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("name", &self.name)
            .finish()
    }
}

/// Feed body as returned by `GET /user/feed` and `GET /user/following/feed`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct FeedBody {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<Option<Post>>>,
    #[serde(rename = "currentUserID", default)]
    pub current_user_id: Option<String>,
    #[serde(default)]
    pub following: Option<Vec<String>>,
}

/// Generic `{status, message}` body for write calls and error responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct StatusBody {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

pub(crate) const SUCCESS: &str = "success";

/// A successfully fetched feed, in server order (oldest first).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedPage {
    /// Posts as sent; `None` marks an absent entry.
    pub posts: Vec<Option<Post>>,
    /// Empty when the service omits it.
    pub current_user_id: String,
    /// Authors the current user follows, when the service includes the list.
    pub following: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreatePostBody<'a> {
    pub post: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct FollowBody {
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_body_has_no_name() {
        let request = AuthRequest::Login {
            email: "a@b.com".to_string(),
            password: "abcdef".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"email": "a@b.com", "password": "abcdef"})
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let request = AuthRequest::Signup {
            email: "a@b.com".to_string(),
            password: "hunter22".to_string(),
            name: "Ada".to_string(),
        };
        let debug = format!("{request:?}");
        assert!(!debug.contains("hunter22"));
        assert!(debug.contains("signup"));
    }

    #[test]
    fn test_feed_body_tolerates_nulls() {
        let body: FeedBody = serde_json::from_str(
            r#"{"status":"success","data":[null,{"_id":"p1","post":"hi"}],"currentUserID":null}"#,
        )
        .unwrap();

        let data = body.data.unwrap();
        assert!(data[0].is_none());
        let post = data[1].as_ref().unwrap();
        assert_eq!(post.id, "p1");
        assert_eq!(post.author_id, "");
        assert!(body.current_user_id.is_none());
        assert!(body.following.is_none());
    }
}
