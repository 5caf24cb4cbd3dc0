use std::fmt;

/// Failure of a call to the feed service.
///
/// Keeps the service-provided message (if any) so controllers can choose
/// between it and their own fallback text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Non-success HTTP status.
    Status { status: u16, message: Option<String> },
    /// Success HTTP status, but the body `status` was not `"success"`.
    Rejected { message: Option<String> },
    /// The request never produced a response (connect, TLS, body read).
    Transport(String),
    /// The response body did not have the expected shape.
    Decode(String),
}

impl ApiError {
    /// Returns the non-empty message reported by the service, if any.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } | ApiError::Rejected { message } => {
                message.as_deref().filter(|m| !m.trim().is_empty())
            }
            ApiError::Transport(_) | ApiError::Decode(_) => None,
        }
    }

    /// True when the service answered with a body-level rejection.
    pub fn is_rejected(&self) -> bool {
        matches!(self, ApiError::Rejected { .. })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Status { status, message } => match message {
                Some(message) => write!(f, "service returned HTTP {status}: {message}"),
                None => write!(f, "service returned HTTP {status}"),
            },
            ApiError::Rejected { message } => match message {
                Some(message) => write!(f, "service rejected the request: {message}"),
                None => write!(f, "service rejected the request"),
            },
            ApiError::Transport(err) => write!(f, "request failed: {err}"),
            ApiError::Decode(err) => write!(f, "unexpected response: {err}"),
        }
    }
}

impl std::error::Error for ApiError {}
