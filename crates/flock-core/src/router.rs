//! Route selection from the session.

use crate::session::Session;

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Auth,
    Home,
}

impl Route {
    /// `Home` iff the session holds a non-empty token.
    pub fn for_session(session: &Session) -> Self {
        if session.is_authenticated() {
            Route::Home
        } else {
            Route::Auth
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_follows_token() {
        assert_eq!(Route::for_session(&Session::default()), Route::Auth);
        assert_eq!(Route::for_session(&Session::new("", None)), Route::Auth);
        assert_eq!(Route::for_session(&Session::new("tok", None)), Route::Home);
    }
}
