//! Login/signup form state machine.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::api::{ApiError, AuthRequest, AuthResponse};
use crate::session::Session;

pub const MSG_EMAIL_REQUIRED: &str = "Email is required";
pub const MSG_EMAIL_INVALID: &str = "Email is invalid";
pub const MSG_PASSWORD_REQUIRED: &str = "Password is required";
pub const MSG_PASSWORD_SHORT: &str = "Password must be at least 6 characters";
pub const MSG_NAME_REQUIRED: &str = "Name is required";
pub const MSG_TOKEN_MISSING: &str = "Login/signup succeeded but token missing.";
pub const MSG_SUBMIT_FAILED: &str = "Something went wrong";
pub const MSG_SERVER_ERROR: &str = "Server error. Please try again.";

const MIN_PASSWORD_CHARS: usize = 6;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is a valid regex"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Signup,
            AuthMode::Signup => AuthMode::Login,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AuthMode::Login => "Sign In",
            AuthMode::Signup => "Sign Up",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Email,
    Password,
    Name,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Email => "Email",
            FormField::Password => "Password",
            FormField::Name => "Name",
        }
    }
}

/// Field errors in display order.
pub type FieldErrors = BTreeMap<FormField, &'static str>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    /// Request `id` is in flight; only its answer is applied.
    Submitting { id: u64 },
    /// Submit-level error shown above the form.
    Error(String),
}

/// The auth form. Field values are owned here; the view only renders them.
#[derive(Clone, Default)]
pub struct AuthForm {
    mode: AuthMode,
    email: String,
    password: String,
    name: String,
    errors: FieldErrors,
    state: SubmitState,
}

impl std::fmt::Debug for AuthForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthForm")
            .field("mode", &self.mode)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("errors", &self.errors)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl AuthForm {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Fields shown for the current mode, in focus order.
    pub fn fields(&self) -> &'static [FormField] {
        match self.mode {
            AuthMode::Login => &[FormField::Email, FormField::Password],
            AuthMode::Signup => &[FormField::Name, FormField::Email, FormField::Password],
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Email => &self.email,
            FormField::Password => &self.password,
            FormField::Name => &self.name,
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: FormField) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, SubmitState::Submitting { .. })
    }

    pub fn submit_error(&self) -> Option<&str> {
        match &self.state {
            SubmitState::Error(message) => Some(message),
            SubmitState::Idle | SubmitState::Submitting { .. } => None,
        }
    }

    /// Computes field errors for the current values without storing them.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.email.is_empty() {
            errors.insert(FormField::Email, MSG_EMAIL_REQUIRED);
        } else if !EMAIL_PATTERN.is_match(&self.email) {
            errors.insert(FormField::Email, MSG_EMAIL_INVALID);
        }

        if self.password.is_empty() {
            errors.insert(FormField::Password, MSG_PASSWORD_REQUIRED);
        } else if self.password.chars().count() < MIN_PASSWORD_CHARS {
            errors.insert(FormField::Password, MSG_PASSWORD_SHORT);
        }

        if self.mode == AuthMode::Signup && self.name.is_empty() {
            errors.insert(FormField::Name, MSG_NAME_REQUIRED);
        }

        errors
    }

    /// Updates one field and clears only that field's error.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Email => self.email = value,
            FormField::Password => self.password = value,
            FormField::Name => self.name = value,
        }
        self.errors.remove(&field);
    }

    /// Switches mode and resets every field, every error, and the submit state.
    ///
    /// An answer to a request started before the switch is ignored afterwards.
    pub fn toggle_mode(&mut self, mode: AuthMode) {
        *self = Self::new(mode);
    }

    /// Validates and, if valid, enters `Submitting { id }` and returns the request.
    ///
    /// Returns `None` while a submit is already in flight or when validation
    /// fails; in the latter case the errors replace the previous ones and any
    /// submit error is cleared.
    pub fn begin_submit(&mut self, id: u64) -> Option<AuthRequest> {
        if self.is_submitting() {
            return None;
        }

        let errors = self.validate();
        if !errors.is_empty() {
            self.errors = errors;
            self.state = SubmitState::Idle;
            return None;
        }

        self.errors.clear();
        self.state = SubmitState::Submitting { id };

        let request = match self.mode {
            AuthMode::Login => AuthRequest::Login {
                email: self.email.clone(),
                password: self.password.clone(),
            },
            AuthMode::Signup => AuthRequest::Signup {
                email: self.email.clone(),
                password: self.password.clone(),
                name: self.name.clone(),
            },
        };
        Some(request)
    }

    /// Applies the service answer. Returns the session to persist on success.
    ///
    /// Nothing is returned unless the response carries a token. Answers to
    /// any request other than the one in flight are dropped.
    pub fn finish_submit(
        &mut self,
        id: u64,
        result: Result<AuthResponse, ApiError>,
    ) -> Option<Session> {
        if self.state != (SubmitState::Submitting { id }) {
            tracing::debug!(id, "ignoring stale auth response");
            return None;
        }

        match result {
            Ok(response) => match response.token.filter(|t| !t.is_empty()) {
                Some(token) => {
                    let name = response
                        .name
                        .filter(|n| !n.trim().is_empty())
                        .unwrap_or_else(|| self.name.clone());
                    self.state = SubmitState::Idle;
                    tracing::info!(mode = ?self.mode, "authenticated");
                    Some(Session::new(token, Some(name)))
                }
                None => {
                    tracing::warn!("auth response had no token");
                    self.state = SubmitState::Error(MSG_TOKEN_MISSING.to_string());
                    None
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "auth request failed");
                let message = match &err {
                    ApiError::Status { .. } | ApiError::Rejected { .. } => {
                        err.service_message().unwrap_or(MSG_SUBMIT_FAILED)
                    }
                    ApiError::Transport(_) | ApiError::Decode(_) => MSG_SERVER_ERROR,
                };
                self.state = SubmitState::Error(message.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(mode: AuthMode) -> AuthForm {
        let mut form = AuthForm::new(mode);
        form.set_field(FormField::Email, "ada@example.com");
        form.set_field(FormField::Password, "secret1");
        form.set_field(FormField::Name, "Ada");
        form
    }

    #[test]
    fn test_validate_empty_login() {
        let form = AuthForm::new(AuthMode::Login);
        let errors = form.validate();

        assert_eq!(errors.get(&FormField::Email), Some(&MSG_EMAIL_REQUIRED));
        assert_eq!(errors.get(&FormField::Password), Some(&MSG_PASSWORD_REQUIRED));
        assert!(!errors.contains_key(&FormField::Name));
    }

    #[test]
    fn test_validate_invalid_email_and_short_password() {
        let mut form = AuthForm::new(AuthMode::Login);
        form.set_field(FormField::Email, "ada@example");
        form.set_field(FormField::Password, "12345");

        let errors = form.validate();
        assert_eq!(errors.get(&FormField::Email), Some(&MSG_EMAIL_INVALID));
        assert_eq!(errors.get(&FormField::Password), Some(&MSG_PASSWORD_SHORT));
    }

    #[test]
    fn test_validate_email_without_at_sign() {
        let mut form = filled(AuthMode::Login);
        form.set_field(FormField::Email, "ada.example.com");
        assert_eq!(form.validate().get(&FormField::Email), Some(&MSG_EMAIL_INVALID));
    }

    #[test]
    fn test_validate_signup_requires_name() {
        let mut form = filled(AuthMode::Signup);
        form.set_field(FormField::Name, "");
        assert_eq!(
            form.validate().into_iter().collect::<Vec<_>>(),
            vec![(FormField::Name, MSG_NAME_REQUIRED)]
        );
    }

    #[test]
    fn test_password_length_counts_chars() {
        let mut form = filled(AuthMode::Login);
        form.set_field(FormField::Password, "ééééé");
        assert_eq!(form.validate().get(&FormField::Password), Some(&MSG_PASSWORD_SHORT));
    }

    #[test]
    fn test_invalid_submit_stores_errors_without_request() {
        let mut form = AuthForm::new(AuthMode::Signup);
        assert_eq!(form.begin_submit(1), None);
        assert_eq!(form.errors().len(), 3);
        assert_eq!(form.state(), &SubmitState::Idle);
    }

    #[test]
    fn test_set_field_clears_only_that_error() {
        let mut form = AuthForm::new(AuthMode::Signup);
        form.begin_submit(1);

        form.set_field(FormField::Email, "x");
        assert_eq!(form.error(FormField::Email), None);
        assert_eq!(form.error(FormField::Password), Some(MSG_PASSWORD_REQUIRED));
        assert_eq!(form.error(FormField::Name), Some(MSG_NAME_REQUIRED));
    }

    #[test]
    fn test_toggle_mode_resets_everything() {
        let mut form = filled(AuthMode::Login);
        form.set_field(FormField::Password, "");
        form.begin_submit(1);

        form.toggle_mode(AuthMode::Signup);
        assert_eq!(form.mode(), AuthMode::Signup);
        assert_eq!(form.value(FormField::Email), "");
        assert!(form.errors().is_empty());
        assert_eq!(form.state(), &SubmitState::Idle);
    }

    #[test]
    fn test_login_request_has_no_name() {
        let mut form = filled(AuthMode::Login);
        let request = form.begin_submit(1).unwrap();
        assert_eq!(
            request,
            AuthRequest::Login {
                email: "ada@example.com".to_string(),
                password: "secret1".to_string(),
            }
        );
        assert!(form.is_submitting());
        assert_eq!(form.begin_submit(1), None);
    }

    #[test]
    fn test_success_uses_service_name() {
        let mut form = filled(AuthMode::Signup);
        form.begin_submit(1).unwrap();

        let session = form
            .finish_submit(1, Ok(AuthResponse {
                token: Some("tok".to_string()),
                name: Some("Ada L.".to_string()),
            }))
            .unwrap();

        assert_eq!(session.token(), Some("tok"));
        assert_eq!(session.display_name(), "Ada L.");
        assert_eq!(form.state(), &SubmitState::Idle);
    }

    #[test]
    fn test_success_falls_back_to_entered_name() {
        let mut form = filled(AuthMode::Signup);
        form.begin_submit(1).unwrap();

        let session = form
            .finish_submit(1, Ok(AuthResponse {
                token: Some("tok".to_string()),
                name: None,
            }))
            .unwrap();

        assert_eq!(session.display_name(), "Ada");
    }

    #[test]
    fn test_success_without_token_is_error() {
        let mut form = filled(AuthMode::Login);
        form.begin_submit(1).unwrap();

        assert_eq!(form.finish_submit(1, Ok(AuthResponse::default())), None);
        assert_eq!(form.submit_error(), Some(MSG_TOKEN_MISSING));
    }

    #[test]
    fn test_failure_messages() {
        let mut form = filled(AuthMode::Login);
        form.begin_submit(1).unwrap();
        form.finish_submit(1, Err(ApiError::Status {
            status: 401,
            message: Some("Invalid credentials".to_string()),
        }));
        assert_eq!(form.submit_error(), Some("Invalid credentials"));

        form.begin_submit(1).unwrap();
        form.finish_submit(1, Err(ApiError::Status {
            status: 500,
            message: None,
        }));
        assert_eq!(form.submit_error(), Some(MSG_SUBMIT_FAILED));

        form.begin_submit(1).unwrap();
        form.finish_submit(1, Err(ApiError::Transport("refused".to_string())));
        assert_eq!(form.submit_error(), Some(MSG_SERVER_ERROR));
    }

    #[test]
    fn test_failed_revalidation_clears_submit_error() {
        let mut form = filled(AuthMode::Login);
        form.begin_submit(1).unwrap();
        form.finish_submit(1, Err(ApiError::Transport("refused".to_string())));
        assert_eq!(form.submit_error(), Some(MSG_SERVER_ERROR));

        form.set_field(FormField::Password, "");
        assert_eq!(form.begin_submit(2), None);
        assert_eq!(form.submit_error(), None);
        assert_eq!(form.error(FormField::Password), Some(MSG_PASSWORD_REQUIRED));
    }

    #[test]
    fn test_answer_for_another_request_is_ignored() {
        let mut form = filled(AuthMode::Login);
        form.begin_submit(1).unwrap();
        form.toggle_mode(AuthMode::Signup);
        form.set_field(FormField::Name, "Ada");
        form.set_field(FormField::Email, "ada@example.com");
        form.set_field(FormField::Password, "secret1");
        form.begin_submit(2).unwrap();

        let stale = form.finish_submit(
            1,
            Err(ApiError::Status {
                status: 401,
                message: Some("Invalid credentials".to_string()),
            }),
        );
        assert_eq!(stale, None);
        assert_eq!(form.submit_error(), None);
        assert!(form.is_submitting());

        let session = form
            .finish_submit(
                2,
                Ok(AuthResponse {
                    token: Some("tok-new".to_string()),
                    name: None,
                }),
            )
            .unwrap();
        assert_eq!(session.token(), Some("tok-new"));
    }
}
