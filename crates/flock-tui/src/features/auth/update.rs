//! Auth screen key handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use flock_core::api::{ApiError, AuthResponse};
use flock_core::session::Session;

use super::AuthScreen;
use crate::common::TaskSeq;
use crate::effects::UiEffect;

pub fn handle_key(screen: &mut AuthScreen, seq: &mut TaskSeq, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => vec![UiEffect::Quit],
        KeyCode::Char('t') if ctrl => {
            screen.toggle_mode();
            vec![]
        }
        KeyCode::Char('p') if ctrl => {
            screen.show_password = !screen.show_password;
            vec![]
        }
        KeyCode::Tab | KeyCode::Down => {
            screen.focus_next();
            vec![]
        }
        KeyCode::BackTab | KeyCode::Up => {
            screen.focus_prev();
            vec![]
        }
        KeyCode::Enter => submit(screen, seq),
        _ => {
            let field = screen.focused_field();
            if screen.input_mut(field).handle_key(key) {
                screen.sync_focused();
            }
            vec![]
        }
    }
}

pub fn handle_paste(screen: &mut AuthScreen, text: &str) {
    let field = screen.focused_field();
    screen.input_mut(field).insert_str(text);
    screen.sync_focused();
}

fn submit(screen: &mut AuthScreen, seq: &mut TaskSeq) -> Vec<UiEffect> {
    let id = seq.next_id().0;
    match screen.form.begin_submit(id) {
        Some(request) => vec![UiEffect::Authenticate { id, request }],
        None => {
            if let Some(field) = screen.form.errors().keys().next().copied() {
                screen.focus_field(field);
            }
            vec![]
        }
    }
}

/// Applies the auth response for request `id`. Returns the new session on success.
pub fn handle_auth_completed(
    screen: &mut AuthScreen,
    id: u64,
    result: Result<AuthResponse, ApiError>,
) -> Option<Session> {
    screen.form.finish_submit(id, result)
}

#[cfg(test)]
mod tests {
    use flock_core::api::AuthRequest;
    use flock_core::auth::{FormField, MSG_EMAIL_REQUIRED};

    use super::*;

    fn press(screen: &mut AuthScreen, code: KeyCode) -> Vec<UiEffect> {
        handle_key(
            screen,
            &mut TaskSeq::default(),
            KeyEvent::new(code, KeyModifiers::NONE),
        )
    }

    fn type_text(screen: &mut AuthScreen, text: &str) {
        for ch in text.chars() {
            press(screen, KeyCode::Char(ch));
        }
    }

    #[test]
    fn test_invalid_submit_emits_nothing() {
        let mut screen = AuthScreen::default();
        screen.focus_next();

        let effects = press(&mut screen, KeyCode::Enter);

        assert!(effects.is_empty());
        assert_eq!(screen.form.error(FormField::Email), Some(MSG_EMAIL_REQUIRED));
        assert_eq!(screen.focused_field(), FormField::Email);
    }

    #[test]
    fn test_typed_login_submits_request() {
        let mut screen = AuthScreen::default();
        type_text(&mut screen, "ada@example.com");
        press(&mut screen, KeyCode::Tab);
        type_text(&mut screen, "secret1");

        let effects = press(&mut screen, KeyCode::Enter);

        assert_eq!(
            effects,
            vec![UiEffect::Authenticate {
                id: 1,
                request: AuthRequest::Login {
                    email: "ada@example.com".to_string(),
                    password: "secret1".to_string(),
                }
            }]
        );
        assert!(screen.form.is_submitting());
    }

    #[test]
    fn test_ctrl_keys_toggle_mode_and_password() {
        let mut screen = AuthScreen::default();
        handle_key(
            &mut screen,
            &mut TaskSeq::default(),
            KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL),
        );
        assert!(screen.show_password);

        handle_key(
            &mut screen,
            &mut TaskSeq::default(),
            KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL),
        );
        assert_eq!(screen.form.fields().len(), 3);
        assert!(screen.input(FormField::Email).is_empty());
    }

    #[test]
    fn test_paste_goes_to_focused_field() {
        let mut screen = AuthScreen::default();
        handle_paste(&mut screen, "ada@example.com");
        assert_eq!(screen.form.value(FormField::Email), "ada@example.com");
    }

    #[test]
    fn test_esc_quits() {
        let mut screen = AuthScreen::default();
        assert_eq!(press(&mut screen, KeyCode::Esc), vec![UiEffect::Quit]);
    }
}
