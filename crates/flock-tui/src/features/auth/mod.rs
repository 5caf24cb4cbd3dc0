//! Auth screen: sign-in / sign-up form.

mod render;
mod update;

use std::fmt;

use flock_core::auth::{AuthForm, FormField};
pub use render::render_auth;
pub use update::{handle_auth_completed, handle_key, handle_paste};

use crate::common::TextField;

/// Auth screen state. Field values live in `form`; `inputs` only track the
/// editing cursor for each field.
#[derive(Default)]
pub struct AuthScreen {
    pub form: AuthForm,
    email: TextField,
    password: TextField,
    name: TextField,
    focus: usize,
    pub show_password: bool,
}

impl fmt::Debug for AuthScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthScreen")
            .field("form", &self.form)
            .field("focus", &self.focused_field())
            .field("show_password", &self.show_password)
            .finish_non_exhaustive()
    }
}

impl AuthScreen {
    pub fn focused_field(&self) -> FormField {
        let fields = self.form.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn input(&self, field: FormField) -> &TextField {
        match field {
            FormField::Email => &self.email,
            FormField::Password => &self.password,
            FormField::Name => &self.name,
        }
    }

    fn input_mut(&mut self, field: FormField) -> &mut TextField {
        match field {
            FormField::Email => &mut self.email,
            FormField::Password => &mut self.password,
            FormField::Name => &mut self.name,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.form.fields().len();
    }

    pub fn focus_prev(&mut self) {
        let len = self.form.fields().len();
        self.focus = (self.focus + len - 1) % len;
    }

    fn focus_field(&mut self, field: FormField) {
        if let Some(idx) = self.form.fields().iter().position(|f| *f == field) {
            self.focus = idx;
        }
    }

    /// Switches between sign-in and sign-up, clearing every field.
    pub fn toggle_mode(&mut self) {
        let mode = self.form.mode().toggled();
        self.form.toggle_mode(mode);
        self.email.clear();
        self.password.clear();
        self.name.clear();
        self.focus = 0;
    }

    /// Pushes the focused input's text into the form.
    fn sync_focused(&mut self) {
        let field = self.focused_field();
        let value = self.input(field).value().to_string();
        self.form.set_field(field, value);
    }
}
