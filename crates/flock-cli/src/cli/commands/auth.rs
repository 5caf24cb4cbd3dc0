//! Session commands: login, signup, logout, whoami.
//!
//! Input goes through the same `AuthForm` as the interactive client, so
//! validation and error messages match.

use anyhow::{Context, Result, bail};
use flock_core::api::ApiClient;
use flock_core::auth::{AuthForm, AuthMode, FormField, MSG_SUBMIT_FAILED};
use flock_core::session::SessionStore;

// One-shot commands issue a single request per form.
const REQUEST_ID: u64 = 1;

pub async fn login(
    client: &ApiClient,
    store: &dyn SessionStore,
    email: &str,
    password: &str,
) -> Result<()> {
    let mut form = AuthForm::new(AuthMode::Login);
    form.set_field(FormField::Email, email);
    form.set_field(FormField::Password, password);
    submit(client, store, form).await
}

pub async fn signup(
    client: &ApiClient,
    store: &dyn SessionStore,
    email: &str,
    password: &str,
    name: &str,
) -> Result<()> {
    let mut form = AuthForm::new(AuthMode::Signup);
    form.set_field(FormField::Name, name);
    form.set_field(FormField::Email, email);
    form.set_field(FormField::Password, password);
    submit(client, store, form).await
}

async fn submit(client: &ApiClient, store: &dyn SessionStore, mut form: AuthForm) -> Result<()> {
    let Some(request) = form.begin_submit(REQUEST_ID) else {
        for (field, message) in form.errors() {
            eprintln!("{}: {message}", field.label());
        }
        bail!("{} failed: invalid input", form.mode().title());
    };

    let result = client.authenticate(&request).await;
    let Some(session) = form.finish_submit(REQUEST_ID, result) else {
        bail!("{}", form.submit_error().unwrap_or(MSG_SUBMIT_FAILED));
    };

    store.set(&session).context("save session")?;
    match session.display_name() {
        "" => println!("Signed in as {}", request.email()),
        name => println!("Signed in as {name}"),
    }
    Ok(())
}

pub fn logout(store: &dyn SessionStore) -> Result<()> {
    store.clear().context("clear session")?;
    println!("Logged out.");
    Ok(())
}

pub fn whoami(store: &dyn SessionStore) -> Result<()> {
    let session = store.get().context("read session")?;
    if !session.is_authenticated() {
        println!("Not logged in.");
    } else if session.display_name().is_empty() {
        println!("Logged in.");
    } else {
        println!("{}", session.display_name());
    }
    Ok(())
}
