//! Session storage.
//!
//! The session is the bearer token plus the display name shown in the UI.
//! It is stored in `<base>/session.json` with restricted permissions (0600).
//! Tokens are never logged or displayed.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// Authenticated identity for outgoing requests.
///
/// A missing or empty token means "logged out". No expiry is tracked; an
/// invalid token only shows up when a request fails.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
}

impl Session {
    /// Creates a session. A blank display name is stored as absent.
    pub fn new(token: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            token: Some(token.into()),
            display_name: display_name.filter(|name| !name.trim().is_empty()),
        }
    }

    /// Returns the bearer token, if present and non-empty.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Returns the display name, or an empty string.
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("")
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token().map(|_| "<redacted>"))
            .field("display_name", &self.display_name)
            .finish()
    }
}

/// Persistent key-value home of the session.
///
/// `get` on an empty store returns `Session::default()`.
pub trait SessionStore: Send + Sync {
    /// Reads the stored session.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be read.
    fn get(&self) -> Result<Session>;

    /// Replaces the stored session.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written.
    fn set(&self, session: &Session) -> Result<()>;

    /// Removes both the token and the display name.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be cleared.
    fn clear(&self) -> Result<()>;
}

/// File-backed session store.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location (`$FLOCK_HOME/session.json`).
    pub fn default_location() -> Self {
        Self::new(paths::session_path())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Session> {
        if !self.path.exists() {
            return Ok(Session::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session from {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", self.path.display()))
    }

    fn set(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            // `mode` only applies on create; narrow an existing file too.
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to restrict {}", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        tracing::info!(path = %self.path.display(), "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to remove {}", self.path.display()));
            }
        }
        tracing::info!(path = %self.path.display(), "session cleared");
        Ok(())
    }
}
