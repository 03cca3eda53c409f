//! Session token storage and auth state.
//!
//! Stores the bearer token in `<base>/session.json` with restricted
//! permissions (0600). Tokens are never logged or displayed in full.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// Persisted session contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque bearer token issued by the backend
    pub token: String,
    /// Username the token was issued for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// RFC 3339 timestamp of the login
    pub logged_in_at: String,
}

impl SessionRecord {
    pub fn new(token: impl Into<String>, username: Option<&str>) -> Self {
        Self {
            token: token.into(),
            username: username.map(str::to_string),
            logged_in_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// File-backed token storage.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(paths::session_path())
    }
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the session from disk.
    /// Returns None if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<SessionRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session from {}", self.path.display()))?;

        let record: SessionRecord = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", self.path.display()))?;

        if record.token.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(record))
    }

    /// Reads only the token.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn token(&self) -> Result<Option<String>> {
        Ok(self.load()?.map(|record| record.token))
    }

    /// Saves the session to disk with restricted permissions (0600).
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, record: &SessionRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(record).context("Failed to serialize session")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }

    /// Removes the session file. Returns true if a file was removed.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove session {}", self.path.display())),
        }
    }
}

/// Shortens a token for display: first and last four characters.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len().max(4));
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

#[derive(Debug, Default)]
struct AuthInner {
    token: Option<String>,
    username: Option<String>,
    initializing: bool,
}

/// Process-wide authentication state.
///
/// Cloned handles share the same state and store.
#[derive(Debug, Clone)]
pub struct AuthState {
    inner: Arc<RwLock<AuthInner>>,
    store: SessionStore,
}

impl AuthState {
    /// Reads the persisted session once and returns the initialized state.
    ///
    /// An unreadable session file counts as logged out and is removed.
    pub fn initialize(store: SessionStore) -> Self {
        let state = Self {
            inner: Arc::new(RwLock::new(AuthInner {
                initializing: true,
                ..AuthInner::default()
            })),
            store,
        };

        let record = state.store.load().unwrap_or_else(|e| {
            tracing::warn!("discarding unreadable session: {e:#}");
            if let Err(e) = state.store.clear() {
                tracing::warn!("failed to remove session: {e:#}");
            }
            None
        });
        {
            let mut inner = state.write();
            if let Some(record) = record {
                tracing::debug!(token = %mask_token(&record.token), "restored session");
                inner.token = Some(record.token);
                inner.username = record.username;
            }
            inner.initializing = false;
        }
        state
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, AuthInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, AuthInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn is_initializing(&self) -> bool {
        self.read().initializing
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn username(&self) -> Option<String> {
        self.read().username.clone()
    }

    /// Persists the token and marks the state authenticated.
    ///
    /// # Errors
    /// Returns an error if the session cannot be written; state is unchanged.
    pub fn login(&self, token: &str, username: Option<&str>) -> Result<()> {
        self.store.save(&SessionRecord::new(token, username))?;
        let mut inner = self.write();
        inner.token = Some(token.to_string());
        inner.username = username.map(str::to_string);
        tracing::info!(token = %mask_token(token), "logged in");
        Ok(())
    }

    /// Clears the token in memory and on disk. Safe to call repeatedly.
    ///
    /// # Errors
    /// Returns an error if the session file cannot be removed.
    pub fn logout(&self) -> Result<()> {
        {
            let mut inner = self.write();
            inner.token = None;
            inner.username = None;
        }
        if self.store.clear()? {
            tracing::info!("session cleared");
        }
        Ok(())
    }
}
