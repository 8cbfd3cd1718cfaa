//! Session store: the auth token, the only value persisted across restarts.
//!
//! ARCHITECTURE
//! ============
//! `SessionStore` is an injected capability, never ambient global state. It
//! pairs a persistence backend (`TokenStore`) with a `watch` channel so that
//! the API client reads the current token without touching disk and the page
//! controller can subscribe to login/logout changes.
//!
//! Only explicit login, signup and logout mutate the store. Pollers read it.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

/// Fixed key the token is stored under.
pub const TOKEN_KEY: &str = "belay_session_token";

/// Errors produced by token persistence.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session file io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persistent key-value backend for the session token.
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage exists but cannot be read.
    fn load(&self) -> Result<Option<String>, SessionError>;

    /// Persist `token`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be written.
    fn save(&self, token: &str) -> Result<(), SessionError>;

    /// Forget the persisted token.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be cleared.
    fn clear(&self) -> Result<(), SessionError>;
}

// =============================================================================
// FILE BACKEND
// =============================================================================

/// Token persisted as a one-entry JSON object `{ "belay_session_token": "..." }`.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut entries: BTreeMap<String, String> = serde_json::from_str(&raw)?;
        Ok(entries.remove(TOKEN_KEY))
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        let entries = BTreeMap::from([(TOKEN_KEY, token)]);
        std::fs::write(&self.path, serde_json::to_vec(&entries)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// MEMORY BACKEND
// =============================================================================

/// Process-local backend. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.token.lock().map(|t| t.clone()).unwrap_or_default())
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(token.to_owned());
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        if let Ok(mut slot) = self.token.lock() {
            *slot = None;
        }
        Ok(())
    }
}

// =============================================================================
// SESSION STORE
// =============================================================================

/// Shared handle to the current session token. Clones observe the same token.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn TokenStore>,
    current: Arc<watch::Sender<Option<String>>>,
}

impl SessionStore {
    /// Open the store, reading the persisted token once.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn open(backend: Arc<dyn TokenStore>) -> Result<Self, SessionError> {
        let token = backend.load()?;
        let (current, _) = watch::channel(token);
        Ok(Self { backend, current: Arc::new(current) })
    }

    /// A store with no persisted token, backed by memory.
    #[must_use]
    pub fn in_memory() -> Self {
        let (current, _) = watch::channel(None);
        Self { backend: Arc::new(MemoryTokenStore::default()), current: Arc::new(current) }
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.current.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Make `token` the current session and persist it.
    ///
    /// The in-process value is updated even when persistence fails, so the
    /// session still works until the process exits.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    pub fn set_token(&self, token: &str) -> Result<(), SessionError> {
        self.current.send_replace(Some(token.to_owned()));
        self.backend.save(token)
    }

    /// End the session locally and forget the persisted token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be cleared.
    pub fn clear_token(&self) -> Result<(), SessionError> {
        self.current.send_replace(None);
        self.backend.clear()
    }

    /// Subscribe to token changes (login, signup, logout).
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.current.subscribe()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
