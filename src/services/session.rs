//! Bearer-token session.
//!
//! The only state that survives a restart is a single bearer token. Where
//! it lives is decided by a [`TokenStore`]: the OS keychain in normal runs,
//! process memory in tests and ephemeral runs.

use std::sync::{Arc, Mutex, RwLock};

use thiserror::Error;

/// Keychain service name for stored tokens.
pub const KEYRING_SERVICE: &str = "roster";

/// Errors raised by token storage.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The OS keychain refused the operation.
    #[error("keychain error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Persistent home of the bearer token.
#[cfg_attr(test, mockall::automock)]
pub trait TokenStore: Send + Sync {
    /// Reads the stored token, if any.
    fn load(&self) -> Result<Option<String>, SessionError>;
    /// Stores a token, replacing any previous one.
    fn save(&self, token: &str) -> Result<(), SessionError>;
    /// Removes the stored token. Removing a missing token succeeds.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Gate deciding whether the user list may be shown.
pub trait SessionGuard: Send + Sync {
    /// Returns whether a usable token is present.
    fn has_valid_session(&self) -> bool;
    /// Forgets the token.
    fn end_session(&self);
}

/// Supplies the ambient bearer token to outgoing requests.
pub trait TokenSource: Send + Sync {
    /// Returns the current token, if signed in.
    fn bearer_token(&self) -> Option<String>;
}

/// Token store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.token.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// Token store backed by the OS keychain.
pub struct KeyringTokenStore {
    entry: keyring::Entry,
}

impl KeyringTokenStore {
    /// Opens the keychain entry for `profile`.
    pub fn new(profile: &str) -> Result<Self, SessionError> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, profile)?;
        Ok(Self { entry })
    }
}

impl std::fmt::Debug for KeyringTokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyringTokenStore").finish_non_exhaustive()
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        match self.entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        self.entry.set_password(token)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// The signed-in session.
///
/// Caches the token in memory and writes through to the store, so guard
/// checks never touch the keychain.
pub struct Session {
    store: Arc<dyn TokenStore>,
    token: RwLock<Option<String>>,
}

impl Session {
    /// Restores the session from `store`.
    ///
    /// A store that cannot be read is treated as signed out.
    pub fn restore(store: Arc<dyn TokenStore>) -> Self {
        let token = match store.load() {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                tracing::warn!("Could not read stored token: {}", e);
                None
            }
        };
        tracing::debug!(signed_in = token.is_some(), "Session restored");
        Self {
            store,
            token: RwLock::new(token),
        }
    }

    /// Starts a session with a freshly issued token.
    pub fn begin(&self, token: impl Into<String>) -> Result<(), SessionError> {
        let token = token.into();
        self.store.save(&token)?;
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token);
        tracing::info!("Session started");
        Ok(())
    }

    /// Returns the current token.
    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl SessionGuard for Session {
    fn has_valid_session(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }

    fn end_session(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        if let Err(e) = self.store.clear() {
            tracing::warn!("Could not clear stored token: {}", e);
        }
        tracing::info!("Session ended");
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("signed_in", &self.has_valid_session())
            .finish()
    }
}

impl TokenSource for Session {
    fn bearer_token(&self) -> Option<String> {
        self.token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_from_empty_store() {
        let session = Session::restore(Arc::new(MemoryTokenStore::new()));
        assert!(!session.has_valid_session());
        assert_eq!(session.bearer_token(), None);
    }

    #[test]
    fn restore_ignores_blank_token() {
        let session = Session::restore(Arc::new(MemoryTokenStore::with_token("   ")));
        assert!(!session.has_valid_session());
    }

    #[test]
    fn begin_and_end() {
        let store = Arc::new(MemoryTokenStore::new());
        let session = Session::restore(store.clone());

        session.begin("QpwL5tke4Pnpja7X4").unwrap();
        assert!(session.has_valid_session());
        assert_eq!(store.load().unwrap().as_deref(), Some("QpwL5tke4Pnpja7X4"));
        assert_eq!(session.bearer_token().as_deref(), Some("QpwL5tke4Pnpja7X4"));

        session.end_session();
        assert!(!session.has_valid_session());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn unreadable_store_means_signed_out() {
        let mut store = MockTokenStore::new();
        store
            .expect_load()
            .returning(|| Err(SessionError::Keyring(keyring::Error::NoStorageAccess(
                "locked".into(),
            ))));

        let session = Session::restore(Arc::new(store));
        assert!(!session.has_valid_session());
    }

    #[test]
    fn end_session_clears_memory_even_if_store_fails() {
        let mut store = MockTokenStore::new();
        store.expect_load().returning(|| Ok(Some("token".to_string())));
        store
            .expect_clear()
            .times(1)
            .returning(|| Err(SessionError::Keyring(keyring::Error::NoStorageAccess(
                "locked".into(),
            ))));

        let session = Session::restore(Arc::new(store));
        assert!(session.has_valid_session());

        session.end_session();
        assert!(!session.has_valid_session());
    }
}
