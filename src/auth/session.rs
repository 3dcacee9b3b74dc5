//! Session store: the single source of truth for "who is logged in".
//!
//! The store owns one slot pairing the raw bearer token with the identity
//! decoded from it. The slot is only ever replaced whole (`login`) or cleared
//! whole (`logout`), and the raw token is persisted to a fixed file under the
//! application data directory so the session survives restarts. Identity is
//! never persisted; it is re-derived from the token on every load.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;
use tracing::{info, warn};

use super::claims::{self, Claims, TokenError};

/// File name for the persisted bearer token.
const TOKEN_FILE: &str = "jwt-token";

#[derive(Debug, Clone)]
struct Session {
    token: String,
    identity: Claims,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("invalid bearer token: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("session storage error: {0}")]
    Storage(#[from] io::Error),
}

/// Shared, injectable session container. Hand it out as `Arc<SessionStore>`;
/// the API client reads the token through it on every request.
pub struct SessionStore {
    storage_dir: PathBuf,
    slot: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            slot: RwLock::new(None),
        }
    }

    /// Rehydrate the session from the persisted token, if any.
    ///
    /// Returns whether a session was restored. A token that fails to decode
    /// is treated as "not logged in", not as an error: the stored credential
    /// is purged and the failure is logged only.
    pub fn initialize(&self) -> Result<bool, SessionError> {
        let path = self.token_path();
        let token = match std::fs::read_to_string(&path) {
            Ok(contents) => contents.trim().to_string(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        match claims::decode(&token) {
            Ok(identity) => {
                info!(sub = %identity.sub, role = %identity.role, "Session restored");
                self.replace(Some(Session { token, identity }));
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "Stored token failed to decode, purging");
                self.purge_token_file()?;
                self.replace(None);
                Ok(false)
            }
        }
    }

    /// Replace the session with a freshly issued token.
    ///
    /// Decode failure clears the session and the persisted credential and is
    /// reported to the caller; presentation is the caller's concern.
    pub fn login(&self, token: &str) -> Result<Claims, SessionError> {
        match claims::decode(token) {
            Ok(identity) => {
                std::fs::create_dir_all(&self.storage_dir)?;
                std::fs::write(self.token_path(), token)?;
                info!(sub = %identity.sub, role = %identity.role, "Logged in");
                self.replace(Some(Session {
                    token: token.to_string(),
                    identity: identity.clone(),
                }));
                Ok(identity)
            }
            Err(e) => {
                self.purge_token_file()?;
                self.replace(None);
                Err(e.into())
            }
        }
    }

    /// Clear the session and delete the persisted token. Calling this while
    /// already logged out is a no-op.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.replace(None);
        self.purge_token_file()?;
        info!("Logged out");
        Ok(())
    }

    /// Current bearer token, if logged in. Cloned snapshot.
    pub fn token(&self) -> Option<String> {
        self.read(|s| s.token.clone())
    }

    /// Current decoded identity, if logged in. Cloned snapshot.
    pub fn identity(&self) -> Option<Claims> {
        self.read(|s| s.identity.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.slot.read().expect("session lock poisoned").is_some()
    }

    fn read<T>(&self, f: impl FnOnce(&Session) -> T) -> Option<T> {
        self.slot
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(f)
    }

    fn replace(&self, session: Option<Session>) {
        *self.slot.write().expect("session lock poisoned") = session;
    }

    fn purge_token_file(&self) -> io::Result<()> {
        match std::fs::remove_file(self.token_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn token_path(&self) -> PathBuf {
        self.storage_dir.join(TOKEN_FILE)
    }

    /// Where the token file lives, for diagnostics.
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    fn token(sub: &str, role: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#);
        let payload =
            URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"{}","role":"{}"}}"#, sub, role));
        format!("{}.{}.sig", header, payload)
    }

    #[test]
    fn test_login_then_read_yields_token_and_identity() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        let t = token("u1", "PI");
        let identity = store.login(&t).expect("login failed");

        assert_eq!(identity.sub, "u1");
        assert_eq!(identity.role, Role::Pi);
        assert_eq!(store.token().as_deref(), Some(t.as_str()));
        assert_eq!(store.identity().unwrap().sub, "u1");
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_login_with_malformed_token_clears_everything() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        // A prior session exists and must not survive the failed replace.
        store.login(&token("u1", "MEMBER")).unwrap();

        let err = store.login("not-a-jwt").unwrap_err();
        assert!(matches!(err, SessionError::InvalidToken(_)));
        assert_eq!(store.token(), None);
        assert_eq!(store.identity(), None);
        assert!(!dir.path().join(TOKEN_FILE).exists());
    }

    #[test]
    fn test_initialize_without_stored_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        assert!(!store.initialize().expect("initialize failed"));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_initialize_purges_corrupt_token() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(TOKEN_FILE), "corrupt.token").unwrap();

        let store = SessionStore::new(dir.path());
        assert!(!store.initialize().expect("initialize failed"));
        assert_eq!(store.identity(), None);
        assert!(!dir.path().join(TOKEN_FILE).exists());
    }

    #[test]
    fn test_restart_round_trip_reproduces_identity() {
        let dir = tempfile::tempdir().unwrap();

        let first = SessionStore::new(dir.path());
        let at_login = first.login(&token("ada", "ADMIN")).unwrap();

        // Simulated process restart: a fresh store over the same directory.
        let second = SessionStore::new(dir.path());
        assert!(second.initialize().unwrap());
        assert_eq!(second.identity().unwrap(), at_login);
        assert_eq!(second.token(), first.token());
    }

    #[test]
    fn test_logout_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        store.login(&token("u1", "VIEWER")).unwrap();
        store.logout().expect("logout failed");
        assert_eq!(store.token(), None);
        assert_eq!(store.identity(), None);

        // Second logout observes the same state, no error.
        store.logout().expect("repeat logout failed");
        assert_eq!(store.token(), None);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_login_replaces_previous_session_whole() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        store.login(&token("old", "MEMBER")).unwrap();
        store.login(&token("new", "ADMIN")).unwrap();

        let identity = store.identity().unwrap();
        assert_eq!(identity.sub, "new");
        assert_eq!(identity.role, Role::Admin);

        let persisted = std::fs::read_to_string(dir.path().join(TOKEN_FILE)).unwrap();
        assert_eq!(Some(persisted), store.token());
    }
}
