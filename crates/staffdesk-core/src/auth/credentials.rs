use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use super::session::{Session, UserProfile};
use super::store::{FileStore, KeyValueStore, KeyringStore, MemoryStore, StoreError, StoreResult};
use crate::config::StorageBackend;

/// Key holding the bearer token
pub const TOKEN_KEY: &str = "auth.token";

/// Key holding the serialized user profile
pub const USER_KEY: &str = "auth.user";

/// Persisted session: a bearer token and a user profile kept as two
/// entries in a [`KeyValueStore`].
///
/// The pair is either fully present or treated as absent. `save` writes
/// the profile before the token and rolls the profile back if the token
/// write fails; `read` discards a half-written pair. All operations hold
/// one lock, so a reader never sees a pair that `save` is still writing.
pub struct CredentialStore {
    backend: Box<dyn KeyValueStore>,
    io: Mutex<()>,
}

impl CredentialStore {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            io: Mutex::new(()),
        }
    }

    /// Open the configured backend. `dir` is where the file backend lives.
    pub fn open(kind: StorageBackend, dir: PathBuf) -> Self {
        let backend: Box<dyn KeyValueStore> = match kind {
            StorageBackend::File => Box::new(FileStore::new(dir)),
            StorageBackend::Keyring => Box::new(KeyringStore::new()),
            StorageBackend::Memory => Box::new(MemoryStore::new()),
        };
        debug!(?kind, "Credential store opened");
        Self::new(backend)
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    pub fn save(&self, session: &Session) -> StoreResult<()> {
        let _guard = self.lock();
        let user = serde_json::to_string(&session.user)?;
        self.backend.set(USER_KEY, &user)?;

        if let Err(e) = self.backend.set(TOKEN_KEY, &session.token) {
            if let Err(rollback) = self.backend.delete(USER_KEY) {
                warn!(error = %rollback, "Failed to roll back user profile after token write failed");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Last saved session, or `None` when logged out.
    pub fn read(&self) -> StoreResult<Option<Session>> {
        let _guard = self.lock();
        let token = self.backend.get(TOKEN_KEY)?;
        let user = self.backend.get(USER_KEY)?;

        match (token, user) {
            (Some(token), Some(user)) => match serde_json::from_str::<UserProfile>(&user) {
                Ok(user) => Ok(Some(Session { token, user })),
                Err(e) => {
                    warn!(error = %e, "Stored user profile is unreadable, discarding session");
                    self.clear_entries()?;
                    Ok(None)
                }
            },
            (None, None) => Ok(None),
            (token, _) => {
                warn!(has_token = token.is_some(), "Discarding half-written session");
                self.clear_entries()?;
                Ok(None)
            }
        }
    }

    /// Current bearer token, if any. Read on every outgoing request.
    pub fn token(&self) -> StoreResult<Option<String>> {
        let _guard = self.lock();
        self.backend.get(TOKEN_KEY)
    }

    /// Remove both entries. Missing entries are not an error.
    pub fn clear(&self) -> StoreResult<()> {
        let _guard = self.lock();
        self.clear_entries()
    }

    fn clear_entries(&self) -> StoreResult<()> {
        // Token first: once it is gone no request can authenticate.
        let token_result = self.backend.delete(TOKEN_KEY);
        let user_result = self.backend.delete(USER_KEY);
        token_result?;
        user_result?;
        Ok(())
    }

    pub fn has_session(&self) -> bool {
        matches!(self.read(), Ok(Some(_)))
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.io.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
