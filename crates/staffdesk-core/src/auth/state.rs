//! App-wide authentication state.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::credentials::CredentialStore;
use super::session::{Session, UserProfile};
use super::store::StoreResult;
use crate::api::{ApiClient, ApiResult, UnauthorizedHandler};

/// Buffer size for the auth event channel.
/// Events are rare; 16 leaves room for a slow subscriber.
const EVENT_BUFFER_SIZE: usize = 16;

/// Which root the UI should mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum AuthState {
    /// The persisted session has not been read yet.
    Loading,
    Authenticated,
    Unauthenticated,
}

/// Notifications for the UI, e.g. to show a "session expired" notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum AuthEvent {
    LoggedIn,
    LoggedOut,
    /// The server rejected the token of an authenticated session.
    SessionExpired,
}

/// Owns [`AuthState`] and keeps it consistent with the [`CredentialStore`].
///
/// State starts at `Loading` and never returns there. Store writes and
/// state changes happen under one lock, so a login racing a 401 cannot
/// leave the state saying `Authenticated` over an empty store.
pub struct AuthManager {
    store: Arc<CredentialStore>,
    state: watch::Sender<AuthState>,
    events: broadcast::Sender<AuthEvent>,
    transition: Mutex<()>,
}

impl AuthManager {
    pub fn new(store: Arc<CredentialStore>) -> Self {
        let (state, _) = watch::channel(AuthState::Loading);
        let (events, _) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self {
            store,
            state,
            events,
            transition: Mutex::new(()),
        }
    }

    pub fn state(&self) -> AuthState {
        *self.state.borrow()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == AuthState::Authenticated
    }

    /// Watch state changes; the UI root mounts from this.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    /// Current session from the store, if authenticated.
    pub fn session(&self) -> Option<Session> {
        match self.store.read() {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Failed to read session");
                None
            }
        }
    }

    /// Leave `Loading` based on what the store holds. Later calls are
    /// no-ops that report the current state.
    pub fn bootstrap(&self) -> AuthState {
        let _guard = self.lock();
        let current = self.state();
        if current != AuthState::Loading {
            debug!(?current, "Already bootstrapped");
            return current;
        }

        let next = match self.store.read() {
            Ok(Some(session)) => {
                debug!(employee_id = %session.user.employee_id, "Restored persisted session");
                AuthState::Authenticated
            }
            Ok(None) => AuthState::Unauthenticated,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted session, starting signed out");
                AuthState::Unauthenticated
            }
        };
        self.state.send_replace(next);
        info!(state = ?next, "Auth bootstrapped");
        next
    }

    /// Persist a new session and become `Authenticated`. On a store failure
    /// the state is left unchanged.
    pub fn login(&self, token: impl Into<String>, user: UserProfile) -> StoreResult<()> {
        let session = Session::new(token, user);
        let _guard = self.lock();
        self.store.save(&session)?;
        self.state.send_replace(AuthState::Authenticated);
        let _ = self.events.send(AuthEvent::LoggedIn);
        info!(employee_id = %session.user.employee_id, "Logged in");
        Ok(())
    }

    /// Authenticate against the server, then [`login`](Self::login).
    pub async fn sign_in(&self, api: &ApiClient, login_id: &str, password: &str) -> ApiResult<UserProfile> {
        let session = api.authenticate(login_id, password).await?;
        let user = session.user.clone();
        self.login(session.token, session.user)?;
        Ok(user)
    }

    /// Forget the session and become `Unauthenticated`. The state changes
    /// even when clearing the store fails; the error is still returned.
    pub fn logout(&self) -> StoreResult<()> {
        let _guard = self.lock();
        let cleared = self.store.clear();
        let previous = self.state.send_replace(AuthState::Unauthenticated);
        if previous != AuthState::Unauthenticated {
            let _ = self.events.send(AuthEvent::LoggedOut);
        }
        info!("Logged out");
        cleared
    }

    /// Server said the token is no longer valid.
    ///
    /// Clearing runs on every call. `SessionExpired` is only emitted when
    /// this call ended an authenticated session, so a burst of concurrent
    /// 401s yields one notice.
    pub fn on_unauthorized(&self) {
        let _guard = self.lock();
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear credentials after unauthorized response");
        }
        let previous = self.state.send_replace(AuthState::Unauthenticated);
        if previous == AuthState::Authenticated {
            warn!("Session expired, signed out");
            let _ = self.events.send(AuthEvent::SessionExpired);
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded data is (); a poisoned lock carries no broken state.
        self.transition.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl UnauthorizedHandler for AuthManager {
    fn handle_unauthorized(&self) {
        self.on_unauthorized();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Id;

    fn manager() -> AuthManager {
        AuthManager::new(Arc::new(CredentialStore::in_memory()))
    }

    #[test]
    fn test_bootstrap_without_session_is_unauthenticated() {
        let auth = manager();
        assert_eq!(auth.state(), AuthState::Loading);
        assert_eq!(auth.bootstrap(), AuthState::Unauthenticated);
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn test_bootstrap_with_persisted_session() {
        let store = Arc::new(CredentialStore::in_memory());
        store.save(&Session::new("t0k", UserProfile::new(3))).unwrap();

        let auth = AuthManager::new(store);
        assert_eq!(auth.bootstrap(), AuthState::Authenticated);
    }

    #[test]
    fn test_bootstrap_runs_once() {
        let auth = manager();
        auth.bootstrap();
        auth.login("abc", UserProfile::new(1)).unwrap();
        assert_eq!(auth.bootstrap(), AuthState::Authenticated);
    }

    #[test]
    fn test_login_persists_and_authenticates() {
        let auth = manager();
        auth.bootstrap();
        let mut events = auth.events();

        auth.login("abc123", UserProfile::new(1)).unwrap();

        assert_eq!(auth.state(), AuthState::Authenticated);
        let session = auth.store().read().unwrap().unwrap();
        assert_eq!(session.token, "abc123");
        assert_eq!(session.user.employee_id, Id::Number(1));
        assert_eq!(events.try_recv().unwrap(), AuthEvent::LoggedIn);
    }

    #[test]
    fn test_logout_clears_store() {
        let auth = manager();
        auth.login("abc123", UserProfile::new(1)).unwrap();
        let mut events = auth.events();

        auth.logout().unwrap();

        assert_eq!(auth.state(), AuthState::Unauthenticated);
        assert_eq!(auth.store().read().unwrap(), None);
        assert_eq!(events.try_recv().unwrap(), AuthEvent::LoggedOut);
        assert!(auth.session().is_none());
    }

    #[test]
    fn test_unauthorized_expires_session_once() {
        let auth = manager();
        auth.login("abc123", UserProfile::new(1)).unwrap();
        let mut events = auth.events();

        auth.on_unauthorized();
        auth.on_unauthorized();

        assert_eq!(auth.state(), AuthState::Unauthenticated);
        assert_eq!(auth.store().token().unwrap(), None);
        assert_eq!(events.try_recv().unwrap(), AuthEvent::SessionExpired);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_unauthorized_while_signed_out_is_silent() {
        let auth = manager();
        auth.bootstrap();
        let mut events = auth.events();

        auth.on_unauthorized();

        assert_eq!(auth.state(), AuthState::Unauthenticated);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let auth = manager();
        let mut rx = auth.subscribe();
        assert_eq!(*rx.borrow(), AuthState::Loading);

        auth.bootstrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), AuthState::Unauthenticated);

        auth.login("abc", UserProfile::new(1)).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), AuthState::Authenticated);
    }
}
