//! Authentication module for managing the signed-in session.
//!
//! This module provides:
//! - `Session`, `UserProfile`: the bearer token and the employee it belongs to
//! - `CredentialStore`: persists the session as two key-value entries
//! - `FileStore`, `KeyringStore`, `MemoryStore`: backends for the store
//! - `AuthManager`: the Loading / Authenticated / Unauthenticated state machine
//!
//! Tokens carry no local expiry. A session ends on logout or when the
//! server answers 401.

pub mod credentials;
pub mod session;
pub mod state;
pub mod store;

pub use credentials::CredentialStore;
pub use session::{Session, UserProfile};
pub use state::{AuthEvent, AuthManager, AuthState};
pub use store::{FileStore, KeyValueStore, KeyringStore, MemoryStore, StoreError, StoreResult};
