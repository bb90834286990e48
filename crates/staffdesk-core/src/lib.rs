//! Core library for staffdesk, an employee self-service client.
//!
//! The crate is organised the way a front-end consumes it:
//!
//! - `auth`: persisted session, credential store backends and the
//!   [`AuthManager`] state machine
//! - `api`: the authenticated [`ApiClient`] and one module per feature
//!   (attendance, leave, salary, memos, holidays, queries, feedback,
//!   notifications, dashboard)
//! - `models`: wire types returned by the API
//! - `config`: on-disk configuration
//!
//! [`AppContext`] wires these together with the unauthorized handler
//! registered on the client at construction time.

pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod models;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{ApiClient, ApiError, ApiResult, UnauthorizedHandler};
pub use auth::{AuthEvent, AuthManager, AuthState, CredentialStore, Session, UserProfile};
pub use config::{Config, StorageBackend};
pub use context::AppContext;
