//! REST API client module for the self-service backend.
//!
//! This module provides the `ApiClient` and, in one file per capability,
//! the feature operations built on it. Every operation reads the cached
//! session, forwards the employee identity as query parameters and
//! performs exactly one HTTP call. Required fields are validated before
//! anything is sent.

pub mod attendance;
pub mod auth;
pub mod client;
pub mod dashboard;
pub mod error;
pub mod feedback;
pub mod leave;
pub mod notice;
pub mod query;
pub mod salary;

pub use client::{ApiClient, ApiClientBuilder, UnauthorizedHandler};
pub use error::{ApiError, ApiResult};

/// Reject blank required fields before a request is built.
pub(crate) fn require(value: &str, field: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        Err(ApiError::validation(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

/// Dates go over the wire as `YYYY-MM-DD`.
pub(crate) fn wire_date(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
