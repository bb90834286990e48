//! Data models for the self-service API.
//!
//! This module contains the wire types exchanged with the server:
//!
//! - `AttendanceRecord`, `Selfie`: attendance history and check-in uploads
//! - `LeaveSummary`, `LeaveRecord`, `LeaveApplication`: leave balances and requests
//! - `SalarySlip`: monthly payslip data
//! - `Memo`, `Holiday`, `BirthdayNotice`: read-only notices
//! - `Query`, `Feedback`: employee-authored records with CRUD
//! - `Dashboard`: the landing summary
//!
//! Server fields are optional and default when missing so that partial
//! responses still decode.

pub mod attendance;
pub mod dashboard;
pub mod feedback;
pub mod leave;
pub mod notice;
pub mod query;
pub mod salary;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use attendance::{AttendanceAction, AttendanceRecord, Selfie};
pub use dashboard::Dashboard;
pub use feedback::{Feedback, NewFeedback};
pub use leave::{LeaveApplication, LeaveBalance, LeaveRecord, LeaveSummary};
pub use notice::{BirthdayNotice, Holiday, Memo};
pub use query::{NewQuery, Query};
pub use salary::{SalaryComponent, SalarySlip};

/// Identifier as sent by the server, which uses numbers for some records
/// and strings for others. The wire representation is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(untagged)]
pub enum Id {
    Number(i64),
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{}", n),
            Id::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Id::Number(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::Text(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id::Text(value)
    }
}
