use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::Id;

/// Signed-in identity: the bearer token and the profile returned at login.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

impl Session {
    pub fn new(token: impl Into<String>, user: UserProfile) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }
}

/// Employee profile as returned by the login endpoint.
///
/// Only the fields the client forwards are typed. Everything else the
/// server sends is kept in `extra` and written back unchanged, so a
/// profile survives a save/read cycle intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UserProfile {
    #[serde(rename = "employeeId", alias = "employee_id")]
    pub employee_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "branchCode", alias = "branch_code", default, skip_serializing_if = "Option::is_none")]
    pub branch_code: Option<String>,
    #[serde(rename = "fullName", alias = "full_name", default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "ts", ts(skip))]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn new(employee_id: impl Into<Id>) -> Self {
        Self {
            employee_id: employee_id.into(),
            email: None,
            role: None,
            branch_code: None,
            full_name: None,
            extra: Map::new(),
        }
    }

    /// Query parameters identifying the caller, forwarded on every
    /// feature request.
    pub fn identity_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("employeeId", self.employee_id.to_string())];
        if let Some(ref email) = self.email {
            params.push(("email", email.clone()));
        }
        if let Some(ref branch) = self.branch_code {
            params.push(("branchCode", branch.clone()));
        }
        params
    }

    pub fn display_name(&self) -> String {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => format!("Employee {}", self.employee_id),
        }
    }
}
