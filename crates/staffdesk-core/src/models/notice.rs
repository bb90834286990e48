//! Read-only notices published by the organisation.

use serde::{Deserialize, Serialize};

use super::Id;

/// An internal memo addressed to the employee or their branch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default)]
pub struct Memo {
    pub id: Option<Id>,
    pub title: Option<String>,
    #[serde(alias = "description", alias = "message")]
    pub body: Option<String>,
    #[serde(rename = "issuedBy", alias = "issued_by")]
    pub issued_by: Option<String>,
    #[serde(rename = "issuedOn", alias = "issued_on", alias = "date")]
    pub issued_on: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default)]
pub struct Holiday {
    pub date: Option<String>,
    #[serde(alias = "title")]
    pub name: Option<String>,
    pub description: Option<String>,
    /// Restricted holidays the employee may choose to take.
    pub optional: bool,
}

/// A colleague's birthday shown in notifications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default)]
pub struct BirthdayNotice {
    #[serde(rename = "employeeId", alias = "employee_id")]
    pub employee_id: Option<Id>,
    #[serde(rename = "fullName", alias = "full_name", alias = "name")]
    pub full_name: Option<String>,
    pub department: Option<String>,
    #[serde(alias = "dob")]
    pub date: Option<String>,
}
