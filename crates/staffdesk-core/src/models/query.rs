use serde::{Deserialize, Serialize};

use super::Id;

/// A question raised by the employee to HR or their manager.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default)]
pub struct Query {
    pub id: Option<Id>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub status: Option<String>,
    /// Reply from the assignee, once answered.
    #[serde(alias = "reply")]
    pub response: Option<String>,
    #[serde(rename = "createdAt", alias = "created_at")]
    pub created_at: Option<String>,
}

impl Query {
    pub fn is_answered(&self) -> bool {
        self.response.as_deref().is_some_and(|r| !r.trim().is_empty())
    }
}

/// Body for creating or editing a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct NewQuery {
    pub subject: String,
    pub message: String,
}
