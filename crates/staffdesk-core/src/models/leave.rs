use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Id;

/// Leave balances per leave type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default)]
pub struct LeaveSummary {
    #[serde(alias = "leaves")]
    pub balances: Vec<LeaveBalance>,
}

impl LeaveSummary {
    pub fn total_remaining(&self) -> f64 {
        self.balances.iter().filter_map(|b| b.remaining).sum()
    }

    pub fn balance_for(&self, leave_type: &str) -> Option<&LeaveBalance> {
        self.balances
            .iter()
            .find(|b| b.leave_type.as_deref().is_some_and(|t| t.eq_ignore_ascii_case(leave_type)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default)]
pub struct LeaveBalance {
    #[serde(rename = "leaveType", alias = "leave_type")]
    pub leave_type: Option<String>,
    pub total: Option<f64>,
    pub used: Option<f64>,
    pub remaining: Option<f64>,
}

/// A previously submitted leave request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default)]
pub struct LeaveRecord {
    pub id: Option<Id>,
    #[serde(rename = "leaveType", alias = "leave_type")]
    pub leave_type: Option<String>,
    #[serde(rename = "fromDate", alias = "from_date")]
    pub from_date: Option<String>,
    #[serde(rename = "toDate", alias = "to_date")]
    pub to_date: Option<String>,
    pub days: Option<f64>,
    pub reason: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "appliedOn", alias = "applied_on")]
    pub applied_on: Option<String>,
}

impl LeaveRecord {
    pub fn is_pending(&self) -> bool {
        self.status
            .as_deref()
            .map(|s| s.eq_ignore_ascii_case("pending"))
            .unwrap_or(false)
    }
}

/// A new leave request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct LeaveApplication {
    #[serde(rename = "leaveType")]
    pub leave_type: String,
    #[serde(rename = "fromDate")]
    pub from: NaiveDate,
    #[serde(rename = "toDate")]
    pub to: NaiveDate,
    pub reason: String,
    #[serde(rename = "halfDay", default)]
    pub half_day: bool,
}

impl LeaveApplication {
    /// Calendar days covered, counting both ends. Half days count as 0.5.
    pub fn days(&self) -> f64 {
        if self.half_day {
            return 0.5;
        }
        ((self.to - self.from).num_days() + 1).max(0) as f64
    }
}
