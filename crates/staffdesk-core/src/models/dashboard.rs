use serde::{Deserialize, Serialize};

use super::{AttendanceRecord, BirthdayNotice, Holiday};

/// Landing-screen summary for the signed-in employee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default)]
pub struct Dashboard {
    #[serde(rename = "presentDays", alias = "present_days")]
    pub present_days: Option<u32>,
    #[serde(rename = "absentDays", alias = "absent_days")]
    pub absent_days: Option<u32>,
    #[serde(rename = "leaveBalance", alias = "leave_balance")]
    pub leave_balance: Option<f64>,
    #[serde(rename = "pendingQueries", alias = "pending_queries")]
    pub pending_queries: Option<u32>,
    pub today: Option<AttendanceRecord>,
    #[serde(rename = "upcomingHolidays", alias = "upcoming_holidays")]
    pub upcoming_holidays: Vec<Holiday>,
    pub birthdays: Vec<BirthdayNotice>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_dashboard() {
        let json = r#"{"presentDays": 14, "today": {"checkIn": "09:05"}, "upcomingHolidays": [{"date": "2026-11-01", "name": "Foundation Day"}]}"#;
        let dashboard: Dashboard = serde_json::from_str(json).unwrap();
        assert_eq!(dashboard.present_days, Some(14));
        assert!(dashboard.today.as_ref().is_some_and(|t| t.is_open()));
        assert_eq!(dashboard.upcoming_holidays.len(), 1);
        assert!(dashboard.birthdays.is_empty());
        assert_eq!(dashboard.absent_days, None);
    }
}
