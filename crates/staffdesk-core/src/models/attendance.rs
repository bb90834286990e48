use serde::{Deserialize, Serialize};

use super::Id;

/// One day of attendance as reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default)]
pub struct AttendanceRecord {
    pub id: Option<Id>,
    pub date: Option<String>,
    #[serde(rename = "checkIn", alias = "check_in")]
    pub check_in: Option<String>,
    #[serde(rename = "checkOut", alias = "check_out")]
    pub check_out: Option<String>,
    #[serde(rename = "breakStart", alias = "break_start")]
    pub break_start: Option<String>,
    #[serde(rename = "breakEnd", alias = "break_end")]
    pub break_end: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "workingHours", alias = "working_hours")]
    pub working_hours: Option<String>,
}

impl AttendanceRecord {
    /// Checked in but not yet checked out.
    pub fn is_open(&self) -> bool {
        self.check_in.is_some() && self.check_out.is_none()
    }

    /// A break was started and has not ended.
    pub fn on_break(&self) -> bool {
        self.break_start.is_some() && self.break_end.is_none()
    }

    pub fn status_display(&self) -> &str {
        match self.status.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ if self.is_open() => "Checked in",
            _ if self.check_out.is_some() => "Checked out",
            _ => "Absent",
        }
    }
}

/// Attendance transitions the employee can perform during a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum AttendanceAction {
    CheckIn,
    BreakStart,
    BreakEnd,
    CheckOut,
}

impl AttendanceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceAction::CheckIn => "check_in",
            AttendanceAction::BreakStart => "break_start",
            AttendanceAction::BreakEnd => "break_end",
            AttendanceAction::CheckOut => "check_out",
        }
    }

    /// Check-in and check-out are proven with a selfie.
    pub fn requires_selfie(&self) -> bool {
        matches!(self, AttendanceAction::CheckIn | AttendanceAction::CheckOut)
    }
}

/// An already-captured selfie image ready for upload.
#[derive(Clone, PartialEq)]
pub struct Selfie {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: String,
}

impl Selfie {
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            file_name: "selfie.jpg".to_string(),
            mime: "image/jpeg".to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for Selfie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selfie")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attendance_history_item() {
        let json = r#"{"id": 991, "date": "2026-10-16", "checkIn": "09:02", "breakStart": "13:00", "breakEnd": "13:30", "checkOut": "18:10", "workingHours": "8:38", "status": "Present"}"#;
        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, Some(Id::Number(991)));
        assert_eq!(record.check_in.as_deref(), Some("09:02"));
        assert!(!record.is_open());
        assert!(!record.on_break());
        assert_eq!(record.status_display(), "Present");
    }

    #[test]
    fn test_status_display_falls_back_to_punches() {
        let open = AttendanceRecord {
            check_in: Some("09:00".into()),
            ..Default::default()
        };
        assert!(open.is_open());
        assert_eq!(open.status_display(), "Checked in");
        assert_eq!(AttendanceRecord::default().status_display(), "Absent");
    }

    #[test]
    fn test_selfie_required_only_for_check_in_and_out() {
        assert!(AttendanceAction::CheckIn.requires_selfie());
        assert!(AttendanceAction::CheckOut.requires_selfie());
        assert!(!AttendanceAction::BreakStart.requires_selfie());
        assert!(!AttendanceAction::BreakEnd.requires_selfie());
    }
}
