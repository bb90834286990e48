use chrono::{NaiveDate, Utc};
use reqwest::{multipart, Method};
use serde_json::json;
use tracing::info;

use super::{wire_date, ApiClient, ApiError, ApiResult};
use crate::models::{AttendanceAction, AttendanceRecord, Selfie};

impl ApiClient {
    /// Attendance between two dates, inclusive.
    pub async fn fetch_attendance_history(&self, from: NaiveDate, to: NaiveDate) -> ApiResult<Vec<AttendanceRecord>> {
        if from > to {
            return Err(ApiError::validation("Start date must not be after end date"));
        }
        let session = self.session()?;
        let mut query = session.user.identity_params();
        query.push(("fromDate", wire_date(from)));
        query.push(("toDate", wire_date(to)));

        let records: Option<Vec<AttendanceRecord>> = self.get("/attendance/history", &query).await?;
        Ok(records.unwrap_or_default())
    }

    pub async fn check_in(&self, selfie: Selfie) -> ApiResult<Option<AttendanceRecord>> {
        self.punch(AttendanceAction::CheckIn, "/attendance/check-in", selfie).await
    }

    pub async fn check_out(&self, selfie: Selfie) -> ApiResult<Option<AttendanceRecord>> {
        self.punch(AttendanceAction::CheckOut, "/attendance/check-out", selfie).await
    }

    pub async fn start_break(&self) -> ApiResult<Option<AttendanceRecord>> {
        self.mark_break(AttendanceAction::BreakStart).await
    }

    pub async fn end_break(&self) -> ApiResult<Option<AttendanceRecord>> {
        self.mark_break(AttendanceAction::BreakEnd).await
    }

    /// Upload a selfie-backed check-in or check-out.
    async fn punch(&self, action: AttendanceAction, path: &str, selfie: Selfie) -> ApiResult<Option<AttendanceRecord>> {
        if action.requires_selfie() && selfie.is_empty() {
            return Err(ApiError::validation("A selfie is required to check in or out"));
        }
        let session = self.session()?;

        let mut form = multipart::Form::new();
        for (key, value) in session.user.identity_params() {
            form = form.text(key, value);
        }
        let part = multipart::Part::bytes(selfie.bytes)
            .file_name(selfie.file_name)
            .mime_str(&selfie.mime)
            .map_err(|_| ApiError::validation(format!("Unsupported selfie type: {}", selfie.mime)))?;
        form = form
            .text("action", action.as_str())
            .text("timestamp", Utc::now().to_rfc3339())
            .part("selfie", part);

        let record = self.post_multipart(path, form).await?;
        info!(action = action.as_str(), "Attendance recorded");
        Ok(record)
    }

    async fn mark_break(&self, action: AttendanceAction) -> ApiResult<Option<AttendanceRecord>> {
        let session = self.session()?;
        let query = session.user.identity_params();
        let body = json!({
            "action": if action == AttendanceAction::BreakStart { "start" } else { "end" },
            "timestamp": Utc::now().to_rfc3339(),
        });

        let record = self.send_json(Method::POST, "/attendance/break", &query, &body).await?;
        info!(action = action.as_str(), "Attendance recorded");
        Ok(record)
    }
}
