use reqwest::Method;
use tracing::info;

use super::{require, ApiClient, ApiError, ApiResult};
use crate::models::{LeaveApplication, LeaveRecord, LeaveSummary};

impl ApiClient {
    pub async fn fetch_leave_summary(&self) -> ApiResult<LeaveSummary> {
        let session = self.session()?;
        let summary: Option<LeaveSummary> = self.get("/leave/summary", &session.user.identity_params()).await?;
        Ok(summary.unwrap_or_default())
    }

    pub async fn fetch_leave_history(&self) -> ApiResult<Vec<LeaveRecord>> {
        let session = self.session()?;
        let records: Option<Vec<LeaveRecord>> = self.get("/leave/history", &session.user.identity_params()).await?;
        Ok(records.unwrap_or_default())
    }

    pub async fn apply_leave(&self, application: &LeaveApplication) -> ApiResult<Option<LeaveRecord>> {
        require(&application.leave_type, "Leave type")?;
        require(&application.reason, "Reason")?;
        if application.from > application.to {
            return Err(ApiError::validation("Leave cannot end before it starts"));
        }
        let session = self.session()?;

        let record = self
            .send_json(Method::POST, "/leave/apply", &session.user.identity_params(), application)
            .await?;
        info!(
            leave_type = %application.leave_type,
            days = application.days(),
            "Leave application submitted"
        );
        Ok(record)
    }
}
