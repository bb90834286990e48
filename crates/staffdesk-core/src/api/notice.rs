use super::{ApiClient, ApiResult};
use crate::models::{BirthdayNotice, Holiday, Memo};

impl ApiClient {
    pub async fn fetch_memos(&self) -> ApiResult<Vec<Memo>> {
        let session = self.session()?;
        let memos: Option<Vec<Memo>> = self.get("/memos", &session.user.identity_params()).await?;
        Ok(memos.unwrap_or_default())
    }

    /// Holidays for `year`, or the current year as decided by the server.
    pub async fn fetch_holidays(&self, year: Option<i32>) -> ApiResult<Vec<Holiday>> {
        let session = self.session()?;
        let mut query = session.user.identity_params();
        if let Some(year) = year {
            query.push(("year", year.to_string()));
        }
        let holidays: Option<Vec<Holiday>> = self.get("/holidays", &query).await?;
        Ok(holidays.unwrap_or_default())
    }

    pub async fn fetch_birthdays(&self) -> ApiResult<Vec<BirthdayNotice>> {
        let session = self.session()?;
        let notices: Option<Vec<BirthdayNotice>> = self
            .get("/notifications/birthdays", &session.user.identity_params())
            .await?;
        Ok(notices.unwrap_or_default())
    }
}
