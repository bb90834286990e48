use super::{ApiClient, ApiResult};
use crate::auth::UserProfile;
use crate::models::Dashboard;

impl ApiClient {
    pub async fn fetch_dashboard(&self) -> ApiResult<Dashboard> {
        let session = self.session()?;
        let dashboard: Option<Dashboard> = self.get("/dashboard", &session.user.identity_params()).await?;
        Ok(dashboard.unwrap_or_default())
    }

    /// Fresh profile from the server. The stored session is left as is.
    pub async fn fetch_profile(&self) -> ApiResult<UserProfile> {
        let session = self.session()?;
        let profile: Option<UserProfile> = self.get("/profile", &session.user.identity_params()).await?;
        Ok(profile.unwrap_or(session.user))
    }
}
