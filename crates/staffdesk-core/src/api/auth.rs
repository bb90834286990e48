use serde::{Deserialize, Serialize};

use super::{require, ApiClient, ApiError, ApiResult};
use crate::auth::{Session, UserProfile};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    #[serde(rename = "loginId")]
    login_id: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(alias = "accessToken", alias = "access_token")]
    token: String,
    #[serde(alias = "profile", alias = "employee")]
    user: UserProfile,
}

impl ApiClient {
    /// Exchange a login id and password for a session. Does not persist
    /// anything; see `AuthManager::sign_in`.
    pub async fn authenticate(&self, login_id: &str, password: &str) -> ApiResult<Session> {
        require(login_id, "Login id")?;
        require(password, "Password")?;

        let body = LoginRequest {
            login_id: login_id.trim(),
            password,
        };
        let response: LoginResponse = match self.post_anonymous("/auth/login", &body).await {
            Ok(response) => response,
            Err(ApiError::Unauthorized) => return Err(ApiError::InvalidCredentials),
            Err(e) => return Err(e),
        };

        if response.token.trim().is_empty() {
            return Err(ApiError::InvalidResponse("login returned an empty token".to_string()));
        }
        Ok(Session::new(response.token, response.user))
    }
}
