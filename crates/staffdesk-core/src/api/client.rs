//! API client for the employee self-service REST API.
//!
//! Every request goes through one pipeline: the request hook attaches the
//! bearer token from the [`CredentialStore`], the response hook turns a
//! 401 into a call to the registered [`UnauthorizedHandler`]. The client
//! itself never clears credentials and never retries.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, multipart, Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{ApiError, ApiResult};
use crate::auth::{CredentialStore, Session};
use crate::config::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::models::Id;

/// Called when the server rejects the bearer token.
///
/// Registered once when the client is built. Concurrent requests that all
/// fail with 401 each call it, so implementations must be idempotent.
pub trait UnauthorizedHandler: Send + Sync {
    fn handle_unauthorized(&self);
}

impl<F> UnauthorizedHandler for F
where
    F: Fn() + Send + Sync,
{
    fn handle_unauthorized(&self) {
        self()
    }
}

/// API client for the self-service backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    credentials: Arc<CredentialStore>,
    on_unauthorized: Option<Arc<dyn UnauthorizedHandler>>,
}

pub struct ApiClientBuilder {
    base_url: String,
    timeout: Duration,
    credentials: Arc<CredentialStore>,
    on_unauthorized: Option<Arc<dyn UnauthorizedHandler>>,
}

impl ApiClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn on_unauthorized(mut self, handler: Arc<dyn UnauthorizedHandler>) -> Self {
        self.on_unauthorized = Some(handler);
        self
    }

    pub fn build(self) -> ApiResult<ApiClient> {
        let client = Client::builder().timeout(self.timeout).build()?;
        Ok(ApiClient {
            client,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            credentials: self.credentials,
            on_unauthorized: self.on_unauthorized,
        })
    }
}

impl ApiClient {
    pub fn builder(base_url: impl Into<String>, credentials: Arc<CredentialStore>) -> ApiClientBuilder {
        ApiClientBuilder {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            credentials,
            on_unauthorized: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `/{collection}/{id}` with the id escaped as a single path segment.
    pub(crate) fn item_path(&self, collection: &str, id: &Id) -> ApiResult<String> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| ApiError::validation(format!("Invalid API base URL: {}", e)))?;
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::validation("API base URL cannot carry a path"))?
            .pop_if_empty()
            .push(collection)
            .push(&id.to_string());
        let prefix = base.path().trim_end_matches('/').len();
        Ok(url.path()[prefix..].to_string())
    }

    /// The cached session every feature call builds its parameters from.
    pub(crate) fn session(&self) -> ApiResult<Session> {
        self.credentials.read()?.ok_or(ApiError::NotSignedIn)
    }

    /// Request hook: attach the current token, if there is one.
    fn authorize(&self, request: RequestBuilder) -> ApiResult<RequestBuilder> {
        match self.credentials.token()? {
            Some(token) => {
                let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| ApiError::validation("Stored token is not a valid header value"))?;
                Ok(request.header(header::AUTHORIZATION, value))
            }
            None => Ok(request),
        }
    }

    /// Response hook: signal 401s, map other failures to errors.
    async fn check_response(&self, response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            self.signal_unauthorized(response.url().path());
            return Err(ApiError::Unauthorized);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &body))
    }

    fn signal_unauthorized(&self, path: &str) {
        match self.on_unauthorized {
            Some(ref handler) => {
                debug!(path, "Unauthorized response, notifying handler");
                handler.handle_unauthorized();
            }
            None => warn!(path, "Unauthorized response but no handler is registered"),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!(%method, url = %url, "Sending request");
        self.client.request(method, url)
    }

    async fn execute(&self, request: RequestBuilder) -> ApiResult<Response> {
        let request = self.authorize(request)?;
        let response = request.send().await?;
        self.check_response(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let url = response.url().path().to_string();
        let text = response.text().await?;
        let value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)
                .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", url, e)))?
        };
        unwrap_envelope(value).map_err(|e| match e {
            ApiError::InvalidResponse(msg) => ApiError::InvalidResponse(format!("{}: {}", url, msg)),
            other => other,
        })
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        let response = self.execute(self.request(Method::GET, path).query(query)).await?;
        Self::decode(response).await
    }

    pub(crate) async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> ApiResult<T> {
        let request = self.request(method, path).query(query).json(body);
        let response = self.execute(request).await?;
        Self::decode(response).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        let response = self.execute(self.request(Method::DELETE, path).query(query)).await?;
        Self::decode(response).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: multipart::Form) -> ApiResult<T> {
        let response = self.execute(self.request(Method::POST, path).multipart(form)).await?;
        Self::decode(response).await
    }

    /// POST without the bearer token. Any failure, 401 included, comes
    /// back as an error and never reaches the unauthorized handler.
    pub(crate) async fn post_anonymous<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }
        Self::decode(response).await
    }
}

/// Accepts both `{"success": .., "message": .., "data": ..}` and a bare
/// payload. `success: false` becomes [`ApiError::Rejected`].
pub(crate) fn unwrap_envelope<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    let payload = match value {
        Value::Object(mut map) if map.contains_key("data") || map.contains_key("success") => {
            if map.get("success").and_then(Value::as_bool) == Some(false) {
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("request was not accepted")
                    .to_string();
                return Err(ApiError::Rejected(message));
            }
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    serde_json::from_value(payload).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}
