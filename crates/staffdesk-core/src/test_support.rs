//! In-process HTTP server for exercising the client end to end.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::api::ApiClient;
use crate::auth::{CredentialStore, Session, UserProfile};

/// A request as the server saw it.
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Clone, Default)]
struct MockState {
    routes: Arc<HashMap<(String, String), (u16, Value)>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

pub(crate) struct MockServer {
    pub base_url: String,
    state: MockState,
}

impl MockServer {
    /// Serve canned `(method, path, status, body)` responses. Anything
    /// else answers 404.
    pub async fn start(routes: Vec<(&str, &str, u16, Value)>) -> Self {
        let routes = routes
            .into_iter()
            .map(|(method, path, status, body)| ((method.to_string(), path.to_string()), (status, body)))
            .collect();
        let state = MockState {
            routes: Arc::new(routes),
            requests: Arc::default(),
        };

        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests().pop().expect("no request was recorded")
    }
}

async fn handle(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query,
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        body,
    });

    match state.routes.get(&(method.to_string(), uri.path().to_string())) {
        Some((status, body)) => {
            let status = StatusCode::from_u16(*status).unwrap();
            if status == StatusCode::NO_CONTENT {
                status.into_response()
            } else {
                (status, Json(body.clone())).into_response()
            }
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"message": "no such route"}))).into_response(),
    }
}

pub(crate) fn test_profile() -> UserProfile {
    let mut profile = UserProfile::new(1);
    profile.email = Some("asha@example.com".to_string());
    profile.branch_code = Some("BLR01".to_string());
    profile.full_name = Some("Asha Rao".to_string());
    profile
}

/// A memory store holding session `abc123` for employee 1.
pub(crate) fn signed_in_store() -> Arc<CredentialStore> {
    let store = Arc::new(CredentialStore::in_memory());
    store.save(&Session::new("abc123", test_profile())).unwrap();
    store
}

pub(crate) fn signed_in_client(server: &MockServer) -> ApiClient {
    ApiClient::builder(&server.base_url, signed_in_store()).build().unwrap()
}

pub(crate) fn signed_out_client(server: &MockServer) -> ApiClient {
    ApiClient::builder(&server.base_url, Arc::new(CredentialStore::in_memory()))
        .build()
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_query_values_are_decoded() {
        let server = MockServer::start(vec![("GET", "/memos", 200, json!([]))]).await;
        let client = signed_out_client(&server);

        let note = "50% off & more/é+".to_string();
        let _: Value = client.get("/memos", &[("note", note.clone())]).await.unwrap();

        assert_eq!(server.last().query["note"], note);
    }
}
