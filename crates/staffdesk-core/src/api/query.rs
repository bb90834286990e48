use reqwest::Method;
use serde_json::Value;

use super::{require, ApiClient, ApiResult};
use crate::models::{Id, NewQuery, Query};

impl ApiClient {
    pub async fn fetch_queries(&self) -> ApiResult<Vec<Query>> {
        let session = self.session()?;
        let queries: Option<Vec<Query>> = self.get("/queries", &session.user.identity_params()).await?;
        Ok(queries.unwrap_or_default())
    }

    pub async fn create_query(&self, query: &NewQuery) -> ApiResult<Option<Query>> {
        validate(query)?;
        let session = self.session()?;
        self.send_json(Method::POST, "/queries", &session.user.identity_params(), query)
            .await
    }

    pub async fn update_query(&self, id: &Id, query: &NewQuery) -> ApiResult<Option<Query>> {
        validate(query)?;
        let session = self.session()?;
        self.send_json(Method::PUT, &self.item_path("queries", id)?, &session.user.identity_params(), query)
            .await
    }

    pub async fn delete_query(&self, id: &Id) -> ApiResult<()> {
        let session = self.session()?;
        let _: Value = self
            .delete(&self.item_path("queries", id)?, &session.user.identity_params())
            .await?;
        Ok(())
    }
}

fn validate(query: &NewQuery) -> ApiResult<()> {
    require(&query.subject, "Subject")?;
    require(&query.message, "Message")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::ApiError;
    use crate::test_support::{signed_in_client, MockServer};

    fn new_query() -> NewQuery {
        NewQuery {
            subject: "Payslip mismatch".into(),
            message: "HRA is missing for September".into(),
        }
    }

    #[tokio::test]
    async fn test_query_crud() {
        let server = MockServer::start(vec![
            ("GET", "/queries", 200, json!([{"id": 4, "subject": "Old", "status": "Closed"}])),
            ("POST", "/queries", 200, json!({"success": true, "data": {"id": 5, "subject": "Payslip mismatch"}})),
            ("PUT", "/queries/5", 200, json!({"success": true})),
            ("DELETE", "/queries/5", 204, json!(null)),
        ])
        .await;
        let client = signed_in_client(&server);

        assert_eq!(client.fetch_queries().await.unwrap().len(), 1);

        let created = client.create_query(&new_query()).await.unwrap().unwrap();
        assert_eq!(created.id, Some(Id::Number(5)));
        assert_eq!(server.last().json()["subject"], "Payslip mismatch");

        let id = Id::Number(5);
        assert_eq!(client.update_query(&id, &new_query()).await.unwrap(), None);
        assert_eq!(server.last().method, "PUT");

        client.delete_query(&id).await.unwrap();
        let last = server.last();
        assert_eq!(last.method, "DELETE");
        assert_eq!(last.path, "/queries/5");
        assert_eq!(last.query["employeeId"], "1");
    }

    #[tokio::test]
    async fn test_blank_query_not_sent() {
        let server = MockServer::start(vec![]).await;
        let client = signed_in_client(&server);

        let blank = NewQuery { subject: "".into(), message: "x".into() };
        assert!(matches!(client.create_query(&blank).await, Err(ApiError::Validation(m)) if m == "Subject is required"));
        let blank = NewQuery { subject: "x".into(), message: " ".into() };
        assert!(matches!(client.update_query(&Id::Number(1), &blank).await, Err(ApiError::Validation(_))));
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_query() {
        let server = MockServer::start(vec![]).await;
        let client = signed_in_client(&server);

        let result = client.delete_query(&Id::Text("Q-9".into())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert_eq!(server.last().path, "/queries/Q-9");
    }
}
