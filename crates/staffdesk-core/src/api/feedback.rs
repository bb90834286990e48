use reqwest::Method;
use serde_json::Value;

use super::{require, ApiClient, ApiError, ApiResult};
use crate::models::feedback::{MAX_RATING, MIN_RATING};
use crate::models::{Feedback, Id, NewFeedback};

impl ApiClient {
    pub async fn fetch_feedback(&self) -> ApiResult<Vec<Feedback>> {
        let session = self.session()?;
        let feedback: Option<Vec<Feedback>> = self.get("/feedback", &session.user.identity_params()).await?;
        Ok(feedback.unwrap_or_default())
    }

    pub async fn create_feedback(&self, feedback: &NewFeedback) -> ApiResult<Option<Feedback>> {
        validate(feedback)?;
        let session = self.session()?;
        self.send_json(Method::POST, "/feedback", &session.user.identity_params(), feedback)
            .await
    }

    pub async fn update_feedback(&self, id: &Id, feedback: &NewFeedback) -> ApiResult<Option<Feedback>> {
        validate(feedback)?;
        let session = self.session()?;
        self.send_json(Method::PUT, &self.item_path("feedback", id)?, &session.user.identity_params(), feedback)
            .await
    }

    pub async fn delete_feedback(&self, id: &Id) -> ApiResult<()> {
        let session = self.session()?;
        let _: Value = self
            .delete(&self.item_path("feedback", id)?, &session.user.identity_params())
            .await?;
        Ok(())
    }
}

fn validate(feedback: &NewFeedback) -> ApiResult<()> {
    require(&feedback.message, "Message")?;
    if !feedback.rating_in_range() {
        return Err(ApiError::validation(format!(
            "Rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::{signed_in_client, MockServer};

    #[tokio::test]
    async fn test_feedback_crud() {
        let server = MockServer::start(vec![
            ("GET", "/feedback", 200, json!({"data": [{"id": "F1", "message": "Nice", "rating": 4}]})),
            ("POST", "/feedback", 200, json!({"data": {"id": "F2", "message": "More parking"}})),
            ("PUT", "/feedback/F2", 200, json!({"data": {"id": "F2", "rating": 3}})),
            ("DELETE", "/feedback/F2", 200, json!({"success": true, "message": "Deleted"})),
        ])
        .await;
        let client = signed_in_client(&server);

        let list = client.fetch_feedback().await.unwrap();
        assert_eq!(list[0].rating, Some(4));

        let fb = NewFeedback { message: "More parking".into(), rating: None };
        let created = client.create_feedback(&fb).await.unwrap().unwrap();
        assert_eq!(created.id, Some(Id::Text("F2".into())));
        assert_eq!(server.last().json(), json!({"message": "More parking"}));

        let edited = NewFeedback { message: "More parking".into(), rating: Some(3) };
        let updated = client.update_feedback(&Id::Text("F2".into()), &edited).await.unwrap().unwrap();
        assert_eq!(updated.rating, Some(3));

        client.delete_feedback(&Id::Text("F2".into())).await.unwrap();
        assert_eq!(server.last().method, "DELETE");
    }

    #[tokio::test]
    async fn test_feedback_validation() {
        let server = MockServer::start(vec![]).await;
        let client = signed_in_client(&server);

        let empty = NewFeedback { message: "".into(), rating: Some(5) };
        assert!(matches!(client.create_feedback(&empty).await, Err(ApiError::Validation(_))));
        let out_of_range = NewFeedback { message: "ok".into(), rating: Some(9) };
        assert!(matches!(
            client.create_feedback(&out_of_range).await,
            Err(ApiError::Validation(m)) if m == "Rating must be between 1 and 5"
        ));
        assert!(server.requests().is_empty());
    }
}
