use super::{ApiClient, ApiError, ApiResult};
use crate::models::SalarySlip;

/// Payroll data starts here; earlier years are rejected locally.
const FIRST_PAYROLL_YEAR: i32 = 2000;

impl ApiClient {
    /// Payslip for a month (1-12) and year. `None` when the slip has not
    /// been generated yet.
    pub async fn fetch_salary_slip(&self, month: u32, year: i32) -> ApiResult<Option<SalarySlip>> {
        if !(1..=12).contains(&month) {
            return Err(ApiError::validation("Month must be between 1 and 12"));
        }
        if year < FIRST_PAYROLL_YEAR {
            return Err(ApiError::validation(format!("Year must be {} or later", FIRST_PAYROLL_YEAR)));
        }
        let session = self.session()?;
        let mut query = session.user.identity_params();
        query.push(("month", month.to_string()));
        query.push(("year", year.to_string()));

        self.get("/salary", &query).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::{signed_in_client, MockServer};

    #[tokio::test]
    async fn test_fetch_salary_slip() {
        let server = MockServer::start(vec![(
            "GET",
            "/salary",
            200,
            json!({"success": true, "data": {"month": 9, "year": 2026, "earnings": [{"name": "Basic", "amount": 50000}], "netPay": 46000}}),
        )])
        .await;
        let client = signed_in_client(&server);

        let slip = client.fetch_salary_slip(9, 2026).await.unwrap().unwrap();
        assert_eq!(slip.net(), 46000.0);

        let request = server.last();
        assert_eq!(request.query["month"], "9");
        assert_eq!(request.query["year"], "2026");
        assert_eq!(request.query["employeeId"], "1");
    }

    #[tokio::test]
    async fn test_missing_slip_is_none() {
        let server = MockServer::start(vec![("GET", "/salary", 200, json!({"success": true, "data": null}))]).await;
        let client = signed_in_client(&server);

        assert_eq!(client.fetch_salary_slip(1, 2026).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_month_and_year_validated_locally() {
        let server = MockServer::start(vec![]).await;
        let client = signed_in_client(&server);

        assert!(matches!(client.fetch_salary_slip(0, 2026).await, Err(ApiError::Validation(_))));
        assert!(matches!(client.fetch_salary_slip(13, 2026).await, Err(ApiError::Validation(_))));
        assert!(matches!(client.fetch_salary_slip(5, 1999).await, Err(ApiError::Validation(_))));
        assert!(server.requests().is_empty());
    }
}
