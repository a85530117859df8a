use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::core::config::UpstreamConfig;
use crate::core::error::{AppError, Result};

use super::types::{
    CreateReportPayload, Department, IssueReport, LoginPayload, ReportQuery, SignupPayload,
    StatusUpdatePayload, TokenResponse, UpstreamUser, Vote,
};

/// Operations the portal needs from the report service
#[async_trait]
pub trait CivicApi: Send + Sync {
    async fn signup(&self, payload: &SignupPayload) -> Result<TokenResponse>;

    async fn login(&self, payload: &LoginPayload) -> Result<TokenResponse>;

    /// Resolve the user behind a bearer token
    async fn me(&self, token: &str) -> Result<UpstreamUser>;

    async fn list_reports(&self, query: &ReportQuery) -> Result<Vec<IssueReport>>;

    async fn my_reports(&self, token: &str) -> Result<Vec<IssueReport>>;

    async fn get_report(&self, id: i64) -> Result<IssueReport>;

    async fn create_report(&self, token: &str, payload: &CreateReportPayload)
        -> Result<IssueReport>;

    async fn update_status(
        &self,
        token: &str,
        id: i64,
        payload: &StatusUpdatePayload,
    ) -> Result<IssueReport>;

    async fn cast_vote(&self, token: &str, report_id: i64) -> Result<Vote>;

    async fn remove_vote(&self, token: &str, report_id: i64) -> Result<()>;

    async fn list_departments(&self) -> Result<Vec<Department>>;

    async fn department_reports(&self, department_id: i64) -> Result<Vec<IssueReport>>;
}

/// `CivicApi` over HTTP
pub struct HttpCivicApi {
    base_url: String,
    http_client: Client,
}

impl HttpCivicApi {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to {}: {}", what, e))
        })?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(map_upstream_error(status, &body, what))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = self.send(request, what).await?;
        response.json::<T>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Invalid response when trying to {}: {}", what, e))
        })
    }
}

/// Translate a non-success report-service response into an `AppError`.
///
/// The service answers errors as `{"detail": ...}`; the detail is passed
/// through to the user when present.
pub(crate) fn map_upstream_error(status: StatusCode, body: &str, what: &str) -> AppError {
    let detail = extract_detail(body);
    let message = detail
        .clone()
        .unwrap_or_else(|| format!("Failed to {}", what));

    match status {
        StatusCode::BAD_REQUEST => AppError::BadRequest(message),
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        StatusCode::UNPROCESSABLE_ENTITY => AppError::Validation(message),
        _ => AppError::ExternalServiceError(format!(
            "Report service returned HTTP {} when trying to {}: {}",
            status,
            what,
            detail.unwrap_or_else(|| body.chars().take(200).collect())
        )),
    }
}

fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) => Some(detail.clone()),
        Value::Null => None,
        // Validation errors arrive as a list of objects with a "msg" field
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .map(str::to_string)
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl CivicApi for HttpCivicApi {
    async fn signup(&self, payload: &SignupPayload) -> Result<TokenResponse> {
        debug!("Registering {} with report service", payload.email);
        let request = self.http_client.post(self.url("/auth/signup")).json(payload);
        self.send_json(request, "sign up").await
    }

    async fn login(&self, payload: &LoginPayload) -> Result<TokenResponse> {
        let request = self.http_client.post(self.url("/auth/login")).json(payload);
        self.send_json(request, "log in").await
    }

    async fn me(&self, token: &str) -> Result<UpstreamUser> {
        let request = self.http_client.get(self.url("/auth/me")).bearer_auth(token);
        self.send_json(request, "fetch current user").await
    }

    async fn list_reports(&self, query: &ReportQuery) -> Result<Vec<IssueReport>> {
        debug!("Listing reports from report service: {:?}", query);
        let request = self.http_client.get(self.url("/reports/")).query(query);
        self.send_json(request, "list reports").await
    }

    async fn my_reports(&self, token: &str) -> Result<Vec<IssueReport>> {
        let request = self.http_client.get(self.url("/reports/my")).bearer_auth(token);
        self.send_json(request, "list your reports").await
    }

    async fn get_report(&self, id: i64) -> Result<IssueReport> {
        let request = self.http_client.get(self.url(&format!("/reports/{}", id)));
        self.send_json(request, "fetch report").await
    }

    async fn create_report(
        &self,
        token: &str,
        payload: &CreateReportPayload,
    ) -> Result<IssueReport> {
        let request = self
            .http_client
            .post(self.url("/reports/"))
            .bearer_auth(token)
            .json(payload);
        self.send_json(request, "create report").await
    }

    async fn update_status(
        &self,
        token: &str,
        id: i64,
        payload: &StatusUpdatePayload,
    ) -> Result<IssueReport> {
        debug!("Forwarding status change of report {} to {}", id, payload.status);
        let request = self
            .http_client
            .patch(self.url(&format!("/reports/{}/status", id)))
            .bearer_auth(token)
            .json(payload);
        self.send_json(request, "update report status").await
    }

    async fn cast_vote(&self, token: &str, report_id: i64) -> Result<Vote> {
        let request = self
            .http_client
            .post(self.url(&format!("/votes/{}", report_id)))
            .bearer_auth(token);
        self.send_json(request, "cast vote").await
    }

    async fn remove_vote(&self, token: &str, report_id: i64) -> Result<()> {
        let request = self
            .http_client
            .delete(self.url(&format!("/votes/{}", report_id)))
            .bearer_auth(token);
        self.send(request, "remove vote").await?;
        Ok(())
    }

    async fn list_departments(&self) -> Result<Vec<Department>> {
        let request = self.http_client.get(self.url("/departments/"));
        self.send_json(request, "list departments").await
    }

    async fn department_reports(&self, department_id: i64) -> Result<Vec<IssueReport>> {
        let request = self
            .http_client
            .get(self.url(&format!("/departments/{}/reports", department_id)));
        self.send_json(request, "list department reports").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_error_mapping_uses_detail() {
        let err = map_upstream_error(
            StatusCode::BAD_REQUEST,
            r#"{"detail":"Already voted"}"#,
            "cast vote",
        );
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "Already voted"));

        let err = map_upstream_error(StatusCode::NOT_FOUND, "", "fetch report");
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Failed to fetch report"));

        let err = map_upstream_error(
            StatusCode::FORBIDDEN,
            r#"{"detail":"Not authorized"}"#,
            "update report status",
        );
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_validation_detail_list_is_joined() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"value is not a valid email address","type":"value_error"},{"loc":["body","password"],"msg":"field required","type":"missing"}]}"#;
        let err = map_upstream_error(StatusCode::UNPROCESSABLE_ENTITY, body, "sign up");
        assert!(matches!(
            err,
            AppError::Validation(ref m)
                if m == "value is not a valid email address; field required"
        ));
    }

    #[test]
    fn test_server_errors_are_external() {
        let err = map_upstream_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "<html>boom</html>",
            "list reports",
        );
        assert!(matches!(err, AppError::ExternalServiceError(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_external_error() {
        let api = HttpCivicApi::new(&UpstreamConfig {
            // Reserved port on loopback; nothing listens there
            base_url: "http://127.0.0.1:9/api".to_string(),
            request_timeout: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(1),
        })
        .unwrap();

        let result = api.get_report(1).await;
        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
    }
}
