//! Status report handler

use axum::{extract::State, Json};

use crate::{
    domain::{
        mail::MailService,
        reporting::{StatusReport, StatusReporter},
    },
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// Get the redirection status and recent activity
#[utoipa::path(
    get,
    operation_id = "status",
    tag = "Reports",
    path = "/api/v1/status",
    responses(
        (status = StatusCode::OK, description = "Status report", body = StatusReport),
        (status = StatusCode::NOT_FOUND, description = "Status reporting is disabled", body = ErrorResponse),
    )
)]
pub async fn handler<M: MailService, R: StatusReporter>(
    State(state): State<AppState<M, R>>,
) -> Result<Json<StatusReport>, ApiError> {
    let reporter = state
        .reporter
        .as_ref()
        .ok_or_else(|| ApiError::new_404("Status reporting is disabled"))?;

    Ok(Json(reporter.report().await?))
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::Utc;
    use testresult::TestResult;

    use crate::{
        domain::{
            logs::{LogEntry, LogError, LogStatus},
            reporting::tests::MockStatusReporter,
        },
        infrastructure::http::{errors::ErrorResponse, router, state::tests::test_state},
    };

    use super::*;

    fn report() -> StatusReport {
        let entry = LogEntry {
            id: 7,
            sent_at: Utc::now(),
            to_email: "admin@example.com".to_string(),
            subject: "EdgeMail test email".to_string(),
            status: LogStatus::Success,
            http_code: Some(200),
            worker_response: "{\"id\":\"m-1\"}".to_string(),
        };

        StatusReport {
            configured: true,
            worker_url_set: true,
            api_token_set: true,
            default_from_email: Some("no-reply@c.com".to_string()),
            default_from_name_set: false,
            last_test: Some(entry.clone()),
            recent_logs: vec![entry],
        }
    }

    #[tokio::test]
    async fn test_status_report() -> TestResult {
        let mut reporter = MockStatusReporter::new();
        let expected = report();
        let returned = expected.clone();

        reporter
            .expect_report()
            .times(1)
            .returning(move || Ok(returned.clone()));

        let response = TestServer::new(router(test_state(None, Some(reporter))))?
            .get("/api/v1/status")
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<StatusReport>(), expected);

        Ok(())
    }

    #[tokio::test]
    async fn test_status_report_never_exposes_token() -> TestResult {
        let mut reporter = MockStatusReporter::new();

        reporter.expect_report().returning(|| Ok(report()));

        let response = TestServer::new(router(test_state(None, Some(reporter))))?
            .get("/api/v1/status")
            .await;

        let json = response.json::<serde_json::Value>();

        assert_eq!(json["api_token_set"], true);
        assert!(json.get("api_token").is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_status_report_disabled() -> TestResult {
        let response = TestServer::new(router(test_state(None, None)))?
            .get("/api/v1/status")
            .await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.json::<ErrorResponse>().error,
            "Status reporting is disabled"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_status_report_store_failure() -> TestResult {
        let mut reporter = MockStatusReporter::new();

        reporter
            .expect_report()
            .returning(|| Err(LogError::UnknownError(anyhow!("database is locked"))));

        let response = TestServer::new(router(test_state(None, Some(reporter))))?
            .get("/api/v1/status")
            .await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        Ok(())
    }
}
