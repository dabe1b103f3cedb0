//! Recent logs handler

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    domain::{
        logs::LogEntry,
        mail::MailService,
        reporting::{StatusReporter, REPORT_LOG_LIMIT},
    },
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// Largest page of log entries served at once
pub const MAX_LOG_LIMIT: u32 = 100;

/// Recent logs query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct LogsQuery {
    /// Number of entries to return, newest first (default 5, at most 100)
    #[param(example = 5)]
    limit: Option<u32>,
}

/// Get the most recent delivery attempts
#[utoipa::path(
    get,
    operation_id = "recent_logs",
    tag = "Reports",
    path = "/api/v1/logs",
    params(LogsQuery),
    responses(
        (status = StatusCode::OK, description = "Recent log entries", body = [LogEntry]),
        (status = StatusCode::NOT_FOUND, description = "Status reporting is disabled", body = ErrorResponse),
    )
)]
pub async fn handler<M: MailService, R: StatusReporter>(
    State(state): State<AppState<M, R>>,
    query: Result<Query<LogsQuery>, QueryRejection>,
) -> Result<Json<Vec<LogEntry>>, ApiError> {
    let Query(query) = query?;

    let reporter = state
        .reporter
        .as_ref()
        .ok_or_else(|| ApiError::new_404("Status reporting is disabled"))?;

    let limit = query.limit.unwrap_or(REPORT_LOG_LIMIT).min(MAX_LOG_LIMIT);

    Ok(Json(reporter.recent_logs(limit).await?))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use mockall::predicate::eq;
    use testresult::TestResult;

    use crate::{
        domain::reporting::tests::MockStatusReporter,
        infrastructure::http::{router, state::tests::test_state},
    };

    use super::*;

    async fn request_with_limit(path: &str, expected_limit: u32) -> TestResult {
        let mut reporter = MockStatusReporter::new();

        reporter
            .expect_recent_logs()
            .times(1)
            .with(eq(expected_limit))
            .returning(|_| Ok(vec![]));

        let response = TestServer::new(router(test_state(None, Some(reporter))))?
            .get(path)
            .await;

        response.assert_status_ok();
        assert!(response.json::<Vec<LogEntry>>().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_default_limit() -> TestResult {
        request_with_limit("/api/v1/logs", REPORT_LOG_LIMIT).await
    }

    #[tokio::test]
    async fn test_explicit_limit() -> TestResult {
        request_with_limit("/api/v1/logs?limit=20", 20).await
    }

    #[tokio::test]
    async fn test_limit_is_capped() -> TestResult {
        request_with_limit("/api/v1/logs?limit=5000", MAX_LOG_LIMIT).await
    }

    #[tokio::test]
    async fn test_invalid_limit() -> TestResult {
        let response = TestServer::new(router(test_state(None, Some(MockStatusReporter::new()))))?
            .get("/api/v1/logs?limit=lots")
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        Ok(())
    }

    #[tokio::test]
    async fn test_reporting_disabled() -> TestResult {
        let response = TestServer::new(router(test_state(None, None)))?
            .get("/api/v1/logs")
            .await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

        Ok(())
    }
}
