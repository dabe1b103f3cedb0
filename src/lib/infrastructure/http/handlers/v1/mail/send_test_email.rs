//! Send test email handler

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::{
    domain::{mail::MailService, reporting::StatusReporter},
    infrastructure::http::{errors::ApiError, state::AppState},
};

const SUCCESS_MESSAGE: &str = "Test email sent successfully!";
const FAILURE_MESSAGE: &str = "Failed to send test email.";

/// Send test email response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendTestEmailResponse {
    /// Always `true`; failures answer with an error instead
    success: bool,

    /// A human-readable confirmation
    #[schema(example = "Test email sent successfully!")]
    message: String,
}

/// Send the fixed test email to the configured admin address
#[utoipa::path(
    post,
    operation_id = "send_test_email",
    tag = "Mail",
    path = "/api/v1/test-email",
    responses(
        (status = StatusCode::OK, description = "Test email sent", body = SendTestEmailResponse),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Test email failed", body = ErrorResponse, example = json!({"error": "Failed to send test email."})),
    )
)]
pub async fn handler<M: MailService, R: StatusReporter>(
    State(state): State<AppState<M, R>>,
) -> Result<Json<SendTestEmailResponse>, ApiError> {
    match state.mail.send_test_email(&state.config.admin_email).await {
        Ok(route) => {
            info!("test email delivered via {route:?}");

            Ok(Json(SendTestEmailResponse {
                success: true,
                message: SUCCESS_MESSAGE.to_string(),
            }))
        }
        Err(err) => {
            warn!("test email failed: {err}");

            Err(ApiError::new_500(FAILURE_MESSAGE))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use mockall::predicate::eq;
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        domain::mail::{tests::MockMailService, DeliveryRoute, EmailAddress, MailerError},
        infrastructure::http::{
            router,
            state::tests::{test_state, ADMIN_EMAIL},
        },
    };

    #[tokio::test]
    async fn test_sends_to_admin() -> TestResult {
        let mut mail = MockMailService::new();

        mail.expect_send_test_email()
            .times(1)
            .with(eq(EmailAddress::new(ADMIN_EMAIL)?))
            .returning(|_| Ok(DeliveryRoute::Native));

        let response = TestServer::new(router(test_state(Some(mail), None)))?
            .post("/api/v1/test-email")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "success": true,
            "message": "Test email sent successfully!",
        }));

        Ok(())
    }

    #[tokio::test]
    async fn test_failure() -> TestResult {
        let mut mail = MockMailService::new();

        mail.expect_send_test_email()
            .times(1)
            .returning(|_| Err(MailerError::SendError));

        let response = TestServer::new(router(test_state(Some(mail), None)))?
            .post("/api/v1/test-email")
            .await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({"error": "Failed to send test email."}));

        Ok(())
    }
}
