//! Send mail handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::{
        mail::{DeliveryRoute, MailRequest, MailService},
        reporting::StatusReporter,
    },
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// A value the host may send either as a list or as one raw string
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListOrRaw {
    /// Already split into items
    List(Vec<String>),

    /// A single string still to be split
    Raw(String),
}

impl Default for ListOrRaw {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

/// Send mail request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SendMailBody {
    /// Recipients, as a list or a comma-separated string
    #[schema(value_type = Vec<String>, example = json!(["jane@example.com"]))]
    to: ListOrRaw,

    /// The subject line
    #[serde(default)]
    #[schema(example = "Your order has shipped")]
    subject: String,

    /// The HTML body
    #[serde(default)]
    #[schema(example = "<p>It's on its way!</p>")]
    message: String,

    /// Header lines, as a list or one raw block
    #[serde(default)]
    #[schema(value_type = Vec<String>, example = json!(["From: Shop <shop@example.com>"]))]
    headers: ListOrRaw,

    /// Attachment references; never forwarded to the worker
    #[serde(default)]
    attachments: Vec<String>,
}

impl From<SendMailBody> for MailRequest {
    fn from(body: SendMailBody) -> Self {
        let recipients = match body.to {
            ListOrRaw::List(items) => items
                .iter()
                .flat_map(|item| MailRequest::parse_recipients(item))
                .collect(),
            ListOrRaw::Raw(raw) => MailRequest::parse_recipients(&raw),
        };

        let headers = match body.headers {
            ListOrRaw::List(items) => items,
            ListOrRaw::Raw(raw) => MailRequest::parse_headers(&raw),
        };

        MailRequest {
            recipients,
            subject: body.subject,
            body_html: body.message,
            headers,
            attachments: body.attachments,
        }
    }
}

/// Send mail response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendMailResponse {
    /// The path that delivered the email
    delivered_by: DeliveryRoute,
}

/// Send an email through the worker, falling back to native delivery
#[utoipa::path(
    post,
    operation_id = "send_mail",
    tag = "Mail",
    path = "/api/v1/mail",
    request_body = SendMailBody,
    responses(
        (status = StatusCode::OK, description = "Email delivered", body = SendMailResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Unprocessable entity", body = ErrorResponse),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Neither path delivered the email", body = ErrorResponse),
    )
)]
pub async fn handler<M: MailService, R: StatusReporter>(
    State(state): State<AppState<M, R>>,
    request: Result<Json<SendMailBody>, JsonRejection>,
) -> Result<Json<SendMailResponse>, ApiError> {
    let Json(body) = request?;

    let delivered_by = state.mail.send(&body.into()).await?;

    Ok(Json(SendMailResponse { delivered_by }))
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use mockall::predicate::eq;
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        domain::mail::{tests::MockMailService, MailerError},
        infrastructure::http::{errors::ErrorResponse, router, state::tests::test_state},
    };

    use super::*;

    #[test]
    fn test_body_accepts_lists() -> TestResult {
        let body: SendMailBody = serde_json::from_value(json!({
            "to": ["a@b.com", "c@d.com, e@f.com"],
            "subject": "Hi",
            "message": "<b>Hello</b>",
            "headers": ["From: Shop <shop@example.com>"],
            "attachments": ["/tmp/invoice.pdf"],
        }))?;

        let request = MailRequest::from(body);

        assert_eq!(request.recipients, vec!["a@b.com", "c@d.com", "e@f.com"]);
        assert_eq!(request.headers, vec!["From: Shop <shop@example.com>"]);
        assert_eq!(request.attachments, vec!["/tmp/invoice.pdf"]);
        assert_eq!(request.body_html, "<b>Hello</b>");

        Ok(())
    }

    #[test]
    fn test_body_accepts_raw_strings() -> TestResult {
        let body: SendMailBody = serde_json::from_value(json!({
            "to": "a@b.com, c@d.com",
            "subject": "Hi",
            "message": "Hello",
            "headers": "Reply-To: help@example.com\r\nFrom: Shop <shop@example.com>\r\n",
        }))?;

        let request = MailRequest::from(body);

        assert_eq!(request.recipients, vec!["a@b.com", "c@d.com"]);
        assert_eq!(
            request.headers,
            vec!["Reply-To: help@example.com", "From: Shop <shop@example.com>"]
        );
        assert!(request.attachments.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_send_mail_via_worker() -> TestResult {
        let mut mail = MockMailService::new();

        mail.expect_send()
            .times(1)
            .with(eq(MailRequest::new("a@b.com", "Hi", "<b>Hello</b>")))
            .returning(|_| Ok(DeliveryRoute::Worker));

        let response = TestServer::new(router(test_state(Some(mail), None)))?
            .post("/api/v1/mail")
            .json(&json!({"to": "a@b.com", "subject": "Hi", "message": "<b>Hello</b>"}))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({"delivered_by": "worker"}));

        Ok(())
    }

    #[tokio::test]
    async fn test_send_mail_via_native_fallback() -> TestResult {
        let mut mail = MockMailService::new();

        mail.expect_send()
            .times(1)
            .returning(|_| Ok(DeliveryRoute::Native));

        let response = TestServer::new(router(test_state(Some(mail), None)))?
            .post("/api/v1/mail")
            .json(&json!({"to": ["a@b.com"], "subject": "Hi", "message": "Hello"}))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({"delivered_by": "native"}));

        Ok(())
    }

    #[tokio::test]
    async fn test_send_mail_failure() -> TestResult {
        let mut mail = MockMailService::new();

        mail.expect_send()
            .times(1)
            .returning(|_| Err(MailerError::UnknownError(anyhow!("relay refused"))));

        let response = TestServer::new(router(test_state(Some(mail), None)))?
            .post("/api/v1/mail")
            .json(&json!({"to": "a@b.com", "subject": "Hi", "message": "Hello"}))
            .await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!response.json::<ErrorResponse>().error.contains("relay"));

        Ok(())
    }

    #[tokio::test]
    async fn test_send_mail_rejects_missing_recipients() -> TestResult {
        let mut mail = MockMailService::new();

        mail.expect_send().times(0);

        let response = TestServer::new(router(test_state(Some(mail), None)))?
            .post("/api/v1/mail")
            .json(&json!({"subject": "Hi"}))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        Ok(())
    }
}
