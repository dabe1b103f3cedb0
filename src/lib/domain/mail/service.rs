//! Mail service: worker redirection with native fallback.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use utoipa::ToSchema;

#[cfg(test)]
use mockall::mock;

use crate::domain::interception::{InterceptDecision, MailInterceptor};

use super::{EmailAddress, MailRequest, Mailer, MailerError};

/// Subject of the operator-triggered test email
pub const TEST_EMAIL_SUBJECT: &str = "EdgeMail test email";

/// Body of the operator-triggered test email
pub const TEST_EMAIL_MESSAGE: &str =
    "This is a test email from EdgeMail. If you received this, your configuration is working correctly!";

/// Which path ended up delivering an email
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryRoute {
    /// The worker endpoint accepted the email
    Worker,

    /// The worker did not handle the email and native delivery succeeded
    Native,
}

/// Mail service
#[async_trait]
pub trait MailService: Clone + Send + Sync + 'static {
    /// Sends an email, preferring the worker and falling back to native delivery.
    ///
    /// # Arguments
    /// * `request` - The email to send.
    ///
    /// # Returns
    /// - [`Ok`] with the [`DeliveryRoute`] that delivered the email.
    /// - [`Err`] with a [`MailerError`] if the worker did not handle it and native delivery failed.
    async fn send(&self, request: &MailRequest) -> Result<DeliveryRoute, MailerError>;

    /// Sends the fixed test email to `admin` through the same path as [`MailService::send`].
    async fn send_test_email(&self, admin: &EmailAddress) -> Result<DeliveryRoute, MailerError>;
}

#[cfg(test)]
mock! {
    pub MailService {}

    impl Clone for MailService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl MailService for MailService {
        async fn send(&self, request: &MailRequest) -> Result<DeliveryRoute, MailerError>;
        async fn send_test_email(&self, admin: &EmailAddress) -> Result<DeliveryRoute, MailerError>;
    }
}

/// Mail service implementation
#[derive(Debug, Clone)]
pub struct MailServiceImpl<I, M>
where
    I: MailInterceptor,
    M: Mailer,
{
    interceptor: Arc<I>,
    mailer: Arc<M>,
}

impl<I, M> MailServiceImpl<I, M>
where
    I: MailInterceptor,
    M: Mailer,
{
    /// Creates a new mail service.
    pub fn new(interceptor: Arc<I>, mailer: Arc<M>) -> Self {
        Self {
            interceptor,
            mailer,
        }
    }
}

#[async_trait]
impl<I, M> MailService for MailServiceImpl<I, M>
where
    I: MailInterceptor,
    M: Mailer,
{
    async fn send(&self, request: &MailRequest) -> Result<DeliveryRoute, MailerError> {
        if self.interceptor.intercept(request).await == InterceptDecision::Handled {
            return Ok(DeliveryRoute::Worker);
        }

        debug!("worker did not handle email, using native delivery");

        self.mailer.send_email(request).await.map_err(|err| {
            warn!("native delivery failed: {err}");
            err
        })?;

        Ok(DeliveryRoute::Native)
    }

    async fn send_test_email(&self, admin: &EmailAddress) -> Result<DeliveryRoute, MailerError> {
        let request = MailRequest::new(admin.as_str(), TEST_EMAIL_SUBJECT, TEST_EMAIL_MESSAGE);

        self.send(&request).await
    }
}
