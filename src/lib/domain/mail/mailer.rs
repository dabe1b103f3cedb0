//! Native mail delivery, used whenever the worker does not handle a request.

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use super::{MailRequest, MailerError};

/// The host's own mail transport
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Send an email
    ///
    /// # Arguments
    /// * `request` - The [`MailRequest`] to deliver. Attachments are not sent.
    ///
    /// # Returns
    /// A [`Result`] indicating success or failure.
    async fn send_email(&self, request: &MailRequest) -> Result<(), MailerError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Clone for Mailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Mailer for Mailer {
        async fn send_email(&self, request: &MailRequest) -> Result<(), MailerError>;
    }
}
