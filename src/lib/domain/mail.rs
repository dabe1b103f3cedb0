//! Outgoing mail: requests, sender identities, worker payloads and native delivery.

mod email_address;
mod errors;
mod mailer;
mod markup;
mod payload;
mod request;
mod sender;
mod service;

pub use email_address::{EmailAddress, EmailAddressError};
pub use errors::MailerError;
pub use mailer::Mailer;
pub use markup::{sanitize_text_field, strip_tags, truncate_sanitized};
pub use payload::{build_payload, OutboundPayload, PayloadRecipient, PayloadSender};
pub use request::MailRequest;
pub use sender::{resolve_sender, SenderError, SenderIdentity};
pub use service::{
    DeliveryRoute, MailService, MailServiceImpl, TEST_EMAIL_MESSAGE, TEST_EMAIL_SUBJECT,
};

#[cfg(test)]
pub mod tests {
    pub use super::mailer::MockMailer;
    pub use super::service::MockMailService;
}
