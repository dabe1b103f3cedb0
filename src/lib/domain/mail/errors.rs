//! Error types for native mail delivery

use lettre::{address::AddressError, error::Error};
use thiserror::Error;
use tracing::debug;

use super::SenderError;

/// Mailer errors
#[derive(Debug, Error)]
pub enum MailerError {
    /// An error occurred while sending the email
    #[error("An error occurred while sending the email")]
    SendError,

    /// Invalid email address
    #[error("Invalid email address")]
    InvalidEmail,

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for MailerError {
    fn from(err: anyhow::Error) -> Self {
        MailerError::UnknownError(err)
    }
}

impl From<AddressError> for MailerError {
    fn from(err: AddressError) -> Self {
        debug!("AddressError -> MailerError: {err}");

        MailerError::InvalidEmail
    }
}

impl From<Error> for MailerError {
    fn from(err: Error) -> Self {
        MailerError::UnknownError(err.into())
    }
}

impl From<SenderError> for MailerError {
    fn from(err: SenderError) -> Self {
        debug!("SenderError -> MailerError: {err}");

        MailerError::InvalidEmail
    }
}
