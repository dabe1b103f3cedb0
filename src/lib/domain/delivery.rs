//! Delivery Client contract and outcome classification.

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use crate::domain::mail::OutboundPayload;

/// Status codes the worker answers with when it accepts an email. Anything
/// else, redirects included, is a failure.
pub const ACCEPTED_STATUS_CODES: [u16; 4] = [200, 201, 202, 204];

/// The code recorded when no HTTP response was received at all
pub const TRANSPORT_FAILURE_CODE: u16 = 0;

/// The result of a single delivery attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The worker accepted the email
    Success {
        /// HTTP status, one of [`ACCEPTED_STATUS_CODES`]
        http_code: u16,

        /// Response body as returned by the worker
        response: String,
    },

    /// The worker rejected the email or could not be reached
    Failure {
        /// HTTP status, or [`TRANSPORT_FAILURE_CODE`] if no response arrived
        http_code: u16,

        /// Response body, or the transport error message
        message: String,
    },
}

impl DeliveryOutcome {
    /// Classifies a received HTTP response.
    pub fn from_response(status: u16, body: String) -> Self {
        if ACCEPTED_STATUS_CODES.contains(&status) {
            Self::Success {
                http_code: status,
                response: body,
            }
        } else {
            Self::Failure {
                http_code: status,
                message: body,
            }
        }
    }

    /// A failure where no response was received (DNS, connect, timeout).
    pub fn transport_failure(message: &str) -> Self {
        let message = if message.trim().is_empty() {
            "transport error".to_string()
        } else {
            message.to_string()
        };

        Self::Failure {
            http_code: TRANSPORT_FAILURE_CODE,
            message,
        }
    }

    /// Whether the worker accepted the email
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Whether the attempt failed before any response was received
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            Self::Failure {
                http_code: TRANSPORT_FAILURE_CODE,
                ..
            }
        )
    }

    /// The HTTP status, or [`TRANSPORT_FAILURE_CODE`]
    pub fn http_code(&self) -> u16 {
        match self {
            Self::Success { http_code, .. } | Self::Failure { http_code, .. } => *http_code,
        }
    }

    /// The response body or error message
    pub fn response_text(&self) -> &str {
        match self {
            Self::Success { response, .. } => response,
            Self::Failure { message, .. } => message,
        }
    }
}

/// Delivers payloads to the worker endpoint
#[async_trait]
pub trait DeliveryClient: Clone + Send + Sync + 'static {
    /// Posts `payload` to `url`, authenticating with `token`. A single attempt
    /// bounded by the client's timeout; failures are returned as outcomes,
    /// never as errors.
    async fn send(&self, url: &str, token: &str, payload: &OutboundPayload) -> DeliveryOutcome;
}

#[cfg(test)]
mock! {
    pub DeliveryClient {}

    impl Clone for DeliveryClient {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl DeliveryClient for DeliveryClient {
        async fn send(&self, url: &str, token: &str, payload: &OutboundPayload) -> DeliveryOutcome;
    }
}
