//! Payload Builder: the JSON document posted to the worker endpoint.

use serde::{Deserialize, Serialize};

use super::{strip_tags, MailRequest, SenderIdentity};

/// A recipient entry in the worker payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadRecipient {
    /// Recipient address
    pub email: String,
}

/// The sender entry in the worker payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadSender {
    /// Sender address
    pub email: String,

    /// Sender display name, possibly empty
    pub name: String,
}

/// The normalized email sent to the worker endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundPayload {
    /// Recipients; always exactly one when built by [`build_payload`]
    pub to: Vec<PayloadRecipient>,

    /// Sender
    pub from: PayloadSender,

    /// Subject line
    pub subject: String,

    /// HTML body, as supplied by the host
    pub html: String,

    /// Plain-text body derived from `html`
    pub text: String,
}

impl OutboundPayload {
    /// The first recipient address, or an empty string
    pub fn primary_recipient(&self) -> &str {
        self.to
            .first()
            .map(|recipient| recipient.email.as_str())
            .unwrap_or_default()
    }
}

/// Builds the worker payload for `request`, addressed to its primary recipient
/// and sent as `sender`.
pub fn build_payload(request: &MailRequest, sender: &SenderIdentity) -> OutboundPayload {
    OutboundPayload {
        to: vec![PayloadRecipient {
            email: request.primary_recipient().to_string(),
        }],
        from: PayloadSender {
            email: sender.email.to_string(),
            name: sender.name.clone(),
        },
        subject: request.subject.clone(),
        html: request.body_html.clone(),
        text: strip_tags(&request.body_html),
    }
}
