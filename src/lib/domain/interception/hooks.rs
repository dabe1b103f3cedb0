//! Extension points invoked by the [`Interceptor`](super::Interceptor).

use crate::domain::{
    delivery::DeliveryOutcome,
    mail::{MailRequest, OutboundPayload},
};

/// Rewrites the payload just before it is sent, e.g. to add tracking fields.
///
/// Closures of the form `Fn(OutboundPayload, &MailRequest) -> OutboundPayload`
/// implement this trait.
pub trait PayloadFilter: Send + Sync {
    /// Returns the payload to send. Return `payload` unchanged to opt out.
    fn filter(&self, payload: OutboundPayload, request: &MailRequest) -> OutboundPayload;
}

impl<F> PayloadFilter for F
where
    F: Fn(OutboundPayload, &MailRequest) -> OutboundPayload + Send + Sync,
{
    fn filter(&self, payload: OutboundPayload, request: &MailRequest) -> OutboundPayload {
        (self)(payload, request)
    }
}

/// Notified after every delivery attempt, successful or not.
///
/// Closures of the form `Fn(&DeliveryOutcome, &OutboundPayload)` implement this trait.
pub trait SendObserver: Send + Sync {
    /// Called with the outcome and the payload that was sent.
    fn on_send_result(&self, outcome: &DeliveryOutcome, payload: &OutboundPayload);
}

impl<F> SendObserver for F
where
    F: Fn(&DeliveryOutcome, &OutboundPayload) + Send + Sync,
{
    fn on_send_result(&self, outcome: &DeliveryOutcome, payload: &OutboundPayload) {
        (self)(outcome, payload)
    }
}
