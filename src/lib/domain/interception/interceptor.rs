//! Interceptor module

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use tracing::{debug, info, warn};

#[cfg(test)]
use mockall::mock;

use crate::domain::{
    delivery::{DeliveryClient, TRANSPORT_FAILURE_CODE},
    logs::{EmailLogService, LogStatus},
    mail::{build_payload, resolve_sender, MailRequest, OutboundPayload},
    settings::SettingsProvider,
};

use super::{PayloadFilter, SendObserver};

/// What the host should do after interception
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterceptDecision {
    /// The worker delivered the email; the host must not send it again
    Handled,

    /// The host must deliver the email itself
    NotHandled,
}

/// Mail interceptor
#[async_trait]
pub trait MailInterceptor: Clone + Send + Sync + 'static {
    /// Attempts to deliver `request` through the worker.
    ///
    /// Never fails: every problem (missing configuration, invalid sender,
    /// transport error, rejected request) degrades to
    /// [`InterceptDecision::NotHandled`] so the host falls back to native delivery.
    async fn intercept(&self, request: &MailRequest) -> InterceptDecision;
}

#[cfg(test)]
mock! {
    pub MailInterceptor {}

    impl Clone for MailInterceptor {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl MailInterceptor for MailInterceptor {
        async fn intercept(&self, request: &MailRequest) -> InterceptDecision;
    }
}

/// Mail interceptor implementation
#[derive(Clone)]
pub struct Interceptor<S, D, L>
where
    S: SettingsProvider,
    D: DeliveryClient,
    L: EmailLogService,
{
    settings: Arc<S>,
    client: Arc<D>,
    logs: Arc<L>,
    payload_filter: Option<Arc<dyn PayloadFilter>>,
    observers: Vec<Arc<dyn SendObserver>>,
}

impl<S, D, L> Interceptor<S, D, L>
where
    S: SettingsProvider,
    D: DeliveryClient,
    L: EmailLogService,
{
    /// Creates an interceptor with no extension hooks.
    pub fn new(settings: Arc<S>, client: Arc<D>, logs: Arc<L>) -> Self {
        Self {
            settings,
            client,
            logs,
            payload_filter: None,
            observers: Vec::new(),
        }
    }

    /// Installs the payload filter, replacing any previous one.
    pub fn with_payload_filter(mut self, filter: impl PayloadFilter + 'static) -> Self {
        self.payload_filter = Some(Arc::new(filter));
        self
    }

    /// Adds an observer notified after every delivery attempt.
    pub fn with_observer(mut self, observer: impl SendObserver + 'static) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    fn apply_payload_filter(&self, payload: OutboundPayload, request: &MailRequest) -> OutboundPayload {
        match &self.payload_filter {
            Some(filter) => filter.filter(payload, request),
            None => payload,
        }
    }

    async fn record(
        &self,
        request: &MailRequest,
        status: LogStatus,
        http_code: u16,
        response: &str,
    ) {
        if let Err(err) = self
            .logs
            .record(
                request.primary_recipient(),
                &request.subject,
                status,
                Some(http_code),
                response,
            )
            .await
        {
            warn!("failed to record delivery attempt: {err}");
        }
    }
}

#[async_trait]
impl<S, D, L> MailInterceptor for Interceptor<S, D, L>
where
    S: SettingsProvider,
    D: DeliveryClient,
    L: EmailLogService,
{
    async fn intercept(&self, request: &MailRequest) -> InterceptDecision {
        let settings = self.settings.settings();

        if !settings.is_configured() {
            debug!("redirection not configured, passing through");
            return InterceptDecision::NotHandled;
        }

        if !request.attachments.is_empty() {
            debug!(
                "dropping {} attachment(s), not supported by the worker",
                request.attachments.len()
            );
        }

        let sender = match resolve_sender(
            &request.headers,
            &settings.default_from_email,
            &settings.default_from_name,
        ) {
            Ok(sender) => sender,
            Err(err) => {
                warn!("not forwarding email to {:?}: {err}", request.primary_recipient());

                self.record(
                    request,
                    LogStatus::Error,
                    TRANSPORT_FAILURE_CODE,
                    &err.to_string(),
                )
                .await;

                return InterceptDecision::NotHandled;
            }
        };

        let payload = self.apply_payload_filter(build_payload(request, &sender), request);

        let outcome = self
            .client
            .send(&settings.worker_url, &settings.api_token, &payload)
            .await;

        let status = if outcome.is_success() {
            LogStatus::Success
        } else {
            LogStatus::Error
        };

        self.record(request, status, outcome.http_code(), outcome.response_text())
            .await;

        for observer in &self.observers {
            observer.on_send_result(&outcome, &payload);
        }

        if outcome.is_success() {
            info!(
                "worker accepted email to {:?} ({})",
                payload.primary_recipient(),
                outcome.http_code()
            );

            InterceptDecision::Handled
        } else {
            warn!(
                "worker did not accept email to {:?} ({}), falling back to native delivery",
                payload.primary_recipient(),
                outcome.http_code()
            );

            InterceptDecision::NotHandled
        }
    }
}

impl<S, D, L> fmt::Debug for Interceptor<S, D, L>
where
    S: SettingsProvider,
    D: DeliveryClient,
    L: EmailLogService,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("settings", &"SettingsProvider")
            .field("client", &"DeliveryClient")
            .field("logs", &"EmailLogService")
            .field("payload_filter", &self.payload_filter.is_some())
            .field("observers", &self.observers.len())
            .finish()
    }
}
