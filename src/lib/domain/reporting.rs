//! Status reporting for operators: configuration state and recent activity.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[cfg(test)]
use mockall::mock;

use crate::domain::{
    logs::{EmailLogService, LogEntry, LogError},
    mail::EmailAddress,
    settings::SettingsProvider,
};

/// Number of recent log entries included in a report
pub const REPORT_LOG_LIMIT: u32 = 5;

/// A snapshot of the redirection status
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusReport {
    /// Worker URL, token and default From address are all set
    pub configured: bool,

    /// Worker URL is set
    pub worker_url_set: bool,

    /// API token is set
    pub api_token_set: bool,

    /// The default From address, if set
    pub default_from_email: Option<String>,

    /// Default From name is set
    pub default_from_name_set: bool,

    /// The latest attempt addressed to the admin, if any
    pub last_test: Option<LogEntry>,

    /// The most recent attempts, newest first
    pub recent_logs: Vec<LogEntry>,
}

/// Status reporter
#[async_trait]
pub trait StatusReporter: Clone + Send + Sync + 'static {
    /// Builds the current status report. Log data may be up to one cache TTL stale.
    async fn report(&self) -> Result<StatusReport, LogError>;

    /// Up to `limit` recent log entries, newest first
    async fn recent_logs(&self, limit: u32) -> Result<Vec<LogEntry>, LogError>;
}

#[cfg(test)]
mock! {
    pub StatusReporter {}

    impl Clone for StatusReporter {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl StatusReporter for StatusReporter {
        async fn report(&self) -> Result<StatusReport, LogError>;
        async fn recent_logs(&self, limit: u32) -> Result<Vec<LogEntry>, LogError>;
    }
}

/// Status reporter implementation
#[derive(Debug, Clone)]
pub struct StatusReporterImpl<S, L>
where
    S: SettingsProvider,
    L: EmailLogService,
{
    settings: Arc<S>,
    logs: Arc<L>,
    admin_email: EmailAddress,
}

impl<S, L> StatusReporterImpl<S, L>
where
    S: SettingsProvider,
    L: EmailLogService,
{
    /// Creates a reporter; `admin_email` identifies test emails.
    pub fn new(settings: Arc<S>, logs: Arc<L>, admin_email: EmailAddress) -> Self {
        Self {
            settings,
            logs,
            admin_email,
        }
    }
}

#[async_trait]
impl<S, L> StatusReporter for StatusReporterImpl<S, L>
where
    S: SettingsProvider,
    L: EmailLogService,
{
    async fn report(&self) -> Result<StatusReport, LogError> {
        let settings = self.settings.settings();

        let worker_url_set = !settings.worker_url.is_empty();
        let api_token_set = !settings.api_token.is_empty();
        let default_from_email =
            (!settings.default_from_email.is_empty()).then(|| settings.default_from_email.clone());

        Ok(StatusReport {
            configured: worker_url_set && api_token_set && default_from_email.is_some(),
            worker_url_set,
            api_token_set,
            default_from_email,
            default_from_name_set: !settings.default_from_name.is_empty(),
            last_test: self.logs.last_test_result(self.admin_email.as_str()).await?,
            recent_logs: self.logs.recent(REPORT_LOG_LIMIT).await?,
        })
    }

    async fn recent_logs(&self, limit: u32) -> Result<Vec<LogEntry>, LogError> {
        self.logs.recent(limit).await
    }
}
