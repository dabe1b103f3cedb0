//! Log service module

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use crate::domain::mail::sanitize_text_field;

use super::{EmailLogRepository, LogEntry, LogError, LogStatus, NewLogEntry, TtlCache};

/// How long report queries may be served from cache
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Log service
#[async_trait]
pub trait EmailLogService: Clone + Send + Sync + 'static {
    /// Appends one entry for a delivery attempt.
    ///
    /// # Arguments
    /// * `to_email` - The recipient the attempt was addressed to.
    /// * `subject` - The subject line.
    /// * `status` - Whether the worker accepted the email.
    /// * `http_code` - The worker's HTTP status; `Some(0)` when no response was received.
    /// * `response` - The worker response body or error message.
    ///
    /// # Returns
    /// The ID assigned by the store. Always writes through; never touches the cache.
    async fn record(
        &self,
        to_email: &str,
        subject: &str,
        status: LogStatus,
        http_code: Option<u16>,
        response: &str,
    ) -> Result<i64, LogError>;

    /// Up to `limit` entries, most recent first. May be up to one cache TTL stale.
    async fn recent(&self, limit: u32) -> Result<Vec<LogEntry>, LogError>;

    /// The most recent entry addressed to `admin_email`. May be up to one cache TTL stale.
    async fn last_test_result(&self, admin_email: &str) -> Result<Option<LogEntry>, LogError>;
}

#[cfg(test)]
mock! {
    pub EmailLogService {}

    impl Clone for EmailLogService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl EmailLogService for EmailLogService {
        async fn record(
            &self,
            to_email: &str,
            subject: &str,
            status: LogStatus,
            http_code: Option<u16>,
            response: &str,
        ) -> Result<i64, LogError>;
        async fn recent(&self, limit: u32) -> Result<Vec<LogEntry>, LogError>;
        async fn last_test_result(&self, admin_email: &str) -> Result<Option<LogEntry>, LogError>;
    }
}

/// Log service implementation
#[derive(Debug, Clone)]
pub struct EmailLogServiceImpl<R>
where
    R: EmailLogRepository,
{
    repo: Arc<R>,
    recent_cache: Arc<TtlCache<u32, Vec<LogEntry>>>,
    last_test_cache: Arc<TtlCache<String, Option<LogEntry>>>,
}

impl<R> EmailLogServiceImpl<R>
where
    R: EmailLogRepository,
{
    /// Creates a log service caching report queries for [`DEFAULT_CACHE_TTL`].
    pub fn new(repo: Arc<R>) -> Self {
        Self::with_cache_ttl(repo, DEFAULT_CACHE_TTL)
    }

    /// Creates a log service caching report queries for `ttl`.
    pub fn with_cache_ttl(repo: Arc<R>, ttl: Duration) -> Self {
        Self {
            repo,
            recent_cache: Arc::new(TtlCache::new(ttl)),
            last_test_cache: Arc::new(TtlCache::new(ttl)),
        }
    }
}

#[async_trait]
impl<R> EmailLogService for EmailLogServiceImpl<R>
where
    R: EmailLogRepository,
{
    async fn record(
        &self,
        to_email: &str,
        subject: &str,
        status: LogStatus,
        http_code: Option<u16>,
        response: &str,
    ) -> Result<i64, LogError> {
        let entry = NewLogEntry::new(to_email, subject, status, http_code, response);

        self.repo.insert_log(&entry).await
    }

    async fn recent(&self, limit: u32) -> Result<Vec<LogEntry>, LogError> {
        self.recent_cache
            .get_or_try_insert_with(limit, || self.repo.recent_logs(limit))
            .await
    }

    async fn last_test_result(&self, admin_email: &str) -> Result<Option<LogEntry>, LogError> {
        let recipient = sanitize_text_field(admin_email);

        self.last_test_cache
            .get_or_try_insert_with(recipient.clone(), || {
                self.repo.latest_log_for_recipient(&recipient)
            })
            .await
    }
}
