//! Log repository module

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use super::{LogEntry, LogError, NewLogEntry};

/// Append-only storage for log entries
#[async_trait]
pub trait EmailLogRepository: Clone + Send + Sync + 'static {
    /// Append an entry, returning its assigned ID
    async fn insert_log(&self, entry: &NewLogEntry) -> Result<i64, LogError>;

    /// Up to `limit` entries, most recent first
    async fn recent_logs(&self, limit: u32) -> Result<Vec<LogEntry>, LogError>;

    /// The most recent entry addressed to `to_email`, if any
    async fn latest_log_for_recipient(&self, to_email: &str)
        -> Result<Option<LogEntry>, LogError>;
}

#[cfg(test)]
mock! {
    pub EmailLogRepository {}

    impl Clone for EmailLogRepository {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl EmailLogRepository for EmailLogRepository {
        async fn insert_log(&self, entry: &NewLogEntry) -> Result<i64, LogError>;
        async fn recent_logs(&self, limit: u32) -> Result<Vec<LogEntry>, LogError>;
        async fn latest_log_for_recipient(&self, to_email: &str) -> Result<Option<LogEntry>, LogError>;
    }
}
