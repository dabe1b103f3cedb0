//! SQLite implementation of the EmailLogRepository trait

use anyhow::{anyhow, Error};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query, query_as, FromRow};

use crate::{
    domain::logs::{EmailLogRepository, LogEntry, LogError, NewLogEntry},
    infrastructure::db::sqlite::SqliteDatabase,
};

#[derive(FromRow)]
struct LogRecord {
    id: i64,
    sent_at: DateTime<Utc>,
    to_email: String,
    subject: String,
    status: String,
    http_code: Option<i64>,
    worker_response: String,
}

impl TryFrom<LogRecord> for LogEntry {
    type Error = Error;

    fn try_from(record: LogRecord) -> Result<Self, Self::Error> {
        let http_code = record
            .http_code
            .map(|code| {
                u16::try_from(code).map_err(|_| anyhow!("stored HTTP code {code} out of range"))
            })
            .transpose()?;

        Ok(LogEntry {
            id: record.id,
            sent_at: record.sent_at,
            to_email: record.to_email,
            subject: record.subject,
            status: record.status.parse()?,
            http_code,
            worker_response: record.worker_response,
        })
    }
}

#[async_trait]
impl EmailLogRepository for SqliteDatabase {
    #[mutants::skip]
    async fn insert_log(&self, entry: &NewLogEntry) -> Result<i64, LogError> {
        let result = query(
            r#"
            INSERT INTO email_logs (sent_at, to_email, subject, status, http_code, worker_response)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.sent_at())
        .bind(entry.to_email())
        .bind(entry.subject())
        .bind(entry.status().as_str())
        .bind(entry.http_code().map(i64::from))
        .bind(entry.worker_response())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    #[mutants::skip]
    async fn recent_logs(&self, limit: u32) -> Result<Vec<LogEntry>, LogError> {
        let records: Vec<LogRecord> = query_as(
            r#"
            SELECT id, sent_at, to_email, subject, status, http_code, worker_response
            FROM email_logs
            ORDER BY sent_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(records
            .into_iter()
            .map(LogEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    #[mutants::skip]
    async fn latest_log_for_recipient(
        &self,
        to_email: &str,
    ) -> Result<Option<LogEntry>, LogError> {
        let record: Option<LogRecord> = query_as(
            r#"
            SELECT id, sent_at, to_email, subject, status, http_code, worker_response
            FROM email_logs
            WHERE to_email = $1
            ORDER BY sent_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(to_email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(LogEntry::try_from).transpose()?)
    }
}
