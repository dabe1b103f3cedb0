//! Log entry models

use std::{fmt, str::FromStr};

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::mail::{sanitize_text_field, truncate_sanitized};

/// Longest recipient stored, in characters
pub const MAX_TO_EMAIL_LENGTH: usize = 512;

/// Longest worker response stored, in characters
pub const MAX_RESPONSE_LENGTH: usize = 2048;

/// Outcome of an attempt as persisted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    /// The worker accepted the email
    Success,

    /// The attempt failed and native delivery took over
    Error,
}

impl LogStatus {
    /// The stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            other => Err(anyhow!("unknown log status {other:?}")),
        }
    }
}

/// A persisted log entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LogEntry {
    /// Identifier assigned by the store
    pub id: i64,

    /// When the attempt was made
    pub sent_at: DateTime<Utc>,

    /// Recipient the email was addressed to
    #[schema(example = "jane@example.com")]
    pub to_email: String,

    /// Subject line
    pub subject: String,

    /// Outcome
    pub status: LogStatus,

    /// HTTP status from the worker; `0` when no response was received
    pub http_code: Option<u16>,

    /// Worker response body or error message
    pub worker_response: String,
}

/// A log entry waiting to be appended. Text fields are sanitised on construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewLogEntry {
    sent_at: DateTime<Utc>,
    to_email: String,
    subject: String,
    status: LogStatus,
    http_code: Option<u16>,
    worker_response: String,
}

impl NewLogEntry {
    /// Creates a log entry stamped with the current time
    pub fn new(
        to_email: &str,
        subject: &str,
        status: LogStatus,
        http_code: Option<u16>,
        worker_response: &str,
    ) -> Self {
        Self {
            sent_at: Utc::now(),
            to_email: truncate_sanitized(&sanitize_text_field(to_email), MAX_TO_EMAIL_LENGTH),
            subject: sanitize_text_field(subject),
            status,
            http_code,
            worker_response: truncate_sanitized(
                &sanitize_text_field(worker_response),
                MAX_RESPONSE_LENGTH,
            ),
        }
    }

    /// Overrides the timestamp
    pub fn with_sent_at(mut self, sent_at: DateTime<Utc>) -> Self {
        self.sent_at = sent_at;
        self
    }

    /// When the attempt was made
    pub fn sent_at(&self) -> &DateTime<Utc> {
        &self.sent_at
    }

    /// Sanitised recipient
    pub fn to_email(&self) -> &str {
        &self.to_email
    }

    /// Sanitised subject
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Outcome
    pub fn status(&self) -> LogStatus {
        self.status
    }

    /// HTTP status, if any
    pub fn http_code(&self) -> Option<u16> {
        self.http_code
    }

    /// Sanitised, truncated worker response
    pub fn worker_response(&self) -> &str {
        &self.worker_response
    }
}
