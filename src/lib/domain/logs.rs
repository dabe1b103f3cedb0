//! Outcome Logger: an append-only record of every redirection attempt.

mod cache;
mod entry;
mod errors;
mod repository;
mod service;

pub use cache::TtlCache;
pub use entry::{LogEntry, LogStatus, NewLogEntry, MAX_RESPONSE_LENGTH, MAX_TO_EMAIL_LENGTH};
pub use errors::LogError;
pub use repository::EmailLogRepository;
pub use service::{EmailLogService, EmailLogServiceImpl, DEFAULT_CACHE_TTL};
