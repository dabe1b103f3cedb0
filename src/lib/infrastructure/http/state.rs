//! Application state module

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};

use crate::domain::{
    mail::{EmailAddress, MailService},
    reporting::StatusReporter,
};

/// Application configuration
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Recipient of operator-triggered test emails
    pub admin_email: EmailAddress,
}

/// Global application state
#[derive(Clone)]
pub struct AppState<M: MailService, R: StatusReporter> {
    /// The time the server started
    pub start_time: DateTime<Utc>,

    /// The application configuration
    pub config: AppConfig,

    /// Mail service
    pub mail: Arc<M>,

    /// Status reporter; reporting endpoints answer 404 without one
    pub reporter: Option<Arc<R>>,
}

/// Implementation of the application state
impl<M, R> AppState<M, R>
where
    M: MailService,
    R: StatusReporter,
{
    /// Create a new application state
    pub fn new(config: AppConfig, mail: M, reporter: Option<R>) -> Self {
        Self {
            config,
            start_time: Utc::now(),
            mail: Arc::new(mail),
            reporter: reporter.map(Arc::new),
        }
    }
}

impl<M, R> fmt::Debug for AppState<M, R>
where
    M: MailService,
    R: StatusReporter,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("start_time", &self.start_time)
            .field("config", &self.config)
            .field("mail", &"MailService")
            .field("reporter", &self.reporter.as_ref().map(|_| "StatusReporter"))
            .finish()
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    use crate::domain::{mail::tests::MockMailService, reporting::tests::MockStatusReporter};

    /// The admin address configured in [`test_state`]
    pub const ADMIN_EMAIL: &str = "admin@example.com";

    /// Test state; a missing `reporter` leaves reporting disabled.
    pub fn test_state(
        mail: Option<MockMailService>,
        reporter: Option<MockStatusReporter>,
    ) -> AppState<MockMailService, MockStatusReporter> {
        let mail = mail
            .map(Arc::new)
            .unwrap_or_else(|| Arc::new(MockMailService::new()));

        let config = AppConfig {
            admin_email: EmailAddress::new_unchecked(ADMIN_EMAIL),
        };

        AppState {
            start_time: Utc::now(),
            config,
            mail,
            reporter: reporter.map(Arc::new),
        }
    }
}
