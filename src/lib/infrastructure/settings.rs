//! Settings sourced from the command line and environment.

use std::fmt;

use clap::Parser;

use crate::domain::settings::{Settings, SettingsProvider};

/// Redirection settings
#[derive(Clone, Default, Parser)]
pub struct WorkerConfig {
    /// The worker endpoint URL
    #[arg(long, env = "EDGEMAIL_WORKER_URL", default_value = "")]
    pub worker_url: String,

    /// The shared secret sent to the worker
    #[arg(long, env = "EDGEMAIL_API_TOKEN", default_value = "", hide_env_values = true)]
    pub api_token: String,

    /// Sender name used when an email has no From header
    #[arg(long, env = "EDGEMAIL_DEFAULT_FROM_NAME", default_value = "")]
    pub default_from_name: String,

    /// Sender address used when an email has no From header
    #[arg(long, env = "EDGEMAIL_DEFAULT_FROM_EMAIL", default_value = "")]
    pub default_from_email: String,
}

impl From<WorkerConfig> for Settings {
    fn from(config: WorkerConfig) -> Self {
        Settings {
            worker_url: config.worker_url.trim().to_string(),
            api_token: config.api_token.trim().to_string(),
            default_from_name: config.default_from_name.trim().to_string(),
            default_from_email: config.default_from_email.trim().to_string(),
        }
    }
}

impl fmt::Debug for WorkerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Settings::from(self.clone()), f)
    }
}

/// Settings fixed for the lifetime of the process
#[derive(Debug, Clone)]
pub struct StaticSettings {
    settings: Settings,
}

impl StaticSettings {
    /// Creates a provider that always answers with `settings`
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

impl From<WorkerConfig> for StaticSettings {
    fn from(config: WorkerConfig) -> Self {
        Self::new(config.into())
    }
}

impl SettingsProvider for StaticSettings {
    fn settings(&self) -> Settings {
        self.settings.clone()
    }
}
