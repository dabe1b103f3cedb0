//! Configuration Provider: redirection settings read once per request.

use std::fmt;

use serde::Deserialize;

#[cfg(test)]
use mockall::mock;

const TOKEN_MASK: &str = "••••";

/// A snapshot of the redirection settings
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Worker endpoint URL
    pub worker_url: String,

    /// Shared secret sent in the token header
    pub api_token: String,

    /// Sender name used when a request has no From header
    pub default_from_name: String,

    /// Sender address used when a request has no From header
    pub default_from_email: String,
}

impl Settings {
    /// Whether redirection is configured; without a URL and token every email
    /// passes straight through to native delivery.
    pub fn is_configured(&self) -> bool {
        !self.worker_url.trim().is_empty() && !self.api_token.trim().is_empty()
    }

    /// The token masked for display, e.g. `••••cdef`
    pub fn masked_api_token(&self) -> Option<String> {
        if self.api_token.is_empty() {
            return None;
        }

        let tail: String = {
            let chars: Vec<char> = self.api_token.chars().collect();
            chars[chars.len().saturating_sub(4)..].iter().collect()
        };

        Some(format!("{TOKEN_MASK}{tail}"))
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("worker_url", &self.worker_url)
            .field("api_token", &self.masked_api_token())
            .field("default_from_name", &self.default_from_name)
            .field("default_from_email", &self.default_from_email)
            .finish()
    }
}

/// Supplies the current settings
pub trait SettingsProvider: Clone + Send + Sync + 'static {
    /// Returns the settings as they are right now. Callers take a fresh
    /// snapshot for every request.
    fn settings(&self) -> Settings;
}

#[cfg(test)]
mock! {
    pub SettingsProvider {}

    impl Clone for SettingsProvider {
        fn clone(&self) -> Self;
    }

    impl SettingsProvider for SettingsProvider {
        fn settings(&self) -> Settings;
    }
}
