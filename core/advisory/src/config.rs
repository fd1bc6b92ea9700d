//! Advisory client configuration.

use std::fmt;
use std::time::Duration;

use railwise_common::{constants, DurationExt, RailwiseError, Result};

/// Default model asked for opinions.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default REST base for the generative language API.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Advisory configuration.
#[derive(Clone)]
pub struct AdvisoryConfig {
    /// Service credential. `None` or empty disables live requests.
    pub api_key: Option<String>,
    /// Model identifier.
    pub model: String,
    /// API base URL, without the model path.
    pub endpoint: String,
    /// Timeout for the single outbound request.
    pub timeout: Duration,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: constants::advisory_timeout().as_std(),
        }
    }
}

impl fmt::Debug for AdvisoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvisoryConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AdvisoryConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(key) = std::env::var("API_KEY") {
            config.api_key = Some(key);
        }

        if let Ok(model) = std::env::var("ADVISORY_MODEL") {
            config.model = model;
        }

        if let Ok(endpoint) = std::env::var("ADVISORY_ENDPOINT") {
            config.endpoint = endpoint;
        }

        if let Ok(secs) = std::env::var("ADVISORY_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.timeout = Duration::from_secs(secs);
            }
        }

        config
    }

    /// The credential, if one is usable.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn is_configured(&self) -> bool {
        self.credential().is_some()
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(RailwiseError::ConfigurationError(
                "Advisory model cannot be empty".to_string(),
            ));
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(RailwiseError::ConfigurationError(format!(
                "Advisory endpoint must be an http(s) URL, got {}",
                self.endpoint
            )));
        }

        if self.timeout.is_zero() {
            return Err(RailwiseError::ConfigurationError(
                "Advisory timeout cannot be 0".to_string(),
            ));
        }

        Ok(())
    }
}
