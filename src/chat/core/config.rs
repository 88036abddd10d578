//! Configuration for the chat client core.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::chat::core::errors::{ChatError, ChatResult};
use crate::chat::core::language::Language;

/// Configuration for the session controller and backend gateway.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Base URL of the inference backend (the `/api/*` endpoints).
    pub backend_base_url: String,
    /// Request timeout for chat and feedback calls.
    #[serde(with = "duration_serde")]
    pub request_timeout: Duration,
    /// Connection timeout.
    #[serde(with = "duration_serde")]
    pub connect_timeout: Duration,
    /// Path of the local state file (preferences + conversation snapshot).
    pub state_path: PathBuf,
    /// Language used when no preference has been stored yet.
    pub default_language: Language,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            backend_base_url: "http://localhost:5000".to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            state_path: PathBuf::from("art_historian_state.json"),
            default_language: Language::En,
        }
    }
}

impl ChatConfig {
    /// Create a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend base URL.
    #[must_use]
    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_base_url = url.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the local state file path.
    #[must_use]
    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = path.into();
        self
    }

    /// Set the fallback language.
    #[must_use]
    pub const fn with_default_language(mut self, language: Language) -> Self {
        self.default_language = language;
        self
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if the backend URL does not parse or a timeout is
    /// zero.
    pub fn validate(&self) -> ChatResult<()> {
        Url::parse(&self.backend_base_url)?;

        if self.request_timeout.is_zero() {
            return Err(ChatError::InvalidConfig(
                "request_timeout must be > 0".to_string(),
            ));
        }
        if self.connect_timeout.is_zero() {
            return Err(ChatError::InvalidConfig(
                "connect_timeout must be > 0".to_string(),
            ));
        }
        if self.state_path.as_os_str().is_empty() {
            return Err(ChatError::InvalidConfig(
                "state_path must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Serde module for Duration serialization.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ChatConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_language, Language::En);
    }

    #[test]
    fn test_config_builder() {
        let config = ChatConfig::new()
            .with_backend_url("https://api.example.com")
            .with_timeout(Duration::from_secs(60))
            .with_default_language(Language::Fr);

        assert_eq!(config.backend_base_url, "https://api.example.com");
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.default_language, Language::Fr);
    }

    #[test]
    fn test_rejects_bad_url() {
        let config = ChatConfig::new().with_backend_url("not a url");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = ChatConfig::new().with_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }
}
