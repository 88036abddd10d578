//! Error types for the chat core.

use thiserror::Error;

/// Errors that can occur in the conversation core.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// User input rejected before reaching the log (empty text, bad MIME).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Operation not valid in the controller's current phase.
    #[error("controller is busy: {0}")]
    Busy(String),

    /// Transport failure talking to the backend (network, timeout, non-2xx).
    #[error("backend transport failure: {0}")]
    Transport(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error from the local state store.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Voice capture is not available on this platform.
    #[error("voice capture unsupported")]
    VoiceUnsupported,
}

impl ChatError {
    /// Whether this error comes from user input and deserves an inline
    /// user-facing message rather than a log line.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Whether this error should be surfaced as the fixed
    /// connectivity-trouble message.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::HttpRequest(_))
    }
}

/// Convenience result alias for chat operations.
pub type ChatResult<T> = Result<T, ChatError>;
