//! Voice input capability boundary.
//!
//! Speech-to-text internals are external: a capture device exposes "submit
//! utterance, receive transcript or failure" and nothing more. Capture is a
//! bounded single-shot operation; cancellation is explicit and surfaces as
//! [`VoiceError::Cancelled`].

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Boxed future type for capture operations.
pub type CaptureFuture<'a> = Pin<Box<dyn Future<Output = Result<String, VoiceError>> + Send + 'a>>;

/// Failures a capture device can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoiceError {
    /// The device heard something it could not transcribe.
    #[error("utterance not understood")]
    NotUnderstood,
    /// The capture was cancelled before a transcript arrived.
    #[error("capture cancelled")]
    Cancelled,
    /// The device failed outright (microphone busy, engine crash).
    #[error("capture failed: {0}")]
    Device(String),
}

/// A single-shot speech capture device.
pub trait VoiceCapture: Send + Sync {
    /// Whether the platform offers speech capture at all.
    ///
    /// When `false`, the session controller notifies the user once and
    /// disables the feature for the rest of the session.
    fn is_supported(&self) -> bool;

    /// Start one capture and resolve with a transcript or an error.
    fn capture(&self) -> CaptureFuture<'_>;

    /// Cancel an in-flight capture; its future resolves with
    /// [`VoiceError::Cancelled`].
    fn cancel(&self);
}

/// Capture device for platforms without speech support.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedVoiceCapture;

impl VoiceCapture for UnsupportedVoiceCapture {
    fn is_supported(&self) -> bool {
        false
    }

    fn capture(&self) -> CaptureFuture<'_> {
        Box::pin(async { Err(VoiceError::Device("voice capture unsupported".to_string())) })
    }

    fn cancel(&self) {}
}
