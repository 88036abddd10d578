//! Conversation session core.
//!
//! The [`controller::SessionController`] owns the session: it validates
//! submissions, appends to the [`log::MessageLog`], talks to the backend
//! through [`gateway::BackendGateway`], persists snapshots through
//! [`persistence::ConversationPersistence`], and drives the UI through
//! one-way [`render::Renderer`] commands. Preferences and snapshots share
//! one [`storage::KeyValueStore`].

pub mod controller;
pub mod core;
pub mod gateway;
pub mod log;
pub mod persistence;
pub mod prefs;
pub mod render;
pub mod storage;
pub mod voice;

pub use controller::{SessionController, SessionPhase, SessionState};
pub use core::{
    ArtworkDetails, ChatConfig, ChatError, ChatResult, ConversationId, Language, MessageId,
    MessageRecord, MessageRole,
};
pub use gateway::{BackendGateway, ChatRequest, ChatResponse, FeedbackRequest, HttpBackendGateway};
pub use log::{MessageLog, MessageSnapshot};
pub use persistence::{ConversationPersistence, ConversationSnapshot};
pub use prefs::{Mood, PreferenceStore, Theme};
pub use render::{FeedbackUiState, NullRenderer, Renderer};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use voice::{UnsupportedVoiceCapture, VoiceCapture, VoiceError};
