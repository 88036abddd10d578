//! Core chat types and identifiers.

pub mod config;
pub mod errors;
pub mod ids;
pub mod language;
pub mod message;

pub use config::ChatConfig;
pub use errors::{ChatError, ChatResult};
pub use ids::{ConversationId, IdParseError, MessageId};
pub use language::{Language, LanguageParseError};
pub use message::{ArtworkDetails, MessageRecord, MessageRole, UnknownRole};
