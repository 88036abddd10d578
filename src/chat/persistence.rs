//! Conversation snapshot persistence.
//!
//! Saves and restores `{conversationId, messages}` through the key-value
//! store. Saving is best effort (chat continuity is not safety-critical);
//! loading treats anything missing or malformed as "no history".

use std::sync::Arc;

use crate::chat::core::ids::ConversationId;
use crate::chat::log::MessageSnapshot;
use crate::chat::storage::{KeyValueStore, keys};

/// The persisted subset of session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSnapshot {
    /// Conversation the messages belong to.
    pub conversation_id: ConversationId,
    /// Ordered message snapshot (`attached_details` is never persisted).
    pub messages: Vec<MessageSnapshot>,
}

/// Reads and writes conversation snapshots.
pub struct ConversationPersistence {
    store: Arc<dyn KeyValueStore>,
}

impl ConversationPersistence {
    /// Create a persistence layer over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persist the snapshot, overwriting any prior one.
    ///
    /// Failures are logged and swallowed; the session continues regardless.
    pub fn save(&self, conversation_id: &ConversationId, messages: &[MessageSnapshot]) {
        let raw = match serde_json::to_string(messages) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!("failed to serialize conversation snapshot: {err}");
                return;
            }
        };
        if let Err(err) = self.store.set(keys::CHAT_HISTORY, &raw) {
            tracing::warn!("failed to persist chat history: {err}");
            return;
        }
        if let Err(err) = self
            .store
            .set(keys::LAST_CONVERSATION_ID, conversation_id.as_str())
        {
            tracing::warn!("failed to persist conversation id: {err}");
        }
    }

    /// Load the last snapshot, if a well-formed one exists.
    ///
    /// Missing keys, malformed JSON, and a malformed conversation id all
    /// yield `None`, so a fresh session starts instead.
    #[must_use]
    pub fn load(&self) -> Option<ConversationSnapshot> {
        let raw_history = self.store.get(keys::CHAT_HISTORY)?;
        let raw_id = self.store.get(keys::LAST_CONVERSATION_ID)?;

        let conversation_id: ConversationId = match raw_id.parse() {
            Ok(id) => id,
            Err(err) => {
                tracing::debug!("stored conversation id unusable: {err}");
                return None;
            }
        };
        let messages: Vec<MessageSnapshot> = match serde_json::from_str(&raw_history) {
            Ok(messages) => messages,
            Err(err) => {
                tracing::debug!("stored chat history unusable: {err}");
                return None;
            }
        };

        Some(ConversationSnapshot {
            conversation_id,
            messages,
        })
    }
}
