//! Rendering collaborator boundary.
//!
//! The core issues one-way render commands and never reads UI state back,
//! so any rendering technology (or a no-op double) can sit behind
//! [`Renderer`].

use std::sync::Mutex;

use crate::chat::core::ids::MessageId;
use crate::chat::core::message::{ArtworkDetails, MessageRecord};

/// Visibility state of the feedback UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedbackUiState {
    /// Neither the prompt nor the reason form is visible.
    #[default]
    Hidden,
    /// "Was this response helpful?" prompt visible, reason form hidden.
    PromptVisible,
    /// Reason-entry form visible (negative rating awaiting a reason).
    ReasonFormVisible,
}

/// One-way render commands issued by the core.
pub trait Renderer: Send + Sync {
    /// Render a newly appended message (user or bot).
    fn render_message(&self, record: &MessageRecord);

    /// Re-render a single message after artwork details were attached.
    fn render_artwork_details(&self, id: &MessageId, details: &ArtworkDetails);

    /// Show or hide the typing indicator.
    fn set_typing_indicator_visible(&self, visible: bool);

    /// Update the feedback prompt/form visibility.
    fn set_feedback_ui_state(&self, state: FeedbackUiState);

    /// Remove all rendered messages (new chat).
    fn clear_messages(&self);
}

/// Renderer that drops every command; useful for headless operation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render_message(&self, _record: &MessageRecord) {}
    fn render_artwork_details(&self, _id: &MessageId, _details: &ArtworkDetails) {}
    fn set_typing_indicator_visible(&self, _visible: bool) {}
    fn set_feedback_ui_state(&self, _state: FeedbackUiState) {}
    fn clear_messages(&self) {}
}

/// A render command captured by [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    /// A message was rendered.
    Message {
        /// Id of the rendered record.
        id: MessageId,
        /// Role tag (`user` | `bot`).
        role: String,
        /// Rendered content.
        content: String,
    },
    /// Artwork details were rendered onto an existing message.
    Details {
        /// Target message id.
        id: MessageId,
        /// Display title (fallback applied).
        title: String,
    },
    /// Typing indicator visibility changed.
    Typing(bool),
    /// Feedback UI state changed.
    Feedback(FeedbackUiState),
    /// All messages were cleared.
    Cleared,
}

/// Renderer that records every command, for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    events: Mutex<Vec<RenderEvent>>,
}

impl RecordingRenderer {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events in order.
    #[must_use]
    pub fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    fn push(&self, event: RenderEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Renderer for RecordingRenderer {
    fn render_message(&self, record: &MessageRecord) {
        self.push(RenderEvent::Message {
            id: record.id.clone(),
            role: record.role.as_str().to_owned(),
            content: record.content.clone(),
        });
    }

    fn render_artwork_details(&self, id: &MessageId, details: &ArtworkDetails) {
        self.push(RenderEvent::Details {
            id: id.clone(),
            title: details.display_title().to_owned(),
        });
    }

    fn set_typing_indicator_visible(&self, visible: bool) {
        self.push(RenderEvent::Typing(visible));
    }

    fn set_feedback_ui_state(&self, state: FeedbackUiState) {
        self.push(RenderEvent::Feedback(state));
    }

    fn clear_messages(&self) {
        self.push(RenderEvent::Cleared);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::core::message::MessageRole;

    #[test]
    fn test_recording_renderer_captures_order() {
        let renderer = RecordingRenderer::new();
        renderer.set_typing_indicator_visible(true);
        renderer.render_message(&MessageRecord {
            id: MessageId::from_sequence(1),
            role: MessageRole::Bot,
            content: "hello".to_string(),
            timestamp: "09:00".to_string(),
            attached_details: None,
        });
        renderer.set_typing_indicator_visible(false);

        let events = renderer.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], RenderEvent::Typing(true));
        assert!(matches!(events[1], RenderEvent::Message { .. }));
    }
}
