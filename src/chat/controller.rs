//! Session controller: the conversation state machine.
//!
//! Owns the session state and coordinates the request/response lifecycle:
//! `Idle → AwaitingResponse → FeedbackPending → Idle`, with a "new chat"
//! reset available from any phase.
//!
//! Submissions are a two-step exchange so the machine is testable without a
//! live network: `submit_user_message`/`submit_image` validate, append the
//! user record, and hand back the prepared [`ChatRequest`]; the host
//! dispatches it and resumes the machine through [`handle_chat_outcome`].
//! The async `run_*` wrappers do both against the configured gateway.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::chat::core::config::ChatConfig;
use crate::chat::core::errors::{ChatError, ChatResult};
use crate::chat::core::ids::{ConversationId, MessageId};
use crate::chat::core::language::Language;
use crate::chat::core::message::{MessageRecord, MessageRole};
use crate::chat::gateway::{BackendGateway, ChatRequest, ChatResponse, FeedbackRequest};
use crate::chat::log::MessageLog;
use crate::chat::persistence::ConversationPersistence;
use crate::chat::prefs::PreferenceStore;
use crate::chat::render::{FeedbackUiState, Renderer};
use crate::chat::storage::KeyValueStore;
use crate::chat::voice::{VoiceCapture, VoiceError};

/// Apology shown when the backend reports a semantic error.
pub const APOLOGY_MESSAGE: &str =
    "I apologize, but I encountered an error processing your request. Please try again.";

/// Fixed message shown on transport failures.
pub const CONNECTION_TROUBLE_MESSAGE: &str =
    "I'm sorry, I'm having trouble connecting to the server. Please try again later.";

/// Thank-you message after a positive rating.
pub const THANKS_POSITIVE_MESSAGE: &str = "Thank you for your feedback!";

/// Thank-you message after a negative rating.
pub const THANKS_NEGATIVE_MESSAGE: &str =
    "Thank you for your feedback. We'll use it to improve.";

/// Shown when an attachment is not an image.
pub const IMAGE_TYPE_ERROR_MESSAGE: &str = "Please upload an image file (JPEG, PNG, etc.).";

/// Fixed caption sent with image submissions.
pub const IMAGE_CAPTION: &str = "I've uploaded an artwork for identification.";

/// One-time notice when voice capture is unavailable.
pub const VOICE_UNSUPPORTED_MESSAGE: &str = "Voice input is not supported on this device.";

/// Shown when a voice capture fails.
pub const VOICE_NOT_UNDERSTOOD_MESSAGE: &str =
    "I couldn't understand your voice input. Please try again.";

/// Where the controller sits in the request/response lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// Ready for a new submission.
    #[default]
    Idle,
    /// A chat request is in flight; new submissions are rejected.
    AwaitingResponse,
    /// The last bot reply awaits a rating; submissions are still allowed
    /// and dismiss the prompt.
    FeedbackPending,
}

/// The session state owned exclusively by the controller.
///
/// Messages live in the [`MessageLog`] the controller owns; everything else
/// is here. A second session (multi-tab) would get its own controller and
/// its own state value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Active conversation id.
    pub conversation_id: ConversationId,
    /// Interface language for future prompts and request tags.
    pub language: Language,
    /// Bot message currently eligible for feedback, if any.
    pub pending_feedback_target: Option<MessageId>,
    /// Lifecycle phase.
    pub phase: SessionPhase,
}

/// Coordinates the message log, gateway, persistence, and render commands.
pub struct SessionController {
    state: SessionState,
    log: MessageLog,
    persistence: ConversationPersistence,
    prefs: PreferenceStore,
    gateway: Arc<dyn BackendGateway>,
    renderer: Arc<dyn Renderer>,
    voice: Arc<dyn VoiceCapture>,
    voice_capturing: bool,
    voice_unavailable_notified: bool,
}

impl SessionController {
    /// Build a controller over the given collaborators.
    ///
    /// The session starts fresh; call [`Self::start`] to restore the last
    /// persisted conversation or emit the welcome message.
    #[must_use]
    pub fn new(
        config: &ChatConfig,
        store: Arc<dyn KeyValueStore>,
        gateway: Arc<dyn BackendGateway>,
        renderer: Arc<dyn Renderer>,
        voice: Arc<dyn VoiceCapture>,
    ) -> Self {
        let prefs = PreferenceStore::new(store.clone());
        let language = prefs.language(config.default_language);
        Self {
            state: SessionState {
                conversation_id: ConversationId::generate(),
                language,
                pending_feedback_target: None,
                phase: SessionPhase::Idle,
            },
            log: MessageLog::new(renderer.clone()),
            persistence: ConversationPersistence::new(store),
            prefs,
            gateway,
            renderer,
            voice,
            voice_capturing: false,
            voice_unavailable_notified: false,
        }
    }

    /// Restore the last persisted conversation when one exists, then greet.
    ///
    /// Restored histories replay through the render path; every start ends
    /// with a fresh localized welcome message, restored or not.
    pub fn start(&mut self) {
        if let Some(snapshot) = self.persistence.load() {
            tracing::info!(
                "restoring conversation {} ({} messages)",
                snapshot.conversation_id,
                snapshot.messages.len()
            );
            self.state.conversation_id = snapshot.conversation_id;
            self.log.restore(snapshot.messages);
        }
        let _ = self
            .log
            .append(MessageRole::Bot, self.state.language.welcome_message());
    }

    // ----- submissions ------------------------------------------------------

    /// Validate and stage a text submission.
    ///
    /// Appends the user record, shows the typing indicator, transitions to
    /// `AwaitingResponse`, and returns the request to dispatch.
    ///
    /// # Errors
    /// `InvalidInput` for whitespace-only text (no record, no transition);
    /// `Busy` while a previous request is still in flight.
    pub fn submit_user_message(&mut self, text: &str) -> ChatResult<ChatRequest> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ChatError::InvalidInput("empty message".to_string()));
        }
        self.ensure_accepting_submissions()?;

        self.dismiss_feedback_ui();
        let _ = self.log.append(MessageRole::User, trimmed);
        self.enter_awaiting();

        Ok(ChatRequest {
            conversation_id: self.state.conversation_id.clone(),
            message: trimmed.to_owned(),
            image: None,
            language: self.state.language,
        })
    }

    /// Validate and stage an image submission.
    ///
    /// The MIME type must begin with `image/`; otherwise a bot error message
    /// is appended and no transition happens. On success the user record
    /// carries the fixed caption and the payload travels base64-encoded.
    ///
    /// # Errors
    /// `InvalidInput` for non-image attachments; `Busy` while a previous
    /// request is still in flight.
    pub fn submit_image(&mut self, mime_type: &str, payload: &[u8]) -> ChatResult<ChatRequest> {
        if !mime_type.starts_with("image/") {
            let _ = self.log.append(MessageRole::Bot, IMAGE_TYPE_ERROR_MESSAGE);
            return Err(ChatError::InvalidInput(format!(
                "attachment is {mime_type}, not an image"
            )));
        }
        self.ensure_accepting_submissions()?;

        self.dismiss_feedback_ui();
        let _ = self.log.append(MessageRole::User, IMAGE_CAPTION);
        self.enter_awaiting();

        Ok(ChatRequest {
            conversation_id: self.state.conversation_id.clone(),
            message: IMAGE_CAPTION.to_owned(),
            image: Some(BASE64.encode(payload)),
            language: self.state.language,
        })
    }

    /// Resume the machine with the outcome of a dispatched chat request.
    ///
    /// Success with an `error` field → apology, back to `Idle`, no feedback
    /// prompt. Success otherwise → bot record (plus artwork details when
    /// present), feedback prompt, snapshot persisted. Transport failure →
    /// fixed connectivity message, back to `Idle`, no retry.
    pub fn handle_chat_outcome(&mut self, outcome: ChatResult<ChatResponse>) {
        self.renderer.set_typing_indicator_visible(false);

        match outcome {
            Ok(body) => {
                if let Some(error) = body.error {
                    tracing::warn!("backend reported an error: {error}");
                    let _ = self.log.append(MessageRole::Bot, APOLOGY_MESSAGE);
                    self.state.phase = SessionPhase::Idle;
                    return;
                }

                let id = self.log.append(MessageRole::Bot, body.response);
                if let Some(details) = body.artwork_details {
                    self.log.attach_details(&id, details);
                }
                self.state.pending_feedback_target = Some(id);
                self.state.phase = SessionPhase::FeedbackPending;
                self.renderer
                    .set_feedback_ui_state(FeedbackUiState::PromptVisible);
                self.persist();
            }
            Err(err) => {
                tracing::warn!("chat request failed: {err}");
                let _ = self.log.append(MessageRole::Bot, CONNECTION_TROUBLE_MESSAGE);
                self.state.phase = SessionPhase::Idle;
            }
        }
    }

    /// Submit text and drive the exchange against the configured gateway.
    ///
    /// # Errors
    /// Validation and busy errors from [`Self::submit_user_message`];
    /// transport failures are absorbed into the conversation itself.
    pub async fn run_user_turn(&mut self, text: &str) -> ChatResult<()> {
        let request = self.submit_user_message(text)?;
        let outcome = self.gateway.send_chat(request).await;
        self.handle_chat_outcome(outcome);
        Ok(())
    }

    /// Submit an image and drive the exchange against the configured gateway.
    ///
    /// # Errors
    /// Validation and busy errors from [`Self::submit_image`]; transport
    /// failures are absorbed into the conversation itself.
    pub async fn run_image_turn(&mut self, mime_type: &str, payload: &[u8]) -> ChatResult<()> {
        let request = self.submit_image(mime_type, payload)?;
        let outcome = self.gateway.send_chat(request).await;
        self.handle_chat_outcome(outcome);
        Ok(())
    }

    // ----- feedback ---------------------------------------------------------

    /// Rate the pending bot reply.
    ///
    /// A negative rating without a non-empty reason shows the reason form
    /// and defers submission. Otherwise the rating is sent (failures logged,
    /// never surfaced), a thank-you message is appended, and the machine
    /// returns to `Idle`.
    ///
    /// # Errors
    /// `Busy` when no feedback is pending.
    pub async fn record_feedback(
        &mut self,
        was_helpful: bool,
        reason: Option<&str>,
    ) -> ChatResult<()> {
        if self.state.phase != SessionPhase::FeedbackPending {
            return Err(ChatError::Busy("no feedback is pending".to_string()));
        }
        let Some(target) = self.state.pending_feedback_target.clone() else {
            return Err(ChatError::Busy("no feedback target".to_string()));
        };

        let reason = reason.map(str::trim).unwrap_or_default();
        if !was_helpful && reason.is_empty() {
            // Defer until the user types a reason.
            self.renderer
                .set_feedback_ui_state(FeedbackUiState::ReasonFormVisible);
            return Ok(());
        }

        let request = FeedbackRequest {
            conversation_id: self.state.conversation_id.clone(),
            message_id: target,
            was_helpful,
            feedback_text: reason.to_owned(),
            language: self.state.language,
        };
        if let Err(err) = self.gateway.send_feedback(request).await {
            tracing::warn!("failed to send feedback: {err}");
        }

        let thanks = if was_helpful {
            THANKS_POSITIVE_MESSAGE
        } else {
            THANKS_NEGATIVE_MESSAGE
        };
        let _ = self.log.append(MessageRole::Bot, thanks);
        self.state.pending_feedback_target = None;
        self.state.phase = SessionPhase::Idle;
        self.renderer.set_feedback_ui_state(FeedbackUiState::Hidden);
        Ok(())
    }

    // ----- session lifecycle ------------------------------------------------

    /// Flush the current conversation, then reset to a fresh one.
    ///
    /// Available from any phase: persists the snapshot, clears the log and
    /// feedback UI, generates a distinct conversation id, and greets the
    /// user in the current language.
    pub fn start_new_chat(&mut self) {
        self.persist();

        if self.voice_capturing {
            self.voice.cancel();
            self.voice_capturing = false;
        }

        self.log.clear();
        self.state.conversation_id =
            ConversationId::generate_distinct(&self.state.conversation_id);
        self.state.pending_feedback_target = None;
        self.state.phase = SessionPhase::Idle;
        self.renderer.set_feedback_ui_state(FeedbackUiState::Hidden);

        let _ = self
            .log
            .append(MessageRole::Bot, self.state.language.welcome_message());
    }

    /// Switch the interface language.
    ///
    /// Already-rendered messages are not retranslated; only future welcome,
    /// placeholder, and prompt text and future request tags change.
    pub fn change_language(&mut self, language: Language) {
        self.state.language = language;
        self.prefs.set_language(language);
    }

    // ----- voice ------------------------------------------------------------

    /// Toggle voice capture: start a one-shot capture, or cancel the one in
    /// flight. A successful transcript is submitted like typed text.
    ///
    /// # Errors
    /// `VoiceUnsupported` when the platform has no capture device (a
    /// one-time notice is appended to the conversation); submission errors
    /// from the transcript path.
    pub async fn toggle_voice(&mut self) -> ChatResult<()> {
        if !self.voice.is_supported() {
            if !self.voice_unavailable_notified {
                self.voice_unavailable_notified = true;
                let _ = self.log.append(MessageRole::Bot, VOICE_UNSUPPORTED_MESSAGE);
            }
            return Err(ChatError::VoiceUnsupported);
        }

        if self.voice_capturing {
            self.voice.cancel();
            self.voice_capturing = false;
            return Ok(());
        }

        self.voice_capturing = true;
        let outcome = self.voice.capture().await;
        self.voice_capturing = false;

        match outcome {
            Ok(transcript) => self.run_user_turn(&transcript).await,
            Err(VoiceError::Cancelled) => Ok(()),
            Err(err) => {
                tracing::warn!("voice capture failed: {err}");
                let _ = self.log.append(MessageRole::Bot, VOICE_NOT_UNDERSTOOD_MESSAGE);
                Ok(())
            }
        }
    }

    // ----- accessors --------------------------------------------------------

    /// Current session state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    /// Active conversation id.
    #[must_use]
    pub const fn conversation_id(&self) -> &ConversationId {
        &self.state.conversation_id
    }

    /// Current interface language.
    #[must_use]
    pub const fn language(&self) -> Language {
        self.state.language
    }

    /// All message records in order.
    #[must_use]
    pub fn messages(&self) -> &[MessageRecord] {
        self.log.records()
    }

    /// Preference store shared with the presentation layer.
    #[must_use]
    pub const fn preferences(&self) -> &PreferenceStore {
        &self.prefs
    }

    // ----- internals --------------------------------------------------------

    /// Reject submissions while a request is in flight.
    fn ensure_accepting_submissions(&self) -> ChatResult<()> {
        if self.state.phase == SessionPhase::AwaitingResponse {
            return Err(ChatError::Busy(
                "a response is still pending; resend after it arrives".to_string(),
            ));
        }
        Ok(())
    }

    /// A new submission dismisses any pending feedback prompt: only the
    /// latest bot message may be rated.
    fn dismiss_feedback_ui(&mut self) {
        if self.state.phase == SessionPhase::FeedbackPending {
            self.state.pending_feedback_target = None;
            self.renderer.set_feedback_ui_state(FeedbackUiState::Hidden);
        }
    }

    fn enter_awaiting(&mut self) {
        self.state.phase = SessionPhase::AwaitingResponse;
        self.renderer.set_typing_indicator_visible(true);
    }

    fn persist(&self) {
        self.persistence
            .save(&self.state.conversation_id, &self.log.snapshot_for_persistence());
    }
}
