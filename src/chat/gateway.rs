//! Backend gateway: the `/api/chat` and `/api/feedback` contract.
//!
//! One request per user turn, no automatic retry; the session controller
//! owns all recovery UX. A non-2xx status, a timeout, or a malformed body
//! are all reported as transport failures.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::chat::core::config::ChatConfig;
use crate::chat::core::errors::{ChatError, ChatResult};
use crate::chat::core::ids::{ConversationId, MessageId};
use crate::chat::core::language::Language;
use crate::chat::core::message::ArtworkDetails;

/// Boxed future type for gateway operations.
pub type GatewayFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Body of a chat request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Active conversation id.
    pub conversation_id: ConversationId,
    /// User message text (or the fixed image caption).
    pub message: String,
    /// Base64 image payload, `null` for text-only turns.
    pub image: Option<String>,
    /// Interface language tag.
    pub language: Language,
}

/// Body of a chat response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// Assistant reply (may carry lightweight markup).
    #[serde(default)]
    pub response: String,
    /// Structured artwork details, when the backend identified a work.
    #[serde(default)]
    pub artwork_details: Option<ArtworkDetails>,
    /// Backend-side semantic error, when processing failed.
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of a feedback request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    /// Conversation the rated message belongs to.
    pub conversation_id: ConversationId,
    /// The rated bot message.
    pub message_id: MessageId,
    /// Whether the response helped.
    pub was_helpful: bool,
    /// Free-text reason (empty for positive ratings).
    pub feedback_text: String,
    /// Interface language tag.
    pub language: Language,
}

/// Requests to the remote inference service.
pub trait BackendGateway: Send + Sync {
    /// Send one chat turn and await the reply.
    ///
    /// # Errors
    /// Returns a transport error for network failures, timeouts, non-2xx
    /// statuses, or malformed bodies. Semantic failures travel inside
    /// [`ChatResponse::error`].
    fn send_chat(&self, request: ChatRequest) -> GatewayFuture<'_, ChatResult<ChatResponse>>;

    /// Send a feedback rating. Fire-and-forget from the UX perspective.
    ///
    /// # Errors
    /// Returns a transport error; callers log it and move on.
    fn send_feedback(&self, request: FeedbackRequest) -> GatewayFuture<'_, ChatResult<()>>;
}

/// HTTP implementation over `reqwest`.
pub struct HttpBackendGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackendGateway {
    /// Path of the chat endpoint.
    pub const CHAT_PATH: &'static str = "/api/chat";
    /// Path of the feedback endpoint.
    pub const FEEDBACK_PATH: &'static str = "/api/feedback";

    /// Build a gateway from the chat configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ChatConfig) -> ChatResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.backend_base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl BackendGateway for HttpBackendGateway {
    fn send_chat(&self, request: ChatRequest) -> GatewayFuture<'_, ChatResult<ChatResponse>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.url(Self::CHAT_PATH))
                .json(&request)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(ChatError::Transport(format!(
                    "chat endpoint returned status {}",
                    response.status()
                )));
            }

            let body = response.json::<ChatResponse>().await?;
            Ok(body)
        })
    }

    fn send_feedback(&self, request: FeedbackRequest) -> GatewayFuture<'_, ChatResult<()>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.url(Self::FEEDBACK_PATH))
                .json(&request)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(ChatError::Transport(format!(
                    "feedback endpoint returned status {}",
                    response.status()
                )));
            }

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    #[test]
    fn test_chat_request_wire_shape() {
        let request = ChatRequest {
            conversation_id: ConversationId::from_str("conv-1700000000000-abc123xyz").unwrap(),
            message: "Tell me about Vermeer".to_string(),
            image: None,
            language: Language::Es,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""conversationId":"conv-1700000000000-abc123xyz""#));
        assert!(json.contains(r#""image":null"#));
        assert!(json.contains(r#""language":"es""#));
    }

    #[test]
    fn test_chat_response_parses_details() {
        let json = r#"{
            "response": "This looks like the Girl with a Pearl Earring.",
            "artworkDetails": {"title": "Girl with a Pearl Earring", "artist": "Johannes Vermeer"}
        }"#;
        let body: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(body.error.is_none());
        assert_eq!(
            body.artwork_details.unwrap().artist.as_deref(),
            Some("Johannes Vermeer")
        );
    }

    #[test]
    fn test_chat_response_tolerates_error_only_body() {
        let body: ChatResponse = serde_json::from_str(r#"{"error":"model overloaded"}"#).unwrap();
        assert_eq!(body.error.as_deref(), Some("model overloaded"));
        assert!(body.response.is_empty());
    }

    #[test]
    fn test_feedback_request_wire_shape() {
        let request = FeedbackRequest {
            conversation_id: ConversationId::from_str("conv-1700000000000-abc123xyz").unwrap(),
            message_id: MessageId::from_sequence(7),
            was_helpful: false,
            feedback_text: "too vague".to_string(),
            language: Language::En,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""wasHelpful":false"#));
        assert!(json.contains(r#""feedbackText":"too vague""#));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = ChatConfig::new().with_backend_url("http://localhost:5000/");
        let gateway = HttpBackendGateway::new(&config).unwrap();
        assert_eq!(
            gateway.url(HttpBackendGateway::CHAT_PATH),
            "http://localhost:5000/api/chat"
        );
    }
}
