//! Message records and artwork detail blocks.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::chat::core::ids::MessageId;

/// Who authored a message.
///
/// Immutable after creation. System-style notices (errors, thank-you texts)
/// are rendered as `Bot` messages, the same way the web client did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message typed, spoken, or uploaded by the user.
    User,
    /// Message produced by the assistant (including local error notices).
    Bot,
}

impl MessageRole {
    /// Wire tag used in the persisted snapshot (`type` field).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "bot" => Ok(Self::Bot),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Error returned when parsing an unknown role tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown message role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

/// Structured artwork information attached post-hoc to a bot message.
///
/// All fields are optional; the renderer substitutes the display fallbacks
/// ("Artwork Details" for the title, "Unknown" elsewhere).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkDetails {
    /// Artwork title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Artist name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    /// Historical period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    /// Artistic style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Image URL, when the backend found one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ArtworkDetails {
    /// Display fallback for a missing title.
    pub const FALLBACK_TITLE: &'static str = "Artwork Details";
    /// Display fallback for missing artist/period/style.
    pub const FALLBACK_FIELD: &'static str = "Unknown";

    /// Title with the display fallback applied.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(Self::FALLBACK_TITLE)
    }

    /// Artist with the display fallback applied.
    #[must_use]
    pub fn display_artist(&self) -> &str {
        self.artist.as_deref().unwrap_or(Self::FALLBACK_FIELD)
    }

    /// Period with the display fallback applied.
    #[must_use]
    pub fn display_period(&self) -> &str {
        self.period.as_deref().unwrap_or(Self::FALLBACK_FIELD)
    }

    /// Style with the display fallback applied.
    #[must_use]
    pub fn display_style(&self) -> &str {
        self.style.as_deref().unwrap_or(Self::FALLBACK_FIELD)
    }
}

/// One entry in the ordered message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    /// Unique, time-ordered identifier within the conversation.
    pub id: MessageId,
    /// Author role; immutable after creation.
    pub role: MessageRole,
    /// Message text (bot messages may carry lightweight markup).
    pub content: String,
    /// Display-formatted creation time (`HH:MM`).
    pub timestamp: String,
    /// Artwork details attached once backend data arrives.
    ///
    /// Only ever set on the most recent bot message; never written to
    /// persisted snapshots.
    pub attached_details: Option<ArtworkDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_tags() {
        assert_eq!(MessageRole::User.as_str(), "user");
        assert_eq!("bot".parse::<MessageRole>().unwrap(), MessageRole::Bot);
        assert!("assistant".parse::<MessageRole>().is_err());
    }

    #[test]
    fn test_details_fallbacks() {
        let details = ArtworkDetails {
            title: Some("Guernica".to_string()),
            ..ArtworkDetails::default()
        };
        assert_eq!(details.display_title(), "Guernica");
        assert_eq!(details.display_artist(), "Unknown");
        assert_eq!(details.display_style(), "Unknown");
    }

    #[test]
    fn test_details_wire_shape() {
        let json = r#"{"title":"Mona Lisa","imageUrl":"https://example.com/a.jpg"}"#;
        let details: ArtworkDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.title.as_deref(), Some("Mona Lisa"));
        assert_eq!(details.image_url.as_deref(), Some("https://example.com/a.jpg"));
        assert!(details.artist.is_none());
    }
}
