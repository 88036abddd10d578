//! Interface language and the localized UI strings the core hands out.
//!
//! Changing the language never retranslates already-rendered messages; it
//! only affects future welcome/placeholder/prompt text and the language tag
//! sent with backend requests.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Interface language for prompts and backend request tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Hindi.
    Hi,
    /// Spanish.
    Es,
    /// French.
    Fr,
}

/// Error returned when parsing an unknown language tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageParseError(pub String);

impl fmt::Display for LanguageParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown language tag: {}", self.0)
    }
}

impl std::error::Error for LanguageParseError {}

impl Language {
    /// Wire tag used in backend requests and preference storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
            Self::Es => "es",
            Self::Fr => "fr",
        }
    }

    /// Parse a stored tag, falling back to English for unknown values.
    ///
    /// Preference storage is best effort; a corrupt tag must not fail the
    /// session.
    #[must_use]
    pub fn from_stored(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }

    /// Welcome message emitted on session start and "new chat".
    #[must_use]
    pub const fn welcome_message(self) -> &'static str {
        match self {
            Self::En => {
                "Greetings! I am your Art Historian AI. How may I assist you with art history today?"
            }
            Self::Hi => {
                "नमस्ते! मैं आपका कला इतिहासकार एआई हूँ। मैं आपकी कला इतिहास के बारे में कैसे मदद कर सकता हूँ?"
            }
            Self::Es => "¡Saludos! Soy tu AI de Historia del Arte. ¿Cómo puedo ayudarte hoy?",
            Self::Fr => {
                "Bonjour ! Je suis votre IA d'Histoire de l'Art. Comment puis-je vous aider aujourd'hui ?"
            }
        }
    }

    /// Placeholder text for the input field.
    #[must_use]
    pub const fn input_placeholder(self) -> &'static str {
        match self {
            Self::En => "Ask about art history...",
            Self::Hi => "कला इतिहास के बारे में पूछें...",
            Self::Es => "Pregunte sobre historia del arte...",
            Self::Fr => "Demandez sur l'histoire de l'art...",
        }
    }

    /// Text shown next to the typing indicator.
    #[must_use]
    pub const fn typing_text(self) -> &'static str {
        match self {
            Self::En => "Art Historian is typing...",
            Self::Hi => "कला इतिहासकार टाइप कर रहा है...",
            Self::Es => "El Historiador de Arte está escribiendo...",
            Self::Fr => "L'Historien d'Art est en train d'écrire...",
        }
    }

    /// Question shown with the feedback prompt.
    #[must_use]
    pub const fn feedback_prompt(self) -> &'static str {
        match self {
            Self::En => "Was this response helpful?",
            Self::Hi => "क्या यह प्रतिक्रिया सहायक थी?",
            Self::Es => "¿Fue útil esta respuesta?",
            Self::Fr => "Cette réponse était-elle utile?",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = LanguageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "hi" => Ok(Self::Hi),
            "es" => Ok(Self::Es),
            "fr" => Ok(Self::Fr),
            other => Err(LanguageParseError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_roundtrip() {
        for lang in [Language::En, Language::Hi, Language::Es, Language::Fr] {
            assert_eq!(lang.as_str().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn test_unknown_tag_falls_back_to_english() {
        assert_eq!(Language::from_stored("de"), Language::En);
        assert_eq!(Language::from_stored(""), Language::En);
    }

    #[test]
    fn test_welcome_is_localized() {
        assert_ne!(
            Language::En.welcome_message(),
            Language::Fr.welcome_message()
        );
    }

    #[test]
    fn test_ui_strings_are_localized() {
        assert_ne!(
            Language::En.input_placeholder(),
            Language::Hi.input_placeholder()
        );
        assert_ne!(Language::En.typing_text(), Language::Es.typing_text());
        assert_ne!(
            Language::En.feedback_prompt(),
            Language::Fr.feedback_prompt()
        );
    }
}
