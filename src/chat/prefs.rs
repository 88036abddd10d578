//! Named user preferences (theme, mood, language).
//!
//! Preferences are stored separately from the conversation snapshot and are
//! best effort: a failed write is logged and swallowed, and an unparseable
//! stored value falls back to the default.

use core::fmt;
use core::str::FromStr;
use std::sync::Arc;

use crate::chat::core::language::Language;
use crate::chat::storage::{KeyValueStore, keys};

/// Visual theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    /// Light theme (default).
    #[default]
    Light,
    /// Dark theme.
    Dark,
}

impl Theme {
    /// Stored tag, matching the web client's class names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light-mode",
            Self::Dark => "dark-mode",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light-mode" => Ok(Self::Light),
            "dark-mode" => Ok(Self::Dark),
            _ => Err(()),
        }
    }
}

/// Ambience preset applied by the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mood {
    /// Calm palette (default).
    #[default]
    Serene,
    /// Muted, library-like palette.
    Scholarly,
    /// Saturated palette.
    Vibrant,
    /// Gallery-classic palette.
    Classic,
}

impl Mood {
    /// Stored tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Serene => "serene",
            Self::Scholarly => "scholarly",
            Self::Vibrant => "vibrant",
            Self::Classic => "classic",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "serene" => Ok(Self::Serene),
            "scholarly" => Ok(Self::Scholarly),
            "vibrant" => Ok(Self::Vibrant),
            "classic" => Ok(Self::Classic),
            _ => Err(()),
        }
    }
}

/// Reads and writes named preferences through the key-value store.
pub struct PreferenceStore {
    store: Arc<dyn KeyValueStore>,
}

impl PreferenceStore {
    /// Create a preference store over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored theme, defaulting to light.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.store
            .get(keys::THEME)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    /// Persist the theme preference.
    pub fn set_theme(&self, theme: Theme) {
        self.write(keys::THEME, theme.as_str());
    }

    /// Stored mood, defaulting to serene.
    #[must_use]
    pub fn mood(&self) -> Mood {
        self.store
            .get(keys::MOOD)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    /// Persist the mood preference.
    pub fn set_mood(&self, mood: Mood) {
        self.write(keys::MOOD, mood.as_str());
    }

    /// Stored language, falling back to `default` when absent or corrupt.
    #[must_use]
    pub fn language(&self, default: Language) -> Language {
        self.store
            .get(keys::LANGUAGE)
            .map_or(default, |raw| Language::from_stored(&raw))
    }

    /// Persist the language preference.
    pub fn set_language(&self, language: Language) {
        self.write(keys::LANGUAGE, language.as_str());
    }

    /// Best-effort write; failures are logged, never surfaced.
    fn write(&self, key: &str, value: &str) {
        if let Err(err) = self.store.set(key, value) {
            tracing::warn!("failed to persist preference {key}: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::storage::MemoryStore;

    #[test]
    fn test_defaults_when_empty() {
        let prefs = PreferenceStore::new(Arc::new(MemoryStore::new()));
        assert_eq!(prefs.theme(), Theme::Light);
        assert_eq!(prefs.mood(), Mood::Serene);
        assert_eq!(prefs.language(Language::Es), Language::Es);
    }

    #[test]
    fn test_roundtrip() {
        let prefs = PreferenceStore::new(Arc::new(MemoryStore::new()));
        prefs.set_theme(Theme::Dark);
        prefs.set_mood(Mood::Scholarly);
        prefs.set_language(Language::Hi);

        assert_eq!(prefs.theme(), Theme::Dark);
        assert_eq!(prefs.mood(), Mood::Scholarly);
        assert_eq!(prefs.language(Language::En), Language::Hi);
    }

    #[test]
    fn test_corrupt_values_fall_back() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::THEME, "neon").unwrap();
        store.set(keys::LANGUAGE, "klingon").unwrap();

        let prefs = PreferenceStore::new(store);
        assert_eq!(prefs.theme(), Theme::Light);
        assert_eq!(prefs.language(Language::Fr), Language::En);
    }
}
