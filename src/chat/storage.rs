//! Key-value state store backing preferences and conversation snapshots.
//!
//! The web client kept everything in browser `localStorage`; this
//! module provides the same named-string-slot surface. Writes replace the
//! whole backing file, so a snapshot is never partially written.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::chat::core::errors::ChatResult;

/// Well-known storage keys shared with the web client.
pub mod keys {
    /// Theme preference (`dark-mode` | `light-mode`).
    pub const THEME: &str = "theme";
    /// Mood preference (serene | scholarly | vibrant | classic).
    pub const MOOD: &str = "mood";
    /// Interface language tag (`en` | `hi` | `es` | `fr`).
    pub const LANGUAGE: &str = "language";
    /// Persisted message snapshot (JSON array of `{type, content, time}`).
    pub const CHAT_HISTORY: &str = "chatHistory";
    /// Conversation id the snapshot belongs to.
    pub const LAST_CONVERSATION_ID: &str = "lastConversationId";
}

/// Named string slots with whole-store replacement semantics.
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `None` when the key was never written.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any prior one.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be written. Callers that
    /// treat persistence as best effort log and swallow it.
    fn set(&self, key: &str, value: &str) -> ChatResult<()>;

    /// Remove a value if present.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> ChatResult<()>;
}

/// JSON-file-backed store.
///
/// The whole map is kept in memory and flushed on every write; a missing or
/// corrupt file is treated as an empty store, never as a failure.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Open a store at `path`, loading existing entries when present.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load_entries(&path);
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Read and parse the backing file; corrupt content yields an empty map.
    fn load_entries(path: &Path) -> HashMap<String, String> {
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(map) => map,
                Err(err) => {
                    tracing::warn!("state file {} is corrupt, starting empty: {err}", path.display());
                    HashMap::new()
                }
            },
            // File likely doesn't exist yet.
            Err(_) => HashMap::new(),
        }
    }

    /// Serialize the current map and replace the backing file.
    fn flush(&self, entries: &HashMap<String, String>) -> ChatResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ChatResult<()> {
        let Ok(mut entries) = self.entries.lock() else {
            return Ok(());
        };
        entries.insert(key.to_owned(), value.to_owned());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> ChatResult<()> {
        let Ok(mut entries) = self.entries.lock() else {
            return Ok(());
        };
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

/// In-memory store for tests and embedded use.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ChatResult<()> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_owned(), value.to_owned());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> ChatResult<()> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_state_path(tag: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("art_historian_{}_{}.json", tag, std::process::id()));
        path
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get(keys::THEME), None);
        store.set(keys::THEME, "dark-mode").unwrap();
        assert_eq!(store.get(keys::THEME), Some("dark-mode".to_string()));
        store.remove(keys::THEME).unwrap();
        assert_eq!(store.get(keys::THEME), None);
    }

    #[test]
    fn test_file_store_persists_across_open() {
        let path = temp_state_path("persist");
        let _ = std::fs::remove_file(&path);

        let store = JsonFileStore::open(&path);
        store.set(keys::LANGUAGE, "fr").unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get(keys::LANGUAGE), Some("fr".to_string()));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let path = temp_state_path("corrupt");
        std::fs::write(&path, "{not json at all").unwrap();

        let store = JsonFileStore::open(&path);
        assert_eq!(store.get(keys::THEME), None);

        let _ = std::fs::remove_file(&path);
    }
}
