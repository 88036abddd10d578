//! Ordered, append-only message log with rendering side effects.
//!
//! The log owns message identity: every append assigns a fresh id from a
//! monotonic sequence, so ids are unique and strictly increasing in creation
//! order. Input validation lives in the session controller; `append` itself
//! never fails.

use std::sync::Arc;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::chat::core::ids::MessageId;
use crate::chat::core::message::{ArtworkDetails, MessageRecord, MessageRole};
use crate::chat::render::Renderer;

/// One persisted log entry, matching the web client's snapshot shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSnapshot {
    /// Author role (`user` | `bot`).
    #[serde(rename = "type")]
    pub role: MessageRole,
    /// Message text.
    pub content: String,
    /// Display-formatted creation time.
    #[serde(rename = "time")]
    pub timestamp: String,
}

/// Ordered sequence of message records plus their render side effects.
pub struct MessageLog {
    records: Vec<MessageRecord>,
    next_sequence: u64,
    renderer: Arc<dyn Renderer>,
}

impl MessageLog {
    /// Create an empty log rendering through `renderer`.
    #[must_use]
    pub fn new(renderer: Arc<dyn Renderer>) -> Self {
        Self {
            records: Vec::new(),
            next_sequence: 0,
            renderer,
        }
    }

    /// Append a message, render it, and return its id.
    pub fn append(&mut self, role: MessageRole, content: impl Into<String>) -> MessageId {
        self.append_at(role, content.into(), current_time_label())
    }

    /// Append with an explicit display timestamp (restore path).
    fn append_at(&mut self, role: MessageRole, content: String, timestamp: String) -> MessageId {
        self.next_sequence += 1;
        let id = MessageId::from_sequence(self.next_sequence);
        let record = MessageRecord {
            id: id.clone(),
            role,
            content,
            timestamp,
            attached_details: None,
        };
        self.renderer.render_message(&record);
        self.records.push(record);
        id
    }

    /// Attach artwork details to an existing message and re-render it.
    ///
    /// A missing id is logged and ignored: the log may have been cleared by
    /// a "new chat" between the request and the response.
    pub fn attach_details(&mut self, id: &MessageId, details: ArtworkDetails) {
        let Some(record) = self.records.iter_mut().find(|r| &r.id == id) else {
            tracing::warn!("artwork details arrived for vanished message {id}");
            return;
        };
        record.attached_details = Some(details);
        if let Some(details) = &record.attached_details {
            self.renderer.render_artwork_details(id, details);
        }
    }

    /// Empty the sequence and the rendered view.
    ///
    /// Used only by "new chat" after the persistence flush. The id sequence
    /// keeps counting so ids never repeat within the process.
    pub fn clear(&mut self) {
        self.records.clear();
        self.renderer.clear_messages();
    }

    /// Snapshot for persistence: `{type, content, time}` per record.
    ///
    /// Volatile fields (ids, attached details) are not persisted; artwork
    /// detail blocks do not survive a reload.
    #[must_use]
    pub fn snapshot_for_persistence(&self) -> Vec<MessageSnapshot> {
        self.records
            .iter()
            .map(|record| MessageSnapshot {
                role: record.role,
                content: record.content.clone(),
                timestamp: record.timestamp.clone(),
            })
            .collect()
    }

    /// Replace the sequence with a restored snapshot.
    ///
    /// Each record is replayed through the same render path `append` uses,
    /// preserving original ordering and timestamps. Restored records get
    /// fresh ids; the sequence continues past them so later appends cannot
    /// collide.
    pub fn restore(&mut self, snapshot: Vec<MessageSnapshot>) {
        self.records.clear();
        for entry in snapshot {
            let _ = self.append_at(entry.role, entry.content, entry.timestamp);
        }
    }

    /// All records in order.
    #[must_use]
    pub fn records(&self) -> &[MessageRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent record, if any.
    #[must_use]
    pub fn last(&self) -> Option<&MessageRecord> {
        self.records.last()
    }
}

/// Display time label in the web client's `HH:MM` shape.
fn current_time_label() -> String {
    Local::now().format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::render::{NullRenderer, RecordingRenderer, RenderEvent};

    fn log() -> MessageLog {
        MessageLog::new(Arc::new(NullRenderer))
    }

    #[test]
    fn test_ids_strictly_increasing_and_unique() {
        let mut log = log();
        let mut previous = None;
        for i in 0..50 {
            let id = log.append(
                if i % 2 == 0 { MessageRole::User } else { MessageRole::Bot },
                format!("message {i}"),
            );
            let seq = id.sequence().unwrap();
            if let Some(prev) = previous {
                assert!(seq > prev, "sequence must strictly increase");
            }
            previous = Some(seq);
        }
        assert_eq!(log.len(), 50);
    }

    #[test]
    fn test_attach_details_to_missing_id_is_noop() {
        let mut log = log();
        let id = log.append(MessageRole::Bot, "hello");
        log.clear();

        // Must not panic or resurrect the record.
        log.attach_details(&id, ArtworkDetails::default());
        assert!(log.is_empty());
    }

    #[test]
    fn test_attach_details_rerenders_target() {
        let renderer = Arc::new(RecordingRenderer::new());
        let mut log = MessageLog::new(renderer.clone());
        let id = log.append(MessageRole::Bot, "about the painting");
        log.attach_details(
            &id,
            ArtworkDetails {
                title: Some("Las Meninas".to_string()),
                ..ArtworkDetails::default()
            },
        );

        let events = renderer.events();
        assert!(events.contains(&RenderEvent::Details {
            id,
            title: "Las Meninas".to_string(),
        }));
        assert!(log.last().unwrap().attached_details.is_some());
    }

    #[test]
    fn test_snapshot_drops_details() {
        let mut log = log();
        let id = log.append(MessageRole::Bot, "with details");
        log.attach_details(
            &id,
            ArtworkDetails {
                title: Some("The Scream".to_string()),
                ..ArtworkDetails::default()
            },
        );

        let snapshot = log.snapshot_for_persistence();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].role, MessageRole::Bot);
        assert_eq!(snapshot[0].content, "with details");
        // Snapshot carries no details field at all.
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(!json.contains("Scream"));
    }

    #[test]
    fn test_restore_replays_through_render_path() {
        let snapshot = vec![
            MessageSnapshot {
                role: MessageRole::Bot,
                content: "welcome".to_string(),
                timestamp: "10:00".to_string(),
            },
            MessageSnapshot {
                role: MessageRole::User,
                content: "who painted Guernica?".to_string(),
                timestamp: "10:01".to_string(),
            },
        ];

        let renderer = Arc::new(RecordingRenderer::new());
        let mut log = MessageLog::new(renderer.clone());
        log.restore(snapshot);

        assert_eq!(log.len(), 2);
        assert_eq!(log.records()[0].timestamp, "10:00");
        assert_eq!(log.records()[1].content, "who painted Guernica?");
        assert_eq!(renderer.events().len(), 2);

        // Fresh appends continue past the restored sequence.
        let id = log.append(MessageRole::User, "and when?");
        assert_eq!(id.sequence(), Some(3));
    }

    #[test]
    fn test_snapshot_wire_shape() {
        let mut log = log();
        let _ = log.append(MessageRole::User, "hello");
        let json = serde_json::to_string(&log.snapshot_for_persistence()).unwrap();
        assert!(json.contains(r#""type":"user""#));
        assert!(json.contains(r#""content":"hello""#));
        assert!(json.contains(r#""time":""#));
    }
}
