//! Identifier types for conversations and messages.
//!
//! This module is intentionally **type-heavy** and **logic-light**: string
//! newtypes with a consistent surface, plus the two generation helpers the
//! wire contract mandates.
//!
//! ## Formats
//! - [`ConversationId`]: `conv-<unix-millis>-<9 base-36 chars>`
//! - [`MessageId`]: `msg-<unix-millis>-<sequence>`
//!
//! Message ids carry a per-log sequence number so that ids remain unique and
//! strictly increasing even when several messages land in the same
//! millisecond.

use core::fmt;
use core::str::FromStr;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Characters used for the random conversation-id suffix (base 36).
const SUFFIX_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random conversation-id suffix.
const SUFFIX_LEN: usize = 9;

/// Error returned when parsing an id with the wrong prefix or shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdParseError {
    /// The expected prefix (`conv` or `msg`).
    pub expected_prefix: &'static str,
}

impl fmt::Display for IdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id must look like {}-<millis>-<tail>", self.expected_prefix)
    }
}

impl std::error::Error for IdParseError {}

/// Declare a string-id newtype with a consistent API.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident,
        prefix = $prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[repr(transparent)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Prefix carried by every id of this type.
            pub const PREFIX: &'static str = $prefix;

            /// Borrow as `&str`.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume into `String`.
            #[inline]
            #[must_use]
            pub fn into_string(self) -> String {
                self.0
            }

            /// Check that a raw string has the `<prefix>-<millis>-<tail>` shape.
            fn validate(raw: &str) -> Result<(), IdParseError> {
                let err = IdParseError {
                    expected_prefix: Self::PREFIX,
                };
                let rest = raw.strip_prefix(concat!($prefix, "-")).ok_or(err.clone())?;
                let (millis, tail) = rest.split_once('-').ok_or(err.clone())?;
                if millis.is_empty() || tail.is_empty() || !millis.bytes().all(|b| b.is_ascii_digit())
                {
                    return Err(err);
                }
                Ok(())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.into_string()
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::validate(s)?;
                Ok(Self(s.to_owned()))
            }
        }
    };
}

define_string_id!(
    /// Opaque token identifying one chat session.
    ///
    /// Created on session start or "new chat"; never mutated; persists until
    /// replaced wholesale.
    ConversationId,
    prefix = "conv"
);

define_string_id!(
    /// Opaque token identifying one message within a conversation.
    ///
    /// Unique and strictly increasing in creation order within a log.
    MessageId,
    prefix = "msg"
);

impl ConversationId {
    /// Generate a fresh conversation id.
    #[must_use]
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis();
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..SUFFIX_CHARSET.len());
                char::from(SUFFIX_CHARSET[idx])
            })
            .collect();
        Self(format!("conv-{millis}-{suffix}"))
    }

    /// Generate a fresh conversation id guaranteed to differ from `previous`.
    #[must_use]
    pub fn generate_distinct(previous: &Self) -> Self {
        loop {
            let id = Self::generate();
            if &id != previous {
                return id;
            }
        }
    }
}

impl MessageId {
    /// Build a message id from the current time and a log sequence number.
    #[must_use]
    pub fn from_sequence(sequence: u64) -> Self {
        let millis = Utc::now().timestamp_millis();
        Self(format!("msg-{millis}-{sequence}"))
    }

    /// The sequence component, when the id carries one.
    ///
    /// Restored ids from older snapshots may lack it; those are never used as
    /// feedback or detail-attachment targets for new messages.
    #[must_use]
    pub fn sequence(&self) -> Option<u64> {
        self.0.rsplit_once('-').and_then(|(_, seq)| seq.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_id_shape() {
        let id = ConversationId::generate();
        assert!(id.as_str().starts_with("conv-"));
        let parsed: ConversationId = id.as_str().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_generate_distinct_differs() {
        let a = ConversationId::generate();
        let b = ConversationId::generate_distinct(&a);
        assert_ne!(a, b);
    }

    #[test]
    fn test_message_id_sequence_roundtrip() {
        let id = MessageId::from_sequence(42);
        assert!(id.as_str().starts_with("msg-"));
        assert_eq!(id.sequence(), Some(42));
    }

    #[test]
    fn test_rejects_wrong_prefix() {
        assert!("conv-123-abc".parse::<MessageId>().is_err());
        assert!("msg-123-7".parse::<ConversationId>().is_err());
        assert!("conv-x-abc".parse::<ConversationId>().is_err());
        assert!("conv-123".parse::<ConversationId>().is_err());
    }
}
