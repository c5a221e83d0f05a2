//! Transcript message - Client-only, never persisted
//!
//! Messages are lost on reload; the server does not round-trip the transcript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{addressee_prefix, MessageId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Speak,
    Stay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub character: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bid: Vec<String>,
}

impl Message {
    /// A spoken line; content gets an `@ a, b  ` prefix when addressed.
    pub fn speak(
        character: impl Into<String>,
        content: &str,
        bid: Vec<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let content = format!("{}{}", addressee_prefix(&bid), content);
        Self {
            id: MessageId::new(),
            character: character.into(),
            content,
            timestamp,
            kind: MessageKind::Speak,
            bid,
        }
    }
}
