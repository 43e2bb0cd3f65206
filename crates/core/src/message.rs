//! Message domain types.
//!
//! A [`Message`] is both a turn in a conversation's history and the mutable
//! display record a front end updates while a reply streams in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person asking
    User,
    /// The language model
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content, grown in place while streaming
    pub text: String,

    /// When the message was created
    pub timestamp: DateTime<Utc>,

    /// True while a reply is still arriving
    #[serde(default)]
    pub is_streaming: bool,

    /// Citation URLs, cumulative and deduplicated, in first-seen order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grounding_urls: Vec<String>,
}

impl Message {
    fn with_role(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
            is_streaming: false,
            grounding_urls: Vec::new(),
        }
    }

    /// Create a new user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_role(Role::User, text)
    }

    /// Create a new, complete model message.
    pub fn model(text: impl Into<String>) -> Self {
        Self::with_role(Role::Model, text)
    }

    /// Create an empty model message that is waiting for a streamed reply.
    pub fn streaming_placeholder() -> Self {
        Self {
            is_streaming: true,
            ..Self::with_role(Role::Model, String::new())
        }
    }

    /// Append a text delta and merge any citation URLs reported with it.
    ///
    /// URLs are compared by exact string equality; a URL already present is
    /// not added again.
    pub fn append(&mut self, delta: &str, grounding_urls: Option<&[String]>) {
        self.text.push_str(delta);
        for url in grounding_urls.unwrap_or_default() {
            if !self.grounding_urls.iter().any(|u| u == url) {
                self.grounding_urls.push(url.clone());
            }
        }
    }

    /// Clear the streaming flag.
    ///
    /// Returns `true` only for the call that actually ended the stream, so a
    /// caller can tell the single true→false transition apart.
    pub fn finish(&mut self) -> bool {
        std::mem::replace(&mut self.is_streaming, false)
    }
}
