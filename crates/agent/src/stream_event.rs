//! Reply-level streaming events.
//!
//! `ReplyEvent` wraps provider-level chunks into the values a front end
//! consumes while a reply streams in. A transport failure is the final
//! `Failed` event, never an `Err`, so a consumer updates one display buffer the
//! same way whether the exchange succeeds or not.

use std::collections::HashSet;

use campusbot_core::message::Message;
use campusbot_core::provider::StreamChunk;
use serde::{Deserialize, Serialize};

/// One incremental unit of a streamed reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamFragment {
    /// Text delta; may be empty when the chunk only carried metadata.
    pub text: String,

    /// Citation URIs reported with this chunk, deduplicated in first-seen
    /// order. `None` when the chunk carried no citation metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding_urls: Option<Vec<String>>,
}

impl StreamFragment {
    /// Derive a fragment from a raw transport chunk.
    pub fn from_chunk(chunk: StreamChunk) -> Self {
        let grounding_urls = chunk.citations.map(|uris| {
            let mut seen = HashSet::new();
            uris.into_iter()
                .filter(|uri| seen.insert(uri.clone()))
                .collect()
        });

        Self {
            text: chunk.text,
            grounding_urls,
        }
    }
}

/// The terminal notice produced when the transport fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportNotice {
    /// Inline Markdown shown to the user after any partial text.
    pub notice: String,

    /// The underlying transport error, for logs and diagnostics.
    pub cause: String,
}

impl TransportNotice {
    pub fn new(assistant_name: &str, cause: impl Into<String>) -> Self {
        Self {
            notice: format!(
                "\n\n*[System Error: Unable to connect to {assistant_name} at this moment.]*"
            ),
            cause: cause.into(),
        }
    }
}

/// Events yielded by a reply stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplyEvent {
    /// A piece of the reply.
    Fragment(StreamFragment),

    /// The transport failed; always the last event of its stream.
    Failed(TransportNotice),
}

impl ReplyEvent {
    /// The text this event contributes to the display buffer.
    pub fn display_text(&self) -> &str {
        match self {
            Self::Fragment(fragment) => &fragment.text,
            Self::Failed(notice) => &notice.notice,
        }
    }

    /// Citation URLs carried by this event, if any.
    pub fn grounding_urls(&self) -> Option<&[String]> {
        match self {
            Self::Fragment(fragment) => fragment.grounding_urls.as_deref(),
            Self::Failed(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Fold this event into an in-progress message.
    pub fn apply_to(&self, message: &mut Message) {
        message.append(self.display_text(), self.grounding_urls());
    }
}
