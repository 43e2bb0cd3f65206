//! Provider trait: the abstraction over the hosted language-model service.
//!
//! A Provider knows how to send a conversation to a model and hand back its
//! reply as a stream of raw chunks. The stream is pull-driven: nothing is read
//! from the network until the consumer polls, and dropping the stream releases
//! the underlying connection.
//!
//! Implementations: Gemini (`campusbot-providers`), scripted mocks in tests.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::Message;

/// A stream of raw reply chunks as delivered by the transport.
pub type ChunkStream = BoxStream<'static, Result<StreamChunk, ProviderError>>;

/// Everything a provider needs for one streamed exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "gemini-2.5-flash")
    pub model: String,

    /// Fixed behavioral preamble applied to every exchange
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,

    /// Prior turns followed by the new user turn
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic, 2.0 = most creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Let the model ground its answer with live web search
    #[serde(default)]
    pub live_search: bool,
}

fn default_temperature() -> f32 {
    0.7
}

/// A single raw chunk of a streamed reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Text delta carried by this chunk; empty for metadata-only chunks
    #[serde(default)]
    pub text: String,

    /// Citation URIs exactly as the service reported them for this chunk.
    ///
    /// `None` when the chunk carried no citation metadata at all. May contain
    /// duplicates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<String>>,
}

impl StreamChunk {
    /// A chunk carrying only text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            citations: None,
        }
    }
}

/// The core Provider trait.
///
/// The stream aggregator calls `stream()` without knowing which backend is
/// behind it.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send a request and get a stream of raw reply chunks.
    ///
    /// An `Err` here means the request failed before any chunk arrived;
    /// errors inside the stream mean it failed midway.
    async fn stream(&self, request: ProviderRequest) -> Result<ChunkStream, ProviderError>;

    /// Health check: can we reach the provider?
    async fn health_check(&self) -> Result<bool, ProviderError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    struct EchoProvider;

    #[async_trait]
    impl Provider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn stream(&self, request: ProviderRequest) -> Result<ChunkStream, ProviderError> {
            let last = request
                .messages
                .last()
                .map(|m| m.text.clone())
                .unwrap_or_default();
            Ok(futures::stream::iter(vec![Ok(StreamChunk::text(last))]).boxed())
        }
    }

    #[test]
    fn provider_request_defaults() {
        let req: ProviderRequest =
            serde_json::from_str(r#"{"model":"gemini-2.5-flash","messages":[]}"#).unwrap();
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert!(!req.live_search);
        assert!(req.system_instruction.is_none());
    }

    #[test]
    fn metadata_free_chunk_has_no_citations() {
        let chunk = StreamChunk::text("hello");
        assert_eq!(chunk.citations, None);
        let json = serde_json::to_string(&chunk).unwrap();
        assert!(!json.contains("citations"));
    }

    #[tokio::test]
    async fn default_health_check_and_stream() {
        let provider = EchoProvider;
        assert!(provider.health_check().await.unwrap());

        let request = ProviderRequest {
            model: "m".into(),
            system_instruction: None,
            messages: vec![Message::user("ping")],
            temperature: 0.7,
            live_search: false,
        };
        let chunks: Vec<_> = provider.stream(request).await.unwrap().collect().await;
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].as_ref().unwrap().text, "ping");
    }
}
