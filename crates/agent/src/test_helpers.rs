//! Shared test helpers for session and reply tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use campusbot_core::error::ProviderError;
use campusbot_core::provider::{ChunkStream, Provider, ProviderRequest, StreamChunk};
use futures::StreamExt;

/// What one `stream` call does.
pub enum Script {
    /// Yield these items in order, then end.
    Items(Vec<Result<StreamChunk, ProviderError>>),
    /// Fail before any chunk is produced.
    Reject(ProviderError),
}

impl Script {
    /// A successful reply made of text-only chunks.
    pub fn texts(texts: &[&str]) -> Self {
        Self::Items(texts.iter().map(|t| Ok(StreamChunk::text(*t))).collect())
    }
}

/// A mock provider that plays back scripted streams.
///
/// Each call to `stream` consumes the next script and records the request.
/// Panics if more calls are made than scripts provided.
pub struct ScriptedProvider {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The requests received so far.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn stream(&self, request: ProviderRequest) -> Result<ChunkStream, ProviderError> {
        self.requests.lock().unwrap().push(request);
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedProvider: no more scripts (call #{})", self.calls()));

        match script {
            Script::Items(items) => Ok(futures::stream::iter(items).boxed()),
            Script::Reject(err) => Err(err),
        }
    }
}
