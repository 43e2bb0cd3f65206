//! Server-sent events decoding.
//!
//! Turns an HTTP body byte stream into the payloads of its `data:` fields.
//! Lines are buffered as raw bytes, so a multi-byte character or a `data:`
//! line split across network reads is reassembled before decoding.

use std::collections::VecDeque;
use std::fmt::Display;
use std::pin::Pin;

use campusbot_core::error::ProviderError;
use futures::stream::{self, Stream, StreamExt};

struct Decoder<S> {
    inner: Pin<Box<S>>,
    buffer: Vec<u8>,
    data: Option<String>,
    ready: VecDeque<String>,
    finished: bool,
}

impl<S> Decoder<S> {
    fn feed(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            self.line(line.trim_end_matches(['\n', '\r']));
        }
    }

    fn line(&mut self, line: &str) {
        if line.is_empty() {
            self.dispatch();
            return;
        }

        // Comment / keep-alive
        if line.starts_with(':') {
            return;
        }

        if let Some(value) = line.strip_prefix("data:") {
            let value = value.strip_prefix(' ').unwrap_or(value);
            match self.data.as_mut() {
                Some(data) => {
                    data.push('\n');
                    data.push_str(value);
                }
                None => self.data = Some(value.to_string()),
            }
        }
        // `event:`, `id:` and `retry:` carry nothing we use.
    }

    fn dispatch(&mut self) {
        if let Some(data) = self.data.take() {
            self.ready.push_back(data);
        }
    }

    fn close(&mut self) {
        if !self.buffer.is_empty() {
            let raw = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&raw);
            self.line(line.trim_end_matches('\r'));
        }
        self.dispatch();
        self.finished = true;
    }
}

/// Decode `body` into the data payloads of its events, in arrival order.
///
/// A byte-level error ends the stream with one `StreamInterrupted` item.
/// Nothing is read from `body` until the returned stream is polled.
pub fn data_events<S, B, E>(body: S) -> impl Stream<Item = Result<String, ProviderError>> + Send
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: Display + Send,
{
    let decoder = Decoder {
        inner: Box::pin(body),
        buffer: Vec::new(),
        data: None,
        ready: VecDeque::new(),
        finished: false,
    };

    stream::unfold(decoder, |mut decoder| async move {
        loop {
            if let Some(data) = decoder.ready.pop_front() {
                return Some((Ok(data), decoder));
            }
            if decoder.finished {
                return None;
            }
            match decoder.inner.next().await {
                Some(Ok(bytes)) => decoder.feed(bytes.as_ref()),
                Some(Err(e)) => {
                    decoder.finished = true;
                    return Some((Err(ProviderError::StreamInterrupted(e.to_string())), decoder));
                }
                None => decoder.close(),
            }
        }
    })
}
