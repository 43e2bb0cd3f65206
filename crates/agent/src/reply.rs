//! Turns one user utterance into a lazy reply stream.
//!
//! The stream is driven entirely by its consumer: the request is only sent
//! on the first poll, and each later poll pulls exactly one chunk from the
//! transport. Nothing runs in the background, so dropping the stream early
//! drops the transport with it.
//!
//! The stream never ends in an error. A transport failure, whether before
//! the first chunk or midway, becomes a single final [`ReplyEvent::Failed`].
//! There are no timeouts here: a transport that stops sending without
//! closing keeps the stream pending.

use campusbot_core::error::ProviderError;
use campusbot_core::provider::ChunkStream;
use futures::stream::{self, Stream, StreamExt};
use tracing::{debug, error, trace};

use crate::session::ConversationContext;
use crate::stream_event::{ReplyEvent, StreamFragment, TransportNotice};

enum State<'a> {
    Pending {
        context: &'a mut ConversationContext,
        user_text: String,
    },
    Streaming {
        context: &'a mut ConversationContext,
        user_text: String,
        chunks: ChunkStream,
        reply: String,
    },
    Done,
}

/// Send `user_text` within `context` and stream the reply.
///
/// `user_text` is forwarded as given; trimming and rejecting empty input is
/// the caller's job. When the stream runs to completion the exchange is added
/// to the context's history; after a failure the history is left unchanged.
pub fn stream_reply<'a>(
    context: &'a mut ConversationContext,
    user_text: &str,
) -> impl Stream<Item = ReplyEvent> + Send + use<'a> {
    let state = State::Pending {
        context,
        user_text: user_text.to_string(),
    };

    stream::unfold(state, |state| async move {
        match state {
            State::Pending { context, user_text } => {
                debug!(
                    session = %context.id(),
                    model = %context.model(),
                    prior_turns = context.history().len(),
                    "Requesting streamed reply"
                );
                let request = context.request_for(&user_text);
                let started = context.provider().stream(request).await;
                match started {
                    Ok(chunks) => advance(context, user_text, chunks, String::new()).await,
                    Err(e) => Some((fail(context, &e), State::Done)),
                }
            }
            State::Streaming {
                context,
                user_text,
                chunks,
                reply,
            } => advance(context, user_text, chunks, reply).await,
            State::Done => None,
        }
    })
}

/// Pull the next chunk and turn it into the next event.
async fn advance<'a>(
    context: &'a mut ConversationContext,
    user_text: String,
    mut chunks: ChunkStream,
    mut reply: String,
) -> Option<(ReplyEvent, State<'a>)> {
    match chunks.next().await {
        Some(Ok(chunk)) => {
            let fragment = StreamFragment::from_chunk(chunk);
            trace!(
                session = %context.id(),
                chars = fragment.text.len(),
                citations = fragment.grounding_urls.as_ref().map_or(0, Vec::len),
                "Reply fragment"
            );
            reply.push_str(&fragment.text);
            Some((
                ReplyEvent::Fragment(fragment),
                State::Streaming {
                    context,
                    user_text,
                    chunks,
                    reply,
                },
            ))
        }
        Some(Err(e)) => Some((fail(context, &e), State::Done)),
        None => {
            debug!(
                session = %context.id(),
                chars = reply.len(),
                "Reply complete"
            );
            context.commit(user_text, reply);
            None
        }
    }
}

fn fail(context: &ConversationContext, err: &ProviderError) -> ReplyEvent {
    error!(session = %context.id(), error = %err, "Reply stream failed");
    ReplyEvent::Failed(TransportNotice::new(context.assistant_name(), err.to_string()))
}
