//! Conversation sessions and streamed reply aggregation.
//!
//! A [`SessionInitiator`] is built once from configuration and hands out
//! independent [`ConversationContext`]s. [`stream_reply`] sends one user
//! utterance within a context and yields the reply as [`ReplyEvent`]s:
//!
//! 1. **Fragments** arrive in transport order, text plus any citations
//! 2. **Failure** is reported as one final notice event, never as an error
//! 3. **Completion** records the exchange in the context's history

pub mod reply;
pub mod session;
pub mod stream_event;

#[cfg(test)]
mod test_helpers;

pub use reply::stream_reply;
pub use session::{ConversationContext, SessionInitiator, SessionSettings};
pub use stream_event::{ReplyEvent, StreamFragment, TransportNotice};
