//! # CampusBot Core
//!
//! Domain types, traits, and error definitions for the CampusBot assistant.
//! This crate has **no transport dependencies**; it defines the domain model
//! that the provider, agent and CLI crates implement against.
//!
//! ## Layout
//!
//! - [`message`]: chat messages and turn history
//! - [`provider`]: the streamed-chunk transport abstraction
//! - [`campus`]: the static campus catalog (locations, events, quick prompts)
//! - [`preamble`]: system instruction rendering from the catalog
//! - [`error`]: error taxonomy

pub mod campus;
pub mod error;
pub mod message;
pub mod preamble;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use campus::{CampusEvent, CampusLocation, QuickPrompt};
pub use error::{Error, ProviderError, Result};
pub use message::{Message, Role};
pub use provider::{ChunkStream, Provider, ProviderRequest, StreamChunk};
