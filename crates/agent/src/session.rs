//! Creation of conversation contexts.
//!
//! A [`SessionInitiator`] is built once per process from configuration. Its
//! construction is where a missing credential is caught; after that,
//! [`SessionInitiator::create_session`] is infallible and purely local: no
//! network traffic happens until the first reply is requested.

use std::sync::Arc;

use campusbot_config::AppConfig;
use campusbot_core::message::Message;
use campusbot_core::preamble;
use campusbot_core::provider::{Provider, ProviderRequest};
use campusbot_core::Result;
use tracing::debug;
use uuid::Uuid;

/// Fixed settings of every session an initiator creates.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub model: String,
    pub temperature: f32,
    pub live_search: bool,
    pub assistant_name: String,
}

impl SessionSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            live_search: config.live_search,
            assistant_name: config.assistant_name.clone(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Immutable per-session configuration, shared read-only between contexts.
#[derive(Debug)]
struct SessionProfile {
    settings: SessionSettings,
    preamble: String,
}

/// Creates independent [`ConversationContext`]s with identical configuration.
pub struct SessionInitiator {
    provider: Arc<dyn Provider>,
    profile: Arc<SessionProfile>,
}

impl SessionInitiator {
    /// Create an initiator over an existing provider.
    ///
    /// The preamble is rendered here, once, and reused by every session.
    pub fn new(provider: Arc<dyn Provider>, settings: SessionSettings) -> Self {
        let preamble = preamble::system_instruction(&settings.assistant_name);
        debug!(
            provider = provider.name(),
            model = %settings.model,
            preamble_chars = preamble.len(),
            "Session initiator ready"
        );
        Self {
            provider,
            profile: Arc::new(SessionProfile { settings, preamble }),
        }
    }

    /// Build the configured provider and an initiator over it.
    ///
    /// Fails with a configuration error when no API key is available.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let provider = campusbot_providers::build_from_config(config)?;
        Ok(Self::new(provider, SessionSettings::from_config(config)))
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.profile.settings
    }

    /// Start a new conversation.
    pub fn create_session(&self) -> ConversationContext {
        let context = ConversationContext {
            id: Uuid::new_v4().to_string(),
            provider: Arc::clone(&self.provider),
            profile: Arc::clone(&self.profile),
            history: Vec::new(),
        };
        debug!(session = %context.id, "Created conversation context");
        context
    }
}

/// One ongoing conversation with the model service.
///
/// Configuration is fixed at creation. The context owns the turns of its
/// completed exchanges; a reply stream borrows it mutably, so only one
/// exchange per context can be in flight.
pub struct ConversationContext {
    id: String,
    provider: Arc<dyn Provider>,
    profile: Arc<SessionProfile>,
    history: Vec<Message>,
}

impl ConversationContext {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The system instruction sent with every exchange.
    pub fn preamble(&self) -> &str {
        &self.profile.preamble
    }

    pub fn model(&self) -> &str {
        &self.profile.settings.model
    }

    pub fn temperature(&self) -> f32 {
        self.profile.settings.temperature
    }

    pub fn live_search(&self) -> bool {
        self.profile.settings.live_search
    }

    pub fn assistant_name(&self) -> &str {
        &self.profile.settings.assistant_name
    }

    /// Turns of completed exchanges, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub(crate) fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// The request for a new user turn on top of the current history.
    pub(crate) fn request_for(&self, user_text: &str) -> ProviderRequest {
        let mut messages = self.history.clone();
        messages.push(Message::user(user_text));

        ProviderRequest {
            model: self.profile.settings.model.clone(),
            system_instruction: Some(self.profile.preamble.clone()),
            messages,
            temperature: self.profile.settings.temperature,
            live_search: self.profile.settings.live_search,
        }
    }

    /// Record a completed exchange.
    pub(crate) fn commit(&mut self, user_text: String, reply: String) {
        self.history.push(Message::user(user_text));
        self.history.push(Message::model(reply));
    }
}

impl std::fmt::Debug for ConversationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationContext")
            .field("id", &self.id)
            .field("provider", &self.provider.name())
            .field("settings", &self.profile.settings)
            .field("turns", &self.history.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedProvider;

    fn initiator() -> SessionInitiator {
        SessionInitiator::new(
            Arc::new(ScriptedProvider::new(vec![])),
            SessionSettings::default(),
        )
    }

    #[test]
    fn default_settings_match_config_defaults() {
        let settings = SessionSettings::default();
        assert_eq!(settings.model, "gemini-2.5-flash");
        assert!((settings.temperature - 0.7).abs() < f32::EPSILON);
        assert!(settings.live_search);
        assert_eq!(settings.assistant_name, "SIT Bot");
    }

    #[test]
    fn two_sessions_share_configuration_not_state() {
        let initiator = initiator();
        let mut a = initiator.create_session();
        let b = initiator.create_session();

        assert_ne!(a.id(), b.id());
        assert_eq!(a.preamble(), b.preamble());
        assert_eq!(a.temperature(), b.temperature());
        assert_eq!(a.model(), b.model());
        assert_eq!(a.live_search(), b.live_search());

        a.commit("hi".into(), "hello".into());
        assert_eq!(a.history().len(), 2);
        assert!(b.history().is_empty());
    }

    #[test]
    fn preamble_embeds_catalog() {
        let context = initiator().create_session();
        assert!(context.preamble().contains("The Matrix (Cafeteria)"));
        assert!(context.preamble().contains("Midnight Hackathon"));
    }

    #[test]
    fn request_carries_history_and_new_turn() {
        let mut context = initiator().create_session();
        context.commit("Where is the gym?".into(), "Spartan Arena.".into());

        let request = context.request_for("Is it open late?");
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[2].text, "Is it open late?");
        assert_eq!(request.system_instruction.as_deref(), Some(context.preamble()));
        assert!(request.live_search);
        assert_eq!(request.model, "gemini-2.5-flash");
    }

    #[test]
    fn creating_a_session_does_not_touch_the_provider() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let initiator = SessionInitiator::new(provider.clone(), SessionSettings::default());
        let _context = initiator.create_session();
        assert_eq!(provider.calls(), 0);
    }

    #[test]
    fn from_config_without_key_fails_fast() {
        let result = SessionInitiator::from_config(&AppConfig::default());
        assert!(matches!(result, Err(campusbot_core::Error::Config { .. })));
    }

    #[test]
    fn from_config_with_key_uses_config_settings() {
        let config = AppConfig {
            api_key: Some("test-key".into()),
            temperature: 0.3,
            assistant_name: "Nova".into(),
            ..AppConfig::default()
        };
        let initiator = SessionInitiator::from_config(&config).unwrap();
        let context = initiator.create_session();
        assert!((context.temperature() - 0.3).abs() < f32::EPSILON);
        assert!(context.preamble().starts_with("You are \"Nova\""));
        assert_eq!(context.assistant_name(), "Nova");
    }
}
