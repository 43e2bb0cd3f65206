//! Language-model transports for CampusBot.
//!
//! All providers implement the `campusbot_core::Provider` trait.
//! [`build_from_config`] wires the configured one.

pub mod gemini;
pub mod sse;

use std::sync::Arc;

use campusbot_config::AppConfig;
use campusbot_core::{Error, Provider};

pub use gemini::GeminiProvider;

/// Build the configured provider.
///
/// Fails with a configuration error when no API key is available, so a
/// missing credential surfaces before any exchange is attempted.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, Error> {
    let api_key = config
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            Error::config(format!(
                "no API key configured (set one of {} or add api_key to {})",
                campusbot_config::API_KEY_VARS.join(", "),
                AppConfig::config_path().display()
            ))
        })?;

    let provider = GeminiProvider::new(&config.api_url, api_key)?;
    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_a_config_error() {
        let config = AppConfig::default();
        match build_from_config(&config) {
            Err(Error::Config { message }) => assert!(message.contains("GEMINI_API_KEY")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected a configuration error"),
        }
    }

    #[test]
    fn blank_key_is_a_config_error() {
        let config = AppConfig {
            api_key: Some("   ".into()),
            ..AppConfig::default()
        };
        assert!(matches!(
            build_from_config(&config),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn builds_gemini_with_key() {
        let config = AppConfig {
            api_key: Some("test-key".into()),
            ..AppConfig::default()
        };
        let provider = build_from_config(&config).unwrap();
        assert_eq!(provider.name(), "gemini");
    }
}
