//! Telegram transport settings.

use config::{Config, ConfigError};
use serde::{Deserialize, Serialize};

/// Telegram transport settings loaded from environment variables.
#[derive(Deserialize, Serialize, Clone)]
pub struct TelegramSettings {
    /// Telegram Bot API token (`TELEGRAM_BOT_TOKEN`).
    pub telegram_bot_token: String,
}

impl TelegramSettings {
    /// Create new settings by loading from environment and files.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails or the token is absent or blank.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_config(cv_relay_core::config::build_config()?)
    }

    /// Deserialize and validate settings from an already built source.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the token is missing or blank.
    pub fn from_config(source: Config) -> Result<Self, ConfigError> {
        let settings: Self = source.try_deserialize()?;
        if settings.telegram_bot_token.trim().is_empty() {
            return Err(ConfigError::Message(
                "telegram_bot_token must not be blank".to_string(),
            ));
        }
        Ok(settings)
    }
}

// Never print the token.
impl std::fmt::Debug for TelegramSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramSettings")
            .field("telegram_bot_token", &"[MASKED]")
            .finish()
    }
}
