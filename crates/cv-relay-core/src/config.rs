//! Configuration and settings management
//!
//! Loads settings from config files and environment variables and defines
//! the fixed generation constants.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// `OpenRouter` OpenAI-compatible API base
pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";

/// Default model used for answering questions
pub const DEFAULT_CHAT_MODEL_ID: &str = "mistralai/devstral-2512:free";

/// Default location of the context document, relative to the working directory
pub const DEFAULT_CV_PATH: &str = "cv_full_complete.md";

/// Sampling temperature for CV answers (low randomness)
pub const CHAT_TEMPERATURE: f32 = 0.3;

/// Output token cap for CV answers
pub const CHAT_MAX_TOKENS: u32 = 600;

/// Default cap on the estimated prompt size in tokens
pub const DEFAULT_MAX_PROMPT_TOKENS: usize = 100_000;

/// Default HTTP timeout for LLM requests in seconds
pub const DEFAULT_LLM_HTTP_TIMEOUT_SECS: u64 = 120;

/// Reply used when the model produced nothing usable
pub const FALLBACK_MESSAGE: &str = "⚠️ No relevant information found in the CV.";

/// Reply used when the question does not fit next to the CV in one request
pub const PROMPT_TOO_LARGE_MESSAGE: &str =
    "⚠️ Your question is too long to answer together with the CV. Please shorten it.";

/// Supported provider backends
pub const SUPPORTED_PROVIDERS: &[&str] = &["openrouter", "openai_compat"];

/// Relay settings loaded from config files and environment variables
#[derive(Deserialize, Serialize, Clone)]
pub struct RelaySettings {
    /// `OpenRouter` (or compatible provider) API key
    pub openrouter_api_key: String,

    /// Provider backend: `openrouter` or `openai_compat`
    #[serde(default = "default_llm_provider")]
    pub llm_provider: String,

    /// API base URL for the provider
    #[serde(default = "default_llm_api_base")]
    pub llm_api_base: String,

    /// Model identifier sent with every request
    #[serde(default = "default_chat_model_id")]
    pub chat_model_id: String,

    /// Path of the context document
    #[serde(default = "default_cv_path")]
    pub cv_path: String,

    /// Name of the CV owner, used in the persona and the greeting
    #[serde(default = "default_cv_owner_name")]
    pub cv_owner_name: String,

    /// Site URL for `OpenRouter` identification
    #[serde(default)]
    pub openrouter_site_url: String,

    /// Site name for `OpenRouter` identification
    #[serde(default = "default_openrouter_site_name")]
    pub openrouter_site_name: String,

    /// Upper bound for the estimated prompt size
    #[serde(default = "default_max_prompt_tokens")]
    pub max_prompt_tokens: usize,

    /// HTTP timeout for LLM requests
    #[serde(default = "default_llm_http_timeout_secs")]
    pub llm_http_timeout_secs: u64,
}

fn default_llm_provider() -> String {
    "openrouter".to_string()
}

fn default_llm_api_base() -> String {
    OPENROUTER_API_BASE.to_string()
}

fn default_chat_model_id() -> String {
    DEFAULT_CHAT_MODEL_ID.to_string()
}

fn default_cv_path() -> String {
    DEFAULT_CV_PATH.to_string()
}

fn default_cv_owner_name() -> String {
    "Rinaldi Guizot".to_string()
}

fn default_openrouter_site_name() -> String {
    "CV Relay Bot".to_string()
}

const fn default_max_prompt_tokens() -> usize {
    DEFAULT_MAX_PROMPT_TOKENS
}

const fn default_llm_http_timeout_secs() -> u64 {
    DEFAULT_LLM_HTTP_TIMEOUT_SECS
}

/// Build the layered configuration source shared by all settings structs.
///
/// Layers, later ones win: `config/default`, `config/{RUN_MODE}`,
/// `config/local`, `APP_`-prefixed env vars, plain env vars.
///
/// # Errors
///
/// Returns a `ConfigError` if a present config file cannot be parsed.
pub fn build_config() -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        // Not checked into git
        .add_source(File::with_name("config/local").required(false))
        // Eg.. `APP_CHAT_MODEL_ID=... ./target/app`
        .add_source(Environment::with_prefix("APP").separator("__"))
        // UPPER_SNAKE_CASE env vars map to snake_case keys; empty vars count as unset
        .add_source(Environment::default().ignore_empty(true))
        .build()
}

impl RelaySettings {
    /// Create new settings by loading from environment and files
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails, if `OPENROUTER_API_KEY` is
    /// absent or blank, or if the provider name is unknown.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_config(build_config()?)
    }

    /// Deserialize and validate settings from an already built source.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a required key is missing or invalid.
    pub fn from_config(source: Config) -> Result<Self, ConfigError> {
        let settings: Self = source.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the invariants deserialization can't express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` describing the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.openrouter_api_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "openrouter_api_key must not be blank".to_string(),
            ));
        }
        if !SUPPORTED_PROVIDERS.contains(&self.llm_provider.as_str()) {
            return Err(ConfigError::Message(format!(
                "unknown llm_provider '{}', expected one of {SUPPORTED_PROVIDERS:?}",
                self.llm_provider
            )));
        }
        if self.chat_model_id.trim().is_empty() {
            return Err(ConfigError::Message(
                "chat_model_id must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

// Never print the API key.
impl std::fmt::Debug for RelaySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelaySettings")
            .field("openrouter_api_key", &"[MASKED]")
            .field("llm_provider", &self.llm_provider)
            .field("llm_api_base", &self.llm_api_base)
            .field("chat_model_id", &self.chat_model_id)
            .field("cv_path", &self.cv_path)
            .field("cv_owner_name", &self.cv_owner_name)
            .field("openrouter_site_url", &self.openrouter_site_url)
            .field("openrouter_site_name", &self.openrouter_site_name)
            .field("max_prompt_tokens", &self.max_prompt_tokens)
            .field("llm_http_timeout_secs", &self.llm_http_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let mut builder = Config::builder();
        for (key, value) in pairs {
            builder = builder.set_override(*key, *value)?;
        }
        builder.build()
    }

    #[test]
    fn test_defaults_applied() -> Result<(), ConfigError> {
        let settings = RelaySettings::from_config(source(&[("openrouter_api_key", "sk-or-test")])?)?;

        assert_eq!(settings.llm_provider, "openrouter");
        assert_eq!(settings.llm_api_base, OPENROUTER_API_BASE);
        assert_eq!(settings.chat_model_id, DEFAULT_CHAT_MODEL_ID);
        assert_eq!(settings.cv_path, DEFAULT_CV_PATH);
        assert_eq!(settings.max_prompt_tokens, DEFAULT_MAX_PROMPT_TOKENS);
        assert_eq!(settings.llm_http_timeout_secs, DEFAULT_LLM_HTTP_TIMEOUT_SECS);
        assert!(settings.openrouter_site_url.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_api_key_fails() -> Result<(), ConfigError> {
        let result = RelaySettings::from_config(source(&[("chat_model_id", "some/model")])?);
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_blank_api_key_fails() -> Result<(), ConfigError> {
        let result = RelaySettings::from_config(source(&[("openrouter_api_key", "   ")])?);
        assert!(matches!(result, Err(ConfigError::Message(_))));
        Ok(())
    }

    #[test]
    fn test_unknown_provider_fails() -> Result<(), ConfigError> {
        let result = RelaySettings::from_config(source(&[
            ("openrouter_api_key", "sk-or-test"),
            ("llm_provider", "carrier-pigeon"),
        ])?);
        assert!(matches!(result, Err(ConfigError::Message(_))));
        Ok(())
    }

    #[test]
    fn test_numeric_overrides_from_strings() -> Result<(), ConfigError> {
        let settings = RelaySettings::from_config(source(&[
            ("openrouter_api_key", "sk-or-test"),
            ("max_prompt_tokens", "2048"),
            ("llm_http_timeout_secs", "15"),
        ])?)?;
        assert_eq!(settings.max_prompt_tokens, 2048);
        assert_eq!(settings.llm_http_timeout_secs, 15);
        Ok(())
    }

    #[test]
    fn test_debug_masks_api_key() -> Result<(), ConfigError> {
        let settings =
            RelaySettings::from_config(source(&[("openrouter_api_key", "sk-or-v1-secret")])?)?;
        let debug = format!("{settings:?}");
        assert!(!debug.contains("sk-or-v1-secret"));
        assert!(debug.contains("[MASKED]"));
        assert!(debug.contains(DEFAULT_CHAT_MODEL_ID));
        Ok(())
    }
}
