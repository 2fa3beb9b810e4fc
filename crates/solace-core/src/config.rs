use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, SolaceError};

/// Environment variable holding the Google API credential.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Top-level configuration for the Solace backend.
///
/// Loaded from `solace.toml` by default. The provider credential is never
/// part of the file; it comes from the environment (see [`api_key_from_env`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolaceConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl SolaceConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SolaceConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let llm = &self.llm;
        if !(0.0..=2.0).contains(&llm.temperature) {
            return Err(SolaceError::Config(format!(
                "llm.temperature must be within 0.0..=2.0, got {}",
                llm.temperature
            )));
        }
        if !(0.0..=1.0).contains(&llm.top_p) {
            return Err(SolaceError::Config(format!(
                "llm.top_p must be within 0.0..=1.0, got {}",
                llm.top_p
            )));
        }
        if llm.max_output_tokens == 0 {
            return Err(SolaceError::Config(
                "llm.max_output_tokens must be greater than 0".to_string(),
            ));
        }
        if llm.timeout_secs == 0 || self.speech.timeout_secs == 0 {
            return Err(SolaceError::Config(
                "provider timeouts must be greater than 0".to_string(),
            ));
        }
        if self.chat.default_session.trim().is_empty() {
            return Err(SolaceError::Config(
                "chat.default_session must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Read the provider credential from the environment.
///
/// Startup must abort when this fails.
pub fn api_key_from_env() -> Result<String> {
    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(SolaceError::MissingEnv(API_KEY_ENV.to_string())),
    }
}

/// Server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Bind address.
    pub host: String,
    /// HTTP port.
    pub port: u16,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
        }
    }
}

/// Hosted language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    /// API root, without the `/models/...` suffix.
    pub base_url: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash-latest".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            temperature: 0.8,
            top_p: 0.9,
            max_output_tokens: 250,
            timeout_secs: 30,
        }
    }
}

/// Hosted speech recognition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub base_url: String,
    /// BCP-47 language code sent with every request.
    pub language_code: String,
    pub timeout_secs: u64,
    /// Largest accepted upload for `/speech-to-text`.
    pub max_upload_bytes: usize,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: "https://speech.googleapis.com/v1".to_string(),
            language_code: "en-US".to_string(),
            timeout_secs: 30,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Conversation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Session used when a request carries no `session_id`.
    pub default_session: String,
    /// Most recent history turns replayed to the model. `None` replays all.
    pub context_turns: Option<usize>,
    /// Upper bound on a single message, in characters. `None` is unbounded.
    pub max_message_chars: Option<usize>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_session: "default".to_string(),
            context_turns: None,
            max_message_chars: None,
        }
    }
}
