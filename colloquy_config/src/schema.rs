use std::path::PathBuf;
use std::time::Duration;

use colloquy_conversation::ConversationConfig;
use colloquy_extraction::{DEFAULT_CONFIDENCE_FLOOR, ExtractionConfig};
use colloquy_providers::{DEFAULT_BASE_URL, DEFAULT_MODEL, RetryPolicy};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const API_KEY_ENV: &str = "GROQ_API_KEY";

const CONFIG_DIR: &str = "colloquy";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    pub provider: ProviderSection,
    // Reuse ConversationConfig from colloquy_conversation to avoid duplication
    #[serde(default)]
    pub conversation: ConversationConfig,
    #[serde(default)]
    pub extraction: ExtractionSection,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderSection {
    pub api_key: String,
    #[serde(default = "ProviderSection::default_base_url")]
    pub base_url: String,
    #[serde(default = "ProviderSection::default_model")]
    pub model: String,
    #[serde(default = "ProviderSection::default_temperature")]
    pub temperature: f32,
    #[serde(default = "ProviderSection::default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "ProviderSection::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "ProviderSection::default_max_retries")]
    pub max_retries: usize,
}

impl ProviderSection {
    fn default_base_url() -> String {
        DEFAULT_BASE_URL.to_string()
    }

    fn default_model() -> String {
        DEFAULT_MODEL.to_string()
    }

    const fn default_temperature() -> f32 {
        0.7
    }

    const fn default_max_tokens() -> u32 {
        1000
    }

    const fn default_timeout_secs() -> u64 {
        60
    }

    const fn default_max_retries() -> usize {
        3
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Backoff policy with the configured retry count.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            ..RetryPolicy::default()
        }
    }

    /// The key with all but its first 8 and last 4 characters hidden.
    #[must_use]
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() > 12 {
            let head: String = chars[..8].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{head}...{tail}")
        } else {
            "***".to_string()
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ExtractionSection {
    #[serde(default = "ExtractionSection::default_confidence_floor")]
    pub confidence_floor: f64,
}

impl Default for ExtractionSection {
    fn default() -> Self {
        Self {
            confidence_floor: Self::default_confidence_floor(),
        }
    }
}

impl ExtractionSection {
    const fn default_confidence_floor() -> f64 {
        DEFAULT_CONFIDENCE_FLOOR
    }
}

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load `~/colloquy/config.json`, letting `GROQ_API_KEY` override the key.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'colloquy init' to create config.",
                config_path.display()
            );
        }

        let content = std::fs::read_to_string(&config_path)?;
        let mut config = Self::from_json(&content)?;
        config.apply_env_key(std::env::var(API_KEY_ENV).ok());

        debug!("Loaded config from {}", config_path.display());
        Ok(config)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Invalid config file: {e}"))
    }

    /// Replace the file key with a non-blank value taken from the environment.
    pub fn apply_env_key(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            debug!("Using API key from {API_KEY_ENV}");
            self.provider.api_key = key;
        }
    }

    #[must_use]
    pub fn conversation_config(&self) -> ConversationConfig {
        self.conversation.clone()
    }

    #[must_use]
    pub fn extraction_config(&self) -> ExtractionConfig {
        ExtractionConfig::default().with_confidence_floor(self.extraction.confidence_floor)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<PathBuf> {
        let config_path = Self::ensure_config_dir()?.join(CONFIG_FILE);

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, CONFIG_TEMPLATE)?;
        Ok(config_path)
    }
}

pub(crate) const CONFIG_TEMPLATE: &str = r#"{
  "provider": {
    "api_key": "your-groq-api-key-here",
    "base_url": "https://api.groq.com/openai/v1",
    "model": "llama-3.1-8b-instant",
    "temperature": 0.7,
    "max_tokens": 1000,
    "timeout_secs": 60,
    "max_retries": 3
  },
  "conversation": {
    "summarization_threshold": 5,
    "preserve_recent": 0,
    "system_prompt": "You are a helpful AI assistant.",
    "summary_max_chars": 1000
  },
  "extraction": {
    "confidence_floor": 0.5
  }
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_minimal_config_uses_defaults() {
        let config = Config::from_json(r#"{"provider": {"api_key": "gsk_abc"}}"#)
            .expect("minimal config parses");

        assert_eq!(config.provider.api_key, "gsk_abc");
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.provider.model, DEFAULT_MODEL);
        assert_eq!(config.provider.max_retries, 3);
        assert_eq!(config.provider.timeout(), Duration::from_secs(60));
        assert_eq!(config.conversation, ConversationConfig::default());
        assert!((config.extraction.confidence_floor - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_template_round_trips_to_defaults() {
        let config = Config::from_json(CONFIG_TEMPLATE).expect("template parses");

        assert_eq!(config.conversation, ConversationConfig::default());
        assert_eq!(config.provider.retry_policy(), RetryPolicy::default());
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_partial_sections() {
        let config = Config::from_json(
            r#"{
                "provider": {"api_key": "k", "max_retries": 0},
                "conversation": {"summarization_threshold": 3, "preserve_recent": 2},
                "extraction": {"confidence_floor": 0.8}
            }"#,
        )
        .expect("config parses");

        let conversation = config.conversation_config();
        assert_eq!(conversation.summarization_threshold, 3);
        assert_eq!(conversation.preserve_recent, 2);
        assert_eq!(
            conversation.system_prompt,
            ConversationConfig::default().system_prompt
        );
        assert_eq!(config.provider.retry_policy().max_retries, 0);
        assert!((config.extraction_config().confidence_floor - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        assert!(Config::from_json(r#"{"provider": {}}"#).is_err());
        assert!(Config::from_json("not json").is_err());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_env_key_override() {
        let mut config =
            Config::from_json(r#"{"provider": {"api_key": "from-file"}}"#).expect("parses");

        config.apply_env_key(Some("   ".to_string()));
        assert_eq!(config.provider.api_key, "from-file");

        config.apply_env_key(None);
        assert_eq!(config.provider.api_key, "from-file");

        config.apply_env_key(Some("gsk_from_env".to_string()));
        assert_eq!(config.provider.api_key, "gsk_from_env");
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_masked_api_key() {
        let mut config =
            Config::from_json(r#"{"provider": {"api_key": "gsk_1234567890abcd"}}"#)
                .expect("parses");
        assert_eq!(config.provider.masked_api_key(), "gsk_1234...abcd");

        config.provider.api_key = "short".to_string();
        assert_eq!(config.provider.masked_api_key(), "***");
    }
}
