//! Runtime Configuration
//!
//! Settings for the detection pipeline: provider credentials, model
//! selection, and cycle tuning. Credentials are required at startup;
//! a missing key is fatal, never a per-call failure.

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors (fatal at startup)
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(String),

    #[error("Invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Gemini API key
    pub gemini_api_key: String,

    /// OpenAI API key
    pub openai_api_key: String,

    /// Gemini model name (default: "gemini-2.5-flash")
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// OpenAI model name (default: "gpt-4o-mini")
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Gemini API base URL
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    /// OpenAI API base URL
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// Run both providers and merge verdicts for high-urgency claims
    #[serde(default = "default_enable_consensus")]
    pub enable_consensus_mode: bool,

    /// Urgency above which consensus mode engages (default: 0.6)
    #[serde(default = "default_consensus_urgency_threshold")]
    pub consensus_urgency_threshold: f64,

    /// Seconds between monitoring cycles (default: 300)
    #[serde(default = "default_monitoring_interval_secs")]
    pub monitoring_interval_secs: u64,

    /// Maximum content items processed per cycle (default: 50)
    #[serde(default = "default_max_claims_per_cycle")]
    pub max_claims_per_cycle: usize,
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_enable_consensus() -> bool {
    true
}

fn default_consensus_urgency_threshold() -> f64 {
    0.6
}

fn default_monitoring_interval_secs() -> u64 {
    300
}

fn default_max_claims_per_cycle() -> usize {
    50
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// `DEEPCHECK_GEMINI_API_KEY` and `DEEPCHECK_OPENAI_API_KEY` are
    /// required; everything else falls back to defaults.
    pub fn from_env() -> ConfigResult<Self> {
        let gemini_api_key = require_env("DEEPCHECK_GEMINI_API_KEY")?;
        let openai_api_key = require_env("DEEPCHECK_OPENAI_API_KEY")?;

        let mut settings = Self::with_keys(gemini_api_key, openai_api_key);

        if let Ok(model) = env::var("DEEPCHECK_GEMINI_MODEL") {
            settings.gemini_model = model;
        }
        if let Ok(model) = env::var("DEEPCHECK_OPENAI_MODEL") {
            settings.openai_model = model;
        }
        if let Ok(url) = env::var("DEEPCHECK_GEMINI_BASE_URL") {
            settings.gemini_base_url = url;
        }
        if let Ok(url) = env::var("DEEPCHECK_OPENAI_BASE_URL") {
            settings.openai_base_url = url;
        }
        if let Ok(value) = env::var("DEEPCHECK_ENABLE_CONSENSUS") {
            settings.enable_consensus_mode = parse_env("DEEPCHECK_ENABLE_CONSENSUS", &value)?;
        }
        if let Ok(value) = env::var("DEEPCHECK_CONSENSUS_URGENCY_THRESHOLD") {
            let threshold: f64 = parse_env("DEEPCHECK_CONSENSUS_URGENCY_THRESHOLD", &value)?;
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::Invalid(
                    "DEEPCHECK_CONSENSUS_URGENCY_THRESHOLD".to_string(),
                    format!("{} is outside [0, 1]", threshold),
                ));
            }
            settings.consensus_urgency_threshold = threshold;
        }
        if let Ok(value) = env::var("DEEPCHECK_MONITORING_INTERVAL_SECS") {
            settings.monitoring_interval_secs =
                parse_env("DEEPCHECK_MONITORING_INTERVAL_SECS", &value)?;
        }
        if let Ok(value) = env::var("DEEPCHECK_MAX_CLAIMS_PER_CYCLE") {
            settings.max_claims_per_cycle = parse_env("DEEPCHECK_MAX_CLAIMS_PER_CYCLE", &value)?;
        }

        Ok(settings)
    }

    /// Build settings with the given credentials and defaults elsewhere
    pub fn with_keys(gemini_api_key: impl Into<String>, openai_api_key: impl Into<String>) -> Self {
        Self {
            gemini_api_key: gemini_api_key.into(),
            openai_api_key: openai_api_key.into(),
            gemini_model: default_gemini_model(),
            openai_model: default_openai_model(),
            gemini_base_url: default_gemini_base_url(),
            openai_base_url: default_openai_base_url(),
            enable_consensus_mode: default_enable_consensus(),
            consensus_urgency_threshold: default_consensus_urgency_threshold(),
            monitoring_interval_secs: default_monitoring_interval_secs(),
            max_claims_per_cycle: default_max_claims_per_cycle(),
        }
    }
}

fn require_env(name: &str) -> ConfigResult<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name.to_string())),
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> ConfigResult<T> {
    value
        .parse()
        .map_err(|_| ConfigError::Invalid(name.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::with_keys("g", "o");
        assert_eq!(settings.gemini_model, "gemini-2.5-flash");
        assert_eq!(settings.openai_model, "gpt-4o-mini");
        assert!(settings.enable_consensus_mode);
        assert_eq!(settings.consensus_urgency_threshold, 0.6);
        assert_eq!(settings.max_claims_per_cycle, 50);
    }

    #[test]
    fn test_missing_key_is_fatal() {
        std::env::remove_var("DEEPCHECK_GEMINI_API_KEY");
        std::env::remove_var("DEEPCHECK_OPENAI_API_KEY");
        let err = Settings::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }
}
