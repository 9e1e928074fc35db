//! Synthesis back-end configuration.

use std::time::Duration;

/// Credentials and endpoints for the remote synthesis services.
///
/// Clients are constructed once per process from this config and passed
/// to the providers explicitly; there is no lazily-initialized global
/// state.
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    pub replicate_api_token: String,
    pub replicate_base_url: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub elevenlabs_api_key: String,
    pub elevenlabs_base_url: String,
    /// Delay between prediction status polls
    pub poll_interval: Duration,
    /// Upper bound on a single video synthesis, polling included
    pub generation_timeout: Duration,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            replicate_api_token: String::new(),
            replicate_base_url: "https://api.replicate.com".to_string(),
            openai_api_key: String::new(),
            openai_base_url: "https://api.openai.com".to_string(),
            elevenlabs_api_key: String::new(),
            elevenlabs_base_url: "https://api.elevenlabs.io".to_string(),
            poll_interval: Duration::from_secs(2),
            generation_timeout: Duration::from_secs(600),
        }
    }
}

impl SynthesisConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            replicate_api_token: std::env::var("REPLICATE_API_TOKEN").unwrap_or_default(),
            replicate_base_url: std::env::var("REPLICATE_BASE_URL")
                .unwrap_or(defaults.replicate_base_url),
            openai_api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_base_url: std::env::var("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            elevenlabs_api_key: std::env::var("ELEVENLABS_API_KEY").unwrap_or_default(),
            elevenlabs_base_url: std::env::var("ELEVENLABS_BASE_URL")
                .unwrap_or(defaults.elevenlabs_base_url),
            poll_interval: Duration::from_secs(
                std::env::var("REPLICATE_POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(2),
            ),
            generation_timeout: Duration::from_secs(
                std::env::var("VIDEO_GENERATION_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(600),
            ),
        }
    }
}
