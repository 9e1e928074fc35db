//! OpenAI text-to-speech provider.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use adreel_models::VoiceProviderKind;

use crate::config::SynthesisConfig;
use crate::error::{SynthesisError, SynthesisResult};

use super::{Voice, VoiceSynthesis};

/// $ per 1,000 characters.
const COST_PER_1K_CHARS: f64 = 0.015;

const VOICES: &[Voice] = &[
    Voice {
        id: "alloy",
        display_name: "Alloy",
        gender: "neutral",
        description: "Balanced, versatile voice",
    },
    Voice {
        id: "echo",
        display_name: "Echo",
        gender: "male",
        description: "Clear, professional tone",
    },
    Voice {
        id: "fable",
        display_name: "Fable",
        gender: "neutral",
        description: "Expressive, storytelling quality",
    },
    Voice {
        id: "onyx",
        display_name: "Onyx",
        gender: "male",
        description: "Deep, authoritative voice",
    },
    Voice {
        id: "nova",
        display_name: "Nova",
        gender: "female",
        description: "Bright, energetic tone",
    },
    Voice {
        id: "shimmer",
        display_name: "Shimmer",
        gender: "female",
        description: "Warm, friendly voice",
    },
];

pub struct OpenAiTts {
    http: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiTts {
    pub fn new(config: &SynthesisConfig) -> SynthesisResult<Self> {
        if config.openai_api_key.is_empty() {
            return Err(SynthesisError::MissingCredentials(
                "OPENAI_API_KEY not set".to_string(),
            ));
        }

        Ok(Self {
            http: Client::new(),
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl VoiceSynthesis for OpenAiTts {
    fn name(&self) -> &'static str {
        "OpenAI TTS"
    }

    fn kind(&self) -> VoiceProviderKind {
        VoiceProviderKind::Openai
    }

    fn available_voices(&self) -> Vec<Voice> {
        VOICES.to_vec()
    }

    fn validate_voice(&self, voice: &str) -> bool {
        VOICES.iter().any(|v| v.id == voice)
    }

    async fn generate(&self, text: &str, voice: &str) -> SynthesisResult<Vec<u8>> {
        if !self.validate_voice(voice) {
            let available = VOICES.iter().map(|v| v.id).collect::<Vec<_>>().join(", ");
            return Err(SynthesisError::InvalidVoice(format!(
                "{voice}. Must be one of: {available}"
            )));
        }

        debug!(voice, chars = text.len(), "Synthesizing voiceover");

        let url = format!("{}/v1/audio/speech", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": "tts-1",
                "voice": voice,
                "input": text,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::request_failed(format!(
                "TTS returned {status}: {body}"
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn cost(&self, text: &str) -> f64 {
        (text.len() as f64 / 1000.0) * COST_PER_1K_CHARS
    }
}
