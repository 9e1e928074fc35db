//! ElevenLabs text-to-speech provider.
//!
//! Abstract voice identifiers are mapped to provider voice tokens via a
//! static table; the table is the validation source of truth.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use adreel_models::VoiceProviderKind;

use crate::config::SynthesisConfig;
use crate::error::{SynthesisError, SynthesisResult};

use super::{Voice, VoiceSynthesis};

/// $ per 1,000 characters.
const COST_PER_1K_CHARS: f64 = 0.30;

/// Abstract id -> provider voice token.
const VOICE_TOKENS: &[(&str, &str)] = &[
    // Indian English voices
    ("preethi", "flq6f7yk4E4fJM5XTYuZ"),
    ("prabhat", "IKne3meq5aSn9XLyUdCD"),
    // Multilingual voices that work well for Indian English
    ("adam", "21m00Tcm4TlvDq8ikWAM"),
    ("bella", "EXAVITQu4vr4xnSDxMaL"),
    ("rachel", "nPczCjzI2devNBz1zQrb"),
    ("antoni", "ErXwobaYiN019PkySvjV"),
];

const VOICES: &[Voice] = &[
    Voice {
        id: "preethi",
        display_name: "Preethi",
        gender: "female",
        description: "Indian English - Warm, professional",
    },
    Voice {
        id: "prabhat",
        display_name: "Prabhat",
        gender: "male",
        description: "Indian English - Clear, authoritative",
    },
    Voice {
        id: "bella",
        display_name: "Bella",
        gender: "female",
        description: "International - Soft, friendly",
    },
    Voice {
        id: "rachel",
        display_name: "Rachel",
        gender: "female",
        description: "International - Warm, engaging",
    },
    Voice {
        id: "adam",
        display_name: "Adam",
        gender: "male",
        description: "International - Deep, professional",
    },
    Voice {
        id: "antoni",
        display_name: "Antoni",
        gender: "male",
        description: "International - Clear, articulate",
    },
];

pub struct ElevenLabs {
    http: Client,
    api_key: String,
    base_url: String,
}

impl ElevenLabs {
    pub fn new(config: &SynthesisConfig) -> SynthesisResult<Self> {
        if config.elevenlabs_api_key.is_empty() {
            return Err(SynthesisError::MissingCredentials(
                "ELEVENLABS_API_KEY not set".to_string(),
            ));
        }

        Ok(Self {
            http: Client::new(),
            api_key: config.elevenlabs_api_key.clone(),
            base_url: config.elevenlabs_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn voice_token(voice: &str) -> Option<&'static str> {
        VOICE_TOKENS
            .iter()
            .find(|(id, _)| *id == voice)
            .map(|(_, token)| *token)
    }
}

#[async_trait]
impl VoiceSynthesis for ElevenLabs {
    fn name(&self) -> &'static str {
        "ElevenLabs"
    }

    fn kind(&self) -> VoiceProviderKind {
        VoiceProviderKind::Elevenlabs
    }

    fn available_voices(&self) -> Vec<Voice> {
        VOICES.to_vec()
    }

    fn validate_voice(&self, voice: &str) -> bool {
        Self::voice_token(voice).is_some()
    }

    async fn generate(&self, text: &str, voice: &str) -> SynthesisResult<Vec<u8>> {
        let token = Self::voice_token(voice)
            .ok_or_else(|| SynthesisError::InvalidVoice(voice.to_string()))?;

        debug!(voice, chars = text.len(), "Synthesizing voiceover");

        let url = format!("{}/v1/text-to-speech/{}", self.base_url, token);
        let response = self
            .http
            .post(&url)
            .header("Accept", "audio/mpeg")
            .header("xi-api-key", &self.api_key)
            .json(&json!({
                "text": text,
                "model_id": "eleven_multilingual_v2",
                "voice_settings": {
                    "stability": 0.5,
                    "similarity_boost": 0.75,
                    "style": 0.0,
                    "use_speaker_boost": true,
                },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::request_failed(format!(
                "ElevenLabs API error: {status} - {body}"
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn cost(&self, text: &str) -> f64 {
        (text.len() as f64 / 1000.0) * COST_PER_1K_CHARS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(base_url: String) -> ElevenLabs {
        ElevenLabs::new(&SynthesisConfig {
            elevenlabs_api_key: "el-test".to_string(),
            elevenlabs_base_url: base_url,
            ..SynthesisConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_every_listed_voice_has_a_token() {
        let provider = provider("http://localhost".to_string());
        for voice in provider.available_voices() {
            assert!(provider.validate_voice(voice.id));
        }
        assert!(!provider.validate_voice("nova"));
    }

    #[test]
    fn test_per_character_cost() {
        let provider = provider("http://localhost".to_string());
        let text = "a".repeat(1000);
        assert!((provider.cost(&text) - 0.30).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_generate_uses_mapped_voice_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/text-to-speech/flq6f7yk4E4fJM5XTYuZ"))
            .and(header("xi-api-key", "el-test"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp3-bytes".to_vec()))
            .mount(&server)
            .await;

        let provider = provider(server.uri());
        let audio = provider.generate("Namaste.", "preethi").await.unwrap();
        assert_eq!(audio, b"mp3-bytes");
    }

    #[tokio::test]
    async fn test_missing_key_rejected_at_construction() {
        let result = ElevenLabs::new(&SynthesisConfig::default());
        assert!(matches!(result, Err(SynthesisError::MissingCredentials(_))));
    }
}
