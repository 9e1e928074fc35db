//! Voice synthesis providers.

mod elevenlabs;
mod openai_tts;

pub use elevenlabs::ElevenLabs;
pub use openai_tts::OpenAiTts;

use async_trait::async_trait;

use adreel_models::VoiceProviderKind;

use crate::config::SynthesisConfig;
use crate::error::SynthesisResult;

/// A voice offered by a provider.
#[derive(Debug, Clone)]
pub struct Voice {
    pub id: &'static str,
    pub display_name: &'static str,
    pub gender: &'static str,
    pub description: &'static str,
}

/// A remote text-to-speech back end.
#[async_trait]
pub trait VoiceSynthesis: Send + Sync {
    fn name(&self) -> &'static str;
    fn kind(&self) -> VoiceProviderKind;

    fn available_voices(&self) -> Vec<Voice>;

    /// True exactly for identifiers in this provider's own table.
    fn validate_voice(&self, voice: &str) -> bool;

    /// Synthesize raw audio bytes. An invalid voice fails before any
    /// remote call is attempted.
    async fn generate(&self, text: &str, voice: &str) -> SynthesisResult<Vec<u8>>;

    /// USD for synthesizing `text`, from the provider's per-character rate.
    fn cost(&self, text: &str) -> f64;
}

/// Resolve a provider for the given kind.
pub fn voice_provider(
    kind: VoiceProviderKind,
    config: &SynthesisConfig,
) -> SynthesisResult<Box<dyn VoiceSynthesis>> {
    match kind {
        VoiceProviderKind::Openai => Ok(Box::new(OpenAiTts::new(config)?)),
        VoiceProviderKind::Elevenlabs => Ok(Box::new(ElevenLabs::new(config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SynthesisConfig {
        SynthesisConfig {
            openai_api_key: "sk-test".to_string(),
            elevenlabs_api_key: "el-test".to_string(),
            ..SynthesisConfig::default()
        }
    }

    #[test]
    fn test_factory_resolves_each_kind() {
        let config = test_config();
        let openai = voice_provider(VoiceProviderKind::Openai, &config).unwrap();
        assert_eq!(openai.kind(), VoiceProviderKind::Openai);

        let eleven = voice_provider(VoiceProviderKind::Elevenlabs, &config).unwrap();
        assert_eq!(eleven.kind(), VoiceProviderKind::Elevenlabs);
    }

    #[test]
    fn test_voice_tables_do_not_cross_validate() {
        let config = test_config();
        let openai = voice_provider(VoiceProviderKind::Openai, &config).unwrap();
        let eleven = voice_provider(VoiceProviderKind::Elevenlabs, &config).unwrap();

        // Valid only for its own provider
        assert!(openai.validate_voice("nova"));
        assert!(!eleven.validate_voice("nova"));

        assert!(eleven.validate_voice("preethi"));
        assert!(!openai.validate_voice("preethi"));

        assert!(!openai.validate_voice("does-not-exist"));
        assert!(!eleven.validate_voice("does-not-exist"));
    }
}
