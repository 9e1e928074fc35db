//! Video synthesis providers.
//!
//! Each provider wraps one remote image/text-to-video back end. The
//! capability envelope and pricing table are pure data on the provider;
//! `validate` checks parameters against the envelope without touching
//! the network, and `generate` re-validates before issuing the one
//! remote call.

mod hailuo2;
mod seedance;
mod veo3_fast;

pub use hailuo2::Hailuo2;
pub use seedance::SeedanceProFast;
pub use veo3_fast::Veo3Fast;

use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::Value;

use adreel_models::VideoProviderKind;

use crate::error::{SynthesisError, SynthesisResult};
use crate::replicate::ReplicateClient;

/// Parameters for one video synthesis call.
#[derive(Debug, Clone)]
pub struct VideoGenerationParams {
    pub prompt: String,
    /// Seconds
    pub duration: u32,
    pub aspect_ratio: String,
    pub resolution: String,
    /// Source image as a data URL; when present the back end derives the
    /// output aspect ratio from the image
    pub image: Option<String>,
}

/// Outcome of an envelope check.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Supported durations: a discrete set, or one true integer range.
#[derive(Debug, Clone, Copy)]
pub enum DurationSupport {
    Discrete(&'static [u32]),
    Range { min: u32, max: u32 },
}

impl DurationSupport {
    pub fn contains(&self, duration: u32) -> bool {
        match self {
            DurationSupport::Discrete(values) => values.contains(&duration),
            DurationSupport::Range { min, max } => (*min..=*max).contains(&duration),
        }
    }

    fn violation(&self, duration: u32) -> String {
        match self {
            DurationSupport::Discrete(values) => {
                let list = values
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Duration must be one of: {list} seconds (got {duration})")
            }
            DurationSupport::Range { min, max } => {
                format!("Duration must be between {min} and {max} seconds (got {duration})")
            }
        }
    }
}

/// What duration/aspect/resolution combinations a back end accepts.
#[derive(Debug, Clone)]
pub struct CapabilityEnvelope {
    pub durations: DurationSupport,
    pub aspect_ratios: &'static [&'static str],
    pub resolutions: &'static [&'static str],
}

impl CapabilityEnvelope {
    /// Envelope checks shared by every provider; cross-field rules are
    /// layered on by the provider's own `validate`.
    fn violations(&self, params: &VideoGenerationParams) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.durations.contains(params.duration) {
            errors.push(self.durations.violation(params.duration));
        }

        if !self.aspect_ratios.contains(&params.aspect_ratio.as_str()) {
            errors.push(format!(
                "Aspect ratio must be one of: {}",
                self.aspect_ratios.join(", ")
            ));
        }

        if !self.resolutions.contains(&params.resolution.as_str()) {
            errors.push(format!(
                "Resolution must be one of: {}",
                self.resolutions.join(", ")
            ));
        }

        errors
    }
}

/// Pricing/quality tier, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderTier {
    Premium,
    Budget,
    UltraBudget,
}

impl ProviderTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderTier::Premium => "premium",
            ProviderTier::Budget => "budget",
            ProviderTier::UltraBudget => "ultra-budget",
        }
    }
}

/// A remote image/text-to-video back end.
#[async_trait]
pub trait VideoSynthesis: Send + Sync {
    fn name(&self) -> &'static str;
    fn model_id(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn tier(&self) -> ProviderTier;
    fn capabilities(&self) -> &CapabilityEnvelope;

    /// Check parameters against the capability envelope. Never touches
    /// the network and never fails; violations come back as a list.
    fn validate(&self, params: &VideoGenerationParams) -> ValidationResult;

    /// Issue the remote call and return the asset locator. Re-validates
    /// first and fails fast with the aggregated violation message.
    async fn generate(&self, params: &VideoGenerationParams) -> SynthesisResult<String>;

    /// Static latency hint in seconds, not a measurement.
    fn estimate_generation_time(&self, duration: u32) -> u64;

    /// USD for one video at the given duration and resolution.
    fn cost_per_video(&self, duration: u32, resolution: &str) -> f64;
}

/// Resolve a provider for the given kind.
pub fn video_provider(
    kind: VideoProviderKind,
    client: Arc<ReplicateClient>,
) -> Box<dyn VideoSynthesis> {
    match kind {
        VideoProviderKind::Veo3Fast => Box::new(Veo3Fast::new(client)),
        VideoProviderKind::Hailuo2 => Box::new(Hailuo2::new(client)),
        VideoProviderKind::SeedanceProFast => Box::new(SeedanceProFast::new(client)),
    }
}

/// Encode an image for the wire; the back ends accept data URLs.
pub fn image_data_url(bytes: &[u8]) -> String {
    // PNG magic: 0x89 'P' 'N' 'G'
    let mime = if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        "image/png"
    } else {
        "image/jpeg"
    };
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

/// Check the remote output is the expected single string locator.
pub(crate) fn expect_locator(output: Value, provider_name: &str) -> SynthesisResult<String> {
    match output {
        Value::String(locator) => Ok(locator),
        other => Err(SynthesisError::UnexpectedResponse(format!(
            "Unexpected output format from {provider_name}: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_support() {
        let discrete = DurationSupport::Discrete(&[4, 6, 8]);
        assert!(discrete.contains(6));
        assert!(!discrete.contains(5));

        let range = DurationSupport::Range { min: 2, max: 12 };
        assert!(range.contains(2));
        assert!(range.contains(12));
        assert!(!range.contains(13));
    }

    #[test]
    fn test_image_data_url_detects_png() {
        let url = image_data_url(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]);
        assert!(url.starts_with("data:image/png;base64,"));

        let url = image_data_url(&[0xFF, 0xD8, 0xFF]);
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_factory_resolves_each_kind() {
        let config = crate::config::SynthesisConfig {
            replicate_api_token: "test-token".to_string(),
            ..crate::config::SynthesisConfig::default()
        };
        let client = Arc::new(ReplicateClient::new(&config).unwrap());

        let veo = video_provider(VideoProviderKind::Veo3Fast, client.clone());
        assert_eq!(veo.model_id(), "google/veo-3-fast");
        assert_eq!(veo.tier(), ProviderTier::Premium);
        assert_eq!(veo.estimate_generation_time(6), 90);

        let hailuo = video_provider(VideoProviderKind::Hailuo2, client.clone());
        assert_eq!(hailuo.model_id(), "minimax/hailuo-02");
        assert_eq!(hailuo.estimate_generation_time(6), 75);

        let seedance = video_provider(VideoProviderKind::SeedanceProFast, client);
        assert_eq!(seedance.model_id(), "bytedance/seedance-1-pro-fast");
        assert_eq!(seedance.estimate_generation_time(6), 60);
    }

    #[test]
    fn test_expect_locator_rejects_non_string_output() {
        let result = expect_locator(serde_json::json!(["a.mp4", "b.mp4"]), "Test");
        assert!(matches!(result, Err(SynthesisError::UnexpectedResponse(_))));

        let locator = expect_locator(serde_json::json!("a.mp4"), "Test").unwrap();
        assert_eq!(locator, "a.mp4");
    }
}
