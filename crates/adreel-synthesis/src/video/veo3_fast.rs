//! Premium tier: Google Veo 3 Fast.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::error::{SynthesisError, SynthesisResult};
use crate::replicate::ReplicateClient;

use super::{
    expect_locator, CapabilityEnvelope, DurationSupport, ProviderTier, ValidationResult,
    VideoGenerationParams, VideoSynthesis,
};

const ENVELOPE: CapabilityEnvelope = CapabilityEnvelope {
    durations: DurationSupport::Discrete(&[4, 6, 8]),
    // Veo 3 only supports these two
    aspect_ratios: &["16:9", "9:16"],
    resolutions: &["720p", "1080p"],
};

/// Without ambient audio; the voiceover is produced separately.
const COST_PER_SECOND: f64 = 0.10;

pub struct Veo3Fast {
    client: Arc<ReplicateClient>,
}

impl Veo3Fast {
    pub fn new(client: Arc<ReplicateClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VideoSynthesis for Veo3Fast {
    fn name(&self) -> &'static str {
        "Google Veo 3 Fast"
    }

    fn model_id(&self) -> &'static str {
        "google/veo-3-fast"
    }

    fn description(&self) -> &'static str {
        "Premium quality, cinematic video generation with fast processing"
    }

    fn tier(&self) -> ProviderTier {
        ProviderTier::Premium
    }

    fn capabilities(&self) -> &CapabilityEnvelope {
        &ENVELOPE
    }

    fn validate(&self, params: &VideoGenerationParams) -> ValidationResult {
        ValidationResult {
            errors: ENVELOPE.violations(params),
        }
    }

    async fn generate(&self, params: &VideoGenerationParams) -> SynthesisResult<String> {
        let validation = self.validate(params);
        if !validation.is_valid() {
            return Err(SynthesisError::invalid_params(&validation.errors));
        }

        let mut input = json!({
            "prompt": params.prompt,
            "duration": params.duration,
            "resolution": params.resolution,
            // Ambient audio off; the voiceover track is merged later
            "generate_audio": false,
        });

        // With a source image the back end derives the aspect ratio from
        // the image itself
        if params.image.is_none() {
            input["aspect_ratio"] = json!(params.aspect_ratio);
        }
        if let Some(image) = &params.image {
            input["image"] = json!(image);
        }

        let output = self.client.run(self.model_id(), input).await?;
        expect_locator(output, self.name())
    }

    fn estimate_generation_time(&self, _duration: u32) -> u64 {
        // Typically 60-120 seconds
        90
    }

    fn cost_per_video(&self, duration: u32, _resolution: &str) -> f64 {
        f64::from(duration) * COST_PER_SECOND
    }
}
