//! Budget tier: Hailuo 2.

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
    durations: DurationSupport::Discrete(&[6, 10]),
    aspect_ratios: &["16:9", "9:16", "1:1"],
    resolutions: &["512p", "768p", "1080p"],
};

/// Per-second USD rate per resolution; unknown resolutions price as 768p.
fn rate(resolution: &str) -> f64 {
    match resolution {
        "512p" => 0.025,
        "768p" => 0.045,
        "1080p" => 0.08,
        _ => 0.045,
    }
}

pub struct Hailuo2 {
    client: Arc<ReplicateClient>,
}

impl Hailuo2 {
    pub fn new(client: Arc<ReplicateClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VideoSynthesis for Hailuo2 {
    fn name(&self) -> &'static str {
        "Hailuo 2"
    }

    fn model_id(&self) -> &'static str {
        "minimax/hailuo-02"
    }

    fn description(&self) -> &'static str {
        "Budget-friendly video generation with realistic physics"
    }

    fn tier(&self) -> ProviderTier {
        ProviderTier::Budget
    }

    fn capabilities(&self) -> &CapabilityEnvelope {
        &ENVELOPE
    }

    fn validate(&self, params: &VideoGenerationParams) -> ValidationResult {
        let mut errors = ENVELOPE.violations(params);

        // Cross-field rule: 10s is only available at 512p and 768p
        if params.duration == 10 && params.resolution == "1080p" {
            errors.push(
                "10-second videos are only available at 512p and 768p resolutions \
                 (1080p not supported for 10s)"
                    .to_string(),
            );
        }

        ValidationResult { errors }
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
        });

        // This back end takes the source image as `first_frame_image`
        // and never takes an aspect-ratio field
        if let Some(image) = &params.image {
            input["first_frame_image"] = json!(image);
        }

        let output = self.client.run(self.model_id(), input).await?;
        expect_locator(output, self.name())
    }

    fn estimate_generation_time(&self, _duration: u32) -> u64 {
        // Typically 60-90 seconds
        75
    }

    fn cost_per_video(&self, duration: u32, resolution: &str) -> f64 {
        f64::from(duration) * rate(resolution)
    }
}
