//! Ultra-budget tier: Seedance 1 Pro Fast.

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
    // The one true integer range in the provider set
    durations: DurationSupport::Range { min: 2, max: 12 },
    aspect_ratios: &["16:9", "9:16", "1:1"],
    resolutions: &["480p", "720p", "1080p"],
};

/// Per-second USD rate per resolution; unknown resolutions price as 720p.
fn rate(resolution: &str) -> f64 {
    match resolution {
        "480p" => 0.015,
        "720p" => 0.025,
        "1080p" => 0.06,
        _ => 0.025,
    }
}

pub struct SeedanceProFast {
    client: Arc<ReplicateClient>,
}

impl SeedanceProFast {
    pub fn new(client: Arc<ReplicateClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VideoSynthesis for SeedanceProFast {
    fn name(&self) -> &'static str {
        "Seedance 1 Pro Fast"
    }

    fn model_id(&self) -> &'static str {
        "bytedance/seedance-1-pro-fast"
    }

    fn description(&self) -> &'static str {
        "Ultra budget-friendly with fast generation times"
    }

    fn tier(&self) -> ProviderTier {
        ProviderTier::UltraBudget
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
        });

        // The back end ignores aspect_ratio when an image is used, so it
        // is omitted entirely in that case
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
        // Typically 40-80 seconds
        60
    }

    fn cost_per_video(&self, duration: u32, resolution: &str) -> f64 {
        f64::from(duration) * rate(resolution)
    }
}
