//! Per-run records: stage timings, cost breakdown, and the persisted
//! metadata document.

use serde::{Deserialize, Serialize};

use crate::overlay::TextOverlay;

/// Wall-clock seconds spent per pipeline stage.
///
/// Stages that did not run (caller-supplied content, disabled or failed
/// optional stages) stay at zero.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StageTimings {
    pub vision: f64,
    pub script: f64,
    pub video: f64,
    pub voiceover: f64,
    pub logo: f64,
    pub merge: f64,
    pub overlays: f64,
    pub total: f64,
}

/// USD cost per generation step.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CostBreakdown {
    pub vision_analysis: f64,
    pub prompt_generation: f64,
    pub script_generation: f64,
    pub video_generation: f64,
    pub voiceover: f64,
    pub total: f64,
}

impl CostBreakdown {
    /// Sum the line items into `total`.
    pub fn finalize(mut self) -> Self {
        self.total = self.vision_analysis
            + self.prompt_generation
            + self.script_generation
            + self.video_generation
            + self.voiceover;
        self
    }
}

/// Video settings echoed into the metadata record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSettings {
    pub video_model: String,
    pub duration: u32,
    pub aspect_ratio: String,
    pub resolution: String,
}

/// Generated or caller-supplied content used for the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentInfo {
    pub prompt: String,
    pub script: String,
    pub voice: String,
    pub voice_provider: String,
    pub theme: String,
}

/// File names (relative to the run folder) of the produced artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputFiles {
    pub original_video: String,
    pub voiceover: String,
    pub final_video: String,
}

/// Outcome of the optional logo compositing stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoSummary {
    pub enabled: bool,
    pub intro: bool,
    pub outro: bool,
    pub intro_duration: f64,
    pub outro_duration: f64,
    /// Set when the stage failed and the run continued with the
    /// un-composited video.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of the optional text-overlay stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlaySummary {
    pub enabled: bool,
    pub count: usize,
    pub overlays: Vec<TextOverlay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The metadata document persisted next to the final video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// RFC 3339
    pub timestamp: String,
    pub video_path: String,
    pub settings: VideoSettings,
    pub content: ContentInfo,
    pub costs: CostBreakdown,
    pub timings: StageTimings,
    pub files: OutputFiles,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<LogoSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_overlays: Option<OverlaySummary>,
}
