//! Shared data models for the AdReel generation pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Generation requests and provider/theme identifiers
//! - Timed text overlays and their anchor positions
//! - The pipeline state machine
//! - Cost, timing, and metadata records persisted per run

pub mod metadata;
pub mod overlay;
pub mod request;
pub mod state;
pub mod theme;

// Re-export common types
pub use metadata::{
    ContentInfo, CostBreakdown, GenerationMetadata, LogoSummary, OutputFiles, OverlaySummary,
    StageTimings, VideoSettings,
};
pub use overlay::{FontWeight, OverlayPosition, TextOverlay, DEFAULT_FADE_DURATION};
pub use request::{GenerationRequest, VideoProviderKind, VoiceProviderKind};
pub use state::GenerationState;
pub use theme::{OverlayPreset, ThemeConfig, ThemeTextStyle, VideoTheme};
