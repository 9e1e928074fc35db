//! Video and voice synthesis providers.
//!
//! This crate provides:
//! - The `VideoSynthesis` trait with three back ends (Veo 3 Fast,
//!   Hailuo 2, Seedance 1 Pro Fast), each carrying its capability
//!   envelope and pricing table as data
//! - The `VoiceSynthesis` trait with two back ends (OpenAI TTS,
//!   ElevenLabs)
//! - The prediction client shared by the video providers
//! - Factory functions resolving a provider from its kind

pub mod config;
pub mod error;
pub mod replicate;
pub mod video;
pub mod voice;

pub use config::SynthesisConfig;
pub use error::{SynthesisError, SynthesisResult};
pub use replicate::ReplicateClient;
pub use video::{
    image_data_url, video_provider, CapabilityEnvelope, DurationSupport, Hailuo2, ProviderTier,
    SeedanceProFast, ValidationResult, Veo3Fast, VideoGenerationParams, VideoSynthesis,
};
pub use voice::{voice_provider, ElevenLabs, OpenAiTts, Voice, VoiceSynthesis};
