//! Generation request — the orchestrator's sole external input.

use serde::{Deserialize, Serialize};

use crate::overlay::TextOverlay;
use crate::theme::VideoTheme;

/// Video synthesis back end selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum VideoProviderKind {
    #[default]
    Veo3Fast,
    Hailuo2,
    SeedanceProFast,
}

impl VideoProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoProviderKind::Veo3Fast => "veo3-fast",
            VideoProviderKind::Hailuo2 => "hailuo2",
            VideoProviderKind::SeedanceProFast => "seedance-pro-fast",
        }
    }

    pub fn all() -> [VideoProviderKind; 3] {
        [
            VideoProviderKind::Veo3Fast,
            VideoProviderKind::Hailuo2,
            VideoProviderKind::SeedanceProFast,
        ]
    }
}

impl std::fmt::Display for VideoProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Voice synthesis back end selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VoiceProviderKind {
    #[default]
    Openai,
    Elevenlabs,
}

impl VoiceProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceProviderKind::Openai => "openai",
            VoiceProviderKind::Elevenlabs => "elevenlabs",
        }
    }
}

impl std::fmt::Display for VoiceProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything needed to produce one marketing video.
///
/// `duration`, `aspect_ratio`, and `resolution` must lie inside the
/// selected video provider's capability envelope; the pipeline checks
/// this before issuing any remote call.
#[derive(Clone)]
pub struct GenerationRequest {
    /// Source product photo (JPEG or PNG bytes)
    pub image: Vec<u8>,

    pub video_provider: VideoProviderKind,
    /// Seconds
    pub duration: u32,
    /// E.g. "9:16"
    pub aspect_ratio: String,
    /// E.g. "1080p"
    pub resolution: String,

    /// Caller-supplied scene prompt; generated from the image when absent
    pub prompt: Option<String>,
    /// Caller-supplied voiceover script; generated when absent
    pub script: Option<String>,

    pub voice_provider: VoiceProviderKind,
    /// Voice identifier understood by the selected voice provider
    pub voice: String,

    pub theme: VideoTheme,

    /// Logo image (PNG bytes) for intro/outro bumper clips
    pub logo: Option<Vec<u8>>,
    pub logo_intro: bool,
    pub logo_outro: bool,
    /// Seconds; a bumper is only built when its duration is positive
    pub intro_duration: f64,
    pub outro_duration: f64,

    pub text_overlays: Vec<TextOverlay>,
}

impl GenerationRequest {
    /// Create a request with defaults matching the editor's initial form.
    pub fn new(image: Vec<u8>) -> Self {
        Self {
            image,
            video_provider: VideoProviderKind::default(),
            duration: 6,
            aspect_ratio: "9:16".to_string(),
            resolution: "1080p".to_string(),
            prompt: None,
            script: None,
            voice_provider: VoiceProviderKind::default(),
            voice: "nova".to_string(),
            theme: VideoTheme::default(),
            logo: None,
            logo_intro: false,
            logo_outro: false,
            intro_duration: 0.0,
            outro_duration: 0.0,
            text_overlays: Vec::new(),
        }
    }

    /// Whether the logo compositing stage should run at all.
    pub fn logo_stage_enabled(&self) -> bool {
        self.logo.is_some() && (self.logo_intro || self.logo_outro)
    }

    /// Violations of the overlay timing/styling invariants.
    pub fn overlay_violations(&self) -> Vec<String> {
        let duration = f64::from(self.duration);
        self.text_overlays
            .iter()
            .enumerate()
            .flat_map(|(i, overlay)| {
                overlay
                    .violations(duration)
                    .into_iter()
                    .map(move |v| format!("overlay {}: {}", i + 1, v))
            })
            .collect()
    }
}

impl std::fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("image_bytes", &self.image.len())
            .field("video_provider", &self.video_provider)
            .field("duration", &self.duration)
            .field("aspect_ratio", &self.aspect_ratio)
            .field("resolution", &self.resolution)
            .field("prompt", &self.prompt)
            .field("script", &self.script)
            .field("voice_provider", &self.voice_provider)
            .field("voice", &self.voice)
            .field("theme", &self.theme)
            .field("logo_bytes", &self.logo.as_ref().map(Vec::len))
            .field("logo_intro", &self.logo_intro)
            .field("logo_outro", &self.logo_outro)
            .field("intro_duration", &self.intro_duration)
            .field("outro_duration", &self.outro_duration)
            .field("text_overlays", &self.text_overlays)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{OverlayPosition, TextOverlay};

    #[test]
    fn test_logo_stage_gating() {
        let mut request = GenerationRequest::new(vec![0xFF, 0xD8]);
        assert!(!request.logo_stage_enabled());

        request.logo = Some(vec![0x89, 0x50]);
        assert!(!request.logo_stage_enabled(), "logo without flags is inert");

        request.logo_intro = true;
        assert!(request.logo_stage_enabled());
    }

    #[test]
    fn test_overlay_violations_are_indexed() {
        let mut request = GenerationRequest::new(vec![0xFF, 0xD8]);
        request.text_overlays = vec![
            TextOverlay::new("OK", OverlayPosition::TopLeft, 0.0, 3.0),
            TextOverlay::new("BAD", OverlayPosition::Center, 5.0, 2.0),
        ];
        let violations = request.overlay_violations();
        assert_eq!(violations.len(), 1);
        assert!(violations[0].starts_with("overlay 2:"));
    }

    #[test]
    fn test_provider_kind_serde() {
        let kind: VideoProviderKind = serde_json::from_str("\"seedance-pro-fast\"").unwrap();
        assert_eq!(kind, VideoProviderKind::SeedanceProFast);
        assert_eq!(
            serde_json::to_string(&VoiceProviderKind::Elevenlabs).unwrap(),
            "\"elevenlabs\""
        );
    }
}
