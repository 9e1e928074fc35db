//! Timed text overlays burned into the final video.

use serde::{Deserialize, Serialize};

/// Fade ramp length applied when an overlay does not specify one.
pub const DEFAULT_FADE_DURATION: f64 = 0.5;

/// Anchor position for an overlay, with a fixed margin from the nearest edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlayPosition {
    TopLeft,
    TopCenter,
    TopRight,
    Center,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl OverlayPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayPosition::TopLeft => "top-left",
            OverlayPosition::TopCenter => "top-center",
            OverlayPosition::TopRight => "top-right",
            OverlayPosition::Center => "center",
            OverlayPosition::BottomLeft => "bottom-left",
            OverlayPosition::BottomCenter => "bottom-center",
            OverlayPosition::BottomRight => "bottom-right",
        }
    }
}

/// Font weight for overlay text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// One timed, styled text overlay.
///
/// Styling fields left empty fall back to the active theme's default
/// text style. Overlays are independent of each other; overlapping
/// entries render in list order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextOverlay {
    pub text: String,
    pub position: OverlayPosition,

    /// Seconds from the start of the video.
    pub start_time: f64,
    /// Seconds from the start of the video; must be greater than `start_time`.
    pub end_time: f64,
    /// Fade in/out ramp length in seconds; defaults to 0.5.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fade_duration: Option<f64>,

    /// Hex color, e.g. `#FFFFFF`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    /// Pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    /// Hex color of the background box; no box when absent in both the
    /// overlay and the theme style.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// 0.0 - 1.0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_opacity: Option<f64>,
}

impl TextOverlay {
    /// Create an overlay with default timing ramps and theme-derived styling.
    pub fn new(
        text: impl Into<String>,
        position: OverlayPosition,
        start_time: f64,
        end_time: f64,
    ) -> Self {
        Self {
            text: text.into(),
            position,
            start_time,
            end_time,
            fade_duration: None,
            text_color: None,
            font_size: None,
            font_weight: None,
            background_color: None,
            background_opacity: None,
        }
    }

    /// Effective fade ramp length.
    pub fn fade(&self) -> f64 {
        self.fade_duration.unwrap_or(DEFAULT_FADE_DURATION)
    }

    /// Collect human-readable violations against the video duration.
    pub fn violations(&self, video_duration: f64) -> Vec<String> {
        let mut errors = Vec::new();
        if self.text.trim().is_empty() {
            errors.push("Overlay text must not be empty".to_string());
        }
        if self.end_time <= self.start_time {
            errors.push(format!(
                "Overlay end time ({}) must be after start time ({})",
                self.end_time, self.start_time
            ));
        }
        if self.start_time < 0.0 {
            errors.push(format!(
                "Overlay start time ({}) must not be negative",
                self.start_time
            ));
        }
        if self.end_time > video_duration {
            errors.push(format!(
                "Overlay end time ({}) exceeds the video duration ({}s)",
                self.end_time, video_duration
            ));
        }
        if let Some(fade) = self.fade_duration {
            if fade < 0.0 {
                errors.push(format!("Overlay fade duration ({fade}) must not be negative"));
            }
        }
        if let Some(opacity) = self.background_opacity {
            if !(0.0..=1.0).contains(&opacity) {
                errors.push(format!(
                    "Overlay background opacity ({opacity}) must be between 0 and 1"
                ));
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_overlay_has_no_violations() {
        let overlay = TextOverlay::new("SALE", OverlayPosition::TopRight, 0.0, 4.0);
        assert!(overlay.violations(6.0).is_empty());
    }

    #[test]
    fn test_end_before_start_rejected() {
        let overlay = TextOverlay::new("SALE", OverlayPosition::TopRight, 4.0, 2.0);
        let errors = overlay.violations(6.0);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("after start time"));
    }

    #[test]
    fn test_end_beyond_video_duration_rejected() {
        let overlay = TextOverlay::new("SALE", OverlayPosition::TopRight, 0.0, 8.0);
        assert!(!overlay.violations(6.0).is_empty());
    }

    #[test]
    fn test_default_fade() {
        let mut overlay = TextOverlay::new("NEW", OverlayPosition::TopLeft, 0.0, 3.0);
        assert!((overlay.fade() - DEFAULT_FADE_DURATION).abs() < f64::EPSILON);
        overlay.fade_duration = Some(1.0);
        assert!((overlay.fade() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_position_serde_kebab_case() {
        let json = serde_json::to_string(&OverlayPosition::BottomCenter).unwrap();
        assert_eq!(json, "\"bottom-center\"");
    }
}
