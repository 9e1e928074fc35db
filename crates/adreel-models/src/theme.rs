//! Content themes.
//!
//! A theme shapes the generated script (tone, keywords, style guidance)
//! and supplies the default styling and quick presets for text overlays.

use serde::{Deserialize, Serialize};

use crate::overlay::{OverlayPosition, TextOverlay};

/// Named content-style configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum VideoTheme {
    Promotional,
    NewProduct,
    #[default]
    Informational,
    Seasonal,
}

impl VideoTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoTheme::Promotional => "promotional",
            VideoTheme::NewProduct => "new-product",
            VideoTheme::Informational => "informational",
            VideoTheme::Seasonal => "seasonal",
        }
    }

    /// All themes, for listing in a chooser UI.
    pub fn all() -> [VideoTheme; 4] {
        [
            VideoTheme::Promotional,
            VideoTheme::NewProduct,
            VideoTheme::Informational,
            VideoTheme::Seasonal,
        ]
    }

    /// Full configuration for this theme.
    pub fn config(&self) -> ThemeConfig {
        match self {
            VideoTheme::Promotional => ThemeConfig {
                name: "Promotional",
                description: "Sales, discounts, limited time offers",
                script_tone: "Urgent, compelling, value-focused",
                script_keywords: &[
                    "deal",
                    "save",
                    "offer",
                    "limited time",
                    "special price",
                    "don't miss",
                    "value",
                    "now",
                ],
                script_style: "Create excitement and urgency around the promotional offer. \
                     Emphasize value and savings. Use action-oriented language.",
                text_style: ThemeTextStyle {
                    text_color: "#FF0000".to_string(),
                    font_size: 72,
                    font_weight: crate::overlay::FontWeight::Bold,
                    background_color: Some("#FFEB3B".to_string()),
                    background_opacity: 0.9,
                },
                presets: vec![
                    OverlayPreset::new("50% OFF", "50% OFF", OverlayPosition::TopCenter, 0.0, 3.0),
                    OverlayPreset::new("SALE", "SALE", OverlayPosition::TopRight, 0.0, 4.0),
                    OverlayPreset::new(
                        "Limited Time",
                        "Limited Time Only",
                        OverlayPosition::BottomCenter,
                        0.0,
                        3.0,
                    ),
                    OverlayPreset::new(
                        "Special Offer",
                        "Special Offer",
                        OverlayPosition::TopLeft,
                        0.0,
                        4.0,
                    ),
                ],
            },
            VideoTheme::NewProduct => ThemeConfig {
                name: "New Product",
                description: "Product launches, new arrivals, fresh additions",
                script_tone: "Exciting, innovative, fresh",
                script_keywords: &[
                    "new",
                    "introducing",
                    "just arrived",
                    "fresh",
                    "latest",
                    "discover",
                    "innovation",
                    "now available",
                ],
                script_style: "Generate excitement about the new product. Emphasize innovation, \
                     newness, and the opportunity to be among the first. Upbeat and energetic.",
                text_style: ThemeTextStyle {
                    text_color: "#FFFFFF".to_string(),
                    font_size: 64,
                    font_weight: crate::overlay::FontWeight::Bold,
                    background_color: Some("#2196F3".to_string()),
                    background_opacity: 0.85,
                },
                presets: vec![
                    OverlayPreset::new("NEW", "NEW", OverlayPosition::TopRight, 0.0, 6.0),
                    OverlayPreset::new(
                        "Just Arrived",
                        "Just Arrived",
                        OverlayPosition::TopCenter,
                        0.0,
                        3.0,
                    ),
                    OverlayPreset::new(
                        "Introducing",
                        "Introducing",
                        OverlayPosition::BottomCenter,
                        0.0,
                        2.0,
                    ),
                    OverlayPreset::new("Fresh", "Fresh Arrival", OverlayPosition::TopLeft, 0.0, 3.0),
                ],
            },
            VideoTheme::Informational => ThemeConfig {
                name: "Informational",
                description: "Product features, benefits, educational content",
                script_tone: "Clear, educational, trustworthy",
                script_keywords: &[
                    "quality",
                    "features",
                    "crafted",
                    "designed",
                    "premium",
                    "perfect for",
                    "ideal",
                    "benefits",
                ],
                script_style: "Focus on product features and benefits in a clear, informative way. \
                     Educational but still engaging. Emphasize quality and value.",
                text_style: ThemeTextStyle {
                    text_color: "#FFFFFF".to_string(),
                    font_size: 56,
                    font_weight: crate::overlay::FontWeight::Bold,
                    background_color: Some("#000000".to_string()),
                    background_opacity: 0.7,
                },
                presets: vec![
                    OverlayPreset::new(
                        "Learn More",
                        "Learn More",
                        OverlayPosition::BottomCenter,
                        4.0,
                        6.0,
                    ),
                    OverlayPreset::new(
                        "Premium Quality",
                        "Premium Quality",
                        OverlayPosition::TopCenter,
                        0.0,
                        3.0,
                    ),
                    OverlayPreset::new("Features", "Key Features", OverlayPosition::TopLeft, 2.0, 6.0),
                    OverlayPreset::new(
                        "Handpicked",
                        "Carefully Curated",
                        OverlayPosition::BottomRight,
                        0.0,
                        4.0,
                    ),
                ],
            },
            VideoTheme::Seasonal => ThemeConfig {
                name: "Seasonal",
                description: "Holiday specials, seasonal offerings, limited editions",
                script_tone: "Festive, timely, exclusive",
                script_keywords: &[
                    "seasonal",
                    "holiday",
                    "limited edition",
                    "celebrate",
                    "festive",
                    "special",
                    "exclusive",
                    "perfect gift",
                ],
                script_style: "Emphasize seasonal relevance and timeliness. Create a sense of \
                     occasion and exclusivity. Mention gifting opportunities if appropriate.",
                text_style: ThemeTextStyle {
                    text_color: "#FFFFFF".to_string(),
                    font_size: 68,
                    font_weight: crate::overlay::FontWeight::Bold,
                    background_color: Some("#C62828".to_string()),
                    background_opacity: 0.85,
                },
                presets: vec![
                    OverlayPreset::new(
                        "Holiday Special",
                        "Holiday Special",
                        OverlayPosition::TopCenter,
                        0.0,
                        3.0,
                    ),
                    OverlayPreset::new(
                        "Limited Edition",
                        "Limited Edition",
                        OverlayPosition::TopRight,
                        0.0,
                        6.0,
                    ),
                    OverlayPreset::new(
                        "Season's Best",
                        "Season's Best",
                        OverlayPosition::BottomCenter,
                        0.0,
                        4.0,
                    ),
                    OverlayPreset::new(
                        "Perfect Gift",
                        "The Perfect Gift",
                        OverlayPosition::TopLeft,
                        2.0,
                        6.0,
                    ),
                ],
            },
        }
    }
}

impl std::fmt::Display for VideoTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Default styling for overlays that do not specify their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeTextStyle {
    pub text_color: String,
    pub font_size: u32,
    pub font_weight: crate::overlay::FontWeight,
    pub background_color: Option<String>,
    pub background_opacity: f64,
}

/// One-click overlay preset offered with a theme.
#[derive(Debug, Clone, Serialize)]
pub struct OverlayPreset {
    /// Label shown on the preset button
    pub label: &'static str,
    pub text: &'static str,
    pub position: OverlayPosition,
    pub start_time: f64,
    pub end_time: f64,
}

impl OverlayPreset {
    fn new(
        label: &'static str,
        text: &'static str,
        position: OverlayPosition,
        start_time: f64,
        end_time: f64,
    ) -> Self {
        Self {
            label,
            text,
            position,
            start_time,
            end_time,
        }
    }

    /// Materialize the preset as an overlay with theme-derived styling.
    pub fn to_overlay(&self) -> TextOverlay {
        TextOverlay::new(self.text, self.position, self.start_time, self.end_time)
    }
}

/// Theme guidance for script generation.
#[derive(Debug, Clone)]
pub struct ThemeConfig {
    pub name: &'static str,
    pub description: &'static str,
    pub script_tone: &'static str,
    pub script_keywords: &'static [&'static str],
    pub script_style: &'static str,
    pub text_style: ThemeTextStyle,
    pub presets: Vec<OverlayPreset>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        assert_eq!(VideoTheme::default(), VideoTheme::Informational);
    }

    #[test]
    fn test_every_theme_has_presets_and_style() {
        for theme in VideoTheme::all() {
            let config = theme.config();
            assert_eq!(config.presets.len(), 4);
            assert!(!config.script_keywords.is_empty());
            assert!(config.text_style.font_size >= 56);
        }
    }

    #[test]
    fn test_preset_to_overlay_inherits_theme_styling() {
        let preset = &VideoTheme::Promotional.config().presets[0];
        let overlay = preset.to_overlay();
        assert_eq!(overlay.text, "50% OFF");
        // Styling is resolved against the theme at burn-in time
        assert!(overlay.text_color.is_none());
    }

    #[test]
    fn test_serde_kebab_case() {
        let json = serde_json::to_string(&VideoTheme::NewProduct).unwrap();
        assert_eq!(json, "\"new-product\"");
    }
}
