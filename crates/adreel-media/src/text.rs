//! Text-overlay burn-in.
//!
//! Each overlay becomes one `drawtext` filter; the filters are chained
//! in list order. Visibility is driven by an alpha expression combining
//! a time gate with linear fade-in/fade-out ramps.

use std::path::Path;
use tokio::fs;
use tracing::info;

use adreel_models::{FontWeight, OverlayPosition, TextOverlay, ThemeTextStyle};

use crate::command::FfmpegCommand;
use crate::error::MediaResult;

/// Pixel margin between an anchored overlay and the nearest edge(s).
pub const OVERLAY_MARGIN: u32 = 40;

/// Padding of the optional background box around the text.
pub const BOX_PADDING: u32 = 20;

/// Regular-weight font files probed when no override is configured.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:/Windows/Fonts/arial.ttf",
];

const BOLD_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:/Windows/Fonts/arialbd.ttf",
];

/// How drawtext should locate its font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSpec {
    /// Explicit font file
    File(String),
    /// Fontconfig family name
    Family(&'static str),
}

/// Resolve a usable font.
///
/// `ADREEL_FONT_PATH` / `ADREEL_FONT_BOLD_PATH` override everything;
/// otherwise well-known system locations are probed, falling back to the
/// fontconfig `Sans` family so no bundled asset is assumed.
pub fn resolve_font(bold: bool) -> FontSpec {
    let env_var = if bold {
        "ADREEL_FONT_BOLD_PATH"
    } else {
        "ADREEL_FONT_PATH"
    };
    if let Ok(path) = std::env::var(env_var) {
        if !path.is_empty() {
            return FontSpec::File(path);
        }
    }

    let candidates = if bold {
        BOLD_FONT_CANDIDATES
    } else {
        FONT_CANDIDATES
    };
    for candidate in candidates {
        if Path::new(candidate).exists() {
            return FontSpec::File((*candidate).to_string());
        }
    }

    FontSpec::Family("Sans")
}

/// Escape characters that are significant to the drawtext option parser.
pub fn escape_drawtext(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace(':', "\\:")
        .replace('%', "\\%")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

/// Position expressions for the seven anchors.
///
/// Centered axes use drawtext's text metrics; edge-anchored axes keep a
/// fixed pixel margin.
fn position_expr(position: OverlayPosition) -> (String, String) {
    let m = OVERLAY_MARGIN;
    let center_x = "(w-text_w)/2".to_string();
    match position {
        OverlayPosition::TopLeft => (m.to_string(), m.to_string()),
        OverlayPosition::TopCenter => (center_x, m.to_string()),
        OverlayPosition::TopRight => (format!("w-text_w-{m}"), m.to_string()),
        OverlayPosition::Center => (center_x, "(h-text_h)/2".to_string()),
        OverlayPosition::BottomLeft => (m.to_string(), format!("h-text_h-{m}")),
        OverlayPosition::BottomCenter => (center_x, format!("h-text_h-{m}")),
        OverlayPosition::BottomRight => (format!("w-text_w-{m}"), format!("h-text_h-{m}")),
    }
}

/// Alpha expression gating visibility to `[start, end]` with linear
/// fade ramps of `fade` seconds at both edges.
///
/// The two ramps are combined through `min`, clamped at full opacity,
/// so overlapping fade windows never exceed 1.
fn alpha_expr(start: f64, end: f64, fade: f64) -> String {
    if fade > 0.0 {
        format!(
            "if(between(t,{start},{end}),min((t-{start})/{fade},min(1,({end}-t)/{fade})),0)"
        )
    } else {
        format!("if(between(t,{start},{end}),1,0)")
    }
}

/// Strip a leading `#` and render as an ffmpeg `0xRRGGBB` literal.
fn color_literal(color: &str) -> String {
    format!("0x{}", color.trim_start_matches('#'))
}

/// Overlay styling after falling back to the theme defaults.
#[derive(Debug, Clone)]
struct ResolvedStyle {
    color: String,
    font_size: u32,
    bold: bool,
    /// Box color and opacity, when a background is requested
    background: Option<(String, f64)>,
}

fn resolve_style(overlay: &TextOverlay, theme: &ThemeTextStyle) -> ResolvedStyle {
    let weight = overlay.font_weight.unwrap_or(theme.font_weight);
    let background_color = overlay
        .background_color
        .clone()
        .or_else(|| theme.background_color.clone());

    ResolvedStyle {
        color: color_literal(overlay.text_color.as_deref().unwrap_or(&theme.text_color)),
        font_size: overlay.font_size.unwrap_or(theme.font_size),
        bold: weight == FontWeight::Bold,
        background: background_color.map(|c| {
            (
                color_literal(&c),
                overlay
                    .background_opacity
                    .unwrap_or(theme.background_opacity),
            )
        }),
    }
}

/// Build the drawtext filter for one overlay.
fn drawtext_filter(overlay: &TextOverlay, theme: &ThemeTextStyle) -> String {
    let style = resolve_style(overlay, theme);
    let (x, y) = position_expr(overlay.position);
    let alpha = alpha_expr(overlay.start_time, overlay.end_time, overlay.fade());

    let mut parts = vec![format!("text='{}'", escape_drawtext(&overlay.text))];
    match resolve_font(style.bold) {
        FontSpec::File(path) => parts.push(format!("fontfile='{}'", escape_drawtext(&path))),
        FontSpec::Family(family) => parts.push(format!("font={family}")),
    }
    parts.push(format!("fontsize={}", style.font_size));
    parts.push(format!("fontcolor={}", style.color));
    parts.push(format!("x={x}"));
    parts.push(format!("y={y}"));
    if let Some((box_color, opacity)) = &style.background {
        parts.push(format!(
            "box=1:boxcolor={box_color}@{opacity}:boxborderw={BOX_PADDING}"
        ));
    }
    parts.push(format!("alpha='{alpha}'"));

    format!("drawtext={}", parts.join(":"))
}

/// Build the full filter chain for an overlay list.
pub fn build_overlay_filter(overlays: &[TextOverlay], theme: &ThemeTextStyle) -> String {
    overlays
        .iter()
        .map(|overlay| drawtext_filter(overlay, theme))
        .collect::<Vec<_>>()
        .join(",")
}

/// Burn a list of timed overlays into a video.
///
/// Zero overlays degenerates to a file copy. The video is re-encoded;
/// the audio track is stream-copied.
pub async fn burn_overlays(
    input: impl AsRef<Path>,
    overlays: &[TextOverlay],
    theme: &ThemeTextStyle,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    if overlays.is_empty() {
        fs::copy(input, output).await?;
        return Ok(());
    }

    info!(
        count = overlays.len(),
        input = %input.display(),
        "Burning text overlays"
    );

    FfmpegCommand::new(output)
        .input(input)
        .video_filter(build_overlay_filter(overlays, theme))
        .video_codec("libx264")
        .audio_codec("copy")
        .run()
        .await
}
