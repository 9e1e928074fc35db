//! Bumper clip synthesis from a still logo image.

use std::path::Path;
use tracing::info;

use crate::command::FfmpegCommand;
use crate::error::MediaResult;

/// Fade ramp length at the head/tail of a bumper.
pub const BUMPER_FADE: f64 = 0.5;

/// Bumpers are synthesized at a fixed frame rate.
pub const BUMPER_FPS: u32 = 25;

/// Parameters for one bumper clip.
#[derive(Debug, Clone)]
pub struct BumperSpec {
    /// Clip length in seconds
    pub duration: f64,
    /// Target pixel dimensions; must match the product video exactly
    pub width: u32,
    pub height: u32,
    pub fade_in: bool,
    pub fade_out: bool,
}

impl BumperSpec {
    /// Intro bumper: fades in from black, cuts straight into the video.
    pub fn intro(duration: f64, width: u32, height: u32) -> Self {
        Self {
            duration,
            width,
            height,
            fade_in: true,
            fade_out: false,
        }
    }

    /// Outro bumper: cuts in, fades out to black.
    pub fn outro(duration: f64, width: u32, height: u32) -> Self {
        Self {
            duration,
            width,
            height,
            fade_in: false,
            fade_out: true,
        }
    }
}

/// Build the filter chain for a bumper clip.
///
/// The logo is scaled to fit inside the target frame preserving its
/// aspect ratio, then padded and centered. Fade-out starts at
/// `duration - 0.5`.
fn build_bumper_filter(spec: &BumperSpec) -> String {
    let (w, h) = (spec.width, spec.height);
    let mut filter = format!(
        "[0:v]scale={w}:{h}:force_original_aspect_ratio=decrease,\
         pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,setsar=1,fps={BUMPER_FPS}"
    );

    if spec.fade_in {
        filter.push_str(&format!(",fade=t=in:st=0:d={BUMPER_FADE}"));
    }
    if spec.fade_out {
        let start = spec.duration - BUMPER_FADE;
        filter.push_str(&format!(",fade=t=out:st={start}:d={BUMPER_FADE}"));
    }

    filter
}

/// Synthesize a fixed-duration video clip from a still image.
pub async fn create_bumper(
    image: impl AsRef<Path>,
    spec: &BumperSpec,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let image = image.as_ref();
    let output = output.as_ref();

    info!(
        image = %image.display(),
        duration = spec.duration,
        width = spec.width,
        height = spec.height,
        "Creating bumper clip"
    );

    FfmpegCommand::new(output)
        .input_with_args(["-loop", "1"], image)
        .filter_complex(build_bumper_filter(spec))
        .duration(spec.duration)
        .video_codec("libx264")
        .pixel_format("yuv420p")
        .run()
        .await
}
