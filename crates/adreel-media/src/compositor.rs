//! The compositing seam used by the orchestrator.
//!
//! The pipeline's fail-soft stages are written against this trait so
//! their contract can be exercised without spawning FFmpeg.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use adreel_models::{TextOverlay, ThemeTextStyle};

use crate::bumper::{create_bumper, BumperSpec};
use crate::concat::concat_clips;
use crate::error::MediaResult;
use crate::merge::merge_video_audio;
use crate::probe::probe_dimensions;
use crate::text::burn_overlays;

/// Media compositing operations.
#[async_trait]
pub trait Compositing: Send + Sync {
    /// Synthesize a bumper clip from a still image.
    async fn create_bumper(
        &self,
        image: &Path,
        spec: &BumperSpec,
        output: &Path,
    ) -> MediaResult<()>;

    /// Join clips with identical codecs by stream copy.
    async fn concat(&self, clips: &[PathBuf], output: &Path) -> MediaResult<()>;

    /// Pixel dimensions of an existing clip.
    async fn probe_dimensions(&self, video: &Path) -> MediaResult<(u32, u32)>;

    /// Merge a video-only clip with an audio track.
    async fn merge(&self, video: &Path, audio: &Path, output: &Path) -> MediaResult<()>;

    /// Burn timed text overlays into a clip.
    async fn burn_overlays(
        &self,
        video: &Path,
        overlays: &[TextOverlay],
        style: &ThemeTextStyle,
        output: &Path,
    ) -> MediaResult<()>;
}

/// Production implementation backed by the FFmpeg CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegCompositor;

#[async_trait]
impl Compositing for FfmpegCompositor {
    async fn create_bumper(
        &self,
        image: &Path,
        spec: &BumperSpec,
        output: &Path,
    ) -> MediaResult<()> {
        create_bumper(image, spec, output).await
    }

    async fn concat(&self, clips: &[PathBuf], output: &Path) -> MediaResult<()> {
        concat_clips(clips, output).await
    }

    async fn probe_dimensions(&self, video: &Path) -> MediaResult<(u32, u32)> {
        probe_dimensions(video).await
    }

    async fn merge(&self, video: &Path, audio: &Path, output: &Path) -> MediaResult<()> {
        merge_video_audio(video, audio, output).await
    }

    async fn burn_overlays(
        &self,
        video: &Path,
        overlays: &[TextOverlay],
        style: &ThemeTextStyle,
        output: &Path,
    ) -> MediaResult<()> {
        burn_overlays(video, overlays, style, output).await
    }
}
