//! The generation pipeline orchestrator.
//!
//! One `GenerationPipeline` drives one run, strictly sequentially: each
//! stage's output is the next stage's input. Failures in the two
//! optional compositing stages (logo bumpers, text overlays) are
//! downgraded to recorded warnings; any other failure aborts the run.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::fs;
use tokio::sync::watch;
use tracing::{info, warn};
use uuid::Uuid;

use adreel_media::{BumperSpec, Compositing, FfmpegCompositor};
use adreel_models::{
    ContentInfo, CostBreakdown, GenerationMetadata, GenerationRequest, GenerationState,
    LogoSummary, OutputFiles, OverlaySummary, VideoSettings,
};
use adreel_storage::OutputStore;
use adreel_synthesis::{
    image_data_url, video_provider, voice_provider, ReplicateClient, VideoGenerationParams,
    VideoSynthesis, VoiceSynthesis,
};

use crate::config::PipelineConfig;
use crate::content::{ContentGenerator, OpenAiContent};
use crate::error::{PipelineError, PipelineResult};
use crate::run::{PipelineRun, StageOutcome};

/// Fixed USD rates for the content generation calls.
const VISION_ANALYSIS_COST: f64 = 0.02;
const PROMPT_GENERATION_COST: f64 = 0.005;
const SCRIPT_GENERATION_COST: f64 = 0.005;

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub run_id: Uuid,
    pub output_dir: PathBuf,
    pub final_video: PathBuf,
    pub metadata: GenerationMetadata,
    pub metadata_path: PathBuf,
}

/// Stateful workflow controller for one generation run.
pub struct GenerationPipeline {
    request: GenerationRequest,
    video: Box<dyn VideoSynthesis>,
    voice: Box<dyn VoiceSynthesis>,
    content: Arc<dyn ContentGenerator>,
    compositor: Arc<dyn Compositing>,
    store: OutputStore,
    run: PipelineRun,
}

impl GenerationPipeline {
    /// Create a pipeline over explicit collaborators.
    pub fn new(
        request: GenerationRequest,
        video: Box<dyn VideoSynthesis>,
        voice: Box<dyn VoiceSynthesis>,
        content: Arc<dyn ContentGenerator>,
        compositor: Arc<dyn Compositing>,
        store: OutputStore,
    ) -> Self {
        Self {
            request,
            video,
            voice,
            content,
            compositor,
            store,
            run: PipelineRun::new(),
        }
    }

    /// Create a pipeline with production collaborators resolved from
    /// config. Clients are constructed here, once, and handed to the
    /// providers explicitly.
    pub fn from_config(
        request: GenerationRequest,
        config: &PipelineConfig,
    ) -> PipelineResult<Self> {
        let client = Arc::new(ReplicateClient::new(&config.synthesis)?);
        let video = video_provider(request.video_provider, client);
        let voice = voice_provider(request.voice_provider, &config.synthesis)?;
        let content = Arc::new(OpenAiContent::new(&config.synthesis, config.brand.clone())?);

        Ok(Self::new(
            request,
            video,
            voice,
            content,
            Arc::new(FfmpegCompositor),
            OutputStore::from_env(),
        ))
    }

    pub fn run_id(&self) -> Uuid {
        self.run.id
    }

    /// Receiver for observing state transitions.
    pub fn state(&self) -> watch::Receiver<GenerationState> {
        self.run.subscribe()
    }

    /// Current state.
    pub fn current_state(&self) -> GenerationState {
        self.run.state()
    }

    /// Execute the run to completion.
    ///
    /// Any non-optional stage failure aborts, transitions to `error`,
    /// and surfaces the triggering message; nothing is retried.
    pub async fn execute(mut self) -> PipelineResult<PipelineOutput> {
        match self.run_stages().await {
            Ok(output) => Ok(output),
            Err(e) => {
                self.run.advance(GenerationState::Error);
                tracing::error!(run_id = %self.run.id, error = %e, "Generation run failed");
                Err(e)
            }
        }
    }

    async fn run_stages(&mut self) -> PipelineResult<PipelineOutput> {
        info!(
            run_id = %self.run.id,
            video_provider = %self.request.video_provider,
            voice_provider = %self.request.voice_provider,
            duration = self.request.duration,
            "Starting generation run"
        );

        // Everything checkable locally is checked before any remote
        // call is issued.
        let mut params = VideoGenerationParams {
            prompt: String::new(),
            duration: self.request.duration,
            aspect_ratio: self.request.aspect_ratio.clone(),
            resolution: self.request.resolution.clone(),
            image: None,
        };

        let mut violations = self.video.validate(&params).errors;
        if !self.voice.validate_voice(&self.request.voice) {
            violations.push(format!(
                "Voice '{}' is not available from {}",
                self.request.voice,
                self.voice.name()
            ));
        }
        violations.extend(self.request.overlay_violations());
        if !violations.is_empty() {
            return Err(PipelineError::invalid_request(&violations));
        }

        let ts = Utc::now().timestamp_millis();

        // Allocate the run's output location and persist the source image
        self.run.advance(GenerationState::UploadingImage);
        let dir = self.store.create_run_dir().await?;
        let source_image = self
            .store
            .save_image(&self.request.image, &dir, "source_image.jpg")
            .await?;
        self.run.artifacts.source_image = Some(source_image);

        // Scene prompt, unless supplied by the caller
        let prompt = match &self.request.prompt {
            Some(prompt) => prompt.clone(),
            None => {
                self.run.advance(GenerationState::AnalyzingImage);
                let started = Instant::now();
                let prompt = self
                    .content
                    .scene_prompt(
                        &self.request.image,
                        self.request.duration,
                        &self.request.aspect_ratio,
                        self.video.name(),
                    )
                    .await?;
                self.run.timings.vision = started.elapsed().as_secs_f64();
                prompt
            }
        };

        // Voiceover script, unless supplied by the caller
        let script = match &self.request.script {
            Some(script) => script.clone(),
            None => {
                self.run.advance(GenerationState::GeneratingScript);
                let started = Instant::now();
                let product = self.content.identify_product(&self.request.image).await?;
                let script = self
                    .content
                    .voiceover_script(&product, self.request.duration, self.request.theme)
                    .await?;
                self.run.timings.script = started.elapsed().as_secs_f64();
                script
            }
        };

        // Video synthesis and asset download
        self.run.advance(GenerationState::GeneratingVideo);
        params.prompt = prompt.clone();
        params.image = Some(image_data_url(&self.request.image));

        let started = Instant::now();
        let locator = self.video.generate(&params).await?;
        self.run.timings.video = started.elapsed().as_secs_f64();

        let original_name = format!("video_original_{ts}.mp4");
        let original_video = self
            .store
            .download_video(&locator, &dir, &original_name)
            .await?;
        self.run.artifacts.original_video = Some(original_video.clone());

        // Optional, fail-soft: logo bumpers
        let logo_outcome = if self.request.logo_stage_enabled() {
            let logo_bytes = self.request.logo.clone().unwrap_or_default();
            let (outcome, elapsed) = self.logo_stage(&logo_bytes, &dir, ts, &original_video).await;
            self.run.timings.logo = elapsed;
            outcome
        } else {
            StageOutcome::Skipped
        };
        if let StageOutcome::Applied(path) = &logo_outcome {
            self.run.artifacts.logo_video = Some(path.clone());
        }
        let video_for_merge = logo_outcome
            .artifact()
            .cloned()
            .unwrap_or_else(|| original_video.clone());

        // Voiceover synthesis
        self.run.advance(GenerationState::GeneratingVoiceover);
        let started = Instant::now();
        let audio = self.voice.generate(&script, &self.request.voice).await?;
        self.run.timings.voiceover = started.elapsed().as_secs_f64();

        let voiceover_name = format!("voiceover_{ts}.mp3");
        let voice_track = self.store.save_audio(&audio, &dir, &voiceover_name).await?;
        self.run.artifacts.voice_track = Some(voice_track.clone());

        // Merge the composited video with the voice track
        self.run.advance(GenerationState::MergingAudio);
        let final_name = format!("video_final_{ts}.mp4");
        let has_overlays = !self.request.text_overlays.is_empty();
        let merge_name = if has_overlays {
            format!("video_merged_{ts}.mp4")
        } else {
            final_name.clone()
        };
        let merged = dir.join(&merge_name);

        let started = Instant::now();
        self.compositor
            .merge(&video_for_merge, &voice_track, &merged)
            .await?;
        self.run.timings.merge = started.elapsed().as_secs_f64();
        self.run.artifacts.merged_video = Some(merged.clone());

        // Optional, fail-soft: text overlay burn-in
        self.run.advance(GenerationState::SavingFiles);
        let overlay_outcome = if has_overlays {
            let final_path = dir.join(&final_name);
            let style = self.request.theme.config().text_style;
            let started = Instant::now();
            match self
                .compositor
                .burn_overlays(&merged, &self.request.text_overlays, &style, &final_path)
                .await
            {
                Ok(()) => {
                    self.run.timings.overlays = started.elapsed().as_secs_f64();
                    StageOutcome::Applied(final_path)
                }
                Err(e) => {
                    warn!(
                        run_id = %self.run.id,
                        error = %e,
                        "Overlay burn-in failed, continuing with the merged video"
                    );
                    self.run.timings.overlays = 0.0;
                    StageOutcome::Recovered {
                        fallback: merged.clone(),
                        error: e.to_string(),
                    }
                }
            }
        } else {
            StageOutcome::Skipped
        };
        let final_video = overlay_outcome
            .artifact()
            .cloned()
            .unwrap_or_else(|| merged.clone());
        self.run.artifacts.final_video = Some(final_video.clone());

        // Cost accounting and the metadata record
        let costs = self.compute_costs(&script);
        self.run.timings.total = self.run.elapsed();

        let final_file_name = final_video
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or(final_name);

        let metadata = GenerationMetadata {
            timestamp: Utc::now().to_rfc3339(),
            video_path: final_video.to_string_lossy().into_owned(),
            settings: VideoSettings {
                video_model: self.video.model_id().to_string(),
                duration: self.request.duration,
                aspect_ratio: self.request.aspect_ratio.clone(),
                resolution: self.request.resolution.clone(),
            },
            content: ContentInfo {
                prompt,
                script,
                voice: self.request.voice.clone(),
                voice_provider: self.request.voice_provider.as_str().to_string(),
                theme: self.request.theme.as_str().to_string(),
            },
            costs,
            timings: self.run.timings.clone(),
            files: OutputFiles {
                original_video: original_name,
                voiceover: voiceover_name,
                final_video: final_file_name,
            },
            logo: self.request.logo.as_ref().map(|_| LogoSummary {
                enabled: true,
                intro: self.request.logo_intro,
                outro: self.request.logo_outro,
                intro_duration: self.request.intro_duration,
                outro_duration: self.request.outro_duration,
                error: logo_outcome.error().map(str::to_string),
            }),
            text_overlays: has_overlays.then(|| OverlaySummary {
                enabled: true,
                count: self.request.text_overlays.len(),
                overlays: self.request.text_overlays.clone(),
                error: overlay_outcome.error().map(str::to_string),
            }),
        };

        let metadata_path = self.store.save_metadata(&dir, &metadata).await?;

        self.run.advance(GenerationState::Complete);
        info!(
            run_id = %self.run.id,
            final_video = %final_video.display(),
            total_cost = metadata.costs.total,
            total_seconds = metadata.timings.total,
            "Generation run complete"
        );

        Ok(PipelineOutput {
            run_id: self.run.id,
            output_dir: dir,
            final_video,
            metadata,
            metadata_path,
        })
    }

    /// Run the logo stage, never propagating its errors.
    ///
    /// Intermediate bumper clips are removed on both the success and
    /// failure paths. Returns the outcome and the stage's wall-clock
    /// seconds (zero when the stage failed).
    async fn logo_stage(
        &self,
        logo_bytes: &[u8],
        dir: &Path,
        ts: i64,
        original: &Path,
    ) -> (StageOutcome<PathBuf>, f64) {
        let started = Instant::now();
        let mut bumpers = Vec::new();

        let result = self
            .try_logo(logo_bytes, dir, ts, original, &mut bumpers)
            .await;

        for bumper in &bumpers {
            if let Err(e) = fs::remove_file(bumper).await {
                warn!("Failed to remove bumper clip {}: {}", bumper.display(), e);
            }
        }

        match result {
            Ok(Some(composited)) => (
                StageOutcome::Applied(composited),
                started.elapsed().as_secs_f64(),
            ),
            Ok(None) => (StageOutcome::Skipped, 0.0),
            Err(e) => {
                warn!(
                    run_id = %self.run.id,
                    error = %e,
                    "Logo compositing failed, continuing with the original video"
                );
                (
                    StageOutcome::Recovered {
                        fallback: original.to_path_buf(),
                        error: e.to_string(),
                    },
                    0.0,
                )
            }
        }
    }

    async fn try_logo(
        &self,
        logo_bytes: &[u8],
        dir: &Path,
        ts: i64,
        original: &Path,
        bumpers: &mut Vec<PathBuf>,
    ) -> PipelineResult<Option<PathBuf>> {
        let logo_path = self
            .store
            .save_image(logo_bytes, dir, &format!("logo_{ts}.png"))
            .await?;

        // Bumpers must match the product video's dimensions exactly
        let (width, height) = self.compositor.probe_dimensions(original).await?;
        info!(width, height, "Probed product video dimensions");

        let mut clips: Vec<PathBuf> = Vec::new();

        if self.request.logo_intro && self.request.intro_duration > 0.0 {
            let intro = dir.join(format!("logo_intro_{ts}.mp4"));
            self.compositor
                .create_bumper(
                    &logo_path,
                    &BumperSpec::intro(self.request.intro_duration, width, height),
                    &intro,
                )
                .await?;
            bumpers.push(intro.clone());
            clips.push(intro);
        }

        clips.push(original.to_path_buf());

        if self.request.logo_outro && self.request.outro_duration > 0.0 {
            let outro = dir.join(format!("logo_outro_{ts}.mp4"));
            self.compositor
                .create_bumper(
                    &logo_path,
                    &BumperSpec::outro(self.request.outro_duration, width, height),
                    &outro,
                )
                .await?;
            bumpers.push(outro.clone());
            clips.push(outro);
        }

        // Flags enabled but no bumper actually built (zero durations)
        if clips.len() == 1 {
            return Ok(None);
        }

        let composited = dir.join(format!("video_with_logo_{ts}.mp4"));
        self.compositor.concat(&clips, &composited).await?;
        Ok(Some(composited))
    }

    /// Line items are zero when the corresponding content was supplied
    /// by the caller rather than generated.
    fn compute_costs(&self, script: &str) -> CostBreakdown {
        let prompt_generated = self.request.prompt.is_none();
        let script_generated = self.request.script.is_none();

        CostBreakdown {
            vision_analysis: if prompt_generated {
                VISION_ANALYSIS_COST
            } else {
                0.0
            },
            prompt_generation: if prompt_generated {
                PROMPT_GENERATION_COST
            } else {
                0.0
            },
            script_generation: if script_generated {
                SCRIPT_GENERATION_COST
            } else {
                0.0
            },
            video_generation: self
                .video
                .cost_per_video(self.request.duration, &self.request.resolution),
            voiceover: self.voice.cost(script),
            total: 0.0,
        }
        .finalize()
    }
}
