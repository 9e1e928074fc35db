//! End-to-end pipeline tests.
//!
//! Remote services are wiremock-backed; compositing runs against an
//! in-process fake so no FFmpeg binary is needed.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::fs;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use adreel_media::{BumperSpec, Compositing, MediaError, MediaResult};
use adreel_models::{
    GenerationRequest, GenerationState, OverlayPosition, TextOverlay, ThemeTextStyle,
    VideoProviderKind, VoiceProviderKind,
};
use adreel_pipeline::{BrandProfile, ContentGenerator, GenerationPipeline, OpenAiContent, PipelineError};
use adreel_storage::OutputStore;
use adreel_synthesis::{video_provider, voice_provider, ReplicateClient, SynthesisConfig};

/// Compositing fake: deterministic byte-level operations, with
/// switchable failures for the two optional stages.
#[derive(Default)]
struct FakeCompositor {
    fail_bumper: bool,
    fail_overlays: bool,
}

#[async_trait]
impl Compositing for FakeCompositor {
    async fn create_bumper(
        &self,
        _image: &Path,
        spec: &BumperSpec,
        output: &Path,
    ) -> MediaResult<()> {
        if self.fail_bumper {
            return Err(MediaError::ffmpeg_failed(
                "bumper synthesis exploded",
                None,
                Some(1),
            ));
        }
        fs::write(output, format!("bumper:{}x{};", spec.width, spec.height)).await?;
        Ok(())
    }

    async fn concat(&self, clips: &[PathBuf], output: &Path) -> MediaResult<()> {
        let mut bytes = Vec::new();
        for clip in clips {
            bytes.extend(fs::read(clip).await?);
        }
        fs::write(output, bytes).await?;
        Ok(())
    }

    async fn probe_dimensions(&self, _video: &Path) -> MediaResult<(u32, u32)> {
        Ok((1080, 1920))
    }

    async fn merge(&self, video: &Path, audio: &Path, output: &Path) -> MediaResult<()> {
        let mut bytes = fs::read(video).await?;
        bytes.extend(fs::read(audio).await?);
        fs::write(output, bytes).await?;
        Ok(())
    }

    async fn burn_overlays(
        &self,
        video: &Path,
        overlays: &[TextOverlay],
        _style: &ThemeTextStyle,
        output: &Path,
    ) -> MediaResult<()> {
        if self.fail_overlays {
            return Err(MediaError::ffmpeg_failed("drawtext exploded", None, Some(1)));
        }
        let mut bytes = fs::read(video).await?;
        bytes.extend(format!("+{} overlays", overlays.len()).into_bytes());
        fs::write(output, bytes).await?;
        Ok(())
    }
}

fn synthesis_config(base_url: &str) -> SynthesisConfig {
    SynthesisConfig {
        replicate_api_token: "test-token".to_string(),
        replicate_base_url: base_url.to_string(),
        openai_api_key: "sk-test".to_string(),
        openai_base_url: base_url.to_string(),
        poll_interval: std::time::Duration::from_millis(10),
        ..SynthesisConfig::default()
    }
}

fn request() -> GenerationRequest {
    let mut request = GenerationRequest::new(vec![0xFF, 0xD8, 0xFF, 0xE0]);
    request.video_provider = VideoProviderKind::Veo3Fast;
    request.voice_provider = VoiceProviderKind::Openai;
    request.duration = 6;
    request.aspect_ratio = "9:16".to_string();
    request.resolution = "1080p".to_string();
    request.voice = "nova".to_string();
    request
}

/// Build a pipeline against wiremock services and the given compositor.
fn pipeline(
    server: &MockServer,
    store_root: &Path,
    request: GenerationRequest,
    compositor: FakeCompositor,
) -> GenerationPipeline {
    let config = synthesis_config(&server.uri());
    let client = Arc::new(ReplicateClient::new(&config).unwrap());
    let video = video_provider(request.video_provider, client);
    let voice = voice_provider(request.voice_provider, &config).unwrap();
    let content: Arc<dyn ContentGenerator> =
        Arc::new(OpenAiContent::new(&config, BrandProfile::default()).unwrap());

    GenerationPipeline::new(
        request,
        video,
        voice,
        content,
        Arc::new(compositor),
        OutputStore::new(store_root),
    )
}

/// Mount the full set of remote-service mocks for a happy-path run.
async fn mount_remote_services(server: &MockServer) {
    // Chat completions serve the scene prompt, product identification,
    // and script generation alike
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{ "message": { "role": "assistant",
                "content": "Slow dolly over a copper kettle in warm light." } }]
        })))
        .mount(server)
        .await;

    // Video prediction resolves immediately to an asset on this server
    Mock::given(method("POST"))
        .and(path("/v1/models/google/veo-3-fast/predictions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "pred-1",
            "status": "succeeded",
            "output": format!("{}/assets/video.mp4", server.uri()),
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/assets/video.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"product-video;".to_vec()))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"voice-track;".to_vec()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_run_with_logo_and_overlays() {
    let server = MockServer::start().await;
    mount_remote_services(&server).await;
    let root = TempDir::new().unwrap();

    let mut request = request();
    request.logo = Some(vec![0x89, 0x50, 0x4E, 0x47]);
    request.logo_intro = true;
    request.intro_duration = 2.0;
    request.text_overlays = vec![TextOverlay::new("NEW", OverlayPosition::TopRight, 0.0, 6.0)];

    let pipeline = pipeline(&server, root.path(), request, FakeCompositor::default());
    let state = pipeline.state();
    let output = pipeline.execute().await.unwrap();

    assert_eq!(*state.borrow(), GenerationState::Complete);

    // intro bumper + product video, then the voice track, then the overlay pass
    let final_bytes = fs::read(&output.final_video).await.unwrap();
    assert_eq!(
        final_bytes,
        b"bumper:1080x1920;product-video;voice-track;+1 overlays".to_vec()
    );

    // Optional stages succeeded: no recorded errors
    let logo = output.metadata.logo.as_ref().unwrap();
    assert!(logo.error.is_none());
    assert!(logo.intro);
    let overlays = output.metadata.text_overlays.as_ref().unwrap();
    assert_eq!(overlays.count, 1);
    assert!(overlays.error.is_none());

    // Generated content flowed into the metadata record
    assert_eq!(
        output.metadata.content.prompt,
        "Slow dolly over a copper kettle in warm light."
    );

    // Intermediate bumper clips are cleaned up
    let mut entries = fs::read_dir(&output.output_dir).await.unwrap();
    while let Some(entry) = entries.next_entry().await.unwrap() {
        let name = entry.file_name().to_string_lossy().into_owned();
        assert!(
            !name.starts_with("logo_intro_"),
            "bumper intermediate {name} should have been removed"
        );
    }

    // The metadata record round-trips from disk
    let store = OutputStore::new(root.path());
    let loaded = store.load_metadata(&output.metadata_path).await.unwrap();
    assert_eq!(loaded.files.final_video, output.metadata.files.final_video);
}

#[tokio::test]
async fn test_out_of_envelope_request_aborts_before_any_remote_call() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();

    let mut request = request();
    // 480p is outside Veo 3 Fast's envelope
    request.resolution = "480p".to_string();
    request.prompt = Some("a pan".to_string());
    request.script = Some("Quality.".to_string());

    let pipeline = pipeline(&server, root.path(), request, FakeCompositor::default());
    let state = pipeline.state();
    let result = pipeline.execute().await;

    match result {
        Err(PipelineError::InvalidRequest(message)) => {
            assert!(message.contains("Resolution must be one of"));
        }
        other => panic!("expected InvalidRequest, got {other:?}"),
    }
    assert_eq!(*state.borrow(), GenerationState::Error);

    // No remote call was issued and no output location was allocated
    assert!(server.received_requests().await.unwrap().is_empty());
    let mut entries = std::fs::read_dir(root.path()).unwrap();
    assert!(entries.next().is_none());
}

#[tokio::test]
async fn test_invalid_voice_rejected_upfront() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();

    let mut request = request();
    // Valid for ElevenLabs, not for OpenAI TTS
    request.voice = "preethi".to_string();

    let pipeline = pipeline(&server, root.path(), request, FakeCompositor::default());
    let result = pipeline.execute().await;

    match result {
        Err(PipelineError::InvalidRequest(message)) => {
            assert!(message.contains("preethi"));
        }
        other => panic!("expected InvalidRequest, got {other:?}"),
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_logo_failure_is_fail_soft() {
    let server = MockServer::start().await;
    mount_remote_services(&server).await;
    let root = TempDir::new().unwrap();

    let mut request = request();
    request.prompt = Some("a pan".to_string());
    request.script = Some("Quality you can feel.".to_string());
    request.logo = Some(vec![0x89, 0x50, 0x4E, 0x47]);
    request.logo_intro = true;
    request.logo_outro = true;
    request.intro_duration = 2.0;
    request.outro_duration = 2.0;

    let pipeline = pipeline(
        &server,
        root.path(),
        request,
        FakeCompositor {
            fail_bumper: true,
            ..FakeCompositor::default()
        },
    );
    let output = pipeline.execute().await.unwrap();

    // The run completed on the un-composited product video
    let final_bytes = fs::read(&output.final_video).await.unwrap();
    assert_eq!(final_bytes, b"product-video;voice-track;".to_vec());

    let logo = output.metadata.logo.as_ref().unwrap();
    assert!(logo.error.as_ref().unwrap().contains("bumper synthesis exploded"));
    // A failed stage resets its recorded timing
    assert_eq!(output.metadata.timings.logo, 0.0);
}

#[tokio::test]
async fn test_overlay_failure_is_fail_soft() {
    let server = MockServer::start().await;
    mount_remote_services(&server).await;
    let root = TempDir::new().unwrap();

    let mut request = request();
    request.prompt = Some("a pan".to_string());
    request.script = Some("Quality.".to_string());
    request.text_overlays = vec![TextOverlay::new("SALE", OverlayPosition::TopLeft, 0.0, 4.0)];

    let pipeline = pipeline(
        &server,
        root.path(),
        request,
        FakeCompositor {
            fail_overlays: true,
            ..FakeCompositor::default()
        },
    );
    let output = pipeline.execute().await.unwrap();

    // Final video equals what it would be without overlay compositing
    let final_bytes = fs::read(&output.final_video).await.unwrap();
    assert_eq!(final_bytes, b"product-video;voice-track;".to_vec());

    let overlays = output.metadata.text_overlays.as_ref().unwrap();
    assert!(overlays.error.as_ref().unwrap().contains("drawtext exploded"));
    assert_eq!(output.metadata.timings.overlays, 0.0);
}

#[tokio::test]
async fn test_caller_supplied_content_zeroes_cost_lines() {
    let server = MockServer::start().await;
    mount_remote_services(&server).await;
    let root = TempDir::new().unwrap();

    let mut request = request();
    request.prompt = Some("a pan".to_string());
    request.script = Some("Quality you can feel.".to_string());
    let script_len = request.script.as_ref().unwrap().len();

    let pipeline = pipeline(&server, root.path(), request, FakeCompositor::default());
    let output = pipeline.execute().await.unwrap();

    let costs = &output.metadata.costs;
    assert_eq!(costs.vision_analysis, 0.0);
    assert_eq!(costs.prompt_generation, 0.0);
    assert_eq!(costs.script_generation, 0.0);
    // Veo 3 Fast: flat $0.10/s
    assert!((costs.video_generation - 0.60).abs() < 1e-9);
    let expected_voiceover = (script_len as f64 / 1000.0) * 0.015;
    assert!((costs.voiceover - expected_voiceover).abs() < 1e-9);
    assert!(
        (costs.total
            - (costs.vision_analysis
                + costs.prompt_generation
                + costs.script_generation
                + costs.video_generation
                + costs.voiceover))
            .abs()
            < 1e-12
    );

    // No chat completion was needed
    let chat_calls = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/v1/chat/completions")
        .count();
    assert_eq!(chat_calls, 0);
}
