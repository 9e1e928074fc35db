//! Per-run output folders and artifact persistence.

use std::path::{Path, PathBuf};

use chrono::{Local, Utc};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use adreel_models::GenerationMetadata;

use crate::error::{StorageError, StorageResult};

/// Filesystem root for generated content.
///
/// Each run gets its own folder under a dated directory; a run never
/// touches another run's files.
#[derive(Debug, Clone)]
pub struct OutputStore {
    base_path: PathBuf,
    http: reqwest::Client,
}

impl OutputStore {
    /// Create a store rooted at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Create a store from `ADREEL_OUTPUT_PATH`, defaulting to
    /// `~/AdReel-Content`.
    pub fn from_env() -> Self {
        let base = std::env::var("ADREEL_OUTPUT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                std::env::var("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join("AdReel-Content")
            });
        Self::new(base)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Allocate a fresh output folder for one run:
    /// `<base>/<YYYY-MM-DD>/generation_<timestamp>/`.
    pub async fn create_run_dir(&self) -> StorageResult<PathBuf> {
        let now = Local::now();
        let date_dir = self.base_path.join(now.format("%Y-%m-%d").to_string());
        let run_dir = date_dir.join(format!("generation_{}", now.format("%Y-%m-%d_%H-%M-%S")));
        fs::create_dir_all(&run_dir).await?;

        info!(dir = %run_dir.display(), "Created run output folder");
        Ok(run_dir)
    }

    /// Persist image bytes into a run folder.
    pub async fn save_image(
        &self,
        bytes: &[u8],
        dir: &Path,
        filename: &str,
    ) -> StorageResult<PathBuf> {
        let path = dir.join(filename);
        fs::write(&path, bytes).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "Saved image");
        Ok(path)
    }

    /// Persist audio bytes into a run folder.
    pub async fn save_audio(
        &self,
        bytes: &[u8],
        dir: &Path,
        filename: &str,
    ) -> StorageResult<PathBuf> {
        let path = dir.join(filename);
        fs::write(&path, bytes).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "Saved audio");
        Ok(path)
    }

    /// Stream a remote asset into a run folder.
    pub async fn download_video(
        &self,
        url: &str,
        dir: &Path,
        filename: &str,
    ) -> StorageResult<PathBuf> {
        info!(url, filename, "Downloading synthesized asset");

        let mut response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(StorageError::download_failed(format!(
                "GET {url} returned {}",
                response.status()
            )));
        }

        let path = dir.join(filename);
        let mut file = fs::File::create(&path).await?;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        Ok(path)
    }

    /// Persist the metadata record as pretty-printed JSON.
    pub async fn save_metadata(
        &self,
        dir: &Path,
        metadata: &GenerationMetadata,
    ) -> StorageResult<PathBuf> {
        let filename = format!("metadata_{}.json", Utc::now().timestamp_millis());
        let path = dir.join(filename);
        let json = serde_json::to_vec_pretty(metadata)?;
        fs::write(&path, json).await?;

        info!(path = %path.display(), "Saved metadata record");
        Ok(path)
    }

    /// Load a metadata record from disk.
    pub async fn load_metadata(&self, path: &Path) -> StorageResult<GenerationMetadata> {
        let bytes = fs::read(path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// List metadata files in a run folder.
    pub async fn list_metadata_files(&self, dir: &Path) -> StorageResult<Vec<PathBuf>> {
        let mut entries = fs::read_dir(dir).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with("metadata_") && name.ends_with(".json") {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adreel_models::{
        ContentInfo, CostBreakdown, OutputFiles, StageTimings, VideoSettings,
    };
    use tempfile::TempDir;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_metadata() -> GenerationMetadata {
        GenerationMetadata {
            timestamp: "2025-11-03T10:00:00Z".to_string(),
            video_path: "/out/video_final_1.mp4".to_string(),
            settings: VideoSettings {
                video_model: "google/veo-3-fast".to_string(),
                duration: 6,
                aspect_ratio: "9:16".to_string(),
                resolution: "1080p".to_string(),
            },
            content: ContentInfo {
                prompt: "a pan".to_string(),
                script: "Quality.".to_string(),
                voice: "nova".to_string(),
                voice_provider: "openai".to_string(),
                theme: "informational".to_string(),
            },
            costs: CostBreakdown::default(),
            timings: StageTimings::default(),
            files: OutputFiles {
                original_video: "video_original_1.mp4".to_string(),
                voiceover: "voiceover_1.mp3".to_string(),
                final_video: "video_final_1.mp4".to_string(),
            },
            logo: None,
            text_overlays: None,
        }
    }

    #[tokio::test]
    async fn test_run_dirs_are_dated_and_unique_per_store() {
        let root = TempDir::new().unwrap();
        let store = OutputStore::new(root.path());

        let dir = store.create_run_dir().await.unwrap();
        assert!(dir.exists());
        assert!(dir
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("generation_"));
        assert_eq!(dir.parent().unwrap().parent().unwrap(), root.path());
    }

    #[tokio::test]
    async fn test_save_and_reload_metadata() {
        let root = TempDir::new().unwrap();
        let store = OutputStore::new(root.path());
        let dir = store.create_run_dir().await.unwrap();

        let path = store.save_metadata(&dir, &sample_metadata()).await.unwrap();
        let listed = store.list_metadata_files(&dir).await.unwrap();
        assert_eq!(listed, vec![path.clone()]);

        let loaded = store.load_metadata(&path).await.unwrap();
        assert_eq!(loaded.settings.video_model, "google/veo-3-fast");
    }

    #[tokio::test]
    async fn test_download_video_writes_streamed_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"video-bytes".to_vec()))
            .mount(&server)
            .await;

        let root = TempDir::new().unwrap();
        let store = OutputStore::new(root.path());
        let path = store
            .download_video(&server.uri(), root.path(), "video_original_1.mp4")
            .await
            .unwrap();

        assert_eq!(fs::read(&path).await.unwrap(), b"video-bytes");
    }

    #[tokio::test]
    async fn test_download_video_rejects_non_2xx() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let root = TempDir::new().unwrap();
        let store = OutputStore::new(root.path());
        let result = store
            .download_video(&server.uri(), root.path(), "missing.mp4")
            .await;

        assert!(matches!(result, Err(StorageError::DownloadFailed(_))));
    }
}
