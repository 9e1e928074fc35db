//! Clip concatenation via the concat demuxer.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::command::FfmpegCommand;
use crate::error::{MediaError, MediaResult};

/// Build the newline-delimited file list fed to the concat demuxer.
fn concat_list_contents(clips: &[PathBuf]) -> String {
    clips
        .iter()
        .map(|p| format!("file '{}'", p.to_string_lossy().replace('\\', "/")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Join an ordered list of clips into one file by stream copy.
///
/// All clips must share codecs (bumpers are synthesized to match the
/// product video for this reason). A single-element list degenerates to
/// a file copy. The scratch list file is removed on success and failure.
pub async fn concat_clips(clips: &[PathBuf], output: impl AsRef<Path>) -> MediaResult<()> {
    let output = output.as_ref();

    if clips.is_empty() {
        return Err(MediaError::EmptyConcatList);
    }

    if clips.len() == 1 {
        fs::copy(&clips[0], output).await?;
        return Ok(());
    }

    info!(count = clips.len(), output = %output.display(), "Concatenating clips");

    let list_path = output
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("concat_list.txt");
    fs::write(&list_path, concat_list_contents(clips)).await?;

    let result = FfmpegCommand::new(output)
        .input_with_args(["-f", "concat", "-safe", "0"], &list_path)
        .output_args(["-c", "copy"])
        .run()
        .await;

    if let Err(e) = fs::remove_file(&list_path).await {
        warn!("Failed to remove concat list {}: {}", list_path.display(), e);
    }

    result
}
