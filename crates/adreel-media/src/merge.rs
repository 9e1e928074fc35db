//! Video/audio merging.

use std::path::Path;
use tracing::info;

use crate::command::FfmpegCommand;
use crate::error::MediaResult;

/// Combine a video-only clip with an independently produced audio track.
///
/// Video is stream-copied; audio is re-encoded to AAC. The output is
/// truncated to the shorter of the two streams.
pub async fn merge_video_audio(
    video: impl AsRef<Path>,
    audio: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let video = video.as_ref();
    let audio = audio.as_ref();
    let output = output.as_ref();

    info!(
        video = %video.display(),
        audio = %audio.display(),
        "Merging video with voice track"
    );

    FfmpegCommand::new(output)
        .input(video)
        .input(audio)
        .video_codec("copy")
        .audio_codec("aac")
        .output_args(["-map", "0:v:0", "-map", "1:a:0", "-shortest"])
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_args() {
        let cmd = FfmpegCommand::new("final.mp4")
            .input("video.mp4")
            .input("voice.mp3")
            .video_codec("copy")
            .audio_codec("aac")
            .output_args(["-map", "0:v:0", "-map", "1:a:0", "-shortest"]);
        let args = cmd.build_args();

        assert!(args.windows(2).any(|w| w == ["-c:v", "copy"]));
        assert!(args.windows(2).any(|w| w == ["-c:a", "aac"]));
        assert!(args.contains(&"-shortest".to_string()));
    }
}
