//! Pipeline state machine.
//!
//! A run moves strictly forward through the states below; the only
//! exception is the terminal `Error` state, reachable from any
//! non-terminal state.

use serde::{Deserialize, Serialize};

/// Current phase of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GenerationState {
    /// Run created, nothing started yet
    #[default]
    Idle,
    /// Persisting the source image into the run folder
    UploadingImage,
    /// Vision call producing the scene prompt
    AnalyzingImage,
    /// Text call producing the voiceover script
    GeneratingScript,
    /// Remote video synthesis, asset download, and logo compositing
    GeneratingVideo,
    /// Text-to-speech call
    GeneratingVoiceover,
    /// Combining the video with the voice track
    MergingAudio,
    /// Overlay burn-in, cost accounting, and metadata emission
    SavingFiles,
    /// Run finished successfully
    Complete,
    /// Run aborted; the pipeline result carries the message
    Error,
}

impl GenerationState {
    /// Get string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationState::Idle => "idle",
            GenerationState::UploadingImage => "uploading_image",
            GenerationState::AnalyzingImage => "analyzing_image",
            GenerationState::GeneratingScript => "generating_script",
            GenerationState::GeneratingVideo => "generating_video",
            GenerationState::GeneratingVoiceover => "generating_voiceover",
            GenerationState::MergingAudio => "merging_audio",
            GenerationState::SavingFiles => "saving_files",
            GenerationState::Complete => "complete",
            GenerationState::Error => "error",
        }
    }

    /// Human-readable progress message for this state.
    pub fn message(&self) -> &'static str {
        match self {
            GenerationState::Idle => "Ready to generate",
            GenerationState::UploadingImage => "Uploading image...",
            GenerationState::AnalyzingImage => "Analyzing image with AI...",
            GenerationState::GeneratingScript => "Writing voiceover script...",
            GenerationState::GeneratingVideo => "Generating video (1-2 min)...",
            GenerationState::GeneratingVoiceover => "Creating voiceover audio...",
            GenerationState::MergingAudio => "Merging video with voiceover...",
            GenerationState::SavingFiles => "Saving files...",
            GenerationState::Complete => "Complete!",
            GenerationState::Error => "Error occurred",
        }
    }

    /// Rough overall progress (0-100) for this state.
    pub fn progress(&self) -> u8 {
        match self {
            GenerationState::Idle => 0,
            GenerationState::UploadingImage => 5,
            GenerationState::AnalyzingImage => 10,
            GenerationState::GeneratingScript => 25,
            // Video synthesis dominates end-to-end latency
            GenerationState::GeneratingVideo => 40,
            GenerationState::GeneratingVoiceover => 85,
            GenerationState::MergingAudio => 90,
            GenerationState::SavingFiles => 95,
            GenerationState::Complete => 100,
            GenerationState::Error => 0,
        }
    }

    /// Ordering rank used to enforce forward-only transitions.
    pub fn rank(&self) -> u8 {
        match self {
            GenerationState::Idle => 0,
            GenerationState::UploadingImage => 1,
            GenerationState::AnalyzingImage => 2,
            GenerationState::GeneratingScript => 3,
            GenerationState::GeneratingVideo => 4,
            GenerationState::GeneratingVoiceover => 5,
            GenerationState::MergingAudio => 6,
            GenerationState::SavingFiles => 7,
            GenerationState::Complete => 8,
            GenerationState::Error => 9,
        }
    }

    /// Check if this is a terminal state (no more transitions expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationState::Complete | GenerationState::Error)
    }

    /// Whether `next` is a legal transition from this state.
    ///
    /// Forward moves are allowed (stages a run skips, such as prompt
    /// generation when a prompt was supplied, are simply stepped over);
    /// `Error` is reachable from any non-terminal state.
    pub fn can_transition_to(&self, next: GenerationState) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == GenerationState::Error {
            return true;
        }
        next.rank() > self.rank()
    }
}

impl std::fmt::Display for GenerationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
