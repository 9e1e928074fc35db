//! Per-run state: the state machine handle, stage timings, and
//! accumulated artifact paths.

use std::path::PathBuf;
use std::time::Instant;

use tokio::sync::watch;
use tracing::warn;
use uuid::Uuid;

use adreel_models::{GenerationState, StageTimings};

/// Artifact paths accumulated while a run progresses.
#[derive(Debug, Default, Clone)]
pub struct RunArtifacts {
    pub source_image: Option<PathBuf>,
    pub original_video: Option<PathBuf>,
    /// Present only when the logo stage produced a composited video
    pub logo_video: Option<PathBuf>,
    pub voice_track: Option<PathBuf>,
    pub merged_video: Option<PathBuf>,
    pub final_video: Option<PathBuf>,
}

/// One execution of the pipeline.
///
/// Created at job start, mutated only by the orchestrator, discarded
/// after the result is returned. The current state is published through
/// a watch channel; a single observer per run, no callback registration.
pub struct PipelineRun {
    pub id: Uuid,
    started: Instant,
    state_tx: watch::Sender<GenerationState>,
    pub timings: StageTimings,
    pub artifacts: RunArtifacts,
}

impl Default for PipelineRun {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineRun {
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(GenerationState::Idle);
        Self {
            id: Uuid::new_v4(),
            started: Instant::now(),
            state_tx,
            timings: StageTimings::default(),
            artifacts: RunArtifacts::default(),
        }
    }

    /// Current state.
    pub fn state(&self) -> GenerationState {
        *self.state_tx.borrow()
    }

    /// Receiver for observing state transitions.
    pub fn subscribe(&self) -> watch::Receiver<GenerationState> {
        self.state_tx.subscribe()
    }

    /// Move to `next`, ignoring anything but a legal forward transition.
    pub fn advance(&self, next: GenerationState) {
        let current = self.state();
        if current == next {
            return;
        }
        if !current.can_transition_to(next) {
            warn!(run_id = %self.id, from = %current, to = %next, "Ignoring illegal state transition");
            return;
        }
        // send_replace never fails; the run holds its own receiver slot
        self.state_tx.send_replace(next);
    }

    /// Seconds since the run started.
    pub fn elapsed(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

/// Outcome of an optional, fail-soft pipeline stage.
///
/// A failed stage carries the fallback artifact together with the
/// recorded error, making "continue but remember" an explicit value
/// rather than a swallowed exception.
#[derive(Debug, Clone)]
pub enum StageOutcome<T> {
    /// The stage was not requested or had nothing to do
    Skipped,
    /// The stage ran and produced a new artifact
    Applied(T),
    /// The stage failed; the run continues with the fallback artifact
    Recovered { fallback: T, error: String },
}

impl<T> StageOutcome<T> {
    /// The artifact the pipeline continues with, when the stage ran.
    pub fn artifact(&self) -> Option<&T> {
        match self {
            StageOutcome::Skipped => None,
            StageOutcome::Applied(artifact) => Some(artifact),
            StageOutcome::Recovered { fallback, .. } => Some(fallback),
        }
    }

    /// The recorded error, when the stage failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            StageOutcome::Recovered { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn was_applied(&self) -> bool {
        matches!(self, StageOutcome::Applied(_))
    }
}
