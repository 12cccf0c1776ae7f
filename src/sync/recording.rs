//! Conversion between captures, persisted recordings and playable tracks.

use super::message::ServerMessage;
use crate::core::{CommittedCapture, Segment, SoundTrack, StepGraph, StepId};
use crate::manifest::{LiveRecording, RecordedStep};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// A persisted recording mapped onto the step graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Replay {
    /// Deepest step the recording reached; the recorded timeline follows the
    /// branch leading to it.
    pub seed: StepId,
    pub track: SoundTrack,
}

/// Map a recording onto `graph`. Entries whose path does not exist in the
/// graph are skipped.
pub fn replay(graph: &StepGraph, recording: &LiveRecording) -> Replay {
    let mut segments = Vec::with_capacity(recording.steps.len());
    let mut seed = StepId::ROOT;

    for (i, entry) in recording.steps.iter().enumerate() {
        let Some(step) = graph.find_path(&entry.step) else {
            warn!(path = ?entry.step, "recording references unknown step, skipping");
            continue;
        };
        let end = recording
            .steps
            .get(i + 1)
            .map(|next| next.start)
            .unwrap_or(recording.length);
        let duration = entry.duration.unwrap_or(end - entry.start);

        segments.push(Segment {
            step,
            start: seconds(entry.start),
            duration: seconds(duration),
        });
        if graph.step(step).depth() >= graph.step(seed).depth() {
            seed = step;
        }
    }

    debug!(segments = segments.len(), %seed, "mapped recording onto graph");
    Replay {
        seed,
        track: SoundTrack::new(recording.sound.clone(), segments),
    }
}

fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value.max(0.0)).unwrap_or_default()
}

/// Turns committed captures into persisted recordings.
#[derive(Clone, Debug)]
pub struct RecordingSync {
    graph: Arc<StepGraph>,
}

impl RecordingSync {
    pub fn new(graph: Arc<StepGraph>) -> Self {
        Self { graph }
    }

    /// Persisted form of a finished capture. `sound` references the audio
    /// payload produced by the device, if any.
    pub fn to_recording(&self, capture: &CommittedCapture, sound: Option<String>) -> LiveRecording {
        let steps = capture
            .marks
            .iter()
            .filter_map(|mark| {
                let step = self.graph.get(mark.step)?;
                Some(RecordedStep {
                    step: step.path().to_vec(),
                    start: mark.start.as_secs_f64(),
                    duration: mark.duration.map(|d| d.as_secs_f64()),
                })
            })
            .collect();

        LiveRecording {
            id: Some(Uuid::new_v4()),
            mode: capture.mode,
            recorded_at: Some(capture.started_at),
            length: capture.length.as_secs_f64(),
            sound,
            steps,
        }
    }

    /// The `wav` message for a finished capture, together with the
    /// recording it carries.
    pub fn commit_message(
        &self,
        capture: &CommittedCapture,
        sound: Option<String>,
    ) -> (LiveRecording, ServerMessage) {
        let recording = self.to_recording(capture, sound);
        let message = ServerMessage::Wav {
            presentation: None,
            recording: recording.clone(),
        };
        (recording, message)
    }

    pub fn replay(&self, recording: &LiveRecording) -> Replay {
        replay(&self.graph, recording)
    }
}
