//! Capture history: the step marks collected while recording.
//!
//! A [`CaptureLog`] is opened when a Recording or Live session starts and
//! collects one mark per step the narrator visits. Finishing it turns the
//! absolute timestamps into offsets from the start of the capture, and, for
//! timed captures, into per-step durations.

use super::graph::StepId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Kind of capture.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    /// Each step change is stamped with a duration.
    Timed,
    /// Untimed narration; only step start offsets are kept.
    Live,
}

/// A step reached during a capture.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptureEvent {
    pub step: StepId,
    pub timestamp: DateTime<Utc>,
}

/// Ordered marks of an in-progress capture.
///
/// # Example
///
/// ```rust
/// use slidecast::core::{CaptureLog, CaptureMode, StepId};
/// use chrono::{Duration, Utc};
///
/// let start = Utc::now();
/// let mut log = CaptureLog::start(CaptureMode::Timed, start);
/// log.mark(StepId::ROOT, start);
///
/// let committed = log.finish(start + Duration::seconds(3));
/// assert_eq!(committed.marks.len(), 1);
/// assert_eq!(committed.marks[0].duration, Some(std::time::Duration::from_secs(3)));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptureLog {
    mode: CaptureMode,
    started_at: DateTime<Utc>,
    events: Vec<CaptureEvent>,
}

impl CaptureLog {
    pub fn start(mode: CaptureMode, now: DateTime<Utc>) -> Self {
        Self {
            mode,
            started_at: now,
            events: Vec::new(),
        }
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Record that `step` was reached at `now`.
    pub fn mark(&mut self, step: StepId, now: DateTime<Utc>) {
        self.events.push(CaptureEvent {
            step,
            timestamp: now,
        });
    }

    pub fn events(&self) -> &[CaptureEvent] {
        &self.events
    }

    /// Steps in the order they were marked.
    pub fn steps(&self) -> Vec<StepId> {
        self.events.iter().map(|e| e.step).collect()
    }

    /// Close the log at `now`.
    pub fn finish(self, now: DateTime<Utc>) -> CommittedCapture {
        let started_at = self.started_at;
        let offset = |t: DateTime<Utc>| elapsed(started_at, t);
        let timed = self.mode == CaptureMode::Timed;

        let marks = self
            .events
            .iter()
            .enumerate()
            .map(|(i, event)| {
                let end = self
                    .events
                    .get(i + 1)
                    .map(|next| next.timestamp)
                    .unwrap_or(now);
                CommittedMark {
                    step: event.step,
                    start: offset(event.timestamp),
                    duration: timed.then(|| elapsed(event.timestamp, end)),
                }
            })
            .collect();

        CommittedCapture {
            mode: self.mode,
            started_at,
            length: offset(now),
            marks,
        }
    }
}

/// A mark after its capture has been closed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommittedMark {
    pub step: StepId,
    /// Offset from the start of the capture.
    pub start: Duration,
    /// Time spent on the step; only timed captures carry it.
    pub duration: Option<Duration>,
}

/// A finished capture, ready to be persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommittedCapture {
    pub mode: CaptureMode,
    pub started_at: DateTime<Utc>,
    pub length: Duration,
    pub marks: Vec<CommittedMark>,
}

fn elapsed(from: DateTime<Utc>, to: DateTime<Utc>) -> Duration {
    to.signed_duration_since(from)
        .to_std()
        .unwrap_or(Duration::ZERO)
}
