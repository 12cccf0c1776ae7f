//! Sound state machine.
//!
//! Owns the [`SoundState`], the playable [`SoundTrack`] with its cursor, and
//! the [`CaptureLog`] of an ongoing capture. Every operation is gated by the
//! current state and returns the side effects the shell has to perform; the
//! machine itself never touches an audio device.

use super::graph::StepId;
use super::history::{CaptureLog, CaptureMode, CommittedCapture};
use super::state::SoundState;
use super::timeline::Direction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A stretch of a sound track during which one step is shown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub step: StepId,
    /// Offset of the segment in the audio clip.
    pub start: Duration,
    pub duration: Duration,
}

/// Playable audio synchronized to steps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SoundTrack {
    /// Reference to the audio payload, if any.
    pub clip: Option<String>,
    pub segments: Vec<Segment>,
}

impl SoundTrack {
    pub fn new(clip: Option<String>, segments: Vec<Segment>) -> Self {
        Self { clip, segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Side effect requested by a sound transition.
#[derive(Clone, Debug, PartialEq)]
pub enum SoundCommand {
    /// Play `clip` from `position` and report back after `remaining`.
    StartPlayback {
        clip: Option<String>,
        step: StepId,
        position: Duration,
        remaining: Duration,
    },
    StopPlayback,
    StartCapture(CaptureMode),
    /// Stop the device capture and persist the finished capture.
    FinishCapture(CommittedCapture),
}

/// Result of moving playback by one segment.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackMove {
    /// Step the timeline has to follow, if playback is still running.
    pub follow: Option<StepId>,
    pub commands: Vec<SoundCommand>,
}

#[derive(Clone, Debug, Default)]
pub struct SoundMachine {
    state: SoundState,
    track: SoundTrack,
    cursor: usize,
    paused_at: Duration,
    playing_since: Option<DateTime<Utc>>,
    capture: Option<CaptureLog>,
}

impl SoundMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_track(track: SoundTrack) -> Self {
        Self {
            track,
            ..Self::default()
        }
    }

    pub fn state(&self) -> SoundState {
        self.state
    }

    pub fn track(&self) -> &SoundTrack {
        &self.track
    }

    /// Index of the current segment; equal to the segment count at the end.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capture(&self) -> Option<&CaptureLog> {
        self.capture.as_ref()
    }

    /// Replace the playable track. Only possible while idle.
    pub fn load_track(&mut self, track: SoundTrack) -> bool {
        if !self.state.is_idle() {
            return false;
        }
        self.track = track;
        self.cursor = 0;
        self.paused_at = Duration::ZERO;
        true
    }

    pub fn end_of_sound(&self) -> bool {
        self.cursor >= self.track.segments.len()
    }

    /// Idle with playback stopped somewhere inside a segment.
    pub fn paused(&self) -> bool {
        self.state.is_idle() && self.paused_at > Duration::ZERO
    }

    /// Forget the paused position.
    pub fn reset(&mut self) {
        if self.state.is_idle() {
            self.paused_at = Duration::ZERO;
        }
    }

    /// Align the cursor with a step the timeline moved to. Steps without a
    /// segment put the cursor at the end of the track.
    pub fn seek(&mut self, step: StepId) {
        if !self.state.is_idle() {
            return;
        }
        self.cursor = self
            .track
            .segments
            .iter()
            .position(|s| s.step == step)
            .unwrap_or(self.track.segments.len());
        self.paused_at = Duration::ZERO;
    }

    /// Start playback from the current segment. `None -> Play`.
    pub fn play(&mut self, now: DateTime<Utc>) -> PlaybackMove {
        if !self.state.is_idle() || self.end_of_sound() {
            return PlaybackMove::idle();
        }
        self.state = SoundState::Play;
        self.start_segment(now)
    }

    /// Stop whatever is running. Playback keeps its position; a capture is
    /// finished and handed back for persistence.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Vec<SoundCommand> {
        match self.state {
            SoundState::None => Vec::new(),
            SoundState::Play => {
                let played = self
                    .playing_since
                    .take()
                    .and_then(|since| now.signed_duration_since(since).to_std().ok())
                    .unwrap_or(Duration::ZERO);
                let limit = self.current_segment().map(|s| s.duration).unwrap_or_default();
                self.paused_at = (self.paused_at + played).min(limit);
                self.state = SoundState::None;
                vec![SoundCommand::StopPlayback]
            }
            SoundState::Recording | SoundState::Live => {
                self.state = SoundState::None;
                match self.capture.take() {
                    Some(log) => vec![SoundCommand::FinishCapture(log.finish(now))],
                    None => Vec::new(),
                }
            }
        }
    }

    /// Begin a timed capture at `step`. `None -> Recording`.
    pub fn record(&mut self, step: StepId, now: DateTime<Utc>) -> Vec<SoundCommand> {
        self.begin_capture(CaptureMode::Timed, step, now)
    }

    /// Begin an untimed capture at `step`. `None -> Live`.
    pub fn live(&mut self, step: StepId, now: DateTime<Utc>) -> Vec<SoundCommand> {
        self.begin_capture(CaptureMode::Live, step, now)
    }

    fn begin_capture(
        &mut self,
        mode: CaptureMode,
        step: StepId,
        now: DateTime<Utc>,
    ) -> Vec<SoundCommand> {
        if !self.state.is_idle() {
            return Vec::new();
        }
        self.reset();
        let mut log = CaptureLog::start(mode, now);
        log.mark(step, now);
        self.capture = Some(log);
        self.state = match mode {
            CaptureMode::Timed => SoundState::Recording,
            CaptureMode::Live => SoundState::Live,
        };
        vec![SoundCommand::StartCapture(mode)]
    }

    /// Stamp a step change into the running capture.
    pub fn mark(&mut self, step: StepId, now: DateTime<Utc>) -> bool {
        match self.capture.as_mut() {
            Some(log) if self.state.is_capturing() => {
                log.mark(step, now);
                true
            }
            _ => false,
        }
    }

    /// Move playback one segment. Only meaningful while playing; running off
    /// the end of the track stops playback.
    pub fn advance(&mut self, direction: Direction, now: DateTime<Utc>) -> PlaybackMove {
        if self.state != SoundState::Play {
            return PlaybackMove::idle();
        }
        let target = match direction {
            Direction::Forward => self.cursor + 1,
            Direction::Backward => self.cursor.saturating_sub(1),
        };
        self.paused_at = Duration::ZERO;

        if target >= self.track.segments.len() {
            self.cursor = self.track.segments.len();
            self.playing_since = None;
            self.state = SoundState::None;
            return PlaybackMove {
                follow: None,
                commands: vec![SoundCommand::StopPlayback],
            };
        }

        self.cursor = target;
        self.start_segment(now)
    }

    fn current_segment(&self) -> Option<&Segment> {
        self.track.segments.get(self.cursor)
    }

    fn start_segment(&mut self, now: DateTime<Utc>) -> PlaybackMove {
        let Some(segment) = self.track.segments.get(self.cursor) else {
            return PlaybackMove::idle();
        };
        let command = SoundCommand::StartPlayback {
            clip: self.track.clip.clone(),
            step: segment.step,
            position: segment.start + self.paused_at,
            remaining: segment.duration.saturating_sub(self.paused_at),
        };
        let follow = Some(segment.step);
        self.playing_since = Some(now);
        PlaybackMove {
            follow,
            commands: vec![command],
        }
    }
}

impl PlaybackMove {
    fn idle() -> Self {
        Self {
            follow: None,
            commands: Vec::new(),
        }
    }
}
