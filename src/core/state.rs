//! Sound state of a session.
//!
//! Exactly one state holds at a time. The state only changes through the
//! gated operations of [`SoundMachine`](super::SoundMachine).

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the audio side of the player is doing.
///
/// # Example
///
/// ```rust
/// use slidecast::core::SoundState;
///
/// assert_eq!(SoundState::default(), SoundState::None);
/// assert!(SoundState::Recording.is_capturing());
/// assert!(SoundState::Live.is_capturing());
/// assert!(!SoundState::Play.is_capturing());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum SoundState {
    /// Idle, possibly paused in the middle of a segment.
    #[default]
    None,
    /// Replaying a sound track in sync with step movement.
    Play,
    /// Timed capture: every step change is stamped.
    Recording,
    /// Untimed capture: narration without per-step durations.
    Live,
}

impl SoundState {
    pub const ALL: [SoundState; 4] = [
        SoundState::None,
        SoundState::Play,
        SoundState::Recording,
        SoundState::Live,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Play => "Play",
            Self::Recording => "Recording",
            Self::Live => "Live",
        }
    }

    /// Whether audio is being captured.
    pub fn is_capturing(&self) -> bool {
        matches!(self, Self::Recording | Self::Live)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for SoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
