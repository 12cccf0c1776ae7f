//! Pure navigation and sound core.
//!
//! This module contains the state of a presentation session without any I/O:
//! - the immutable step graph
//! - the timeline cursor with its redo stack
//! - the sound state machine and the capture history
//! - guard predicates used to gate controls
//!
//! Nothing here performs side effects. Operations return the commands the
//! shell in [`crate::effects`] has to carry out.

mod graph;
mod guard;
mod history;
mod sound;
mod state;
mod timeline;

pub use graph::{Step, StepGraph, StepId, StepNode};
pub use guard::{CaptureContext, Guard};
pub use history::{CaptureEvent, CaptureLog, CaptureMode, CommittedCapture, CommittedMark};
pub use sound::{PlaybackMove, Segment, SoundCommand, SoundMachine, SoundTrack};
pub use state::SoundState;
pub use timeline::{Direction, Timeline, TimelineKind};
