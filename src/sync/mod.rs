//! Recording sync.
//!
//! Bridges the pure core and the outside world: committed captures become
//! persisted [`LiveRecording`](crate::manifest::LiveRecording)s and `wav`
//! messages, persisted recordings are replayed into a seed step and a
//! [`SoundTrack`](crate::core::SoundTrack), and viewer URLs are parsed into a
//! [`DeepLink`].

mod deep_link;
mod message;
mod recording;

pub use deep_link::DeepLink;
pub use message::ServerMessage;
pub use recording::{replay, RecordingSync, Replay};
