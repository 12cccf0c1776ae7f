//! The imperative shell around the pure core.
//!
//! This module performs all I/O: loading the manifest and slides, talking to
//! the companion server, driving the audio device, and running the event
//! loop that feeds keys into a [`Session`](crate::dispatch::Session).
//!
//! # Key Concepts
//!
//! - **Environment**: devices are traits bundled in a [`PlayerEnv`]
//! - **Effects**: session commands become Stillwater effects run against it
//! - **Player**: one task owns the session; deferred work reports back as events

pub mod apply;
pub mod devices;
pub mod env;
pub mod error;
pub mod files;
pub mod player;
pub mod server;

pub use apply::{sound_effect, Applied, ShellEffect};
pub use devices::{LogAlert, LoggingAudio, LoggingRenderer};
pub use env::{Alert, AudioDevice, PlayerEnv, SlideLoader, SlideRenderer};
pub use error::{DeviceError, PlayerError, ShellError, SyncError};
pub use files::FileLoader;
pub use player::Player;
pub use server::ServerClient;
