//! Errors raised by the imperative shell.

use crate::builder::BuildError;
use crate::manifest::ManifestError;
use thiserror::Error;

/// Failure reported by an audio device or a slide renderer.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DeviceError {
    #[error("Audio device failed: {0}")]
    Audio(String),

    #[error("Renderer failed: {0}")]
    Render(String),
}

/// Errors talking to the companion server.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SyncError {
    #[error("Server not connected (status {status})")]
    NotConnected { status: u16 },

    #[error("Invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Failure while executing a command. The player logs these and keeps going.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ShellError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error("Could not load slide from {location}: {reason}")]
    SlideLoad { location: String, reason: String },

    #[error("Slide '{slide}' has no directory in slideDict")]
    UnmappedSlide { slide: String },

    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Errors that prevent the player from starting.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}
