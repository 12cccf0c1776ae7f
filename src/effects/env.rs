//! Collaborators the player drives.
//!
//! The player never draws, plays or records anything itself. Everything that
//! touches a device goes through these traits, bundled in a [`PlayerEnv`]
//! that effects are run against.

use super::error::{DeviceError, ShellError};
use crate::core::{CaptureMode, Step};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;

/// Audio playback and capture.
pub trait AudioDevice: Send + Sync {
    /// Play `clip` starting at `position`.
    fn play(&self, clip: Option<&str>, position: Duration) -> Result<(), DeviceError>;

    fn stop(&self) -> Result<(), DeviceError>;

    fn start_capture(&self, mode: CaptureMode) -> Result<(), DeviceError>;

    /// Write buffered capture data. Called periodically while capturing.
    fn flush_capture(&self) -> Result<(), DeviceError>;

    /// Stop capturing and return a reference to the captured payload.
    fn finish_capture(&self) -> Result<Option<String>, DeviceError>;
}

/// Draws slides.
pub trait SlideRenderer: Send + Sync {
    /// Show `step` using the content of its slide.
    fn show(&self, step: &Step, content: &str) -> Result<(), DeviceError>;

    fn toggle_sketchpad(&self) -> Result<(), DeviceError>;
}

/// Fetches slide content.
pub trait SlideLoader: Send + Sync {
    fn load(&self, location: String) -> BoxFuture<'static, Result<String, ShellError>>;
}

/// User-visible notification channel.
pub trait Alert: Send + Sync {
    fn alert(&self, message: &str);
}

/// Environment effects are run against.
#[derive(Clone)]
pub struct PlayerEnv {
    pub audio: Arc<dyn AudioDevice>,
    pub renderer: Arc<dyn SlideRenderer>,
    pub loader: Arc<dyn SlideLoader>,
    pub alert: Arc<dyn Alert>,
}

impl PlayerEnv {
    pub fn new(
        audio: Arc<dyn AudioDevice>,
        renderer: Arc<dyn SlideRenderer>,
        loader: Arc<dyn SlideLoader>,
        alert: Arc<dyn Alert>,
    ) -> Self {
        Self {
            audio,
            renderer,
            loader,
            alert,
        }
    }
}
