//! Headless devices used by the command-line player.
//!
//! There is no sound card or screen behind these: they log what a real
//! device would do, which is enough to drive and inspect a presentation from
//! a terminal.

use super::env::{Alert, AudioDevice, SlideRenderer};
use super::error::DeviceError;
use crate::core::{CaptureMode, Step};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{error, info};
use uuid::Uuid;

/// Audio device that logs instead of playing and names each capture with a
/// fresh uuid.
#[derive(Debug, Default)]
pub struct LoggingAudio {
    capture: Mutex<Option<(CaptureMode, Uuid)>>,
}

impl LoggingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<(CaptureMode, Uuid)>>, DeviceError> {
        self.capture
            .lock()
            .map_err(|_| DeviceError::Audio("capture state poisoned".into()))
    }
}

impl AudioDevice for LoggingAudio {
    fn play(&self, clip: Option<&str>, position: Duration) -> Result<(), DeviceError> {
        info!(clip = clip.unwrap_or("<none>"), position_ms = position.as_millis() as u64, "play");
        Ok(())
    }

    fn stop(&self) -> Result<(), DeviceError> {
        info!("stop playback");
        Ok(())
    }

    fn start_capture(&self, mode: CaptureMode) -> Result<(), DeviceError> {
        let id = Uuid::new_v4();
        *self.lock()? = Some((mode, id));
        info!(?mode, %id, "capture started");
        Ok(())
    }

    fn flush_capture(&self) -> Result<(), DeviceError> {
        if let Some((_, id)) = *self.lock()? {
            tracing::trace!(%id, "capture flushed");
        }
        Ok(())
    }

    fn finish_capture(&self) -> Result<Option<String>, DeviceError> {
        let finished = self.lock()?.take();
        Ok(finished.map(|(mode, id)| {
            info!(?mode, %id, "capture finished");
            format!("live/{id}.webm")
        }))
    }
}

/// Renderer that logs the step being shown.
#[derive(Debug, Default)]
pub struct LoggingRenderer {
    sketching: AtomicBool,
}

impl SlideRenderer for LoggingRenderer {
    fn show(&self, step: &Step, content: &str) -> Result<(), DeviceError> {
        info!(
            step = %step.id(),
            path = ?step.path(),
            slide = step.slide().unwrap_or("-"),
            name = step.name().unwrap_or(""),
            bytes = content.len(),
            "show"
        );
        Ok(())
    }

    fn toggle_sketchpad(&self) -> Result<(), DeviceError> {
        let was = self.sketching.fetch_xor(true, Ordering::Relaxed);
        info!(sketching = !was, "sketchpad toggled");
        Ok(())
    }
}

/// Alerts go to the error log, which the CLI writes to stderr.
#[derive(Debug, Default)]
pub struct LogAlert;

impl Alert for LogAlert {
    fn alert(&self, message: &str) {
        error!(%message, "alert");
    }
}
