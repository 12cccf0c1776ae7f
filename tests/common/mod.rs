//! Common test utilities for player runtime tests
//!
//! Fake devices that log every call, a slide loader with per-slide delays,
//! and helpers to lay out a presentation directory and feed keys.

#![allow(dead_code)]

use futures::future::BoxFuture;
use futures::FutureExt;
use slidecast::config::PlayerConfig;
use slidecast::core::{CaptureMode, Step};
use slidecast::dispatch::{Input, KeyAction, Session};
use slidecast::effects::{
    Alert, AudioDevice, DeviceError, Player, PlayerEnv, ShellError, SlideLoader, SlideRenderer,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// root(a) { [0](b) { [0,0](c) }, [1] "aside" }, with one timed recording
/// covering the root and step [0].
pub const MANIFEST: &str = r#"{
    "presentation": "Runtime",
    "tree": {
        "slide": "a",
        "children": [
            { "slide": "b", "children": [ { "slide": "c" } ] },
            { "name": "aside" }
        ]
    },
    "slideDict": { "a": "a", "b": "b", "c": "c" },
    "live": [
        {
            "length": 1.0,
            "sound": "live/0.webm",
            "steps": [
                { "step": [], "start": 0.0, "duration": 0.3 },
                { "step": [0], "start": 0.3, "duration": 0.7 }
            ]
        }
    ]
}"#;

#[derive(Default)]
pub struct Log(Mutex<Vec<String>>);

impl Log {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.entries().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

pub struct FakeAudio(pub Arc<Log>);

impl AudioDevice for FakeAudio {
    fn play(&self, clip: Option<&str>, _position: Duration) -> Result<(), DeviceError> {
        self.0.push(format!("play {}", clip.unwrap_or("-")));
        Ok(())
    }

    fn stop(&self) -> Result<(), DeviceError> {
        self.0.push("stop");
        Ok(())
    }

    fn start_capture(&self, mode: CaptureMode) -> Result<(), DeviceError> {
        self.0.push(format!("capture {mode:?}"));
        Ok(())
    }

    fn flush_capture(&self) -> Result<(), DeviceError> {
        Ok(())
    }

    fn finish_capture(&self) -> Result<Option<String>, DeviceError> {
        self.0.push("finish");
        Ok(Some("take.webm".to_string()))
    }
}

/// Audio device whose capture cannot be finalized.
pub struct FailingFinishAudio(pub Arc<Log>);

impl AudioDevice for FailingFinishAudio {
    fn play(&self, clip: Option<&str>, position: Duration) -> Result<(), DeviceError> {
        FakeAudio(self.0.clone()).play(clip, position)
    }

    fn stop(&self) -> Result<(), DeviceError> {
        FakeAudio(self.0.clone()).stop()
    }

    fn start_capture(&self, mode: CaptureMode) -> Result<(), DeviceError> {
        FakeAudio(self.0.clone()).start_capture(mode)
    }

    fn flush_capture(&self) -> Result<(), DeviceError> {
        Ok(())
    }

    fn finish_capture(&self) -> Result<Option<String>, DeviceError> {
        self.0.push("finish");
        Err(DeviceError::Audio("encoder crashed".into()))
    }
}

pub struct FakeRenderer(pub Arc<Log>);

impl SlideRenderer for FakeRenderer {
    fn show(&self, step: &Step, _content: &str) -> Result<(), DeviceError> {
        self.0.push(format!("show {}", step.id().index()));
        Ok(())
    }

    fn toggle_sketchpad(&self) -> Result<(), DeviceError> {
        self.0.push("sketch");
        Ok(())
    }
}

/// Loader that answers after a per-slide delay, or fails for listed slides.
#[derive(Default)]
pub struct FakeLoader {
    pub delays: HashMap<String, Duration>,
    pub failing: Vec<String>,
}

impl FakeLoader {
    fn slide_of(location: &str) -> String {
        location
            .rsplit('/')
            .nth(1)
            .unwrap_or_default()
            .to_string()
    }
}

impl SlideLoader for FakeLoader {
    fn load(&self, location: String) -> BoxFuture<'static, Result<String, ShellError>> {
        let slide = Self::slide_of(&location);
        let delay = self.delays.get(&slide).copied().unwrap_or_default();
        let fails = self.failing.contains(&slide);
        async move {
            tokio::time::sleep(delay).await;
            if fails {
                Err(ShellError::SlideLoad {
                    location,
                    reason: "not found".into(),
                })
            } else {
                Ok(format!("<svg id=\"{slide}\"/>"))
            }
        }
        .boxed()
    }
}

pub struct FakeAlert(pub Arc<Log>);

impl Alert for FakeAlert {
    fn alert(&self, message: &str) {
        self.0.push(format!("alert {message}"));
    }
}

pub fn env(log: &Arc<Log>, loader: FakeLoader) -> PlayerEnv {
    env_with_audio(log, Arc::new(FakeAudio(log.clone())), loader)
}

pub fn env_with_audio(log: &Arc<Log>, audio: Arc<dyn AudioDevice>, loader: FakeLoader) -> PlayerEnv {
    PlayerEnv::new(
        audio,
        Arc::new(FakeRenderer(log.clone())),
        Arc::new(loader),
        Arc::new(FakeAlert(log.clone())),
    )
}

/// Write `manifest.json` and one `image.svg` per slide directory.
pub fn write_presentation(dir: &Path, manifest: &str) {
    std::fs::write(dir.join("manifest.json"), manifest).unwrap();
    for slide in ["a", "b", "c"] {
        std::fs::create_dir_all(dir.join(slide)).unwrap();
        std::fs::write(dir.join(slide).join("image.svg"), format!("<svg id=\"{slide}\"/>"))
            .unwrap();
    }
}

pub fn config(dir: &Path, server_url: &str) -> PlayerConfig {
    PlayerConfig {
        presentation_dir: dir.to_str().unwrap().to_string(),
        server_url: server_url.to_string(),
        probe_timeout_ms: 2_000,
        request_timeout_ms: 2_000,
        capture_flush_ms: 50,
        ..PlayerConfig::default()
    }
}

pub fn key(input: Input) -> KeyAction {
    KeyAction::Input(input)
}

/// Feed `keys`, pausing after each, wait `tail`, then close the channel and
/// return the session the player hands back.
pub async fn run_keys(player: Player, keys: Vec<(KeyAction, Duration)>, tail: Duration) -> Session {
    let (tx, rx) = mpsc::channel(16);
    let feeder = async move {
        for (key, pause) in keys {
            tx.send(key).await.unwrap();
            tokio::time::sleep(pause).await;
        }
        tokio::time::sleep(tail).await;
        drop(tx);
    };
    let (session, ()) = tokio::join!(player.run(rx), feeder);
    session
}
