//! Effects that carry out session commands against a [`PlayerEnv`].
//!
//! Following Stillwater 0.11.0 conventions, every command becomes a
//! `BoxedEffect` built with `from_fn`, and nothing happens until the player
//! runs it with `.run(&env).await`.

use super::env::PlayerEnv;
use super::error::ShellError;
use crate::core::{CaptureMode, CommittedCapture, SoundCommand, Step, StepId};
use std::sync::Arc;
use std::time::Duration;
use stillwater::effect::BoxedEffect;
use stillwater::prelude::*;

pub type ShellEffect<T> = BoxedEffect<T, ShellError, PlayerEnv>;

/// What a sound effect did, for the player to follow up on.
#[derive(Clone, Debug, PartialEq)]
pub enum Applied {
    /// Playback is running; the segment ends after `remaining`.
    PlaybackStarted { step: StepId, remaining: Duration },
    PlaybackStopped,
    CaptureStarted(CaptureMode),
    /// The device stopped capturing; the capture is ready to persist.
    CaptureFinished {
        capture: CommittedCapture,
        sound: Option<String>,
    },
}

pub fn sound_effect(command: SoundCommand) -> ShellEffect<Applied> {
    match command {
        SoundCommand::StartPlayback {
            clip,
            step,
            position,
            remaining,
        } => from_fn(move |env: &PlayerEnv| {
            env.audio.play(clip.as_deref(), position)?;
            Ok(Applied::PlaybackStarted { step, remaining })
        })
        .boxed(),
        SoundCommand::StopPlayback => from_fn(|env: &PlayerEnv| {
            env.audio.stop()?;
            Ok(Applied::PlaybackStopped)
        })
        .boxed(),
        SoundCommand::StartCapture(mode) => from_fn(move |env: &PlayerEnv| {
            env.audio.start_capture(mode)?;
            Ok(Applied::CaptureStarted(mode))
        })
        .boxed(),
        SoundCommand::FinishCapture(capture) => from_fn(move |env: &PlayerEnv| {
            let sound = env.audio.finish_capture()?;
            Ok(Applied::CaptureFinished {
                capture: capture.clone(),
                sound,
            })
        })
        .boxed(),
    }
}

pub fn show_effect(step: Step, content: Arc<str>) -> ShellEffect<StepId> {
    from_fn(move |env: &PlayerEnv| {
        env.renderer.show(&step, &content)?;
        Ok(step.id())
    })
    .boxed()
}

pub fn toggle_sketch_effect() -> ShellEffect<()> {
    from_fn(|env: &PlayerEnv| Ok(env.renderer.toggle_sketchpad()?)).boxed()
}
