//! The session context and its dispatch function.
//!
//! A [`Session`] owns the timeline and the sound machine of one viewer. The
//! only way to change either after construction is [`Session::dispatch`] (or
//! the playback timer and jump entry points next to it), which applies the
//! combined transition and reports what the shell has to do.

use super::keys::Input;
use crate::core::{
    CaptureContext, Direction, Guard, PlaybackMove, SoundCommand, SoundMachine, SoundState,
    SoundTrack, StepGraph, StepId, Timeline,
};
use crate::manifest::Manifest;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, trace};

/// Side effect requested by a dispatched input, in execution order.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// The timeline moved; render this step.
    Show(StepId),
    Sound(SoundCommand),
}

/// Result of a dispatch: where the session ended up and what to execute.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub step: StepId,
    pub sound: SoundState,
    pub commands: Vec<Command>,
}

pub struct Session {
    manifest: Arc<Manifest>,
    graph: Arc<StepGraph>,
    timeline: Timeline,
    sound: SoundMachine,
    server_connected: bool,
    capture_guard: Guard<CaptureContext>,
}

impl Session {
    pub(crate) fn from_parts(
        manifest: Arc<Manifest>,
        graph: Arc<StepGraph>,
        timeline: Timeline,
        sound: SoundMachine,
        server_connected: bool,
        capture_guard: Guard<CaptureContext>,
    ) -> Self {
        Self {
            manifest,
            graph,
            timeline,
            sound,
            server_connected,
            capture_guard,
        }
    }

    pub fn manifest(&self) -> &Arc<Manifest> {
        &self.manifest
    }

    pub fn graph(&self) -> &Arc<StepGraph> {
        &self.graph
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn sound(&self) -> &SoundMachine {
        &self.sound
    }

    pub fn sound_state(&self) -> SoundState {
        self.sound.state()
    }

    pub fn current(&self) -> StepId {
        self.timeline.current()
    }

    pub fn server_connected(&self) -> bool {
        self.server_connected
    }

    /// Whether the record and live controls are live.
    pub fn capture_allowed(&self) -> bool {
        self.capture_guard.check(&CaptureContext {
            kind: self.timeline.kind(),
            server_connected: self.server_connected,
        })
    }

    /// Apply one user input.
    pub fn dispatch(&mut self, input: Input, now: DateTime<Utc>) -> Outcome {
        let before = (self.timeline.current(), self.sound.state());
        let mut commands = Vec::new();

        match input {
            Input::Next => self.next(now, &mut commands),
            Input::Prev => self.prev(now, &mut commands),
            Input::Play => self.play(now, &mut commands),
            Input::Record => self.record(now, &mut commands),
            Input::Live => self.live(now, &mut commands),
        }

        let outcome = self.outcome(commands);
        if (outcome.step, outcome.sound) != before || !outcome.commands.is_empty() {
            debug!(
                ?input,
                step = %outcome.step,
                sound = %outcome.sound,
                commands = outcome.commands.len(),
                "dispatched input"
            );
        } else {
            trace!(?input, sound = %outcome.sound, "input ignored");
        }
        outcome
    }

    /// The current playback segment ran out.
    pub fn playback_elapsed(&mut self, now: DateTime<Utc>) -> Outcome {
        let mut commands = Vec::new();
        if self.sound.state() == SoundState::Play {
            let mv = self.sound.advance(Direction::Forward, now);
            self.follow(mv, &mut commands);
        }
        self.outcome(commands)
    }

    /// Jump to an arbitrary step, e.g. from a deep link or a click on a
    /// sub-slide. Playback is stopped first; a running capture keeps going
    /// and marks the new step.
    pub fn goto(&mut self, step: StepId, now: DateTime<Utc>) -> Outcome {
        let mut commands = Vec::new();
        if self.graph.get(step).is_none() {
            return self.outcome(commands);
        }
        if self.sound.state() == SoundState::Play {
            push_sound(&mut commands, self.sound.stop(now));
        }
        if self.jump(step) {
            commands.push(Command::Show(step));
            if self.sound.state().is_capturing() {
                self.sound.mark(step, now);
            }
        }
        self.outcome(commands)
    }

    /// Make a freshly committed recording the playable track.
    pub fn adopt_track(&mut self, track: SoundTrack) -> bool {
        let current = self.timeline.current();
        let loaded = self.sound.load_track(track);
        if loaded {
            self.sound.seek(current);
        }
        loaded
    }

    /// Record the outcome of the startup server probe.
    pub fn set_server_connected(&mut self, connected: bool) {
        self.server_connected = connected;
    }

    /// Move the timeline without emitting commands. Used at construction.
    pub(crate) fn jump(&mut self, step: StepId) -> bool {
        if step == self.timeline.current() {
            return false;
        }
        self.timeline.goto(&self.graph, step);
        self.sound.seek(step);
        true
    }

    fn next(&mut self, now: DateTime<Utc>, commands: &mut Vec<Command>) {
        if !self.timeline.can_advance(&self.graph) {
            return;
        }
        match self.sound.state() {
            SoundState::None => {
                self.sound.reset();
                if self.timeline.move_head(&self.graph, Direction::Forward) {
                    let current = self.timeline.current();
                    self.sound.seek(current);
                    commands.push(Command::Show(current));
                }
            }
            SoundState::Play => {
                let mv = self.sound.advance(Direction::Forward, now);
                self.follow(mv, commands);
            }
            SoundState::Recording | SoundState::Live => {
                if self.timeline.move_head(&self.graph, Direction::Forward) {
                    let current = self.timeline.current();
                    commands.push(Command::Show(current));
                    self.sound.mark(current, now);
                }
            }
        }
    }

    fn prev(&mut self, now: DateTime<Utc>, commands: &mut Vec<Command>) {
        if !self.timeline.can_retreat() {
            return;
        }
        match self.sound.state() {
            SoundState::None => {
                if self.sound.paused() {
                    self.sound.reset();
                } else if self.timeline.move_head(&self.graph, Direction::Backward) {
                    let current = self.timeline.current();
                    self.sound.seek(current);
                    commands.push(Command::Show(current));
                }
            }
            SoundState::Play => {
                let mv = self.sound.advance(Direction::Backward, now);
                self.follow(mv, commands);
            }
            SoundState::Recording => push_sound(commands, self.sound.stop(now)),
            SoundState::Live => {
                if self.timeline.move_head(&self.graph, Direction::Backward) {
                    let current = self.timeline.current();
                    commands.push(Command::Show(current));
                    self.sound.mark(current, now);
                }
            }
        }
    }

    fn play(&mut self, now: DateTime<Utc>, commands: &mut Vec<Command>) {
        match self.sound.state() {
            SoundState::None => {
                if !self.sound.end_of_sound() {
                    let mv = self.sound.play(now);
                    self.follow(mv, commands);
                }
            }
            SoundState::Play | SoundState::Recording | SoundState::Live => {
                push_sound(commands, self.sound.stop(now))
            }
        }
    }

    fn record(&mut self, now: DateTime<Utc>, commands: &mut Vec<Command>) {
        if !self.capture_allowed() {
            return;
        }
        match self.sound.state() {
            SoundState::None => {
                let current = self.timeline.current();
                push_sound(commands, self.sound.record(current, now));
            }
            SoundState::Recording | SoundState::Live => push_sound(commands, self.sound.stop(now)),
            SoundState::Play => {
                push_sound(commands, self.sound.stop(now));
                let current = self.timeline.current();
                push_sound(commands, self.sound.record(current, now));
            }
        }
    }

    fn live(&mut self, now: DateTime<Utc>, commands: &mut Vec<Command>) {
        if !self.capture_allowed() {
            return;
        }
        match self.sound.state() {
            SoundState::None => {
                let current = self.timeline.current();
                push_sound(commands, self.sound.live(current, now));
            }
            SoundState::Live => push_sound(commands, self.sound.stop(now)),
            SoundState::Recording | SoundState::Play => {}
        }
    }

    /// Sound moved first; bring the timeline to the step it is on.
    fn follow(&mut self, mv: PlaybackMove, commands: &mut Vec<Command>) {
        push_sound(commands, mv.commands);
        if let Some(step) = mv.follow {
            if step != self.timeline.current() {
                self.timeline.goto(&self.graph, step);
                commands.push(Command::Show(step));
            }
        }
    }

    fn outcome(&self, commands: Vec<Command>) -> Outcome {
        Outcome {
            step: self.timeline.current(),
            sound: self.sound.state(),
            commands,
        }
    }
}

fn push_sound(commands: &mut Vec<Command>, sound: Vec<SoundCommand>) {
    commands.extend(sound.into_iter().map(Command::Sound));
}
