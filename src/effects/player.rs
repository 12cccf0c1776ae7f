//! The player runtime.
//!
//! A single task owns the [`Session`] and applies every state change. Work
//! that finishes later (slide loads, playback timers, uploads) reports back
//! through an internal event queue and is applied in order, after whatever
//! transition was in flight has settled.
//!
//! Slide loads are keyed by a generation number. Each navigation bumps the
//! generation and cancels the previous load, and a completion carrying an
//! old generation is dropped. Playback timers and capture flushes hold a
//! [`CancellationToken`] that is cancelled as soon as the sound stops.

use super::apply::{show_effect, sound_effect, toggle_sketch_effect, Applied};
use super::env::PlayerEnv;
use super::error::{PlayerError, ShellError, SyncError};
use super::files::{self, SLIDE_CONTENT_FILE};
use super::server::ServerClient;
use crate::builder::SessionBuilder;
use crate::config::PlayerConfig;
use crate::core::{CaptureMode, CommittedCapture, SoundCommand, StepId};
use crate::dispatch::{Command, Input, KeyAction, Session};
use crate::sync::RecordingSync;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use stillwater::effect::Effect;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Completion of deferred work, applied by the event loop.
#[derive(Debug)]
enum PlayerEvent {
    PlaybackElapsed {
        generation: u64,
    },
    SlideLoaded {
        generation: u64,
        step: StepId,
        slide: String,
        result: Result<String, ShellError>,
    },
    Persisted {
        result: Result<(), SyncError>,
    },
}

pub struct Player {
    session: Session,
    env: PlayerEnv,
    server: ServerClient,
    sync: RecordingSync,
    presentation_dir: String,
    flush_interval: Duration,
    events_tx: mpsc::UnboundedSender<PlayerEvent>,
    events_rx: mpsc::UnboundedReceiver<PlayerEvent>,
    slide_generation: u64,
    slide_load: Option<CancellationToken>,
    loaded_slide: Option<(String, Arc<str>)>,
    playback_generation: u64,
    playback_timer: Option<CancellationToken>,
    capture_flush: Option<CancellationToken>,
    uploads: Vec<JoinHandle<()>>,
}

impl Player {
    /// Probe the server and load the manifest concurrently, build the
    /// session, and show the starting step.
    pub async fn start(config: &PlayerConfig, env: PlayerEnv) -> Result<Self, PlayerError> {
        let server = ServerClient::new(&config.server_url, config.request_timeout())?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        let (probe, manifest) = tokio::join!(
            tokio::time::timeout(config.probe_timeout(), server.probe()),
            files::load_manifest(&http, &config.presentation_dir),
        );
        let connected = probe.unwrap_or_else(|_| {
            warn!(url = %server.url(), "server probe timed out, recording disabled");
            false
        });
        let manifest = manifest.inspect_err(|e| {
            error!(error = %e, "failed to load presentation");
            env.alert.alert(&e.to_string());
        })?;

        info!(
            presentation = %manifest.presentation,
            recordings = manifest.live.len(),
            server_connected = connected,
            "presentation loaded"
        );

        let session = SessionBuilder::new()
            .manifest(manifest)
            .deep_link(config.deep_link)
            .server_connected(connected)
            .build()?;

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut player = Self {
            sync: RecordingSync::new(session.graph().clone()),
            session,
            env,
            server,
            presentation_dir: config.presentation_dir.clone(),
            flush_interval: config.capture_flush_interval(),
            events_tx,
            events_rx,
            slide_generation: 0,
            slide_load: None,
            loaded_slide: None,
            playback_generation: 0,
            playback_timer: None,
            capture_flush: None,
            uploads: Vec::new(),
        };

        let initial = player.session.current();
        player.show(initial).await;
        player.settle_slide().await;
        Ok(player)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Process keys until the channel closes, then stop any running sound,
    /// wait for pending uploads and hand back the final session.
    pub async fn run(mut self, mut keys: mpsc::Receiver<KeyAction>) -> Session {
        loop {
            tokio::select! {
                biased;
                Some(event) = self.events_rx.recv() => self.handle_event(event).await,
                key = keys.recv() => match key {
                    Some(action) => self.handle_key(action).await,
                    None => break,
                },
            }
        }
        self.shutdown().await;
        self.session
    }

    async fn handle_key(&mut self, action: KeyAction) {
        match action {
            KeyAction::ToggleSketch => {
                if let Err(e) = toggle_sketch_effect().run(&self.env).await {
                    error!(error = %e, "failed to toggle sketchpad");
                }
            }
            KeyAction::Input(input) => {
                let outcome = self.session.dispatch(input, Utc::now());
                self.execute(outcome.commands).await;
            }
        }
    }

    async fn handle_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::PlaybackElapsed { generation } => {
                if generation != self.playback_generation {
                    debug!(generation, "ignoring stale playback timer");
                    return;
                }
                self.playback_timer = None;
                let outcome = self.session.playback_elapsed(Utc::now());
                self.execute(outcome.commands).await;
            }
            PlayerEvent::SlideLoaded {
                generation,
                step,
                slide,
                result,
            } => {
                if generation != self.slide_generation {
                    debug!(generation, %step, "discarding stale slide load");
                    return;
                }
                self.slide_load = None;
                match result {
                    Ok(content) => {
                        let content: Arc<str> = Arc::from(content);
                        self.loaded_slide = Some((slide, content.clone()));
                        self.render(step, content).await;
                    }
                    Err(e) => {
                        error!(%step, error = %e, "slide load failed");
                        self.env.alert.alert(&e.to_string());
                    }
                }
            }
            PlayerEvent::Persisted { result } => match result {
                Ok(()) => info!("recording saved"),
                Err(e) => {
                    error!(error = %e, "failed to save recording");
                    self.env
                        .alert
                        .alert(&format!("Recording could not be saved: {e}"));
                }
            },
        }
    }

    async fn execute(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Show(step) => self.show(step).await,
                Command::Sound(command) => self.apply_sound(command).await,
            }
        }
    }

    async fn apply_sound(&mut self, command: SoundCommand) {
        let mut finishing = None;
        match &command {
            SoundCommand::StartPlayback { .. } | SoundCommand::StopPlayback => {
                self.cancel_playback()
            }
            SoundCommand::FinishCapture(capture) => {
                cancel(&mut self.capture_flush);
                finishing = Some(capture.clone());
            }
            SoundCommand::StartCapture(_) => {}
        }

        match sound_effect(command).run(&self.env).await {
            Ok(Applied::PlaybackStarted { step, remaining }) => {
                debug!(%step, remaining_ms = remaining.as_millis() as u64, "segment playing");
                self.schedule_playback(remaining);
            }
            Ok(Applied::PlaybackStopped) => {}
            Ok(Applied::CaptureStarted(mode)) => {
                info!(?mode, "capture started");
                self.start_flush();
            }
            Ok(Applied::CaptureFinished { capture, sound }) => self.persist(capture, sound),
            Err(e) => {
                error!(error = %e, "sound command failed");
                if let Some(capture) = finishing {
                    self.env
                        .alert
                        .alert(&format!("Recording audio was lost, saving steps only: {e}"));
                    self.persist(capture, None);
                }
            }
        }
    }

    /// Show `step`, loading its slide unless it is already loaded.
    async fn show(&mut self, step: StepId) {
        self.slide_generation += 1;
        cancel(&mut self.slide_load);

        let Some(slide) = self.session.graph().get(step).and_then(|s| s.slide()) else {
            return;
        };
        let slide = slide.to_string();

        if let Some((loaded, content)) = &self.loaded_slide {
            if *loaded == slide {
                let content = content.clone();
                self.render(step, content).await;
                return;
            }
        }

        let manifest = self.session.manifest();
        let Some(location) =
            files::file_name(&self.presentation_dir, manifest, &slide, SLIDE_CONTENT_FILE)
        else {
            let e = ShellError::UnmappedSlide { slide };
            error!(%step, error = %e, "cannot show step");
            self.env.alert.alert(&e.to_string());
            return;
        };

        debug!(%step, %location, "loading slide");
        let token = CancellationToken::new();
        self.slide_load = Some(token.clone());
        let generation = self.slide_generation;
        let tx = self.events_tx.clone();
        let load = self.env.loader.load(location);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                result = load => {
                    let _ = tx.send(PlayerEvent::SlideLoaded { generation, step, slide, result });
                }
            }
        });
    }

    async fn render(&mut self, step: StepId, content: Arc<str>) {
        let Some(resolved) = self.session.graph().get(step).cloned() else {
            return;
        };
        if let Err(e) = show_effect(resolved, content).run(&self.env).await {
            error!(%step, error = %e, "failed to render step");
        }
    }

    /// Wait until the pending slide load, if any, has been applied.
    async fn settle_slide(&mut self) {
        while self.slide_load.is_some() {
            let Some(event) = self.events_rx.recv().await else {
                return;
            };
            self.handle_event(event).await;
        }
    }

    fn schedule_playback(&mut self, remaining: Duration) {
        self.cancel_playback();
        let generation = self.playback_generation;
        let token = CancellationToken::new();
        self.playback_timer = Some(token.clone());
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(remaining) => {
                    let _ = tx.send(PlayerEvent::PlaybackElapsed { generation });
                }
            }
        });
    }

    fn cancel_playback(&mut self) {
        self.playback_generation += 1;
        cancel(&mut self.playback_timer);
    }

    fn start_flush(&mut self) {
        cancel(&mut self.capture_flush);
        let token = CancellationToken::new();
        self.capture_flush = Some(token.clone());
        let env = self.env.clone();
        let period = self.flush_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = env.audio.flush_capture() {
                            warn!(error = %e, "capture flush failed");
                        }
                    }
                }
            }
        });
    }

    /// Upload a finished capture. A timed capture also becomes the playable
    /// track straight away.
    fn persist(&mut self, capture: CommittedCapture, sound: Option<String>) {
        let (recording, message) = self.sync.commit_message(&capture, sound);
        info!(
            mode = ?recording.mode,
            steps = recording.steps.len(),
            length_s = recording.length,
            "capture committed"
        );

        if capture.mode == CaptureMode::Timed {
            let track = self.sync.replay(&recording).track;
            if self.session.adopt_track(track) {
                debug!("committed recording is now playable");
            }
        }

        let server = self.server.clone();
        let presentation = self.session.manifest().presentation.clone();
        let tx = self.events_tx.clone();
        self.uploads.retain(|upload| !upload.is_finished());
        self.uploads.push(tokio::spawn(async move {
            let result = server.send(message, &presentation).await;
            let _ = tx.send(PlayerEvent::Persisted { result });
        }));
    }

    async fn shutdown(&mut self) {
        cancel(&mut self.slide_load);
        if !self.session.sound_state().is_idle() {
            debug!(sound = %self.session.sound_state(), "stopping sound before exit");
            let outcome = self.session.dispatch(Input::Play, Utc::now());
            self.execute(outcome.commands).await;
        }
        self.cancel_playback();
        cancel(&mut self.capture_flush);

        for upload in self.uploads.drain(..) {
            if let Err(e) = upload.await {
                error!(error = %e, "upload task failed");
            }
        }
        while let Ok(event) = self.events_rx.try_recv() {
            if let PlayerEvent::Persisted { .. } = event {
                self.handle_event(event).await;
            }
        }
    }
}

fn cancel(token: &mut Option<CancellationToken>) {
    if let Some(token) = token.take() {
        token.cancel();
    }
}
