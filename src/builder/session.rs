//! Builder for constructing sessions.

use crate::builder::error::BuildError;
use crate::core::{CaptureContext, Guard, SoundMachine, SoundTrack, Timeline};
use crate::dispatch::Session;
use crate::manifest::validate::replayable;
use crate::manifest::{self, Manifest};
use crate::sync::{replay, DeepLink};
use std::sync::Arc;
use tracing::{debug, warn};

/// Builder for a [`Session`] with a fluent API.
///
/// # Example
///
/// ```rust
/// use slidecast::builder::SessionBuilder;
/// use slidecast::core::{SoundState, StepNode, TimelineKind};
/// use slidecast::manifest::Manifest;
/// use slidecast::sync::DeepLink;
///
/// let manifest = Manifest {
///     presentation: "Demo".into(),
///     tree: StepNode::new().slide("s").child(StepNode::new()),
///     slide_dict: [("s".to_string(), "s".to_string())].into(),
///     live: Vec::new(),
/// };
///
/// let session = SessionBuilder::new()
///     .manifest(manifest)
///     .deep_link(DeepLink::parse("?step=1"))
///     .build()
///     .unwrap();
///
/// assert_eq!(session.current().index(), 1);
/// assert_eq!(session.sound_state(), SoundState::None);
/// assert_eq!(session.timeline().kind(), TimelineKind::Default);
/// ```
pub struct SessionBuilder {
    manifest: Option<Arc<Manifest>>,
    deep_link: DeepLink,
    server_connected: bool,
    track: Option<SoundTrack>,
    capture_guard: Guard<CaptureContext>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            manifest: None,
            deep_link: DeepLink::default(),
            server_connected: false,
            track: None,
            capture_guard: Guard::capture_allowed(),
        }
    }

    /// Set the manifest (required).
    pub fn manifest(mut self, manifest: impl Into<Arc<Manifest>>) -> Self {
        self.manifest = Some(manifest.into());
        self
    }

    /// Starting step and recording, as given in the viewer URL.
    pub fn deep_link(mut self, deep_link: DeepLink) -> Self {
        self.deep_link = deep_link;
        self
    }

    /// Result of the startup server probe.
    pub fn server_connected(mut self, connected: bool) -> Self {
        self.server_connected = connected;
        self
    }

    /// Playable track for a session that is not replaying a recording.
    pub fn sound_track(mut self, track: SoundTrack) -> Self {
        self.track = Some(track);
        self
    }

    /// Add a condition the record and live controls must also satisfy.
    pub fn require_for_capture(mut self, guard: Guard<CaptureContext>) -> Self {
        self.capture_guard = self.capture_guard.and(guard);
        self
    }

    /// Build the session, positioned at the deep-linked step.
    pub fn build(self) -> Result<Session, BuildError> {
        let manifest = self.manifest.ok_or(BuildError::MissingManifest)?;
        manifest::validate(&manifest)?;
        let graph = Arc::new(manifest.graph());

        let selected = self.deep_link.live.and_then(|index| {
            let recording = manifest.recording(Some(index))?;
            if replayable(index, recording, &graph) {
                Some(recording)
            } else {
                warn!(live = index, "recording cannot be replayed, ignoring");
                None
            }
        });

        let (timeline, sound) = match selected {
            Some(recording) => {
                let replay = replay(&graph, recording);
                debug!(
                    segments = replay.track.segments.len(),
                    seed = %replay.seed,
                    "replaying recorded session"
                );
                (
                    Timeline::recorded(&graph, replay.seed),
                    SoundMachine::with_track(replay.track),
                )
            }
            None => {
                if self.deep_link.live.is_some_and(|i| i >= manifest.live.len()) {
                    debug!(live = ?self.deep_link.live, "recording index out of range, ignoring");
                }
                (
                    Timeline::new(&graph),
                    SoundMachine::with_track(self.track.unwrap_or_default()),
                )
            }
        };

        let start = graph.current_step(self.deep_link.step);
        let mut session = Session::from_parts(
            manifest,
            graph,
            timeline,
            sound,
            self.server_connected,
            self.capture_guard,
        );
        session.jump(start);
        Ok(session)
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
