//! End-to-end navigation and capture scenarios on a built session.

use chrono::{Duration as ChronoDuration, Utc};
use slidecast::builder::SessionBuilder;
use slidecast::core::{CaptureMode, SoundCommand, SoundState, StepId, StepNode, TimelineKind};
use slidecast::dispatch::{Command, Input};
use slidecast::manifest::{LiveRecording, Manifest, RecordedStep};
use slidecast::sync::DeepLink;
use std::collections::BTreeMap;

/// root with children [0, 1]
fn forked(live: Vec<LiveRecording>) -> Manifest {
    Manifest {
        presentation: "Fork".into(),
        tree: StepNode::new()
            .slide("main")
            .child(StepNode::new().name("left"))
            .child(StepNode::new().name("right")),
        slide_dict: BTreeMap::from([("main".to_string(), "main".to_string())]),
        live,
    }
}

fn right_branch_recording() -> LiveRecording {
    LiveRecording {
        id: None,
        mode: CaptureMode::Timed,
        recorded_at: None,
        length: 4.0,
        sound: Some("live/right.webm".into()),
        steps: vec![
            RecordedStep {
                step: vec![],
                start: 0.0,
                duration: Some(1.0),
            },
            RecordedStep {
                step: vec![1],
                start: 1.0,
                duration: Some(3.0),
            },
        ],
    }
}

#[test]
fn forward_back_forward_retraces_the_branch() {
    let mut session = SessionBuilder::new()
        .manifest(forked(Vec::new()))
        .build()
        .unwrap();
    let left = session.graph().find_path(&[0]).unwrap();
    let now = Utc::now();

    assert_eq!(session.dispatch(Input::Next, now).step, left);
    assert_eq!(session.dispatch(Input::Prev, now).step, StepId::ROOT);
    assert_eq!(session.timeline().future().collect::<Vec<_>>(), vec![left]);
    assert_eq!(session.dispatch(Input::Next, now).step, left);
    assert_eq!(session.timeline().future_len(), 0);
}

#[test]
fn record_at_root_commits_a_single_event() {
    let mut session = SessionBuilder::new()
        .manifest(forked(Vec::new()))
        .server_connected(true)
        .build()
        .unwrap();
    let t0 = Utc::now();

    assert_eq!(
        session.dispatch(Input::Record, t0).sound,
        SoundState::Recording
    );

    let outcome = session.dispatch(Input::Prev, t0 + ChronoDuration::seconds(1));
    assert_eq!(outcome.sound, SoundState::Recording);
    assert!(outcome.commands.is_empty());

    let outcome = session.dispatch(Input::Record, t0 + ChronoDuration::seconds(2));
    assert_eq!(outcome.sound, SoundState::None);
    match &outcome.commands[..] {
        [Command::Sound(SoundCommand::FinishCapture(capture))] => {
            assert_eq!(capture.marks.len(), 1);
            assert_eq!(capture.marks[0].step, StepId::ROOT);
        }
        other => panic!("unexpected commands {other:?}"),
    }
}

#[test]
fn out_of_range_deep_link_starts_at_root() {
    let session = SessionBuilder::new()
        .manifest(forked(Vec::new()))
        .deep_link(DeepLink::parse("?step=999"))
        .build()
        .unwrap();
    assert_eq!(session.graph().len(), 3);
    assert_eq!(session.current(), StepId::ROOT);
}

#[test]
fn recorded_timeline_ignores_capture_controls() {
    let mut session = SessionBuilder::new()
        .manifest(forked(vec![right_branch_recording()]))
        .server_connected(true)
        .deep_link(DeepLink::parse("?live=0"))
        .build()
        .unwrap();
    assert_eq!(session.timeline().kind(), TimelineKind::Recorded);

    for input in [Input::Record, Input::Live] {
        let outcome = session.dispatch(input, Utc::now());
        assert_eq!(outcome.sound, SoundState::None);
        assert!(outcome.commands.is_empty());
    }
}

#[test]
fn recorded_timeline_follows_the_recorded_branch() {
    let mut session = SessionBuilder::new()
        .manifest(forked(vec![right_branch_recording()]))
        .deep_link(DeepLink::parse("?live=0"))
        .build()
        .unwrap();
    let right = session.graph().find_path(&[1]).unwrap();

    let outcome = session.dispatch(Input::Next, Utc::now());
    assert_eq!(outcome.step, right);
}

#[test]
fn replayed_recording_drives_the_timeline() {
    let mut session = SessionBuilder::new()
        .manifest(forked(vec![right_branch_recording()]))
        .deep_link(DeepLink::parse("?live=0"))
        .build()
        .unwrap();
    let right = session.graph().find_path(&[1]).unwrap();
    let t0 = Utc::now();

    let outcome = session.dispatch(Input::Play, t0);
    assert_eq!(outcome.sound, SoundState::Play);
    match &outcome.commands[..] {
        [Command::Sound(SoundCommand::StartPlayback { clip, step, .. })] => {
            assert_eq!(clip.as_deref(), Some("live/right.webm"));
            assert_eq!(*step, StepId::ROOT);
        }
        other => panic!("unexpected commands {other:?}"),
    }

    let outcome = session.playback_elapsed(t0 + ChronoDuration::seconds(1));
    assert_eq!(outcome.step, right);
    assert!(outcome.commands.contains(&Command::Show(right)));
}

#[test]
fn deep_link_into_recording_positions_both() {
    let session = SessionBuilder::new()
        .manifest(forked(vec![right_branch_recording()]))
        .deep_link(DeepLink::parse("?step=2&live=0"))
        .build()
        .unwrap();
    let right = session.graph().find_path(&[1]).unwrap();
    assert_eq!(session.current(), right);
    assert_eq!(session.sound().cursor(), 1);
}
