//! Property-based tests for navigation and sound invariants.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated step trees and input sequences.

use chrono::{Duration as ChronoDuration, Utc};
use proptest::prelude::*;
use slidecast::builder::SessionBuilder;
use slidecast::core::{Direction, SoundState, StepGraph, StepId, StepNode, Timeline};
use slidecast::dispatch::{Input, Session};
use slidecast::manifest::Manifest;
use slidecast::sync::DeepLink;
use std::collections::BTreeMap;

fn arbitrary_tree() -> impl Strategy<Value = StepNode> {
    Just(StepNode::new()).prop_recursive(4, 40, 3, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(|children| StepNode {
            children,
            ..StepNode::new()
        })
    })
}

fn arbitrary_input() -> impl Strategy<Value = Input> {
    prop::sample::select(Input::ALL.to_vec())
}

fn arbitrary_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Forward), Just(Direction::Backward)]
}

fn session(tree: StepNode, connected: bool) -> Session {
    let manifest = Manifest {
        presentation: "Generated".into(),
        tree: tree.slide("main"),
        slide_dict: BTreeMap::from([("main".to_string(), "main".to_string())]),
        live: Vec::new(),
    };
    SessionBuilder::new()
        .manifest(manifest)
        .server_connected(connected)
        .build()
        .unwrap()
}

fn assert_contiguous(graph: &StepGraph, timeline: &Timeline) -> Result<(), TestCaseError> {
    prop_assert!(graph.is_contiguous(&timeline.path()));
    prop_assert_eq!(
        timeline.past().len(),
        graph.step(timeline.current()).depth()
    );
    Ok(())
}

proptest! {
    #[test]
    fn timeline_path_stays_contiguous(
        tree in arbitrary_tree(),
        moves in prop::collection::vec(arbitrary_direction(), 0..40),
    ) {
        let graph = StepGraph::from_tree(&tree);
        let mut timeline = Timeline::new(&graph);
        for direction in moves {
            timeline.move_head(&graph, direction);
            assert_contiguous(&graph, &timeline)?;
        }
    }

    #[test]
    fn jumps_keep_the_path_contiguous(
        tree in arbitrary_tree(),
        targets in prop::collection::vec(any::<prop::sample::Index>(), 1..10),
        moves in prop::collection::vec(arbitrary_direction(), 0..10),
    ) {
        let graph = StepGraph::from_tree(&tree);
        let mut timeline = Timeline::new(&graph);
        for (i, target) in targets.iter().enumerate() {
            let step = graph.current_step(Some(target.index(graph.len())));
            timeline.goto(&graph, step);
            prop_assert_eq!(timeline.current(), step);
            assert_contiguous(&graph, &timeline)?;
            if let Some(&direction) = moves.get(i) {
                timeline.move_head(&graph, direction);
                assert_contiguous(&graph, &timeline)?;
            }
        }
    }

    #[test]
    fn back_then_forward_returns_to_same_step(
        tree in arbitrary_tree(),
        forward in 0usize..10,
    ) {
        let graph = StepGraph::from_tree(&tree);
        let mut timeline = Timeline::new(&graph);
        for _ in 0..forward {
            timeline.move_head(&graph, Direction::Forward);
        }
        let at = timeline.current();
        if timeline.move_head(&graph, Direction::Backward) {
            prop_assert!(timeline.move_head(&graph, Direction::Forward));
            prop_assert_eq!(timeline.current(), at);
        }
    }

    #[test]
    fn dispatch_keeps_session_consistent(
        tree in arbitrary_tree(),
        connected in any::<bool>(),
        inputs in prop::collection::vec(arbitrary_input(), 0..60),
    ) {
        let mut session = session(tree, connected);
        let graph = session.graph().clone();
        let t0 = Utc::now();
        for (i, input) in inputs.into_iter().enumerate() {
            let outcome = session.dispatch(input, t0 + ChronoDuration::milliseconds(100 * i as i64));
            prop_assert_eq!(outcome.step, session.current());
            prop_assert_eq!(outcome.sound, session.sound_state());
            prop_assert!(SoundState::ALL.contains(&outcome.sound));
            prop_assert_eq!(
                session.sound().capture().is_some(),
                outcome.sound.is_capturing()
            );
            if !connected {
                prop_assert!(!outcome.sound.is_capturing());
            }
            assert_contiguous(&graph, session.timeline())?;
        }
    }

    #[test]
    fn deep_link_round_trips_every_step(tree in arbitrary_tree()) {
        let graph = StepGraph::from_tree(&tree);
        for step in graph.iter() {
            let link = DeepLink { step: Some(step.id().index()), live: None };
            let parsed = DeepLink::parse(&link.to_query());
            prop_assert_eq!(graph.current_step(parsed.step), step.id());
        }
    }

    #[test]
    fn non_numeric_step_falls_back_to_root(
        tree in arbitrary_tree(),
        value in "[a-zA-Z.\\-]{1,8}",
    ) {
        let graph = StepGraph::from_tree(&tree);
        let link = DeepLink::from_params(Some(&value), None);
        prop_assert_eq!(link.step, None);
        prop_assert_eq!(graph.current_step(link.step), StepId::ROOT);
    }

    #[test]
    fn out_of_range_step_falls_back_to_root(tree in arbitrary_tree(), extra in 0usize..1000) {
        let graph = StepGraph::from_tree(&tree);
        prop_assert_eq!(graph.current_step(Some(graph.len() + extra)), StepId::ROOT);
    }
}
