//! Navigation cursor over the step graph.
//!
//! The timeline keeps the steps behind the cursor (`past`), the active step,
//! and the steps ahead of it that were already walked once (`future`). The
//! future stack is what makes "back, then forward" retrace the same branch
//! instead of re-deriving the default child.

use super::graph::{StepGraph, StepId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Whether the timeline can be recorded over.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineKind {
    #[default]
    Default,
    /// Replay of a persisted recording; read-only for capture.
    Recorded,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Forward,
    Backward,
}

/// Cursor over a [`StepGraph`].
///
/// Invariant: `past ++ [current] ++ future` is a contiguous path starting at
/// the root.
///
/// # Example
///
/// ```rust
/// use slidecast::core::{Direction, StepGraph, StepNode, Timeline};
///
/// let tree = StepNode::new()
///     .child(StepNode::new())
///     .child(StepNode::new());
/// let graph = StepGraph::from_tree(&tree);
/// let mut timeline = Timeline::new(&graph);
///
/// assert!(timeline.move_head(&graph, Direction::Forward));
/// let first = timeline.current();
/// assert!(timeline.move_head(&graph, Direction::Backward));
/// assert!(timeline.move_head(&graph, Direction::Forward));
/// assert_eq!(timeline.current(), first);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    past: Vec<StepId>,
    current: StepId,
    future: VecDeque<StepId>,
    kind: TimelineKind,
}

impl Timeline {
    /// A default timeline positioned at the root.
    pub fn new(graph: &StepGraph) -> Self {
        Self {
            past: Vec::new(),
            current: graph.root().id(),
            future: VecDeque::new(),
            kind: TimelineKind::Default,
        }
    }

    /// A recorded timeline positioned at the root whose future follows the
    /// branch leading to `seed`.
    pub fn recorded(graph: &StepGraph, seed: StepId) -> Self {
        let mut timeline = Self::new(graph);
        timeline.kind = TimelineKind::Recorded;
        timeline.future = graph.path_to(seed).into_iter().skip(1).collect();
        timeline
    }

    pub fn kind(&self) -> TimelineKind {
        self.kind
    }

    pub fn is_recorded(&self) -> bool {
        self.kind == TimelineKind::Recorded
    }

    pub fn current(&self) -> StepId {
        self.current
    }

    /// Steps behind the cursor, oldest first.
    pub fn past(&self) -> &[StepId] {
        &self.past
    }

    /// Steps retained ahead of the cursor, next step first.
    pub fn future(&self) -> impl Iterator<Item = StepId> + '_ {
        self.future.iter().copied()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// The full retained path: `past ++ [current] ++ future`.
    pub fn path(&self) -> Vec<StepId> {
        let mut path = self.past.clone();
        path.push(self.current);
        path.extend(self.future.iter().copied());
        path
    }

    pub fn can_advance(&self, graph: &StepGraph) -> bool {
        !self.future.is_empty() || graph.default_child(self.current).is_some()
    }

    pub fn can_retreat(&self) -> bool {
        !self.past.is_empty()
    }

    /// Move one step. Returns `false` and leaves the timeline untouched when
    /// there is nowhere to go.
    pub fn move_head(&mut self, graph: &StepGraph, direction: Direction) -> bool {
        match direction {
            Direction::Forward => {
                let next = match self.future.pop_front() {
                    Some(next) => next,
                    None => match graph.default_child(self.current) {
                        Some(child) => child,
                        None => return false,
                    },
                };
                self.past.push(self.current);
                self.current = next;
                true
            }
            Direction::Backward => match self.past.pop() {
                Some(previous) => {
                    self.future.push_front(self.current);
                    self.current = previous;
                    true
                }
                None => false,
            },
        }
    }

    /// Jump to an arbitrary step.
    ///
    /// The past becomes the ancestors of `target`. The future is kept when
    /// `target` lies on the retained path, otherwise it is dropped because
    /// the jump chose another branch.
    pub fn goto(&mut self, graph: &StepGraph, target: StepId) {
        if graph.get(target).is_none() || target == self.current {
            return;
        }

        let retained = self.path();
        let future = match retained.iter().position(|&s| s == target) {
            Some(at) => retained[at + 1..].iter().copied().collect(),
            None => VecDeque::new(),
        };

        let mut past = graph.path_to(target);
        past.pop();

        self.past = past;
        self.current = target;
        self.future = future;
    }
}
