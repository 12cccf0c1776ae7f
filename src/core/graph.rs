//! Immutable step graph built from the presentation's step tree.
//!
//! Steps are stored in depth-first preorder, so a step's position in the
//! graph doubles as its deep-link index.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a step: its depth-first preorder index in the graph.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct StepId(usize);

impl StepId {
    /// The root step of every graph.
    pub const ROOT: StepId = StepId(0);

    /// Deep-link index of this step.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node of the step tree as written in a manifest.
///
/// A node that names a `slide` opens that slide; nodes without one belong to
/// the slide of their nearest ancestor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StepNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slide: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StepNode>,
}

impl StepNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slide(mut self, slide: impl Into<String>) -> Self {
        self.slide = Some(slide.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn child(mut self, child: StepNode) -> Self {
        self.children.push(child);
        self
    }
}

/// A single resolved step.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    id: StepId,
    path: Vec<usize>,
    parent: Option<StepId>,
    children: Vec<StepId>,
    slide: Option<String>,
    name: Option<String>,
}

impl Step {
    pub fn id(&self) -> StepId {
        self.id
    }

    /// Branch indices from the root to this step. The root's path is empty.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub fn parent(&self) -> Option<StepId> {
        self.parent
    }

    pub fn children(&self) -> &[StepId] {
        &self.children
    }

    /// Slide this step belongs to, inherited from the nearest ancestor.
    pub fn slide(&self) -> Option<&str> {
        self.slide.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

/// Read-only tree of steps.
///
/// # Example
///
/// ```rust
/// use slidecast::core::{StepGraph, StepId, StepNode};
///
/// let tree = StepNode::new()
///     .slide("intro")
///     .child(StepNode::new().name("a"))
///     .child(StepNode::new().name("b"));
/// let graph = StepGraph::from_tree(&tree);
///
/// assert_eq!(graph.len(), 3);
/// assert_eq!(graph.current_step(Some(2)).index(), 2);
/// assert_eq!(graph.current_step(Some(99)), StepId::ROOT);
/// assert_eq!(graph.step(StepId::ROOT).slide(), Some("intro"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct StepGraph {
    steps: Vec<Step>,
}

impl StepGraph {
    /// Build the graph from a step tree. Steps are numbered in preorder.
    pub fn from_tree(root: &StepNode) -> Self {
        let mut steps = Vec::new();
        Self::visit(root, None, Vec::new(), None, &mut steps);
        Self { steps }
    }

    fn visit(
        node: &StepNode,
        parent: Option<StepId>,
        path: Vec<usize>,
        inherited_slide: Option<&str>,
        steps: &mut Vec<Step>,
    ) -> StepId {
        let id = StepId(steps.len());
        let slide = node.slide.as_deref().or(inherited_slide).map(str::to_owned);
        steps.push(Step {
            id,
            path: path.clone(),
            parent,
            children: Vec::with_capacity(node.children.len()),
            slide: slide.clone(),
            name: node.name.clone(),
        });

        for (branch, child) in node.children.iter().enumerate() {
            let mut child_path = path.clone();
            child_path.push(branch);
            let child_id = Self::visit(child, Some(id), child_path, slide.as_deref(), steps);
            steps[id.0].children.push(child_id);
        }

        id
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn root(&self) -> &Step {
        &self.steps[0]
    }

    /// Look up a step, `None` if the id does not belong to this graph.
    pub fn get(&self, id: StepId) -> Option<&Step> {
        self.steps.get(id.0)
    }

    /// Look up a step known to belong to this graph.
    ///
    /// Panics on a foreign id; ids are only minted by the graph itself.
    pub fn step(&self, id: StepId) -> &Step {
        &self.steps[id.0]
    }

    /// Resolve a deep-link index. Absent or out-of-range indices fall back
    /// to the root.
    pub fn current_step(&self, index: Option<usize>) -> StepId {
        match index {
            Some(i) if i < self.steps.len() => StepId(i),
            _ => StepId::ROOT,
        }
    }

    pub fn parent(&self, id: StepId) -> Option<StepId> {
        self.get(id).and_then(Step::parent)
    }

    pub fn children(&self, id: StepId) -> &[StepId] {
        self.get(id).map(Step::children).unwrap_or(&[])
    }

    /// The child taken when moving forward without a retained branch.
    pub fn default_child(&self, id: StepId) -> Option<StepId> {
        self.children(id).first().copied()
    }

    /// Steps from the root down to `id`, inclusive.
    pub fn path_to(&self, id: StepId) -> Vec<StepId> {
        let mut path = Vec::new();
        let mut cursor = self.get(id).map(Step::id);
        while let Some(step) = cursor {
            path.push(step);
            cursor = self.parent(step);
        }
        path.reverse();
        path
    }

    /// Find the step reached by following `path` from the root.
    pub fn find_path(&self, path: &[usize]) -> Option<StepId> {
        let mut current = StepId::ROOT;
        for &branch in path {
            current = *self.children(current).get(branch)?;
        }
        Some(current)
    }

    /// Whether `sequence` starts at the root and each step is a child of
    /// the one before it.
    pub fn is_contiguous(&self, sequence: &[StepId]) -> bool {
        match sequence.first() {
            Some(&first) if first == StepId::ROOT => sequence
                .windows(2)
                .all(|pair| self.parent(pair[1]) == Some(pair[0])),
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }
}
