//! Per-slide node handles.
//!
//! The slider registers the rendered node of each slide position here so the
//! measurer can read the first slide's extent and hit testing can map points
//! back to positions.

use crate::dom::node::NodeId;

/// Ordered, sparse list of slide nodes indexed by slide position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationTargetRegistry {
    targets: Vec<Option<NodeId>>,
}

impl AnimationTargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow or shrink to `len` positions. New positions start empty.
    pub fn resize(&mut self, len: usize) {
        self.targets.resize(len, None);
    }

    /// Record `node` at `position`, growing the registry if needed.
    pub fn register(&mut self, position: usize, node: NodeId) {
        if position >= self.targets.len() {
            self.targets.resize(position + 1, None);
        }
        self.targets[position] = Some(node);
    }

    /// Clear `position`; returns the node that was there.
    pub fn unregister(&mut self, position: usize) -> Option<NodeId> {
        self.targets.get_mut(position)?.take()
    }

    pub fn get(&self, position: usize) -> Option<NodeId> {
        self.targets.get(position).copied().flatten()
    }

    /// The node at position 0, used as the representative item.
    pub fn first(&self) -> Option<NodeId> {
        self.get(0)
    }

    /// Position of `node`, if registered.
    pub fn position_of(&self, node: NodeId) -> Option<usize> {
        self.targets.iter().position(|t| *t == Some(node))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// `(position, node)` for every registered slot.
    pub fn iter(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.targets
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.map(|node| (i, node)))
    }
}
