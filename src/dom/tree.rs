//! Tree operations: insert, remove, walk, find.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{NodeData, NodeId, NodeKind};

const EMPTY_CHILDREN: &[NodeId] = &[];

/// The node tree, backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`. Parent/child relationships are stored
/// in secondary maps so that node removal is O(subtree size) and lookup is O(1).
pub struct Dom {
    nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    root: Option<NodeId>,
}

impl Dom {
    /// Create an empty DOM.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
        }
    }

    /// Insert a parentless node. The first one inserted becomes the root.
    pub fn insert(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Insert a node as the last child of `parent`.
    ///
    /// Returns `None` if `parent` does not exist.
    pub fn insert_child(&mut self, parent: NodeId, data: NodeData) -> Option<NodeId> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        self.parent.insert(id, parent);
        self.children.get_mut(parent)?.push(id);
        Some(id)
    }

    /// Insert a node under `parent`. If `parent` is gone the node is left
    /// detached instead of failing.
    pub fn attach(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(id);
            self.parent.insert(id, parent);
        }
        id
    }

    /// Remove a node and all its descendants.
    ///
    /// Returns the `NodeData` for the removed node, or `None` if it didn't exist.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeData> {
        if !self.nodes.contains_key(id) {
            return None;
        }

        if let Some(parent_id) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&child| child != id);
            }
        }
        if self.root == Some(id) {
            self.root = None;
        }

        let mut to_remove = VecDeque::from([id]);
        let mut removed = None;
        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            let data = self.nodes.remove(current);
            if current == id {
                removed = data;
            }
        }
        removed
    }

    /// Remove every child subtree of `parent`, keeping `parent` itself.
    pub fn clear_children(&mut self, parent: NodeId) {
        let kids = self.children(parent).to_vec();
        for kid in kids {
            self.remove(kid);
        }
    }

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Children of a node, in insertion order. Empty if the node does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// First child of `parent` with the given kind.
    pub fn child_of_kind(&self, parent: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self.nodes.get(child).is_some_and(|data| data.kind == kind))
    }

    /// Whether `node` is `ancestor` or lies beneath it.
    pub fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    /// The current root node, if set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of nodes in the DOM.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    ///
    /// This is also paint order: later nodes are drawn on top.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        result
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slider::navigation::NavButton;

    /// ```text
    ///          root
    ///           |
    ///        wrapper
    ///      /    |    \
    ///   prev  track  next
    ///         /   \
    ///       s0     s1
    /// ```
    struct Fixture {
        dom: Dom,
        root: NodeId,
        wrapper: NodeId,
        prev: NodeId,
        track: NodeId,
        next: NodeId,
        s0: NodeId,
        s1: NodeId,
    }

    fn slider_tree() -> Fixture {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new(NodeKind::Root));
        let wrapper = dom.insert_child(root, NodeData::new(NodeKind::Wrapper)).unwrap();
        let prev = dom
            .insert_child(wrapper, NodeData::new(NodeKind::Button(NavButton::Previous)))
            .unwrap();
        let track = dom.insert_child(wrapper, NodeData::new(NodeKind::Track)).unwrap();
        let next = dom
            .insert_child(wrapper, NodeData::new(NodeKind::Button(NavButton::Next)))
            .unwrap();
        let s0 = dom.insert_child(track, NodeData::new(NodeKind::Slide { ordinal: 0 })).unwrap();
        let s1 = dom.insert_child(track, NodeData::new(NodeKind::Slide { ordinal: 1 })).unwrap();
        Fixture { dom, root, wrapper, prev, track, next, s0, s1 }
    }

    #[test]
    fn first_insert_becomes_root() {
        let f = slider_tree();
        assert_eq!(f.dom.root(), Some(f.root));
        assert_eq!(f.dom.parent(f.root), None);
        assert_eq!(f.dom.len(), 7);
    }

    #[test]
    fn insert_child_under_missing_parent_fails() {
        let mut f = slider_tree();
        f.dom.remove(f.track);
        assert!(f.dom.insert_child(f.track, NodeData::new(NodeKind::Slide { ordinal: 2 })).is_none());
    }

    #[test]
    fn children_keep_insertion_order() {
        let f = slider_tree();
        assert_eq!(f.dom.children(f.wrapper), &[f.prev, f.track, f.next]);
        assert_eq!(f.dom.children(f.track), &[f.s0, f.s1]);
        assert!(f.dom.children(f.s0).is_empty());
    }

    #[test]
    fn child_of_kind_finds_track_and_buttons() {
        let f = slider_tree();
        assert_eq!(f.dom.child_of_kind(f.wrapper, NodeKind::Track), Some(f.track));
        assert_eq!(
            f.dom.child_of_kind(f.wrapper, NodeKind::Button(NavButton::Next)),
            Some(f.next)
        );
        assert_eq!(f.dom.child_of_kind(f.wrapper, NodeKind::Overlay), None);
    }

    #[test]
    fn is_within_walks_ancestors() {
        let f = slider_tree();
        assert!(f.dom.is_within(f.s1, f.wrapper));
        assert!(f.dom.is_within(f.track, f.track));
        assert!(!f.dom.is_within(f.prev, f.track));
    }

    #[test]
    fn remove_subtree() {
        let mut f = slider_tree();
        let removed = f.dom.remove(f.track).unwrap();
        assert_eq!(removed.kind, NodeKind::Track);
        assert!(!f.dom.contains(f.s0));
        assert!(!f.dom.contains(f.s1));
        assert_eq!(f.dom.children(f.wrapper), &[f.prev, f.next]);
        assert!(f.dom.remove(f.track).is_none());
    }

    #[test]
    fn clear_children_keeps_parent() {
        let mut f = slider_tree();
        f.dom.clear_children(f.track);
        assert!(f.dom.contains(f.track));
        assert!(f.dom.children(f.track).is_empty());
        assert_eq!(f.dom.len(), 5);
    }

    #[test]
    fn removing_root_clears_it() {
        let mut f = slider_tree();
        f.dom.remove(f.root);
        assert!(f.dom.is_empty());
        assert_eq!(f.dom.root(), None);
    }

    #[test]
    fn walk_depth_first_is_paint_order() {
        let f = slider_tree();
        assert_eq!(
            f.dom.walk_depth_first(f.root),
            vec![f.root, f.wrapper, f.prev, f.track, f.s0, f.s1, f.next]
        );
    }

    #[test]
    fn attach_falls_back_to_detached() {
        let mut f = slider_tree();
        let s2 = f.dom.attach(f.track, NodeData::new(NodeKind::Slide { ordinal: 2 }));
        assert_eq!(f.dom.parent(s2), Some(f.track));
        f.dom.remove(f.wrapper);
        let orphan = f.dom.attach(f.track, NodeData::new(NodeKind::Slide { ordinal: 0 }));
        assert!(f.dom.contains(orphan));
        assert_eq!(f.dom.parent(orphan), None);
    }
}
