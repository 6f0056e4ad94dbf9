//! TaffyTree wrapper for layout computation.
//!
//! [`LayoutEngine`] synchronizes the DOM tree to a taffy layout tree,
//! runs layout computation, and reports absolute [`Region`]s. Consumers that
//! only need to read geometry take a [`GeometryQuery`] instead of the engine.

use std::collections::{HashMap, HashSet};

use taffy::prelude::*;

use crate::dom::node::NodeId;
use crate::dom::tree::Dom;
use crate::geometry::Region;

use super::resolve::resolve_spec;

/// Read access to computed node geometry.
pub trait GeometryQuery {
    /// Absolute region of `node`, or `None` if it has no layout.
    fn region_of(&self, node: NodeId) -> Option<Region>;
}

/// Wraps a [`TaffyTree`] and maintains a mapping from DOM [`NodeId`]s to
/// taffy node ids.
pub struct LayoutEngine {
    tree: TaffyTree<NodeId>,
    node_map: HashMap<NodeId, taffy::NodeId>,
    root: Option<taffy::NodeId>,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self {
            tree: TaffyTree::new(),
            node_map: HashMap::new(),
            root: None,
        }
    }

    /// Synchronize the taffy tree with the DOM structure.
    ///
    /// Stale taffy nodes are removed, live ones are created or restyled from
    /// their [`LayoutSpec`](super::resolve::LayoutSpec), and parent/child
    /// edges are rebuilt to mirror the DOM.
    pub fn sync_tree(&mut self, dom: &Dom, viewport: (u16, u16)) {
        let Some(dom_root) = dom.root() else {
            self.clear();
            return;
        };

        let live_nodes = dom.walk_depth_first(dom_root);
        let live_set: HashSet<NodeId> = live_nodes.iter().copied().collect();

        let stale: Vec<NodeId> = self
            .node_map
            .keys()
            .filter(|k| !live_set.contains(k))
            .copied()
            .collect();
        for key in stale {
            if let Some(taffy_id) = self.node_map.remove(&key) {
                let _ = self.tree.remove(taffy_id);
            }
        }

        for &dom_id in &live_nodes {
            let Some(data) = dom.get(dom_id) else { continue };
            let style = resolve_spec(&data.layout, viewport);
            match self.node_map.get(&dom_id) {
                Some(&taffy_id) => {
                    if let Err(err) = self.tree.set_style(taffy_id, style) {
                        tracing::warn!(target: "gilt_slider::layout", ?dom_id, %err, "set_style failed");
                    }
                }
                None => match self.tree.new_leaf_with_context(style, dom_id) {
                    Ok(taffy_id) => {
                        self.node_map.insert(dom_id, taffy_id);
                    }
                    Err(err) => {
                        tracing::warn!(target: "gilt_slider::layout", ?dom_id, %err, "node creation failed");
                    }
                },
            }
        }

        for &dom_id in &live_nodes {
            let taffy_children: Vec<taffy::NodeId> = dom
                .children(dom_id)
                .iter()
                .filter_map(|child| self.node_map.get(child).copied())
                .collect();
            if let Some(&taffy_id) = self.node_map.get(&dom_id) {
                let _ = self.tree.set_children(taffy_id, &taffy_children);
            }
        }

        self.root = self.node_map.get(&dom_root).copied();
    }

    /// Run taffy layout on the root with the terminal size as available space.
    pub fn compute(&mut self, available_width: f32, available_height: f32) {
        if let Some(root) = self.root {
            let result = self.tree.compute_layout(
                root,
                taffy::geometry::Size {
                    width: AvailableSpace::Definite(available_width),
                    height: AvailableSpace::Definite(available_height),
                },
            );
            if let Err(err) = result {
                tracing::warn!(target: "gilt_slider::layout", %err, "layout failed");
            }
        }
    }

    /// Absolute layout of a DOM node, rounded to whole cells.
    ///
    /// Taffy reports locations relative to the parent; this sums them up the
    /// chain.
    pub fn get_layout(&self, node: NodeId) -> Option<Region> {
        let taffy_id = *self.node_map.get(&node)?;
        let layout = self.tree.layout(taffy_id).ok()?;
        let (mut x, mut y) = (layout.location.x, layout.location.y);
        let mut current = self.tree.parent(taffy_id);
        while let Some(parent) = current {
            let parent_layout = self.tree.layout(parent).ok()?;
            x += parent_layout.location.x;
            y += parent_layout.location.y;
            current = self.tree.parent(parent);
        }
        Some(Region {
            x: x.round() as i32,
            y: y.round() as i32,
            width: layout.size.width.round() as i32,
            height: layout.size.height.round() as i32,
        })
    }

    /// Number of nodes mirrored into taffy.
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }

    fn clear(&mut self) {
        for (_, taffy_id) in self.node_map.drain() {
            let _ = self.tree.remove(taffy_id);
        }
        self.root = None;
    }
}

impl GeometryQuery for LayoutEngine {
    fn region_of(&self, node: NodeId) -> Option<Region> {
        self.get_layout(node)
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}
