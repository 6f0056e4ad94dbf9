//! Node types: NodeId, NodeKind, NodeData.

use slotmap::new_key_type;

use crate::layout::resolve::LayoutSpec;
use crate::slider::navigation::NavButton;

new_key_type! {
    /// Unique identifier for a DOM node. Copy, lightweight (u64).
    pub struct NodeId;
}

/// What a node is in the slider's tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The host's top-level node (the terminal).
    Root,
    /// A slider's outer box: buttons and track.
    Wrapper,
    /// The clipping viewport slides scroll through.
    Track,
    /// One slide; `ordinal` is its position within the slider's own list.
    Slide { ordinal: usize },
    Button(NavButton),
    /// The modal layer covering the root while the lightbox is open.
    Overlay,
}

/// Data associated with a single DOM node.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    pub layout: LayoutSpec,
    /// Class names passed through from the slider props.
    pub classes: Vec<String>,
}

impl NodeData {
    /// Create a new `NodeData` with a column layout and no classes.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            layout: LayoutSpec::column(),
            classes: Vec::new(),
        }
    }

    /// Set the layout spec (builder).
    pub fn with_layout(mut self, layout: LayoutSpec) -> Self {
        self.layout = layout;
        self
    }

    /// Add a single class (builder).
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        self.add_class(&class);
        self
    }

    /// Check whether this node has a given class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a class. No-op if already present or empty.
    pub fn add_class(&mut self, class: &str) {
        if !class.is_empty() && !self.has_class(class) {
            self.classes.push(class.to_owned());
        }
    }

    /// Replace the class list, dropping empty names and duplicates.
    pub fn set_classes<'a>(&mut self, classes: impl IntoIterator<Item = &'a str>) {
        self.classes.clear();
        for class in classes {
            self.add_class(class);
        }
    }

    /// The slide ordinal, if this is a slide.
    pub fn slide_ordinal(&self) -> Option<usize> {
        match self.kind {
            NodeKind::Slide { ordinal } => Some(ordinal),
            _ => None,
        }
    }
}
