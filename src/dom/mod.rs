//! DOM arena: slotmap-backed node tree for the slider and its overlay.

pub mod node;
pub mod tree;

pub use node::{NodeData, NodeId, NodeKind};
pub use tree::Dom;
