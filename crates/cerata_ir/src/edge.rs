//! Directed edges between nodes.

use crate::ids::NodeId;
use cerata_common::Ident;

/// A directed connection from `src` to `dst`.
///
/// Either end may be cleared when a node is rewired; a dangling edge stays in
/// the arena but is ignored by lowering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Edge name, `<src>_to_<dst>` unless created otherwise.
    pub name: Ident,
    /// Driving node.
    pub src: Option<NodeId>,
    /// Driven node.
    pub dst: Option<NodeId>,
}

impl Edge {
    /// Whether both ends are set.
    pub fn is_complete(&self) -> bool {
        self.src.is_some() && self.dst.is_some()
    }

    /// The end opposite to `node`, if `node` is one of the ends.
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if self.src == Some(node) {
            self.dst
        } else if self.dst == Some(node) {
            self.src
        } else {
            None
        }
    }
}
