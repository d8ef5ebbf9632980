//! Label history tree.
//!
//! An append-only arena of `(parent, edge)` links. Labels that share a path
//! prefix share the nodes of that prefix, so no label ever copies its path.
//! A path is recovered by walking parent links back to the root.

use serde::{Deserialize, Serialize};

use crate::graph::EdgeLocation;

/// Index of a node in a [`LabelHistoryTree`].
pub type HistoryIndex = usize;

/// Index of the root sentinel, which stands for the initial state at the source.
pub const ROOT: HistoryIndex = 0;

/// One link in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryNode {
    /// Parent node; the root is its own parent.
    pub parent: HistoryIndex,
    /// Position of this node in the tree.
    pub index: HistoryIndex,
    /// Edge traversed from the parent. Meaningless at the root.
    pub edge_location: EdgeLocation,
}

/// Append-only forest of label provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelHistoryTree {
    nodes: Vec<HistoryNode>,
}

impl LabelHistoryTree {
    /// Create a tree holding only the root, rooted at `source_vertex_index`.
    pub fn new(source_vertex_index: usize) -> Self {
        Self {
            nodes: vec![HistoryNode {
                parent: ROOT,
                index: ROOT,
                edge_location: EdgeLocation::new(source_vertex_index, 0),
            }],
        }
    }

    /// Append a node reached from `parent` across `edge_location`.
    pub fn push(&mut self, parent: HistoryIndex, edge_location: EdgeLocation) -> HistoryIndex {
        crate::contract!(
            parent < self.nodes.len(),
            "history parent {} not in tree of {} nodes",
            parent,
            self.nodes.len()
        );
        let index = self.nodes.len();
        self.nodes.push(HistoryNode {
            parent,
            index,
            edge_location,
        });
        index
    }

    /// Node at `index`.
    pub fn get(&self, index: HistoryIndex) -> Option<&HistoryNode> {
        self.nodes.get(index)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root is present from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edges from `index` back to the root, last traversed edge first.
    pub fn path(&self, mut index: HistoryIndex) -> Vec<EdgeLocation> {
        let mut path = Vec::new();
        while index != ROOT {
            let node = &self.nodes[index];
            path.push(node.edge_location);
            index = node.parent;
        }
        path
    }

    /// Assert that every node sits at the position it records.
    ///
    /// # Panics
    ///
    /// Panics on the first mismatch.
    pub fn check_consistency(&self) {
        for (position, node) in self.nodes.iter().enumerate() {
            crate::contract!(
                position == node.index,
                "history node at {} records index {}",
                position,
                node.index
            );
            crate::contract!(position == ROOT || node.parent < position);
        }
    }
}
