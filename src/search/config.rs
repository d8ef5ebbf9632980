//! Search configuration.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::DEFAULT_SEARCH_VERSION;

/// Order in which vertices are processed within a round.
///
/// The order only affects how early dominated labels are pruned, never the
/// resulting end-state set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexOrder {
    /// Ascending time of each vertex's earliest pending label; empty vertices last.
    #[default]
    EarliestLabel,
    /// Plain vertex index order.
    Index,
}

/// Label-setting search configuration.
///
/// ## Parameters
///
/// - `max_rounds`: stop with an error after this many propagation rounds
///   (`None` runs to the fixed point)
/// - `vertex_order`: processing order heuristic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Configuration version identifier.
    pub version: String,
    /// Round cap for bounded execution.
    pub max_rounds: Option<usize>,
    /// Vertex processing order.
    pub vertex_order: VertexOrder,
}

impl SearchConfig {
    /// Set the round cap.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    /// Set the vertex processing order.
    pub fn with_vertex_order(mut self, vertex_order: VertexOrder) -> Self {
        self.vertex_order = vertex_order;
        self
    }

    /// Compute a hash of the configuration parameters.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(self)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_SEARCH_VERSION.to_string(),
            max_rounds: None,
            vertex_order: VertexOrder::default(),
        }
    }
}
