//! Search output.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::graph::{EdgeLocation, Graph};
use crate::types::{extend, State};

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Propagation rounds run, including the final empty round.
    pub rounds: usize,
    /// Labels created, i.e. history nodes appended.
    pub labels_created: usize,
    /// Extensions that failed their time, energy or delivery check.
    pub extensions_rejected: usize,
    /// Feasible candidates dropped because an existing label dominated them.
    pub candidates_dominated: usize,
    /// Existing labels tombstoned by a newer candidate.
    pub labels_tombstoned: usize,
}

/// Nondominated end states and the paths producing them.
///
/// `nondominated_paths[i]` lists the edges of a path in reverse traversal
/// order (last edge first). Replaying it forward from the initial state
/// reproduces `nondominated_end_states[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Solutions {
    /// Paths, last traversed edge first.
    pub nondominated_paths: Vec<Vec<EdgeLocation>>,
    /// End state of each path.
    pub nondominated_end_states: Vec<State>,
    /// Search counters.
    pub stats: SearchStats,
}

impl Solutions {
    /// Number of solutions.
    pub fn len(&self) -> usize {
        self.nondominated_end_states.len()
    }

    /// Whether no path reached the target.
    pub fn is_empty(&self) -> bool {
        self.nondominated_end_states.is_empty()
    }

    /// Iterate `(reversed path, end state)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&[EdgeLocation], &State)> {
        self.nondominated_paths
            .iter()
            .map(Vec::as_slice)
            .zip(self.nondominated_end_states.iter())
    }

    /// Path `i` in traversal order.
    pub fn forward_path(&self, i: usize) -> Option<Vec<EdgeLocation>> {
        self.nondominated_paths
            .get(i)
            .map(|path| path.iter().rev().copied().collect())
    }

    /// End states sorted by every field, for order-independent comparison.
    pub fn sorted_end_states(&self) -> Vec<State> {
        let mut states = self.nondominated_end_states.clone();
        states.sort_by_key(State::canonical_key);
        states
    }

    /// Replay every path from `initial_state`, in solution order.
    ///
    /// Entry `i` equals `Some(nondominated_end_states[i])` for the graph and
    /// initial state the search ran on.
    pub fn replay(&self, graph: &Graph, initial_state: &State) -> Vec<Option<State>> {
        self.nondominated_paths
            .iter()
            .map(|path| replay_path(graph, path, initial_state))
            .collect()
    }

    /// Deterministic hash of the end-state set.
    ///
    /// Independent of solution order and of the search statistics.
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(&self.sorted_end_states())
    }
}

/// Replay a reversed path from `initial_state`.
///
/// Returns `None` when an edge of the path is not traversable from the
/// state reached so far, or when consecutive edges are not connected.
pub fn replay_path(
    graph: &Graph,
    reversed_path: &[EdgeLocation],
    initial_state: &State,
) -> Option<State> {
    let mut state = *initial_state;
    let mut at: Option<usize> = None;
    for location in reversed_path.iter().rev() {
        if at.is_some_and(|vertex| vertex != location.source_vertex_index) {
            return None;
        }
        let edge = graph.edge_at(*location);
        state = extend(&state, &edge.data)?;
        at = Some(edge.vertex_index);
    }
    Some(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExtensionData, Site};

    fn line_graph() -> Graph {
        let mut graph = Graph::new();
        for _ in 0..3 {
            graph.add_vertex(Site::default());
        }
        graph.add_edge(0, 1, ExtensionData::new(0, 0, 100, 2, 1, -1));
        graph.add_edge(1, 2, ExtensionData::new(1, 0, 100, 3, 2, -1));
        graph
    }

    #[test]
    fn test_replay_path() {
        let graph = line_graph();
        let reversed = vec![EdgeLocation::new(1, 0), EdgeLocation::new(0, 0)];
        let end = replay_path(&graph, &reversed, &State::new(0, 0, 5)).unwrap();
        assert_eq!(end, State::new(5, 3, 3));
        // Not enough energy for the second edge.
        assert!(replay_path(&graph, &reversed, &State::new(0, 0, 1)).is_none());
    }

    #[test]
    fn test_replay_rejects_disconnected_path() {
        let graph = line_graph();
        let reversed = vec![EdgeLocation::new(0, 0), EdgeLocation::new(0, 0)];
        assert!(replay_path(&graph, &reversed, &State::new(0, 0, 5)).is_none());
    }

    #[test]
    fn test_fingerprint_ignores_order_and_stats() {
        let a = State::new(1, 2, 3);
        let b = State::new(0, 5, 3);
        let first = Solutions {
            nondominated_paths: vec![vec![], vec![]],
            nondominated_end_states: vec![a, b],
            stats: SearchStats::default(),
        };
        let second = Solutions {
            nondominated_paths: vec![vec![], vec![]],
            nondominated_end_states: vec![b, a],
            stats: SearchStats { rounds: 9, ..SearchStats::default() },
        };
        assert_eq!(first.fingerprint(), second.fingerprint());
        assert_eq!(first.forward_path(0), Some(vec![]));
        assert_eq!(first.iter().count(), 2);
    }

    #[test]
    fn test_replay_all_paths() {
        let graph = line_graph();
        let initial = State::new(0, 0, 5);
        let solutions = Solutions {
            nondominated_paths: vec![
                vec![EdgeLocation::new(1, 0), EdgeLocation::new(0, 0)],
                vec![EdgeLocation::new(0, 0)],
                vec![EdgeLocation::new(0, 0), EdgeLocation::new(0, 0)],
            ],
            nondominated_end_states: vec![
                State::new(5, 3, 3),
                State::new(2, 1, 4),
                State::default(),
            ],
            stats: SearchStats::default(),
        };
        assert_eq!(
            solutions.replay(&graph, &initial),
            vec![Some(State::new(5, 3, 3)), Some(State::new(2, 1, 4)), None]
        );
    }
}
