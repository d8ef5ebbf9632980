//! Label-setting search.
//!
//! Round-based multi-criteria label propagation. Each vertex holds a set of
//! labels in `current`; every round extends those labels across the
//! vertex's outgoing edges into `next`, pruning by Pareto domination, and
//! then the two arrays swap roles. The loop stops at the fixed point where no
//! vertex other than the target holds a label.
//!
//! ## Algorithm
//!
//! 1. Park the target's labels in its `next` slot so arrivals are compared
//!    against everything already at the target
//! 2. Sweep tombstoned labels and sort each vertex's labels by time
//! 3. Order vertices by their earliest label time (empty vertices last)
//! 4. For every vertex, edge and live label: extend, then admit the result
//!    at the edge target unless an existing label dominates it
//! 5. Clear the vertex; swap `current` and `next`
//!
//! Paths are never copied per label. Each label points into a
//! [`LabelHistoryTree`](crate::history::LabelHistoryTree) and the path is
//! rebuilt by walking parent links once the search is done.

pub mod config;
pub mod label;
pub mod ping_pong;
pub mod solutions;

use tracing::{debug, trace};

use crate::graph::{EdgeLocation, Graph};
use crate::history::{LabelHistoryTree, ROOT};
use crate::types::{extend, State};

pub use config::{SearchConfig, VertexOrder};
pub use label::Label;
pub use ping_pong::find_ping_pong_solutions;
pub use solutions::{replay_path, SearchStats, Solutions};

use label::admit;

/// Error type for bounded searches.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The configured round cap was reached before the fixed point.
    #[error("Round limit exceeded after {rounds} rounds")]
    RoundLimitExceeded {
        /// Rounds completed when the search stopped.
        rounds: usize,
    },
}

/// Label-setting search over a borrowed graph.
///
/// The graph is read-only for the lifetime of the search; label arrays and
/// the history tree are owned by [`run`](Self::run) and dropped when it
/// returns.
#[derive(Debug, Clone)]
pub struct LabelSettingSearch<'g> {
    graph: &'g Graph,
    source: usize,
    target: usize,
    config: SearchConfig,
}

impl<'g> LabelSettingSearch<'g> {
    /// Create a search from `source` to `target`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range, if `source == target`, or if
    /// the target has outgoing edges.
    pub fn new(graph: &'g Graph, source: usize, target: usize) -> Self {
        check_endpoints(graph, source, target);
        Self {
            graph,
            source,
            target,
            config: SearchConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run the search from `initial_state` to the fixed point.
    pub fn run(&self, initial_state: State) -> Result<Solutions, SearchError> {
        let vertices = self.graph.get_vertices();
        let target = self.target;

        let mut current: Vec<Vec<Label>> = vec![Vec::new(); vertices.len()];
        let mut next: Vec<Vec<Label>> = vec![Vec::new(); vertices.len()];
        let mut tree = LabelHistoryTree::new(self.source);
        let mut stats = SearchStats::default();
        let mut order: Vec<usize> = (0..vertices.len()).collect();

        current[self.source].push(Label::new(initial_state, ROOT));

        let mut labels_pending = true;
        while labels_pending {
            if let Some(max_rounds) = self.config.max_rounds {
                if stats.rounds >= max_rounds {
                    debug!(rounds = stats.rounds, "label-setting search hit round limit");
                    return Err(SearchError::RoundLimitExceeded { rounds: stats.rounds });
                }
            }
            stats.rounds += 1;
            labels_pending = false;

            // The target never propagates; its labels stay parked in `next`.
            crate::contract!(next[target].is_empty());
            std::mem::swap(&mut current[target], &mut next[target]);

            for labels in current.iter_mut() {
                labels.retain(|l| !l.dominated);
                labels.sort_by(|lhs, rhs| lhs.state.cmp_by_time(&rhs.state));
            }

            if self.config.vertex_order == VertexOrder::EarliestLabel {
                order.sort_by_key(|&v| match current[v].first() {
                    Some(label) => (false, label.state.time),
                    None => (true, 0),
                });
            }

            let mut active_vertices = 0usize;
            for &vertex_index in &order {
                if current[vertex_index].is_empty() {
                    continue;
                }
                labels_pending = true;
                active_vertices += 1;

                // Edge-major loop: all labels are written to one target
                // vertex before moving to the next.
                let vertex = &vertices[vertex_index];
                for (out_edge_index, edge) in vertex.out_edges.iter().enumerate() {
                    let to = edge.vertex_index;
                    let location = EdgeLocation::new(vertex_index, out_edge_index);
                    let incoming = current[vertex_index].len();
                    next[to].reserve(incoming);

                    // Indexed loop: a self-loop may tombstone labels of this
                    // very vertex while they are being extended.
                    for i in 0..incoming {
                        let label = current[vertex_index][i];
                        if label.dominated {
                            continue;
                        }
                        let Some(state) = extend(&label.state, &edge.data) else {
                            stats.extensions_rejected += 1;
                            continue;
                        };
                        let sets = &mut [next[to].as_mut_slice(), current[to].as_mut_slice()];
                        if !admit(&state, sets, &mut stats) {
                            continue;
                        }
                        let history = tree.push(label.history, location);
                        next[to].push(Label::new(state, history));
                    }
                }
                current[vertex_index].clear();
            }

            std::mem::swap(&mut current, &mut next);
            trace!(
                round = stats.rounds,
                active_vertices,
                history_len = tree.len(),
                "round complete"
            );
        }

        tree.check_consistency();
        stats.labels_created = tree.len() - 1;

        let solutions = collect_solutions(&current[target], &tree, stats);
        debug!(
            source = self.source,
            target,
            rounds = stats.rounds,
            labels_created = stats.labels_created,
            candidates_dominated = stats.candidates_dominated,
            solutions = solutions.len(),
            "label-setting search finished"
        );
        Ok(solutions)
    }
}

/// Find all nondominated paths from `source` to `target`.
///
/// # Panics
///
/// Panics if `source == target`, if the target has outgoing edges, or if
/// either index is out of range.
pub fn find_solutions(
    graph: &Graph,
    source: usize,
    target: usize,
    initial_state: State,
) -> Solutions {
    let search = LabelSettingSearch::new(graph, source, target);
    match search.run(initial_state) {
        Ok(solutions) => solutions,
        // The default configuration has no round cap.
        Err(SearchError::RoundLimitExceeded { .. }) => {
            unreachable!("unbounded search stopped early")
        }
    }
}

/// Find all nondominated paths with an explicit configuration.
///
/// # Panics
///
/// Same contract as [`find_solutions`].
pub fn find_solutions_with_config(
    graph: &Graph,
    source: usize,
    target: usize,
    initial_state: State,
    config: SearchConfig,
) -> Result<Solutions, SearchError> {
    LabelSettingSearch::new(graph, source, target)
        .with_config(config)
        .run(initial_state)
}

pub(crate) fn check_endpoints(graph: &Graph, source: usize, target: usize) {
    let vertices = graph.get_vertices();
    crate::contract!(source < vertices.len(), "source {} out of range", source);
    crate::contract!(target < vertices.len(), "target {} out of range", target);
    crate::contract!(source != target);
    crate::contract!(
        vertices[target].out_edges.is_empty(),
        "target {} has {} outgoing edges",
        target,
        vertices[target].out_edges.len()
    );
}

/// Keep the live target labels and rebuild their paths.
pub(crate) fn collect_solutions(
    target_labels: &[Label],
    tree: &LabelHistoryTree,
    stats: SearchStats,
) -> Solutions {
    let (nondominated_paths, nondominated_end_states) = target_labels
        .iter()
        .filter(|l| !l.dominated)
        .map(|l| (tree.path(l.history), l.state))
        .unzip();

    Solutions {
        nondominated_paths,
        nondominated_end_states,
        stats,
    }
}
