//! Ping-pong variant of the label-setting search.
//!
//! Instead of two label arrays that are cleared and swapped, each vertex
//! keeps one label list for the whole search together with a watermark.
//! Labels below the watermark have been propagated; labels between the
//! watermark and the length at the start of a round are the round's
//! "current" window; labels appended during the round are its "next". The
//! roles alternate by moving the watermark, never by clearing.
//!
//! Propagated labels stay in the list and keep pruning later arrivals, so
//! this variant usually creates fewer labels. It must find the same
//! end-state set as [`find_solutions`](super::find_solutions) and is used to
//! cross-check it.

use tracing::{debug, trace};

use crate::graph::{EdgeLocation, Graph};
use crate::history::{LabelHistoryTree, ROOT};
use crate::types::{extend, State};

use super::label::{admit, Label};
use super::{check_endpoints, collect_solutions, SearchStats, Solutions};

#[derive(Debug, Clone, Default)]
struct VertexLabels {
    labels: Vec<Label>,
    /// Labels before this index have been propagated.
    processed: usize,
}

impl VertexLabels {
    /// Drop tombstoned labels, keeping the watermark on the same live labels.
    fn compact(&mut self) {
        let processed_live = self.labels[..self.processed].iter().filter(|l| !l.dominated).count();
        self.labels.retain(|l| !l.dominated);
        self.processed = processed_live;
    }

    fn earliest_pending_time(&self) -> Option<i32> {
        self.labels[self.processed..].first().map(|l| l.state.time)
    }
}

/// Find all nondominated paths with the ping-pong label layout.
///
/// # Panics
///
/// Same contract as [`find_solutions`](super::find_solutions).
pub fn find_ping_pong_solutions(
    graph: &Graph,
    source: usize,
    target: usize,
    initial_state: State,
) -> Solutions {
    check_endpoints(graph, source, target);
    let vertices = graph.get_vertices();

    let mut slots: Vec<VertexLabels> = vec![VertexLabels::default(); vertices.len()];
    let mut tree = LabelHistoryTree::new(source);
    let mut stats = SearchStats::default();
    let mut order: Vec<usize> = (0..vertices.len()).filter(|&v| v != target).collect();

    slots[source].labels.push(Label::new(initial_state, ROOT));

    loop {
        stats.rounds += 1;

        for slot in slots.iter_mut() {
            slot.compact();
            let processed = slot.processed;
            slot.labels[processed..].sort_by(|lhs, rhs| lhs.state.cmp_by_time(&rhs.state));
        }

        // Window ends are fixed here; arrivals during the round wait for the next one.
        let round_end: Vec<usize> = slots.iter().map(|s| s.labels.len()).collect();
        if order.iter().all(|&v| slots[v].processed == round_end[v]) {
            break;
        }

        order.sort_by_key(|&v| match slots[v].earliest_pending_time() {
            Some(time) => (false, time),
            None => (true, 0),
        });

        for &vertex_index in &order {
            let window = slots[vertex_index].processed..round_end[vertex_index];
            if window.is_empty() {
                continue;
            }

            for (out_edge_index, edge) in vertices[vertex_index].out_edges.iter().enumerate() {
                let to = edge.vertex_index;
                let location = EdgeLocation::new(vertex_index, out_edge_index);

                for i in window.clone() {
                    let label = slots[vertex_index].labels[i];
                    if label.dominated {
                        continue;
                    }
                    let Some(state) = extend(&label.state, &edge.data) else {
                        stats.extensions_rejected += 1;
                        continue;
                    };
                    if !admit(&state, &mut [slots[to].labels.as_mut_slice()], &mut stats) {
                        continue;
                    }
                    let history = tree.push(label.history, location);
                    slots[to].labels.push(Label::new(state, history));
                }
            }
            slots[vertex_index].processed = window.end;
        }

        trace!(round = stats.rounds, history_len = tree.len(), "ping-pong round complete");
    }

    tree.check_consistency();
    stats.labels_created = tree.len() - 1;

    let solutions = collect_solutions(&slots[target].labels, &tree, stats);
    debug!(
        source,
        target,
        rounds = stats.rounds,
        labels_created = stats.labels_created,
        solutions = solutions.len(),
        "ping-pong search finished"
    );
    solutions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::find_solutions;
    use crate::types::{ExtensionData, Site};

    #[test]
    fn test_compact_keeps_watermark_on_live_labels() {
        let mut slot = VertexLabels::default();
        for t in 0..4 {
            slot.labels.push(Label::new(State::new(0, t, 0), t as usize));
        }
        slot.processed = 3;
        slot.labels[0].dominated = true;
        slot.labels[3].dominated = true;
        slot.compact();
        assert_eq!(slot.labels.len(), 2);
        assert_eq!(slot.processed, 2);
        assert_eq!(slot.earliest_pending_time(), None);
    }

    #[test]
    fn test_matches_label_setting_search_with_charger() {
        let mut graph = Graph::new();
        let depot = graph.add_vertex(Site::default());
        let mid = graph.add_vertex(Site::default());
        let sink = graph.add_vertex(Site::default());
        graph.add_edge(depot, depot, ExtensionData::new(0, 0, 100, 3, 2, 4));
        graph.add_edge(depot, mid, ExtensionData::new(1, 0, 100, 4, 7, -6));
        graph.add_edge(mid, sink, ExtensionData::new(2, 0, 100, 0, 0, 0));
        graph.add_edge(depot, sink, ExtensionData::new(3, 0, 100, 0, 0, 0));

        let initial = State::default();
        let expected = find_solutions(&graph, depot, sink, initial);
        let actual = find_ping_pong_solutions(&graph, depot, sink, initial);

        assert_eq!(actual.len(), expected.len());
        assert_eq!(actual.sorted_end_states(), expected.sorted_end_states());
        for (path, end) in actual.iter() {
            assert_eq!(crate::search::replay_path(&graph, path, &initial).as_ref(), Some(end));
        }
    }

    #[test]
    #[should_panic(expected = "contract violated")]
    fn test_target_with_out_edges_panics() {
        let mut graph = Graph::new();
        graph.add_vertex(Site::default());
        graph.add_vertex(Site::default());
        graph.add_edge(1, 0, ExtensionData::default());
        find_ping_pong_solutions(&graph, 0, 1, State::default());
    }
}
