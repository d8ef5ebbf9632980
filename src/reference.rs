//! Reference oracle built on `petgraph`.
//!
//! Converts a [`Graph`] to a `petgraph` directed graph and back, and solves
//! the same problem there with the `generic_rcsp` labeling solver: a cost
//! ordered queue of labels, domination checked when a label is inserted and
//! again when it is popped. Only used to validate the label-setting search;
//! nothing in the core depends on it.

use generic_rcsp::{
    GraphType, InitialLabelGenerator, Label, Meta, ProblemGraph, RcspSolver, UserProblem,
};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::stable_graph::EdgeReference;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::{EdgeLocation, Graph, GraphError};
use crate::types::{extend, is_dominate, ExtensionData, Site, State};

/// Vertex weight of a [`ReferenceGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceVertex {
    /// Index of the vertex in the originating [`Graph`].
    pub index: usize,
    /// Position.
    pub site: Site,
}

/// `petgraph` representation of a [`Graph`].
///
/// Node indices equal vertex indices and edge indices equal global edge
/// indices.
pub type ReferenceGraph = DiGraph<ReferenceVertex, ExtensionData>;

/// Oracle output, shaped like [`Solutions`](crate::Solutions).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceSolutions {
    /// Paths as `petgraph` edge indices, last traversed edge first.
    pub nondominated_paths: Vec<Vec<EdgeIndex>>,
    /// End state of each path.
    pub nondominated_end_states: Vec<State>,
}

impl ReferenceSolutions {
    /// End states sorted by every field.
    pub fn sorted_end_states(&self) -> Vec<State> {
        let mut states = self.nondominated_end_states.clone();
        states.sort_by_key(State::canonical_key);
        states
    }

    /// Translate the paths to edge locations of the originating graph.
    pub fn edge_location_paths(&self, graph: &Graph) -> Vec<Vec<EdgeLocation>> {
        self.nondominated_paths
            .iter()
            .map(|path| path.iter().map(|e| graph.edge_location(e.index())).collect())
            .collect()
    }
}

/// Convert a graph to its `petgraph` representation.
pub fn to_reference_graph(graph: &Graph) -> ReferenceGraph {
    let mut reference = ReferenceGraph::with_capacity(graph.num_vertices(), graph.num_edges());
    for vertex in graph.get_vertices() {
        reference.add_node(ReferenceVertex {
            index: vertex.index,
            site: vertex.site,
        });
    }
    for (source, edge) in graph.edges() {
        reference.add_edge(NodeIndex::new(source), NodeIndex::new(edge.vertex_index), edge.data);
    }
    reference
}

/// Convert a `petgraph` representation back to a graph.
///
/// Fails when node weights do not carry the dense `0..n` vertex indices.
pub fn from_reference_graph(reference: &ReferenceGraph) -> Result<Graph, GraphError> {
    let mut graph = Graph::new();
    for (position, node) in reference.node_indices().enumerate() {
        let vertex = &reference[node];
        if vertex.index != position {
            return Err(GraphError::VertexIndexMismatch {
                position,
                index: vertex.index,
            });
        }
        graph.add_vertex(vertex.site);
    }
    for edge in reference.edge_references() {
        let source = reference[edge.source()].index;
        let target = reference[edge.target()].index;
        graph.try_add_edge(source, target, *edge.weight())?;
    }
    Ok(graph)
}

/// Problem handed to the `generic_rcsp` solver.
///
/// The solver expects the start node at index 0, so the source is added
/// first and the remaining nodes follow in index order. Edges are added in
/// order, which keeps their indices equal to those of the [`ReferenceGraph`].
struct OracleProblem {
    dag: GraphType<ReferenceVertex, ExtensionData>,
    start: NodeIndex,
    end: NodeIndex,
    initial_state: State,
}

impl OracleProblem {
    fn new(
        reference: &ReferenceGraph,
        source: NodeIndex,
        target: NodeIndex,
        initial_state: State,
    ) -> Self {
        let mut dag = GraphType::with_capacity(reference.node_count(), reference.edge_count());
        let mut remap = vec![NodeIndex::end(); reference.node_count()];
        let rest = reference.node_indices().filter(|&n| n != source);
        let order = std::iter::once(source).chain(rest);
        for node in order {
            remap[node.index()] = dag.add_node(reference[node]);
        }
        for edge in reference.edge_references() {
            dag.add_edge(
                remap[edge.source().index()],
                remap[edge.target().index()],
                *edge.weight(),
            );
        }

        Self {
            dag,
            start: remap[source.index()],
            end: remap[target.index()],
            initial_state,
        }
    }
}

#[derive(Debug, Clone)]
struct OracleMeta {
    state: State,
}

impl Meta for OracleMeta {}

impl InitialLabelGenerator<OracleProblem> for OracleMeta {
    fn default(problem: &OracleProblem) -> Self {
        Self {
            state: problem.initial_state,
        }
    }
}

impl UserProblem<OracleMeta, ReferenceVertex, ExtensionData, ()> for OracleProblem {
    fn create_graph(&mut self) -> ProblemGraph<ReferenceVertex, ExtensionData> {
        ProblemGraph {
            dag: std::mem::take(&mut self.dag),
            start: self.start,
            end: self.end,
        }
    }

    fn is_dominating(
        label_a: &Label<OracleMeta>,
        label_b: &Label<OracleMeta>,
        _active_filters: &[()],
    ) -> bool {
        is_dominate(&label_a.meta.state, &label_b.meta.state)
    }

    fn extend_label<'arena>(
        &self,
        existing_label: &'arena Label<'arena, OracleMeta>,
        edge: &EdgeReference<ExtensionData>,
        _source: &ReferenceVertex,
        _target: &ReferenceVertex,
        _active_filters: &[()],
        _sink: NodeIndex,
    ) -> Option<Label<'arena, OracleMeta>> {
        let data = edge.weight();
        let state = extend(&existing_label.meta.state, data)?;
        Some(Label::extend(
            existing_label,
            edge,
            f64::from(data.cost_change),
            OracleMeta { state },
        ))
    }
}

type OracleSolver = RcspSolver<OracleProblem, OracleMeta, ReferenceVertex, ExtensionData, ()>;

/// Solve the instance with the `generic_rcsp` labeling algorithm.
///
/// # Panics
///
/// Panics if `source == target` or if the target has outgoing edges.
pub fn find_reference_solutions(
    reference: &ReferenceGraph,
    source: NodeIndex,
    target: NodeIndex,
    initial_state: State,
) -> ReferenceSolutions {
    crate::contract!(source != target);
    crate::contract!(reference.edges(target).next().is_none());

    let problem = OracleProblem::new(reference, source, target, initial_state);
    let mut solver = OracleSolver::new(problem);
    let paths = solver.find_paths::<false>(&[], f64::from(initial_state.cost));

    // The solver reports paths and costs only; end states are replayed.
    let mut candidates: Vec<(Vec<EdgeIndex>, State)> = Vec::with_capacity(paths.len());
    for (_, feasible) in &paths {
        let forward: Vec<EdgeIndex> = feasible.path.iter().filter_map(|&(_, edge)| edge).collect();
        let end = forward
            .iter()
            .try_fold(initial_state, |state, &edge| extend(&state, &reference[edge]));
        crate::contract!(end.is_some(), "oracle path does not replay: {:?}", forward);
        if let Some(end) = end {
            candidates.push((forward.into_iter().rev().collect(), end));
        }
    }

    // Insertion compares a candidate against one label of equal cost only,
    // so the end labels can still hold dominated or repeated states.
    let mut solutions = ReferenceSolutions::default();
    for (i, (path, state)) in candidates.iter().enumerate() {
        let beaten = candidates.iter().enumerate().any(|(j, (_, other))| {
            j != i && is_dominate(other, state) && (j < i || !is_dominate(state, other))
        });
        if !beaten {
            solutions.nondominated_paths.push(path.clone());
            solutions.nondominated_end_states.push(*state);
        }
    }

    debug!(
        paths_found = candidates.len(),
        solutions = solutions.nondominated_end_states.len(),
        "reference search finished"
    );
    solutions
}
