//! Owned adjacency graph.
//!
//! Vertices own their outgoing edges. An edge has no identity of its own: it
//! is addressed either by its dense global index or by its
//! [`EdgeLocation`], the pair `(source vertex, position in out_edges)`.

use serde::{Deserialize, Serialize};

use crate::types::{ExtensionData, Site};

/// Outgoing edge stored on its source vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetEdge {
    /// Index of the target vertex.
    pub vertex_index: usize,
    /// Extension applied on traversal.
    pub data: ExtensionData,
}

/// Vertex with its ordered outgoing edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Dense index assigned at insertion.
    pub index: usize,
    /// Position, for visualization.
    pub site: Site,
    /// Outgoing edges in insertion order.
    pub out_edges: Vec<TargetEdge>,
}

/// Address of an edge: source vertex and position in its `out_edges`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct EdgeLocation {
    /// Source vertex index.
    pub source_vertex_index: usize,
    /// Position in the source vertex's `out_edges`.
    pub out_edge_index: usize,
}

impl EdgeLocation {
    /// Create a new edge location.
    pub fn new(source_vertex_index: usize, out_edge_index: usize) -> Self {
        Self {
            source_vertex_index,
            out_edge_index,
        }
    }
}

/// Error type for checked graph construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Vertex index not present in the graph.
    #[error("Vertex {index} out of range (graph has {len} vertices)")]
    VertexOutOfRange {
        /// Offending index.
        index: usize,
        /// Number of vertices.
        len: usize,
    },
    /// Vertex indices of a converted graph are not the dense `0..n` range.
    #[error("Vertex at position {position} carries index {index}")]
    VertexIndexMismatch {
        /// Position in the source representation.
        position: usize,
        /// Index stored on the vertex.
        index: usize,
    },
}

/// Directed graph whose edges carry [`ExtensionData`].
///
/// Indices are dense and assigned at insertion time. There is no removal or
/// update API; the graph is static for a solve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    vertices: Vec<Vertex>,
    /// Global edge index -> location.
    edges: Vec<EdgeLocation>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, site: Site) -> usize {
        let index = self.vertices.len();
        self.vertices.push(Vertex {
            index,
            site,
            out_edges: Vec::new(),
        });
        index
    }

    /// Append an edge and return its global index.
    ///
    /// # Panics
    ///
    /// Panics if either vertex index is not present. Use
    /// [`try_add_edge`](Self::try_add_edge) for indices that are not trusted.
    pub fn add_edge(
        &mut self,
        source_vertex_index: usize,
        target_vertex_index: usize,
        data: ExtensionData,
    ) -> usize {
        crate::contract!(
            source_vertex_index < self.vertices.len(),
            "source vertex {} out of range",
            source_vertex_index
        );
        crate::contract!(
            target_vertex_index < self.vertices.len(),
            "target vertex {} out of range",
            target_vertex_index
        );
        self.push_edge(source_vertex_index, target_vertex_index, data)
    }

    /// Append an edge, rejecting unknown vertex indices.
    pub fn try_add_edge(
        &mut self,
        source_vertex_index: usize,
        target_vertex_index: usize,
        data: ExtensionData,
    ) -> Result<usize, GraphError> {
        for index in [source_vertex_index, target_vertex_index] {
            if index >= self.vertices.len() {
                return Err(GraphError::VertexOutOfRange {
                    index,
                    len: self.vertices.len(),
                });
            }
        }
        Ok(self.push_edge(source_vertex_index, target_vertex_index, data))
    }

    fn push_edge(
        &mut self,
        source_vertex_index: usize,
        target_vertex_index: usize,
        data: ExtensionData,
    ) -> usize {
        let out_edges = &mut self.vertices[source_vertex_index].out_edges;
        self.edges.push(EdgeLocation::new(source_vertex_index, out_edges.len()));
        out_edges.push(TargetEdge {
            vertex_index: target_vertex_index,
            data,
        });
        self.edges.len() - 1
    }

    /// Extension data of the edge with the given global index.
    ///
    /// # Panics
    ///
    /// Panics if the edge index is not present.
    pub fn get_extension_data(&self, edge_index: usize) -> &ExtensionData {
        &self.edge_at(self.edge_location(edge_index)).data
    }

    /// Location of the edge with the given global index.
    ///
    /// # Panics
    ///
    /// Panics if the edge index is not present.
    pub fn edge_location(&self, edge_index: usize) -> EdgeLocation {
        crate::contract!(
            edge_index < self.edges.len(),
            "edge {} out of range",
            edge_index
        );
        self.edges[edge_index]
    }

    /// Edge stored at a location.
    ///
    /// # Panics
    ///
    /// Panics if the location does not address an existing edge.
    pub fn edge_at(&self, location: EdgeLocation) -> &TargetEdge {
        let vertex = self.vertices.get(location.source_vertex_index);
        let edge = vertex.and_then(|v| v.out_edges.get(location.out_edge_index));
        crate::contract!(edge.is_some(), "no edge at {:?}", location);
        &self.vertices[location.source_vertex_index].out_edges[location.out_edge_index]
    }

    /// All vertices in index order.
    pub fn get_vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Iterate `(source vertex index, edge)` in global edge order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, &TargetEdge)> + '_ {
        self.edges
            .iter()
            .map(|loc| (loc.source_vertex_index, self.edge_at(*loc)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(index: usize) -> ExtensionData {
        ExtensionData::new(index, 0, 100, 1, 1, 0)
    }

    #[test]
    fn test_dense_vertex_and_edge_indices() {
        let mut graph = Graph::new();
        assert_eq!(graph.add_vertex(Site::new(0.0, 0.0)), 0);
        assert_eq!(graph.add_vertex(Site::new(1.0, 0.0)), 1);
        assert_eq!(graph.add_vertex(Site::new(2.0, 0.0)), 2);

        assert_eq!(graph.add_edge(0, 1, data(0)), 0);
        assert_eq!(graph.add_edge(1, 2, data(1)), 1);
        assert_eq!(graph.add_edge(0, 2, data(2)), 2);

        assert_eq!(graph.num_vertices(), 3);
        assert_eq!(graph.num_edges(), 3);
        assert_eq!(graph.edge_location(2), EdgeLocation::new(0, 1));
        assert_eq!(graph.get_extension_data(1).index, 1);
        assert_eq!(graph.get_vertices()[0].out_edges.len(), 2);
    }

    #[test]
    fn test_self_loops_are_allowed() {
        let mut graph = Graph::new();
        let v = graph.add_vertex(Site::default());
        let e = graph.add_edge(v, v, data(0));
        let edge = graph.edge_at(graph.edge_location(e));
        assert_eq!(edge.vertex_index, v);
    }

    #[test]
    fn test_edges_iterate_in_global_order() {
        let mut graph = Graph::new();
        let a = graph.add_vertex(Site::default());
        let b = graph.add_vertex(Site::default());
        graph.add_edge(b, a, data(0));
        graph.add_edge(a, b, data(1));
        graph.add_edge(b, b, data(2));

        let order: Vec<_> = graph
            .edges()
            .map(|(src, e)| (src, e.vertex_index, e.data.index))
            .collect();
        assert_eq!(order, vec![(b, a, 0), (a, b, 1), (b, b, 2)]);
    }

    #[test]
    fn test_try_add_edge_rejects_unknown_vertex() {
        let mut graph = Graph::new();
        graph.add_vertex(Site::default());
        let err = graph.try_add_edge(0, 3, data(0)).unwrap_err();
        assert_eq!(err, GraphError::VertexOutOfRange { index: 3, len: 1 });
        assert_eq!(graph.num_edges(), 0);
    }

    #[test]
    #[should_panic(expected = "contract violated")]
    fn test_add_edge_out_of_range_panics() {
        let mut graph = Graph::new();
        graph.add_vertex(Site::default());
        graph.add_edge(0, 1, data(0));
    }

    #[test]
    #[should_panic(expected = "edge 0 out of range")]
    fn test_get_extension_data_out_of_range_panics() {
        Graph::new().get_extension_data(0);
    }
}
