//! Graphviz DOT export.
//!
//! Vertex positions are written as pinned `pos` attributes, so a layout
//! engine that honors them reproduces the site map:
//!
//! ```text
//! dot -Kneato -Tsvg graph.dot -o graph.svg
//! ```
//!
//! See <https://graphviz.org/doc/info/lang.html>.

use std::io::{self, Write};

use crate::graph::Graph;

/// Write `graph` in DOT format.
///
/// Edge labels encode `index,tw:[earliest,latest],cost,duration,energy` and
/// the delivery index for delivery edges. When `show_travel_labels` is
/// false only self-loops (chargers, deliveries) are labeled.
pub fn write_dot<W: Write>(graph: &Graph, show_travel_labels: bool, mut out: W) -> io::Result<()> {
    writeln!(out, "digraph G {{")?;
    for vertex in graph.get_vertices() {
        writeln!(
            out,
            "{}[label=\"{}\" pos=\"{},{}!\"];",
            vertex.index, vertex.index, vertex.site.x, vertex.site.y
        )?;
    }
    for (source, edge) in graph.edges() {
        let target = edge.vertex_index;
        if show_travel_labels || source == target {
            writeln!(out, "{}->{} [label=\"{}\"];", source, target, edge.data)?;
        } else {
            writeln!(out, "{}->{} ;", source, target)?;
        }
    }
    writeln!(out, "}}")?;
    out.flush()
}

/// Render `graph` in DOT format to a string.
pub fn to_dot_string(graph: &Graph, show_travel_labels: bool) -> String {
    let mut buffer = Vec::new();
    write_dot(graph, show_travel_labels, &mut buffer).expect("writing to a Vec cannot fail");
    String::from_utf8_lossy(&buffer).into_owned()
}
