//! # rcsp-kernel
//!
//! Label-setting search for the Resource Constrained Shortest Path Problem.
//!
//! The kernel answers one question:
//!
//! > Given a source, a target and an initial resource state, which paths
//! > reach the target with an end state no other path beats on every resource?
//!
//! This is the pricing subproblem of column-generation vehicle-routing
//! solvers, called thousands of times per pricing iteration.
//!
//! ## Core Contract
//!
//! 1. Edges carry an [`ExtensionData`] that transforms a [`State`] (cost,
//!    time, energy, completed deliveries) or rejects it
//! 2. A state dominates another when it is at least as good on every resource
//! 3. [`find_solutions`] returns every nondominated end state at the target
//!    with the path producing it
//!
//! ## Architecture
//!
//! ```text
//! Graph ──► LabelSettingSearch ──► Solutions
//!              │        │
//!        extend/dominate  LabelHistoryTree (path reconstruction)
//! ```
//!
//! ## Failure Model
//!
//! Infeasible extensions and dominated labels are ordinary control flow.
//! Contract violations (source equal to target, a target with outgoing
//! edges, out-of-range indices) panic through [`contract!`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contract;
pub mod types;
pub mod graph;
pub mod history;
pub mod search;
pub mod canonical;
pub mod generator;
pub mod dot;

#[cfg(feature = "reference")]
pub mod reference;

// Re-exports
pub use types::{
    extend, is_dominate, DeliveryIndex, DeliverySet, ExtensionData, Site, State, N_DELIVERIES,
};
pub use graph::{EdgeLocation, Graph, GraphError, TargetEdge, Vertex};
pub use history::{HistoryIndex, HistoryNode, LabelHistoryTree, ROOT};
pub use search::{
    find_ping_pong_solutions, find_solutions, find_solutions_with_config, replay_path,
    Label, LabelSettingSearch, SearchConfig, SearchError, SearchStats, Solutions, VertexOrder,
};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};
pub use generator::{generate, GeneratorError, SourceTargetGraph};
pub use dot::{to_dot_string, write_dot};

#[cfg(feature = "reference")]
pub use reference::{
    find_reference_solutions, from_reference_graph, to_reference_graph,
    ReferenceGraph, ReferenceSolutions, ReferenceVertex,
};

#[doc(hidden)]
pub use tracing as __tracing;

/// Default search configuration version identifier.
pub const DEFAULT_SEARCH_VERSION: &str = "label_setting_v1";
