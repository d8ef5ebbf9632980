//! Random synthetic instances.
//!
//! Builds a small delivery network: one vertex per site, a sink vertex, a
//! charger at the depot (vertex 0), random chargers elsewhere, one delivery
//! per non-depot site and travel edges between every pair of sites. The
//! depot is the source; the sink is reached from the depot by a zero-cost
//! structural edge, so every instance has at least one solution.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::graph::Graph;
use crate::types::{DeliveryIndex, ExtensionData, Site, N_DELIVERIES};

/// Latest time of every generated time window.
pub const LATEST_TIME: i32 = 100;

/// Probability that a non-depot site gets a charger.
const CHARGER_PROBABILITY: f64 = 0.15;

/// Placement attempts per site before giving up.
const MAX_PLACEMENT_ATTEMPTS: usize = 100_000;

/// Error type for instance generation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeneratorError {
    /// Site count outside `1..=N_DELIVERIES`.
    #[error("Site count {count} out of range 1..={max}")]
    InvalidSiteCount {
        /// Requested site count.
        count: usize,
        /// Largest supported site count.
        max: usize,
    },
    /// No free grid position found for a site.
    #[error("No free position found after placing {placed} sites")]
    NoFreePosition {
        /// Sites placed before the failure.
        placed: usize,
    },
}

/// A graph together with the endpoints to search between.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTargetGraph {
    /// Source vertex (the depot).
    pub source: usize,
    /// Target vertex (the sink).
    pub target: usize,
    /// The instance.
    pub graph: Graph,
}

/// Generate a random instance with `sites_count` sites.
///
/// The same `(sites_count, seed)` always produces the same graph.
pub fn generate(sites_count: usize, seed: u64) -> Result<SourceTargetGraph, GeneratorError> {
    if sites_count == 0 || sites_count > N_DELIVERIES {
        return Err(GeneratorError::InvalidSiteCount {
            count: sites_count,
            max: N_DELIVERIES,
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let sites = create_sites(sites_count, &mut rng)?;

    let mut graph = Graph::new();
    for site in &sites {
        graph.add_vertex(*site);
    }
    // Sink, drawn next to the depot.
    let source = 0;
    let target = graph.add_vertex(sites[0].offset(0.5, 0.5));

    let mut next_index = 0usize;
    let mut add = |graph: &mut Graph, from: usize, to: usize, data: ExtensionData| {
        graph.add_edge(from, to, ExtensionData { index: next_index, ..data });
        next_index += 1;
    };

    let charger = ExtensionData::new(0, 0, LATEST_TIME, 3, 2, 4);
    add(&mut graph, source, source, charger);
    for site in 1..sites_count {
        if rng.gen::<f64>() < CHARGER_PROBABILITY {
            add(&mut graph, site, site, charger);
        }
    }

    for site in 1..sites_count {
        // site < sites_count <= N_DELIVERIES
        if let Some(delivery) = DeliveryIndex::new(site) {
            let data = ExtensionData::new(0, 0, LATEST_TIME, 0, 0, 0).with_delivery(delivery);
            add(&mut graph, site, site, data);
        }
    }

    for (from, from_site) in sites.iter().enumerate() {
        for (to, to_site) in sites.iter().enumerate() {
            if from == to {
                continue;
            }
            let distance = (10.0 * from_site.distance_squared(to_site)).sqrt();
            crate::contract!(distance > 0.0);
            let travel = ExtensionData::new(
                0,
                0,
                LATEST_TIME,
                (2.0 * distance) as i32,
                distance as i32,
                -distance as i32,
            );
            add(&mut graph, from, to, travel);
        }
    }

    add(&mut graph, source, target, ExtensionData::new(0, 0, LATEST_TIME, 0, 0, 0));

    debug!(
        sites_count,
        seed,
        vertices = graph.num_vertices(),
        edges = graph.num_edges(),
        "generated instance"
    );

    Ok(SourceTargetGraph { source, target, graph })
}

/// Place sites at distinct integer points of a grid just large enough to
/// make collisions rare.
fn create_sites(sites_count: usize, rng: &mut StdRng) -> Result<Vec<Site>, GeneratorError> {
    let grid_side = 10 + (2.0 * sites_count as f64).sqrt() as i32;
    let mut sites: Vec<Site> = Vec::with_capacity(sites_count);

    while sites.len() < sites_count {
        let position = (0..MAX_PLACEMENT_ATTEMPTS)
            .map(|_| {
                Site::new(
                    rng.gen_range(0..grid_side) as f32,
                    rng.gen_range(0..grid_side) as f32,
                )
            })
            .find(|candidate| !sites.contains(candidate))
            .ok_or(GeneratorError::NoFreePosition { placed: sites.len() })?;
        sites.push(position);
    }

    Ok(sites)
}
