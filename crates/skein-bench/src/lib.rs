//! Benchmark profiles for Skein network spaces.
//!
//! - [`lattice_graph`]: `width x height` 4-connected grid as a graph
//! - [`reference_graph`]: 10K-node sparse random graph (mean degree ~6)
//! - [`init_agent_positions`]: deterministic agent placement via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use petgraph::graphmap::UnGraphMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use skein_core::AgentId;

/// Node id of `(row, col)` in a lattice of the given width.
pub fn lattice_id(row: u32, col: u32, width: u32) -> u32 {
    row * width + col
}

/// 4-connected lattice with absorbing edges.
pub fn lattice_graph(width: u32, height: u32) -> UnGraphMap<u32, ()> {
    let mut g = UnGraphMap::with_capacity((width * height) as usize, (2 * width * height) as usize);
    for row in 0..height {
        for col in 0..width {
            let id = lattice_id(row, col, width);
            g.add_node(id);
            if col > 0 {
                g.add_edge(id, lattice_id(row, col - 1, width), ());
            }
            if row > 0 {
                g.add_edge(id, lattice_id(row - 1, col, width), ());
            }
        }
    }
    g
}

/// 10K nodes, each linked to three uniformly chosen partners.
///
/// Duplicate picks collapse, so the mean degree lands slightly below 6.
pub fn reference_graph(seed: u64) -> UnGraphMap<u32, ()> {
    const NODES: u32 = 10_000;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut g = UnGraphMap::with_capacity(NODES as usize, 3 * NODES as usize);
    for i in 0..NODES {
        g.add_node(i);
    }
    for i in 0..NODES {
        for _ in 0..3 {
            let j = rng.random_range(0..NODES);
            g.add_edge(i, j, ());
        }
    }
    g
}

/// Place `n_agents` on distinct nodes in `0..node_count`.
///
/// Returns `(agent, node)` pairs. Panics if `n_agents > node_count`.
pub fn init_agent_positions(node_count: u32, n_agents: u32, seed: u64) -> Vec<(AgentId, u32)> {
    assert!(
        n_agents <= node_count,
        "cannot place {n_agents} agents on {node_count} nodes"
    );
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut taken = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(n_agents as usize);
    for a in 0..n_agents {
        let node = loop {
            let candidate = rng.random_range(0..node_count);
            if taken.insert(candidate) {
                break candidate;
            }
        };
        out.push((AgentId(u64::from(a)), node));
    }
    out
}
