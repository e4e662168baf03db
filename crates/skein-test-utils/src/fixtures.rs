//! Reusable graph fixtures.
//!
//! All fixtures are undirected `GraphMap`s over `u32` node ids:
//!
//! - [`scenario_graph`]: nodes {1,2,3}, edges (1,2),(2,3).
//! - [`path_graph`], [`cycle_graph`], [`star_graph`], [`complete_graph`].
//! - [`random_graph`]: Erdős–Rényi `G(n, p)` from a fixed seed.

use petgraph::graphmap::UnGraphMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The three-node path used throughout the behavioural tests.
pub fn scenario_graph() -> UnGraphMap<u32, ()> {
    UnGraphMap::from_edges([(1, 2), (2, 3)])
}

/// `0 - 1 - … - (n-1)`.
pub fn path_graph(n: u32) -> UnGraphMap<u32, ()> {
    let mut g = UnGraphMap::new();
    for i in 0..n {
        g.add_node(i);
    }
    for i in 1..n {
        g.add_edge(i - 1, i, ());
    }
    g
}

/// A path with its ends joined. Needs `n >= 3` to be a simple cycle.
pub fn cycle_graph(n: u32) -> UnGraphMap<u32, ()> {
    let mut g = path_graph(n);
    if n >= 3 {
        g.add_edge(n - 1, 0, ());
    }
    g
}

/// Hub `0` connected to leaves `1..=leaves`.
pub fn star_graph(leaves: u32) -> UnGraphMap<u32, ()> {
    let mut g = UnGraphMap::new();
    g.add_node(0);
    for leaf in 1..=leaves {
        g.add_edge(0, leaf, ());
    }
    g
}

/// Every pair of distinct nodes connected.
pub fn complete_graph(n: u32) -> UnGraphMap<u32, ()> {
    let mut g = path_graph(n);
    for a in 0..n {
        for b in (a + 1)..n {
            g.add_edge(a, b, ());
        }
    }
    g
}

/// `G(n, p)`: each unordered pair is an edge with probability `p`.
pub fn random_graph(n: u32, p: f64, seed: u64) -> UnGraphMap<u32, ()> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut g = UnGraphMap::new();
    for i in 0..n {
        g.add_node(i);
    }
    for a in 0..n {
        for b in (a + 1)..n {
            if rng.random_bool(p) {
                g.add_edge(a, b, ());
            }
        }
    }
    g
}

/// Sorted undirected edge list, each pair as `(min, max)`.
pub fn undirected_edges(g: &UnGraphMap<u32, ()>) -> Vec<(u32, u32)> {
    let mut edges: Vec<(u32, u32)> = g
        .all_edges()
        .map(|(a, b, _)| (a.min(b), a.max(b)))
        .collect();
    edges.sort_unstable();
    edges
}
