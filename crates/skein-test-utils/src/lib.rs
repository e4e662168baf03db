//! Test utilities and mock types for Skein development.
//!
//! Provides a minimal hand-written [`GraphBackend`] ([`AdjacencyGraph`])
//! for exercising networks over non-`Copy` coordinates, a custom cell type
//! ([`TaggedCell`]), and a consistency assertion shared by integration
//! tests. Graph fixtures live in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use indexmap::{IndexMap, IndexSet};
use skein_core::{AgentId, CellError, Coordinate};
use skein_space::{Cell, GraphBackend, Network, SpaceCell, SpaceRng};

/// Adjacency-set graph over arbitrary coordinates.
///
/// Keeps separate outgoing and incoming sets so it can act as a directed
/// or undirected backend. Node iteration follows insertion order.
#[derive(Clone, Debug)]
pub struct AdjacencyGraph<K: Coordinate> {
    directed: bool,
    out: IndexMap<K, IndexSet<K>>,
    inc: IndexMap<K, IndexSet<K>>,
    edges: usize,
}

impl<K: Coordinate> AdjacencyGraph<K> {
    pub fn undirected() -> Self {
        Self {
            directed: false,
            out: IndexMap::new(),
            inc: IndexMap::new(),
            edges: 0,
        }
    }

    pub fn directed() -> Self {
        Self {
            directed: true,
            ..Self::undirected()
        }
    }

    /// Build from an edge list, inserting endpoints as needed.
    pub fn from_edges(directed: bool, edges: impl IntoIterator<Item = (K, K)>) -> Self {
        let mut g = if directed {
            Self::directed()
        } else {
            Self::undirected()
        };
        for (a, b) in edges {
            g.add_edge(a, b);
        }
        g
    }

    fn link(&mut self, a: &K, b: &K) {
        if let Some(set) = self.out.get_mut(a) {
            set.insert(b.clone());
        }
        if let Some(set) = self.inc.get_mut(b) {
            set.insert(a.clone());
        }
    }

    fn unlink(&mut self, a: &K, b: &K) {
        if let Some(set) = self.out.get_mut(a) {
            set.shift_remove(b);
        }
        if let Some(set) = self.inc.get_mut(b) {
            set.shift_remove(a);
        }
    }
}

impl<K: Coordinate> GraphBackend for AdjacencyGraph<K> {
    type Node = K;

    fn is_directed(&self) -> bool {
        self.directed
    }

    fn node_count(&self) -> usize {
        self.out.len()
    }

    fn edge_count(&self) -> usize {
        self.edges
    }

    fn nodes(&self) -> impl Iterator<Item = K> + '_ {
        self.out.keys().cloned()
    }

    fn neighbors(&self, node: &K) -> impl Iterator<Item = K> + '_ {
        self.out.get(node).into_iter().flatten().cloned()
    }

    fn predecessors(&self, node: &K) -> impl Iterator<Item = K> + '_ {
        self.inc.get(node).into_iter().flatten().cloned()
    }

    fn contains_node(&self, node: &K) -> bool {
        self.out.contains_key(node)
    }

    fn contains_edge(&self, a: &K, b: &K) -> bool {
        self.out.get(a).is_some_and(|set| set.contains(b))
    }

    fn add_node(&mut self, node: K) -> bool {
        if self.out.contains_key(&node) {
            return false;
        }
        self.out.insert(node.clone(), IndexSet::new());
        self.inc.insert(node, IndexSet::new());
        true
    }

    fn remove_node(&mut self, node: &K) -> bool {
        let Some(outgoing) = self.out.shift_remove(node) else {
            return false;
        };
        let incoming = self.inc.shift_remove(node).unwrap_or_default();
        for target in &outgoing {
            if let Some(set) = self.inc.get_mut(target) {
                set.shift_remove(node);
            }
        }
        for source in &incoming {
            if let Some(set) = self.out.get_mut(source) {
                set.shift_remove(node);
            }
        }
        let removed = if self.directed {
            let self_loop = usize::from(outgoing.contains(node));
            outgoing.len() + incoming.len() - self_loop
        } else {
            outgoing.len()
        };
        self.edges -= removed;
        true
    }

    fn add_edge(&mut self, a: K, b: K) -> bool {
        if self.contains_edge(&a, &b) {
            return false;
        }
        self.add_node(a.clone());
        self.add_node(b.clone());
        self.link(&a, &b);
        if !self.directed {
            self.link(&b, &a);
        }
        self.edges += 1;
        true
    }

    fn remove_edge(&mut self, a: &K, b: &K) -> bool {
        if !self.contains_edge(a, b) {
            return false;
        }
        self.unlink(a, b);
        if !self.directed {
            self.unlink(b, a);
        }
        self.edges -= 1;
        true
    }
}

/// A cell carrying a label assigned at creation.
///
/// Wraps the default [`Cell`] and delegates everything else to it.
#[derive(Clone, Debug, PartialEq)]
pub struct TaggedCell<K: Coordinate> {
    pub inner: Cell<K>,
    pub tag: String,
}

impl<K: Coordinate> SpaceCell for TaggedCell<K> {
    type Coord = K;

    fn new(coordinate: K, capacity: Option<usize>, _rng: &mut SpaceRng) -> Self {
        let tag = format!("{coordinate:?}");
        Self {
            inner: Cell::with_capacity(coordinate, capacity),
            tag,
        }
    }

    fn coordinate(&self) -> &K {
        self.inner.coordinate()
    }

    fn capacity(&self) -> Option<usize> {
        self.inner.capacity()
    }

    fn connections(&self) -> &IndexMap<K, K> {
        self.inner.connections()
    }

    fn connect(&mut self, other: &K, label: K) {
        self.inner.connect(other, label);
    }

    fn disconnect(&mut self, other: &K) -> bool {
        self.inner.disconnect(other)
    }

    fn clear_connections(&mut self) {
        self.inner.clear_connections();
    }

    fn agents(&self) -> &[AgentId] {
        self.inner.agents()
    }

    fn add_agent(&mut self, agent: AgentId) -> Result<(), CellError> {
        self.inner.add_agent(agent)
    }

    fn remove_agent(&mut self, agent: AgentId) -> Result<(), CellError> {
        self.inner.remove_agent(agent)
    }
}

/// Panic with the first violation if the network's cells and graph
/// disagree.
pub fn assert_network_consistent<G, C>(network: &Network<G, C>)
where
    G: GraphBackend,
    C: SpaceCell<Coord = G::Node>,
{
    if let Err(e) = network.verify_consistency() {
        panic!("{e}");
    }
}
