//! The graph backend contract and its petgraph adapter.

use petgraph::graphmap::{GraphMap, NodeTrait};
use petgraph::{Direction, EdgeType};
use skein_core::Coordinate;

/// Minimal capability contract a graph must satisfy to back a
/// [`Network`](crate::Network).
///
/// The network only enumerates nodes and neighbours and applies
/// node/edge mutations; it never runs graph algorithms. Mutation methods
/// report whether the graph actually changed.
///
/// Implemented for [`petgraph::graphmap::GraphMap`] (undirected and
/// directed) and for `&mut G`, so a network may either own its graph or
/// hold an exclusive borrow of a caller's graph.
pub trait GraphBackend {
    /// Node identifier; doubles as the cell coordinate.
    type Node: Coordinate;

    /// Whether edges are directed.
    fn is_directed(&self) -> bool;

    /// Number of nodes.
    fn node_count(&self) -> usize;

    /// Number of edges.
    fn edge_count(&self) -> usize;

    /// All node identifiers.
    fn nodes(&self) -> impl Iterator<Item = Self::Node> + '_;

    /// Nodes reachable over one edge from `node` (successors when directed).
    ///
    /// Empty if `node` is not in the graph.
    fn neighbors(&self, node: &Self::Node) -> impl Iterator<Item = Self::Node> + '_;

    /// Nodes with an edge into `node`. Same as [`neighbors`](Self::neighbors)
    /// for undirected graphs.
    fn predecessors(&self, node: &Self::Node) -> impl Iterator<Item = Self::Node> + '_;

    /// Whether `node` exists.
    fn contains_node(&self, node: &Self::Node) -> bool;

    /// Whether the edge `a -> b` (or `a - b`) exists.
    fn contains_edge(&self, a: &Self::Node, b: &Self::Node) -> bool;

    /// Insert an isolated node. Returns `false` if it already existed.
    fn add_node(&mut self, node: Self::Node) -> bool;

    /// Remove a node together with every incident edge. Returns `false` if
    /// it did not exist.
    fn remove_node(&mut self, node: &Self::Node) -> bool;

    /// Insert an edge. Returns `false` if it already existed.
    fn add_edge(&mut self, a: Self::Node, b: Self::Node) -> bool;

    /// Remove an edge. Returns `false` if it did not exist.
    fn remove_edge(&mut self, a: &Self::Node, b: &Self::Node) -> bool;
}

impl<N, E, Ty> GraphBackend for GraphMap<N, E, Ty>
where
    N: NodeTrait + std::fmt::Debug + 'static,
    E: Default,
    Ty: EdgeType,
{
    type Node = N;

    fn is_directed(&self) -> bool {
        GraphMap::is_directed(self)
    }

    fn node_count(&self) -> usize {
        GraphMap::node_count(self)
    }

    fn edge_count(&self) -> usize {
        GraphMap::edge_count(self)
    }

    fn nodes(&self) -> impl Iterator<Item = N> + '_ {
        GraphMap::nodes(self)
    }

    fn neighbors(&self, node: &N) -> impl Iterator<Item = N> + '_ {
        GraphMap::neighbors(self, *node)
    }

    fn predecessors(&self, node: &N) -> impl Iterator<Item = N> + '_ {
        self.neighbors_directed(*node, Direction::Incoming)
    }

    fn contains_node(&self, node: &N) -> bool {
        GraphMap::contains_node(self, *node)
    }

    fn contains_edge(&self, a: &N, b: &N) -> bool {
        GraphMap::contains_edge(self, *a, *b)
    }

    fn add_node(&mut self, node: N) -> bool {
        if GraphMap::contains_node(self, node) {
            return false;
        }
        GraphMap::add_node(self, node);
        true
    }

    fn remove_node(&mut self, node: &N) -> bool {
        GraphMap::remove_node(self, *node)
    }

    fn add_edge(&mut self, a: N, b: N) -> bool {
        GraphMap::add_edge(self, a, b, E::default()).is_none()
    }

    fn remove_edge(&mut self, a: &N, b: &N) -> bool {
        GraphMap::remove_edge(self, *a, *b).is_some()
    }
}

impl<G: GraphBackend + ?Sized> GraphBackend for &mut G {
    type Node = G::Node;

    fn is_directed(&self) -> bool {
        (**self).is_directed()
    }

    fn node_count(&self) -> usize {
        (**self).node_count()
    }

    fn edge_count(&self) -> usize {
        (**self).edge_count()
    }

    fn nodes(&self) -> impl Iterator<Item = Self::Node> + '_ {
        (**self).nodes()
    }

    fn neighbors(&self, node: &Self::Node) -> impl Iterator<Item = Self::Node> + '_ {
        (**self).neighbors(node)
    }

    fn predecessors(&self, node: &Self::Node) -> impl Iterator<Item = Self::Node> + '_ {
        (**self).predecessors(node)
    }

    fn contains_node(&self, node: &Self::Node) -> bool {
        (**self).contains_node(node)
    }

    fn contains_edge(&self, a: &Self::Node, b: &Self::Node) -> bool {
        (**self).contains_edge(a, b)
    }

    fn add_node(&mut self, node: Self::Node) -> bool {
        (**self).add_node(node)
    }

    fn remove_node(&mut self, node: &Self::Node) -> bool {
        (**self).remove_node(node)
    }

    fn add_edge(&mut self, a: Self::Node, b: Self::Node) -> bool {
        (**self).add_edge(a, b)
    }

    fn remove_edge(&mut self, a: &Self::Node, b: &Self::Node) -> bool {
        (**self).remove_edge(a, b)
    }
}
