//! Graph-backed discrete space.
//!
//! A [`Network`] binds a [`GraphBackend`] to a [`DiscreteSpace`]: every
//! graph node has exactly one cell, and every graph edge has a matching
//! cell-level connection labelled by the neighbour's coordinate. The
//! network is the only write path for both structures, so the two stay
//! in lockstep:
//!
//! - construction walks the graph's nodes to create cells, then walks each
//!   node's neighbours to create connections;
//! - [`add_cell`](CellSpace::add_cell), [`remove_cell`](CellSpace::remove_cell),
//!   [`add_connection`](CellSpace::add_connection) and
//!   [`remove_connection`](CellSpace::remove_connection) validate first,
//!   then apply the change to the cells and to the graph.
//!
//! For undirected backends connections are symmetric. For directed
//! backends a cell connects to `v` exactly when the graph has the edge
//! `cell → v`.
//!
//! Operations are synchronous and single-writer. There is no rollback: if
//! a backend call misbehaves after the cell side was updated, the two
//! sides can diverge. [`Network::verify_consistency`] reports such drift.

use crate::cell::{Cell, SpaceCell};
use crate::collection::CellCollection;
use crate::config::{NetworkBuilder, SpaceRng};
use crate::discrete::DiscreteSpace;
use crate::error::SpaceError;
use crate::graph::GraphBackend;
use crate::space::CellSpace;
use rand::SeedableRng;
use skein_core::{AgentId, SpaceInstanceId};
use std::fmt;

/// A discrete space whose cells and connections mirror a graph.
///
/// # Examples
///
/// ```
/// use petgraph::graphmap::UnGraphMap;
/// use skein_space::{CellSpace, Network, SpaceCell};
///
/// let graph = UnGraphMap::<u32, ()>::from_edges([(1, 2), (2, 3)]);
/// let mut network = Network::new(graph);
/// assert_eq!(network.len(), 3);
/// assert!(network.cell(&2).unwrap().is_connected_to(&3));
///
/// network.add_connection(&1, &3).unwrap();
/// assert!(network.graph().contains_edge(1, 3));
///
/// network.remove_cell(&2).unwrap();
/// assert_eq!(network.graph().edge_count(), 1);
/// assert!(!network.cell(&1).unwrap().is_connected_to(&2));
/// ```
pub struct Network<G, C = Cell<<G as GraphBackend>::Node>>
where
    G: GraphBackend,
    C: SpaceCell<Coord = G::Node>,
{
    base: DiscreteSpace<C>,
    graph: G,
}

impl<G: GraphBackend> Network<G> {
    /// Build a network of default [`Cell`]s with unlimited capacity and
    /// RNG seed 0.
    pub fn new(graph: G) -> Self {
        let mut base =
            DiscreteSpace::from_parts(None, SpaceRng::seed_from_u64(0), Box::new(Cell::new));
        for node in graph.nodes() {
            base.insert_unchecked(Cell::with_capacity(node, None));
        }
        Self::connect(graph, base)
    }

    /// Start configuring a network over `graph`.
    pub fn builder(graph: G) -> NetworkBuilder<G> {
        NetworkBuilder::new(graph)
    }
}

impl<G, C> Network<G, C>
where
    G: GraphBackend,
    C: SpaceCell<Coord = G::Node>,
{
    /// Materialise one cell per graph node through the base's factory,
    /// then connect them.
    ///
    /// Fails with [`SpaceError::FactoryMismatch`] if the factory returns a
    /// cell for a coordinate other than the node it was asked for.
    pub(crate) fn from_base(
        graph: G,
        mut base: DiscreteSpace<C>,
    ) -> Result<Self, SpaceError<G::Node>> {
        for node in graph.nodes() {
            let cell = base.try_make_cell(node)?;
            base.insert_unchecked(cell);
        }
        Ok(Self::connect(graph, base))
    }

    /// Wire connections for cells already materialised from `graph`.
    fn connect(graph: G, base: DiscreteSpace<C>) -> Self {
        let mut network = Self { base, graph };
        network.connect_cells();
        log::debug!(
            "network {}: materialised {} cells and {} connections from {} edges",
            network.base.instance_id(),
            network.base.len(),
            network.base.iter().map(|c| c.connections().len()).sum::<usize>(),
            network.graph.edge_count(),
        );
        network
    }

    fn connect_cells(&mut self) {
        for (coord, cell) in self.base.cells_mut() {
            connect_single_cell(&self.graph, coord, cell);
        }
    }

    fn require(&self, coord: &G::Node) -> Result<(), SpaceError<G::Node>> {
        if self.base.contains(coord) {
            Ok(())
        } else {
            Err(SpaceError::CellNotFound {
                coord: coord.clone(),
            })
        }
    }

    /// The backing graph. Read-only: all writes go through the network.
    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// The underlying cell container. Read-only.
    pub fn space(&self) -> &DiscreteSpace<C> {
        &self.base
    }

    /// Give the graph back, dropping the cells.
    pub fn into_graph(self) -> G {
        self.graph
    }

    /// Create a cell at `coord` through the configured factory and add it
    /// as an isolated node.
    ///
    /// # Errors
    ///
    /// [`SpaceError::DuplicateCell`] if `coord` is taken,
    /// [`SpaceError::FactoryMismatch`] if the factory built a cell for a
    /// different coordinate. Nothing is registered on failure.
    pub fn create_cell(&mut self, coord: G::Node) -> Result<(), SpaceError<G::Node>> {
        if self.base.contains(&coord) || self.graph.contains_node(&coord) {
            return Err(SpaceError::DuplicateCell { coord });
        }
        let cell = self.base.try_make_cell(coord)?;
        self.add_cell(cell)
    }

    /// Number of cells (equal to the number of graph nodes).
    pub fn len(&self) -> usize {
        self.base.len()
    }

    /// `true` if the network has no cells.
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Iterate over cells in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &C> + '_ {
        self.base.iter()
    }

    /// Every cell, as a collection.
    pub fn all_cells(&self) -> CellCollection<'_, C> {
        self.base.all_cells()
    }

    /// Every unoccupied cell.
    pub fn empties(&self) -> CellCollection<'_, C> {
        self.base.empties()
    }

    /// Cells directly connected to `coord`.
    pub fn neighbours(
        &self,
        coord: &G::Node,
    ) -> Result<CellCollection<'_, C>, SpaceError<G::Node>> {
        self.base.neighbours(coord)
    }

    /// Cells within `radius` hops of `coord`. See
    /// [`DiscreteSpace::neighborhood`].
    pub fn neighborhood(
        &self,
        coord: &G::Node,
        radius: usize,
        include_center: bool,
    ) -> Result<CellCollection<'_, C>, SpaceError<G::Node>> {
        self.base.neighborhood(coord, radius, include_center)
    }

    /// Pick a cell uniformly at random using the space RNG.
    pub fn select_random_cell(&mut self) -> Option<&C> {
        self.base.select_random_cell()
    }

    /// Pick an unoccupied cell uniformly at random using the space RNG.
    pub fn select_random_empty_cell(&mut self) -> Option<&C> {
        self.base.select_random_empty_cell()
    }

    /// The space RNG.
    pub fn rng_mut(&mut self) -> &mut SpaceRng {
        self.base.rng_mut()
    }

    /// Place `agent` on the cell at `coord`.
    pub fn place_agent(
        &mut self,
        coord: &G::Node,
        agent: AgentId,
    ) -> Result<(), SpaceError<G::Node>> {
        self.base.place_agent(coord, agent)
    }

    /// Remove `agent` from the cell at `coord`.
    pub fn remove_agent(
        &mut self,
        coord: &G::Node,
        agent: AgentId,
    ) -> Result<(), SpaceError<G::Node>> {
        self.base.remove_agent(coord, agent)
    }

    /// Move `agent` between two cells. Nothing changes on failure.
    pub fn move_agent(
        &mut self,
        agent: AgentId,
        from: &G::Node,
        to: &G::Node,
    ) -> Result<(), SpaceError<G::Node>> {
        self.base.move_agent(agent, from, to)
    }

    /// Check that cells and graph agree.
    ///
    /// Verifies that graph nodes and registered cells are in bijection,
    /// that every graph edge `u → v` has a connection on `Cell(u)` labelled
    /// `v` and vice versa, and that no connection targets an unregistered
    /// cell. Only fails if a side was mutated without going through the
    /// network.
    ///
    /// # Errors
    ///
    /// [`SpaceError::Inconsistent`] describing the first violation found.
    pub fn verify_consistency(&self) -> Result<(), SpaceError<G::Node>> {
        let inconsistent =
            |reason: String| -> Result<(), SpaceError<G::Node>> { Err(SpaceError::Inconsistent { reason }) };

        if self.graph.node_count() != self.base.len() {
            return inconsistent(format!(
                "graph has {} nodes but {} cells are registered",
                self.graph.node_count(),
                self.base.len()
            ));
        }
        for node in self.graph.nodes() {
            if !self.base.contains(&node) {
                return inconsistent(format!("graph node {node:?} has no cell"));
            }
        }

        for cell in self.base.iter() {
            let coord = cell.coordinate();
            for (label, target) in cell.connections() {
                if !self.base.contains(target) {
                    return inconsistent(format!(
                        "cell {coord:?} holds a dangling connection to {target:?}"
                    ));
                }
                if label != target {
                    return inconsistent(format!(
                        "cell {coord:?} labels its connection to {target:?} as {label:?}"
                    ));
                }
                if !self.graph.contains_edge(coord, target) {
                    return inconsistent(format!(
                        "connection {coord:?} -> {target:?} has no graph edge"
                    ));
                }
            }
            for neighbour in self.graph.neighbors(coord) {
                if !cell.is_connected_to(&neighbour) {
                    return inconsistent(format!(
                        "graph edge {coord:?} -> {neighbour:?} has no cell connection"
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Connect `cell` to the cell of every graph neighbour of `coord`,
/// labelled by the neighbour's coordinate.
fn connect_single_cell<G, C>(graph: &G, coord: &G::Node, cell: &mut C)
where
    G: GraphBackend,
    C: SpaceCell<Coord = G::Node>,
{
    for neighbour in graph.neighbors(coord) {
        log::trace!("connect {coord:?} -> {neighbour:?}");
        cell.connect(&neighbour, neighbour.clone());
    }
}

impl<G, C> CellSpace for Network<G, C>
where
    G: GraphBackend,
    C: SpaceCell<Coord = G::Node>,
{
    type Cell = C;

    fn cell(&self, coord: &G::Node) -> Option<&C> {
        self.base.cell(coord)
    }

    fn contains(&self, coord: &G::Node) -> bool {
        self.base.contains(coord)
    }

    fn cell_count(&self) -> usize {
        self.base.cell_count()
    }

    fn canonical_ordering(&self) -> Vec<G::Node> {
        self.base.canonical_ordering()
    }

    fn add_cell(&mut self, mut cell: C) -> Result<(), SpaceError<G::Node>> {
        let coord = cell.coordinate().clone();
        if self.base.contains(&coord) || self.graph.contains_node(&coord) {
            return Err(SpaceError::DuplicateCell { coord });
        }
        if !cell.connections().is_empty() {
            log::warn!(
                "network {}: cell {coord:?} arrived with {} connections; inserting it isolated",
                self.base.instance_id(),
                cell.connections().len()
            );
            cell.clear_connections();
        }
        self.base.add_cell(cell)?;
        self.graph.add_node(coord.clone());
        log::debug!("network {}: added cell {coord:?}", self.base.instance_id());
        Ok(())
    }

    fn remove_cell(&mut self, coord: &G::Node) -> Result<C, SpaceError<G::Node>> {
        self.require(coord)?;
        // Directed in-edges are invisible from the removed cell's own
        // connections, so scrub via the graph first.
        let predecessors: Vec<G::Node> = self
            .graph
            .predecessors(coord)
            .filter(|p| p != coord)
            .collect();
        for peer in &predecessors {
            self.base.unlink(peer, coord);
        }
        let cell = self.base.remove_cell(coord)?;
        if !self.graph.remove_node(coord) {
            log::warn!(
                "network {}: cell {coord:?} had no graph node",
                self.base.instance_id()
            );
        }
        log::debug!(
            "network {}: removed cell {coord:?} and {} incoming connections",
            self.base.instance_id(),
            predecessors.len()
        );
        Ok(cell)
    }

    fn add_connection(&mut self, a: &G::Node, b: &G::Node) -> Result<(), SpaceError<G::Node>> {
        self.require(a)?;
        self.require(b)?;
        if self.graph.is_directed() {
            self.base.link(a, b);
        } else {
            self.base.add_connection(a, b)?;
        }
        self.graph.add_edge(a.clone(), b.clone());
        log::trace!("network {}: connected {a:?} - {b:?}", self.base.instance_id());
        Ok(())
    }

    fn remove_connection(
        &mut self,
        a: &G::Node,
        b: &G::Node,
    ) -> Result<(), SpaceError<G::Node>> {
        self.require(a)?;
        self.require(b)?;
        if !self.graph.contains_edge(a, b) {
            return Err(SpaceError::ConnectionNotFound {
                from: a.clone(),
                to: b.clone(),
            });
        }
        if self.graph.is_directed() {
            self.base.unlink(a, b);
        } else {
            self.base.remove_connection(a, b)?;
        }
        self.graph.remove_edge(a, b);
        log::trace!("network {}: disconnected {a:?} - {b:?}", self.base.instance_id());
        Ok(())
    }

    fn instance_id(&self) -> SpaceInstanceId {
        self.base.instance_id()
    }
}

impl<G, C> fmt::Debug for Network<G, C>
where
    G: GraphBackend,
    C: SpaceCell<Coord = G::Node>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network")
            .field("cells", &self.base.len())
            .field("nodes", &self.graph.node_count())
            .field("edges", &self.graph.edge_count())
            .field("directed", &self.graph.is_directed())
            .field("instance_id", &self.base.instance_id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use petgraph::graphmap::{DiGraphMap, UnGraphMap};
    use proptest::prelude::*;
    use rand::Rng;
    use skein_core::CellError;

    /// Nodes {1,2,3}, edges {(1,2),(2,3)}.
    fn scenario() -> Network<UnGraphMap<u32, ()>> {
        Network::new(UnGraphMap::from_edges([(1, 2), (2, 3)]))
    }

    fn targets<G, C>(network: &Network<G, C>, k: u32) -> Vec<u32>
    where
        G: GraphBackend<Node = u32>,
        C: SpaceCell<Coord = u32>,
    {
        let mut v: Vec<u32> = network
            .cell(&k)
            .unwrap()
            .connections()
            .values()
            .copied()
            .collect();
        v.sort_unstable();
        v
    }

    fn nodes(g: &UnGraphMap<u32, ()>) -> Vec<u32> {
        let mut v: Vec<u32> = g.nodes().collect();
        v.sort_unstable();
        v
    }

    // ── Construction ────────────────────────────────────────────

    #[test]
    fn construction_mirrors_graph() {
        let n = scenario();
        assert_eq!(n.len(), 3);
        assert_eq!(targets(&n, 1), vec![2]);
        assert_eq!(targets(&n, 2), vec![1, 3]);
        assert_eq!(targets(&n, 3), vec![2]);
        n.verify_consistency().unwrap();
    }

    #[test]
    fn connections_are_labelled_by_neighbour_coordinate() {
        let n = scenario();
        let cell = n.cell(&2).unwrap();
        assert_eq!(cell.connections().get(&1), Some(&1));
        assert_eq!(cell.connections().get(&3), Some(&3));
    }

    #[test]
    fn empty_graph_yields_empty_space() {
        let n = Network::new(UnGraphMap::<u32, ()>::new());
        assert!(n.is_empty());
        assert_eq!(n.all_cells().len(), 0);
        n.verify_consistency().unwrap();
    }

    #[test]
    fn isolated_nodes_become_unconnected_cells() {
        let mut g = UnGraphMap::<u32, ()>::new();
        g.add_node(7);
        g.add_node(8);
        let n = Network::new(g);
        assert_eq!(n.len(), 2);
        assert!(targets(&n, 7).is_empty());
    }

    #[test]
    fn self_loop_connects_cell_to_itself() {
        let n = Network::new(UnGraphMap::<u32, ()>::from_edges([(1, 1), (1, 2)]));
        assert_eq!(targets(&n, 1), vec![1, 2]);
        assert_eq!(targets(&n, 2), vec![1]);
        n.verify_consistency().unwrap();
    }

    #[test]
    fn builder_applies_capacity_to_every_cell() {
        let n = Network::builder(UnGraphMap::<u32, ()>::from_edges([(1, 2), (2, 3)]))
            .capacity(Some(2))
            .build()
            .unwrap();
        assert!(n.iter().all(|c| c.capacity() == Some(2)));
    }

    #[test]
    fn builder_rejects_zero_capacity() {
        let built = Network::builder(UnGraphMap::<u32, ()>::new())
            .capacity(Some(0))
            .build();
        assert!(built.is_err());
    }

    #[test]
    fn borrowed_graph_is_mutated_in_place() {
        let mut g = UnGraphMap::<u32, ()>::from_edges([(1, 2)]);
        {
            let mut n = Network::new(&mut g);
            n.create_cell(3).unwrap();
            n.add_connection(&2, &3).unwrap();
            n.verify_consistency().unwrap();
        }
        assert!(g.contains_edge(2, 3));
        assert_eq!(g.node_count(), 3);
    }

    // ── Cell insertion ──────────────────────────────────────────

    #[test]
    fn add_cell_is_isolated() {
        let mut n = scenario();
        n.create_cell(4).unwrap();
        assert_eq!(n.len(), 4);
        assert!(targets(&n, 4).is_empty());
        assert!(n.graph().contains_node(4));
        assert_eq!(n.graph().neighbors(4).count(), 0);
        n.verify_consistency().unwrap();
    }

    #[test]
    fn add_duplicate_cell_is_a_conflict() {
        let mut n = scenario();
        assert_eq!(
            n.create_cell(2),
            Err(SpaceError::DuplicateCell { coord: 2 })
        );
        let dup = Cell::with_capacity(2, None);
        assert_eq!(n.add_cell(dup), Err(SpaceError::DuplicateCell { coord: 2 }));
        assert_eq!(targets(&n, 2), vec![1, 3]);
        n.verify_consistency().unwrap();
    }

    #[test]
    fn add_cell_strips_preexisting_connections() {
        let mut n = scenario();
        let mut stray = Cell::with_capacity(9, None);
        stray.connect(&1, 1);
        n.add_cell(stray).unwrap();
        assert!(targets(&n, 9).is_empty());
        n.verify_consistency().unwrap();
    }

    // ── Cell removal ────────────────────────────────────────────

    #[test]
    fn remove_cell_scrubs_peers_and_graph() {
        let mut n = scenario();
        n.create_cell(4).unwrap();
        n.add_connection(&1, &3).unwrap();
        let removed = n.remove_cell(&2).unwrap();
        assert_eq!(*removed.coordinate(), 2);
        assert_eq!(nodes(n.graph()), vec![1, 3, 4]);
        assert!(!n.graph().contains_edge(1, 2));
        assert_eq!(targets(&n, 1), vec![3]);
        assert_eq!(targets(&n, 3), vec![1]);
        n.verify_consistency().unwrap();
    }

    #[test]
    fn remove_unknown_cell_fails() {
        let mut n = scenario();
        assert!(matches!(
            n.remove_cell(&42),
            Err(SpaceError::CellNotFound { coord: 42 })
        ));
        assert_eq!(n.len(), 3);
    }

    #[test]
    fn add_then_remove_cell_restores_node_set() {
        let mut n = scenario();
        let before = nodes(n.graph());
        n.create_cell(10).unwrap();
        n.remove_cell(&10).unwrap();
        assert_eq!(nodes(n.graph()), before);
        assert_eq!(n.canonical_ordering(), vec![1, 2, 3]);
    }

    #[test]
    fn removed_cell_can_be_reinserted() {
        let mut n = scenario();
        let cell = n.remove_cell(&1).unwrap();
        n.add_cell(cell).unwrap();
        assert!(targets(&n, 1).is_empty());
        n.verify_consistency().unwrap();
    }

    // ── Connections ─────────────────────────────────────────────

    #[test]
    fn add_connection_updates_both_sides() {
        let mut n = scenario();
        n.add_connection(&1, &3).unwrap();
        assert_eq!(targets(&n, 1), vec![2, 3]);
        assert_eq!(targets(&n, 3), vec![1, 2]);
        assert!(n.graph().contains_edge(1, 3));
        n.verify_consistency().unwrap();
    }

    #[test]
    fn add_connection_is_idempotent() {
        let mut n = scenario();
        n.add_connection(&1, &2).unwrap();
        assert_eq!(n.graph().edge_count(), 2);
        assert_eq!(targets(&n, 1), vec![2]);
    }

    #[test]
    fn add_connection_to_unknown_cell_changes_nothing() {
        let mut n = scenario();
        assert!(matches!(
            n.add_connection(&1, &99),
            Err(SpaceError::CellNotFound { coord: 99 })
        ));
        assert!(!n.graph().contains_node(99));
        assert_eq!(targets(&n, 1), vec![2]);
    }

    #[test]
    fn connection_roundtrip_then_clean_failure() {
        let mut n = scenario();
        n.add_connection(&1, &3).unwrap();
        n.remove_connection(&1, &3).unwrap();
        assert_eq!(n.graph().edge_count(), 2);
        assert_eq!(targets(&n, 1), vec![2]);
        assert_eq!(
            n.remove_connection(&1, &3),
            Err(SpaceError::ConnectionNotFound { from: 1, to: 3 })
        );
        n.verify_consistency().unwrap();
    }

    #[test]
    fn remove_connection_accepts_either_order_when_undirected() {
        let mut n = scenario();
        n.remove_connection(&2, &1).unwrap();
        assert!(targets(&n, 1).is_empty());
        assert_eq!(targets(&n, 2), vec![3]);
        n.verify_consistency().unwrap();
    }

    // ── Directed backends ───────────────────────────────────────

    #[test]
    fn directed_connections_follow_edge_direction() {
        let mut n = Network::new(DiGraphMap::<u32, ()>::from_edges([(1, 2), (3, 2)]));
        assert_eq!(targets(&n, 1), vec![2]);
        assert!(targets(&n, 2).is_empty());

        n.add_connection(&2, &1).unwrap();
        assert_eq!(targets(&n, 2), vec![1]);
        assert_eq!(targets(&n, 1), vec![2]);
        n.verify_consistency().unwrap();

        assert!(matches!(
            n.remove_connection(&1, &3),
            Err(SpaceError::ConnectionNotFound { .. })
        ));
        n.remove_connection(&2, &1).unwrap();
        assert!(targets(&n, 2).is_empty());
        n.verify_consistency().unwrap();
    }

    #[test]
    fn directed_remove_cell_scrubs_in_edges() {
        let mut n = Network::new(DiGraphMap::<u32, ()>::from_edges([(1, 2), (3, 2), (2, 4)]));
        n.remove_cell(&2).unwrap();
        assert!(targets(&n, 1).is_empty());
        assert!(targets(&n, 3).is_empty());
        assert_eq!(n.graph().edge_count(), 0);
        n.verify_consistency().unwrap();
    }

    // ── Occupancy and randomness ────────────────────────────────

    #[test]
    fn agents_and_empties() {
        let mut n = Network::builder(UnGraphMap::<u32, ()>::from_edges([(1, 2), (2, 3)]))
            .capacity(Some(1))
            .seed(11)
            .build()
            .unwrap();
        n.place_agent(&1, AgentId(1)).unwrap();
        n.place_agent(&3, AgentId(3)).unwrap();
        assert_eq!(n.empties().coordinates(), vec![2]);
        assert_eq!(*n.select_random_empty_cell().unwrap().coordinate(), 2);
        assert_eq!(
            n.place_agent(&1, AgentId(9)),
            Err(SpaceError::Cell {
                coord: 1,
                source: CellError::Full { capacity: 1 },
            })
        );
        n.move_agent(AgentId(1), &1, &2).unwrap();
        let agents: Vec<AgentId> = n.neighbours(&3).unwrap().agents().collect();
        assert_eq!(agents, vec![AgentId(1)]);
    }

    #[test]
    fn same_seed_same_selection() {
        let build = || {
            Network::builder(UnGraphMap::<u32, ()>::from_edges([(1, 2), (2, 3), (3, 4)]))
                .seed(21)
                .build()
                .unwrap()
        };
        let mut a = build();
        let mut b = build();
        for _ in 0..10 {
            let ka = a.select_random_cell().map(|c| *c.coordinate());
            let kb = b.select_random_cell().map(|c| *c.coordinate());
            assert_eq!(ka, kb);
        }
    }

    // ── Custom cell types ───────────────────────────────────────

    /// A cell that draws a per-cell weight from the space RNG at creation.
    #[derive(Debug)]
    struct WeightedCell {
        inner: Cell<u32>,
        weight: f64,
    }

    impl SpaceCell for WeightedCell {
        type Coord = u32;

        fn new(coordinate: u32, capacity: Option<usize>, rng: &mut SpaceRng) -> Self {
            Self {
                inner: Cell::with_capacity(coordinate, capacity),
                weight: rng.random(),
            }
        }

        fn coordinate(&self) -> &u32 {
            self.inner.coordinate()
        }

        fn capacity(&self) -> Option<usize> {
            self.inner.capacity()
        }

        fn connections(&self) -> &indexmap::IndexMap<u32, u32> {
            self.inner.connections()
        }

        fn connect(&mut self, other: &u32, label: u32) {
            self.inner.connect(other, label);
        }

        fn disconnect(&mut self, other: &u32) -> bool {
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

    #[test]
    fn custom_cell_type_receives_rng() {
        let n = Network::builder(UnGraphMap::<u32, ()>::from_edges([(1, 2), (2, 3)]))
            .seed(5)
            .cell_type::<WeightedCell>()
            .build()
            .unwrap();
        assert!(n.iter().all(|c| (0.0..1.0).contains(&c.weight)));
        let weights: Vec<f64> = n.iter().map(|c| c.weight).collect();
        assert!(weights.windows(2).any(|w| w[0] != w[1]));
        n.verify_consistency().unwrap();
    }

    #[test]
    fn factory_closure_builds_cells() {
        let n = Network::builder(UnGraphMap::<u32, ()>::from_edges([(1, 2)]))
            .factory(|coord, _capacity, _rng: &mut SpaceRng| WeightedCell {
                inner: Cell::with_capacity(coord, Some(3)),
                weight: f64::from(coord),
            })
            .build()
            .unwrap();
        assert_eq!(n.cell(&2).unwrap().weight, 2.0);
        assert_eq!(n.cell(&1).unwrap().capacity(), Some(3));
    }

    #[test]
    fn build_rejects_factory_that_collapses_coordinates() {
        let built = Network::builder(UnGraphMap::<u32, ()>::from_edges([(1, 2), (2, 3)]))
            .factory(|_coord: u32, capacity, _rng: &mut SpaceRng| {
                Cell::with_capacity(0, capacity)
            })
            .build();
        assert!(matches!(
            built,
            Err(SpaceError::FactoryMismatch { requested: 1, produced: 0 })
        ));
    }

    #[test]
    fn create_cell_rejects_rewritten_coordinate() {
        let mut n = Network::builder(UnGraphMap::<u32, ()>::new())
            .factory(|coord: u32, capacity, _rng: &mut SpaceRng| {
                Cell::with_capacity(coord + 100, capacity)
            })
            .build()
            .unwrap();
        assert_eq!(
            n.create_cell(5),
            Err(SpaceError::FactoryMismatch { requested: 5, produced: 105 })
        );
        assert!(n.is_empty());
        assert!(!n.contains(&105));
        assert_eq!(n.graph().node_count(), 0);
        n.verify_consistency().unwrap();
    }

    #[test]
    fn network_moves_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Network<UnGraphMap<u32, ()>>>();
        assert_send_sync::<Network<DiGraphMap<u32, ()>>>();

        let mut n = scenario();
        let handle = std::thread::spawn(move || {
            n.create_cell(4).unwrap();
            n
        });
        let n = handle.join().unwrap();
        assert_eq!(n.len(), 4);
        n.verify_consistency().unwrap();
    }

    // ── Consistency checking ────────────────────────────────────

    #[test]
    fn verify_detects_stray_cell() {
        let mut base = DiscreteSpace::<Cell<u32>>::builder().build().unwrap();
        let stray = base.make_cell(99);
        base.insert_unchecked(stray);
        let n = Network::from_base(UnGraphMap::<u32, ()>::from_edges([(1, 2)]), base).unwrap();
        assert!(matches!(
            n.verify_consistency(),
            Err(SpaceError::Inconsistent { .. })
        ));
    }

    #[test]
    fn debug_reports_shape() {
        let n = scenario();
        let s = format!("{n:?}");
        assert!(s.contains("cells: 3"));
        assert!(s.contains("edges: 2"));
    }

    // ── Compliance ──────────────────────────────────────────────

    #[test]
    fn compliance_undirected() {
        let mut n = scenario();
        compliance::run_full_compliance(&mut n, 100);
        compliance::assert_connections_symmetric(&n);
        n.verify_consistency().unwrap();
    }

    #[test]
    fn compliance_directed() {
        let mut n = Network::new(DiGraphMap::<u32, ()>::from_edges([(1, 2), (2, 3)]));
        compliance::run_full_compliance(&mut n, 100);
        n.verify_consistency().unwrap();
    }

    // ── Property tests ──────────────────────────────────────────

    fn arb_edges() -> impl Strategy<Value = Vec<(u32, u32)>> {
        prop::collection::vec((0u32..20, 0u32..20), 0..60)
    }

    #[derive(Clone, Debug)]
    enum Op {
        AddCell(u32),
        RemoveCell(u32),
        Connect(u32, u32),
        Disconnect(u32, u32),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u32..25).prop_map(Op::AddCell),
            (0u32..25).prop_map(Op::RemoveCell),
            (0u32..25, 0u32..25).prop_map(|(a, b)| Op::Connect(a, b)),
            (0u32..25, 0u32..25).prop_map(|(a, b)| Op::Disconnect(a, b)),
        ]
    }

    proptest! {
        #[test]
        fn construction_is_bijective_and_symmetric(edges in arb_edges()) {
            let g = UnGraphMap::<u32, ()>::from_edges(edges.iter().copied());
            let n = Network::new(g);
            prop_assert_eq!(n.len(), n.graph().node_count());
            for (u, v, _) in n.graph().all_edges() {
                prop_assert!(n.cell(&u).unwrap().is_connected_to(&v));
                prop_assert!(n.cell(&v).unwrap().is_connected_to(&u));
            }
            prop_assert!(n.verify_consistency().is_ok());
        }

        #[test]
        fn operations_preserve_consistency(
            edges in arb_edges(),
            ops in prop::collection::vec(arb_op(), 0..80),
        ) {
            let mut n = Network::new(UnGraphMap::<u32, ()>::from_edges(edges.iter().copied()));
            for op in ops {
                // Individual operations may fail; consistency must hold regardless.
                let _ = match op {
                    Op::AddCell(k) => n.create_cell(k),
                    Op::RemoveCell(k) => n.remove_cell(&k).map(|_| ()),
                    Op::Connect(a, b) => n.add_connection(&a, &b),
                    Op::Disconnect(a, b) => n.remove_connection(&a, &b),
                };
                prop_assert!(n.verify_consistency().is_ok(), "{:?}", n.verify_consistency());
            }
        }

        #[test]
        fn removal_leaves_no_reference(edges in arb_edges(), victim in 0u32..20) {
            let mut n = Network::new(UnGraphMap::<u32, ()>::from_edges(edges.iter().copied()));
            if n.contains(&victim) {
                n.remove_cell(&victim).unwrap();
                prop_assert!(!n.graph().contains_node(victim));
                for cell in n.iter() {
                    prop_assert!(!cell.is_connected_to(&victim));
                }
            }
        }
    }
}
