//! The cell entity: capacity, occupancy, and labelled connections.

use crate::config::SpaceRng;
use indexmap::IndexMap;
use skein_core::{AgentId, CellError, Coordinate};
use smallvec::SmallVec;

/// Capability contract for anything a space can hold as a cell.
///
/// A cell is identified by its coordinate, which never changes after
/// creation. Its adjacency record maps a *label* to a *handle*: the handle
/// is the coordinate of the connected cell, the label is whatever key the
/// space chose when connecting (network spaces use the neighbour's own
/// coordinate). Spaces resolve handles through their coordinate index, so
/// cells never hold references to each other.
///
/// Connection methods are one-directional. Spaces call them symmetrically
/// when a connection is logically bidirectional.
pub trait SpaceCell {
    /// Coordinate type shared with the owning space.
    type Coord: Coordinate;

    /// Construct a cell. This is the default cell-type factory used when a
    /// space is not given an explicit factory closure.
    ///
    /// `rng` is the space's randomness source; cells that need their own
    /// stream should derive one from it rather than store a reference.
    fn new(coordinate: Self::Coord, capacity: Option<usize>, rng: &mut SpaceRng) -> Self
    where
        Self: Sized;

    /// The cell's coordinate.
    fn coordinate(&self) -> &Self::Coord;

    /// Maximum number of agents, or `None` for unlimited.
    fn capacity(&self) -> Option<usize>;

    /// Label → handle map of outgoing connections.
    fn connections(&self) -> &IndexMap<Self::Coord, Self::Coord>;

    /// Record a one-directional connection to `other` under `label`.
    ///
    /// Re-connecting under an existing label replaces the previous handle.
    fn connect(&mut self, other: &Self::Coord, label: Self::Coord);

    /// Remove every label pointing at `other`.
    ///
    /// Returns `true` if at least one connection was removed.
    fn disconnect(&mut self, other: &Self::Coord) -> bool;

    /// Drop all outgoing connections.
    fn clear_connections(&mut self);

    /// Whether any label points at `other`.
    fn is_connected_to(&self, other: &Self::Coord) -> bool {
        self.connections().values().any(|c| c == other)
    }

    /// Agents currently on this cell, in arrival order.
    fn agents(&self) -> &[AgentId];

    /// Place an agent on this cell.
    fn add_agent(&mut self, agent: AgentId) -> Result<(), CellError>;

    /// Remove an agent from this cell.
    fn remove_agent(&mut self, agent: AgentId) -> Result<(), CellError>;

    /// `true` if no agent occupies the cell.
    fn is_empty(&self) -> bool {
        self.agents().is_empty()
    }

    /// `true` if the cell has reached its capacity.
    fn is_full(&self) -> bool {
        self.capacity().is_some_and(|cap| self.agents().len() >= cap)
    }
}

/// The default cell type.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use skein_space::{Cell, SpaceCell, SpaceRng};
/// use skein_core::AgentId;
///
/// let mut rng = SpaceRng::seed_from_u64(0);
/// let mut a = Cell::new(1u32, Some(1), &mut rng);
/// a.connect(&2, 2);
/// assert!(a.is_connected_to(&2));
///
/// a.add_agent(AgentId(10)).unwrap();
/// assert!(a.is_full());
/// assert!(a.add_agent(AgentId(11)).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Cell<K: Coordinate> {
    coordinate: K,
    capacity: Option<usize>,
    agents: SmallVec<[AgentId; 4]>,
    connections: IndexMap<K, K>,
}

impl<K: Coordinate> Cell<K> {
    /// Create an unconnected, unoccupied cell.
    pub fn with_capacity(coordinate: K, capacity: Option<usize>) -> Self {
        Self {
            coordinate,
            capacity,
            agents: SmallVec::new(),
            connections: IndexMap::new(),
        }
    }
}

impl<K: Coordinate> SpaceCell for Cell<K> {
    type Coord = K;

    fn new(coordinate: K, capacity: Option<usize>, _rng: &mut SpaceRng) -> Self {
        Self::with_capacity(coordinate, capacity)
    }

    fn coordinate(&self) -> &K {
        &self.coordinate
    }

    fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    fn connections(&self) -> &IndexMap<K, K> {
        &self.connections
    }

    fn connect(&mut self, other: &K, label: K) {
        self.connections.insert(label, other.clone());
    }

    fn disconnect(&mut self, other: &K) -> bool {
        let before = self.connections.len();
        // retain keeps the surviving labels in insertion order.
        self.connections.retain(|_, target| target != other);
        self.connections.len() != before
    }

    fn clear_connections(&mut self) {
        self.connections.clear();
    }

    fn agents(&self) -> &[AgentId] {
        &self.agents
    }

    fn add_agent(&mut self, agent: AgentId) -> Result<(), CellError> {
        if self.agents.contains(&agent) {
            return Err(CellError::AgentAlreadyPresent { agent });
        }
        if let Some(capacity) = self.capacity {
            if self.agents.len() >= capacity {
                return Err(CellError::Full { capacity });
            }
        }
        self.agents.push(agent);
        Ok(())
    }

    fn remove_agent(&mut self, agent: AgentId) -> Result<(), CellError> {
        let pos = self
            .agents
            .iter()
            .position(|&a| a == agent)
            .ok_or(CellError::AgentNotFound { agent })?;
        self.agents.remove(pos);
        Ok(())
    }
}
