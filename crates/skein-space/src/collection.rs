//! Borrowed, ordered views over groups of cells.

use crate::cell::SpaceCell;
use rand::seq::IndexedRandom;
use rand::Rng;
use skein_core::AgentId;

/// An ordered collection of borrowed cells.
///
/// Returned by whole-space and neighbourhood queries. Order follows the
/// producing query (registration order for whole-space views, BFS order
/// for neighbourhoods), so random selections are reproducible for a
/// given RNG state.
#[derive(Debug)]
pub struct CellCollection<'a, C: SpaceCell> {
    cells: Vec<&'a C>,
}

impl<C: SpaceCell> Clone for CellCollection<'_, C> {
    fn clone(&self) -> Self {
        Self {
            cells: self.cells.clone(),
        }
    }
}

impl<'a, C: SpaceCell> CellCollection<'a, C> {
    /// Collect cells from an iterator.
    pub fn new(cells: impl IntoIterator<Item = &'a C>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// `true` if the collection holds no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over the cells.
    pub fn iter(&self) -> impl Iterator<Item = &'a C> + '_ {
        self.cells.iter().copied()
    }

    /// Whether a cell with this coordinate is in the collection.
    pub fn contains(&self, coord: &C::Coord) -> bool {
        self.cells.iter().any(|c| c.coordinate() == coord)
    }

    /// Coordinates of the cells, in collection order.
    pub fn coordinates(&self) -> Vec<C::Coord> {
        self.cells.iter().map(|c| c.coordinate().clone()).collect()
    }

    /// Sub-collection of cells matching `predicate`.
    pub fn select(&self, mut predicate: impl FnMut(&C) -> bool) -> Self {
        Self {
            cells: self.cells.iter().copied().filter(|c| predicate(*c)).collect(),
        }
    }

    /// Sub-collection of unoccupied cells.
    pub fn empties(&self) -> Self {
        self.select(|c| c.is_empty())
    }

    /// All agents on the cells, in collection order.
    pub fn agents(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.cells.iter().flat_map(|c| c.agents().iter().copied())
    }

    /// Pick a cell uniformly at random. `None` if the collection is empty.
    pub fn select_random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&'a C> {
        self.cells.choose(rng).copied()
    }

    /// Pick an agent uniformly at random across all cells.
    pub fn select_random_agent<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<AgentId> {
        let agents: Vec<AgentId> = self.agents().collect();
        agents.choose(rng).copied()
    }
}

impl<'a, C: SpaceCell> IntoIterator for CellCollection<'a, C> {
    type Item = &'a C;
    type IntoIter = std::vec::IntoIter<&'a C>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}
