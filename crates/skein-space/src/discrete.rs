//! The discrete space base: coordinate index, capacity, RNG, and factory.

use crate::cell::SpaceCell;
use crate::collection::CellCollection;
use crate::config::{CellFactory, SpaceBuilder, SpaceRng};
use crate::error::SpaceError;
use crate::space::CellSpace;
use indexmap::{IndexMap, IndexSet};
use rand::seq::IndexedRandom;
use rand::Rng;
use skein_core::{AgentId, CellError, SpaceInstanceId};
use std::fmt;

/// A container of individually addressable cells.
///
/// Owns the coordinate → cell mapping, the capacity applied to newly
/// created cells, the cell factory, and the space RNG. Connections are
/// plain cell-side records; nothing here knows about graphs. Cells are
/// kept in registration order, which makes iteration and random
/// selection reproducible.
///
/// # Examples
///
/// ```
/// use skein_space::{Cell, CellSpace, DiscreteSpace, SpaceCell};
///
/// let mut space = DiscreteSpace::<Cell<&str>>::builder().build().unwrap();
/// for name in ["ann", "bob", "cy"] {
///     let cell = space.make_cell(name);
///     space.add_cell(cell).unwrap();
/// }
/// space.add_connection(&"ann", &"bob").unwrap();
/// assert!(space.cell(&"bob").unwrap().is_connected_to(&"ann"));
///
/// space.remove_cell(&"bob").unwrap();
/// assert!(space.cell(&"ann").unwrap().connections().is_empty());
/// ```
pub struct DiscreteSpace<C: SpaceCell> {
    cells: IndexMap<C::Coord, C>,
    capacity: Option<usize>,
    rng: SpaceRng,
    factory: CellFactory<C>,
    instance_id: SpaceInstanceId,
}

impl<C: SpaceCell + 'static> DiscreteSpace<C> {
    /// Start configuring a new space.
    pub fn builder() -> SpaceBuilder<C> {
        SpaceBuilder::new()
    }
}

impl<C: SpaceCell> DiscreteSpace<C> {
    pub(crate) fn from_parts(
        capacity: Option<usize>,
        rng: SpaceRng,
        factory: CellFactory<C>,
    ) -> Self {
        Self {
            cells: IndexMap::new(),
            capacity,
            rng,
            factory,
            instance_id: SpaceInstanceId::next(),
        }
    }

    /// Build a detached cell through the configured factory.
    ///
    /// The cell gets the space's default capacity and is not registered;
    /// pass it to [`add_cell`](CellSpace::add_cell) to insert it.
    pub fn make_cell(&mut self, coord: C::Coord) -> C {
        (self.factory)(coord, self.capacity, &mut self.rng)
    }

    /// Like [`make_cell`](Self::make_cell), but rejects a factory that
    /// returns a cell for a different coordinate.
    ///
    /// # Errors
    ///
    /// [`SpaceError::FactoryMismatch`] naming both coordinates.
    pub fn try_make_cell(&mut self, coord: C::Coord) -> Result<C, SpaceError<C::Coord>> {
        let cell = self.make_cell(coord.clone());
        if cell.coordinate() != &coord {
            return Err(SpaceError::FactoryMismatch {
                requested: coord,
                produced: cell.coordinate().clone(),
            });
        }
        Ok(cell)
    }

    /// Capacity applied to cells created by this space.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Number of registered cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// `true` if no cells are registered.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over cells in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &C> + '_ {
        self.cells.values()
    }

    /// Iterate over registered coordinates in registration order.
    pub fn coordinates(&self) -> impl Iterator<Item = &C::Coord> + '_ {
        self.cells.keys()
    }

    /// Every cell, as a collection.
    pub fn all_cells(&self) -> CellCollection<'_, C> {
        CellCollection::new(self.cells.values())
    }

    /// Every unoccupied cell.
    pub fn empties(&self) -> CellCollection<'_, C> {
        CellCollection::new(self.cells.values().filter(|c| c.is_empty()))
    }

    /// Cells directly connected to `coord`.
    pub fn neighbours(
        &self,
        coord: &C::Coord,
    ) -> Result<CellCollection<'_, C>, SpaceError<C::Coord>> {
        self.neighborhood(coord, 1, false)
    }

    /// Cells within `radius` connection hops of `coord`, in BFS order.
    ///
    /// # Errors
    ///
    /// [`SpaceError::InvalidRadius`] if `radius == 0`,
    /// [`SpaceError::CellNotFound`] if `coord` is not registered.
    pub fn neighborhood(
        &self,
        coord: &C::Coord,
        radius: usize,
        include_center: bool,
    ) -> Result<CellCollection<'_, C>, SpaceError<C::Coord>> {
        if radius == 0 {
            return Err(SpaceError::InvalidRadius { radius });
        }
        let (center, _) = self
            .cells
            .get_key_value(coord)
            .ok_or_else(|| SpaceError::CellNotFound {
                coord: coord.clone(),
            })?;

        let mut visited: IndexSet<&C::Coord> = IndexSet::new();
        visited.insert(center);
        let mut frontier = vec![center];
        for _ in 0..radius {
            let mut next = Vec::new();
            for k in frontier {
                let Some(cell) = self.cells.get(k) else {
                    continue;
                };
                for target in cell.connections().values() {
                    if self.cells.contains_key(target) && visited.insert(target) {
                        next.push(target);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        Ok(CellCollection::new(
            visited
                .into_iter()
                .filter(|k| include_center || *k != center)
                .filter_map(|k| self.cells.get(k)),
        ))
    }

    /// Pick a registered cell uniformly at random using the space RNG.
    pub fn select_random_cell(&mut self) -> Option<&C> {
        if self.cells.is_empty() {
            return None;
        }
        let i = self.rng.random_range(0..self.cells.len());
        self.cells.get_index(i).map(|(_, c)| c)
    }

    /// Pick an unoccupied cell uniformly at random using the space RNG.
    pub fn select_random_empty_cell(&mut self) -> Option<&C> {
        let empties: Vec<&C> = self.cells.values().filter(|c| c.is_empty()).collect();
        empties.choose(&mut self.rng).copied()
    }

    /// The space RNG.
    pub fn rng_mut(&mut self) -> &mut SpaceRng {
        &mut self.rng
    }

    /// Place `agent` on the cell at `coord`.
    pub fn place_agent(
        &mut self,
        coord: &C::Coord,
        agent: AgentId,
    ) -> Result<(), SpaceError<C::Coord>> {
        let cell = self.require_mut(coord)?;
        cell.add_agent(agent).map_err(|source| SpaceError::Cell {
            coord: coord.clone(),
            source,
        })
    }

    /// Remove `agent` from the cell at `coord`.
    pub fn remove_agent(
        &mut self,
        coord: &C::Coord,
        agent: AgentId,
    ) -> Result<(), SpaceError<C::Coord>> {
        let cell = self.require_mut(coord)?;
        cell.remove_agent(agent).map_err(|source| SpaceError::Cell {
            coord: coord.clone(),
            source,
        })
    }

    /// Move `agent` between two cells.
    ///
    /// Both cells are checked before anything changes, so a failed move
    /// leaves the agent where it was.
    pub fn move_agent(
        &mut self,
        agent: AgentId,
        from: &C::Coord,
        to: &C::Coord,
    ) -> Result<(), SpaceError<C::Coord>> {
        let origin = self.require(from)?;
        if !origin.agents().contains(&agent) {
            return Err(SpaceError::Cell {
                coord: from.clone(),
                source: CellError::AgentNotFound { agent },
            });
        }
        if from == to {
            return Ok(());
        }
        let target = self.require(to)?;
        if let Some(capacity) = target.capacity() {
            if target.is_full() {
                return Err(SpaceError::Cell {
                    coord: to.clone(),
                    source: CellError::Full { capacity },
                });
            }
        }
        self.remove_agent(from, agent)?;
        self.place_agent(to, agent)
    }

    fn require(&self, coord: &C::Coord) -> Result<&C, SpaceError<C::Coord>> {
        self.cells.get(coord).ok_or_else(|| SpaceError::CellNotFound {
            coord: coord.clone(),
        })
    }

    fn require_mut(&mut self, coord: &C::Coord) -> Result<&mut C, SpaceError<C::Coord>> {
        self.cells
            .get_mut(coord)
            .ok_or_else(|| SpaceError::CellNotFound {
                coord: coord.clone(),
            })
    }

    // ── Crate-internal write access for Network ─────────────────

    /// Register without the duplicate check. Callers guarantee uniqueness.
    pub(crate) fn insert_unchecked(&mut self, cell: C) {
        self.cells.insert(cell.coordinate().clone(), cell);
    }

    pub(crate) fn cells_mut(&mut self) -> indexmap::map::IterMut<'_, C::Coord, C> {
        self.cells.iter_mut()
    }

    /// One-directional connect, labelled by the target coordinate.
    pub(crate) fn link(&mut self, from: &C::Coord, to: &C::Coord) {
        if let Some(cell) = self.cells.get_mut(from) {
            cell.connect(to, to.clone());
        }
    }

    /// One-directional disconnect. Returns whether anything was removed.
    pub(crate) fn unlink(&mut self, from: &C::Coord, to: &C::Coord) -> bool {
        self.cells
            .get_mut(from)
            .is_some_and(|cell| cell.disconnect(to))
    }
}

impl<C: SpaceCell> CellSpace for DiscreteSpace<C> {
    type Cell = C;

    fn cell(&self, coord: &C::Coord) -> Option<&C> {
        self.cells.get(coord)
    }

    fn contains(&self, coord: &C::Coord) -> bool {
        self.cells.contains_key(coord)
    }

    fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn canonical_ordering(&self) -> Vec<C::Coord> {
        self.cells.keys().cloned().collect()
    }

    fn add_cell(&mut self, cell: C) -> Result<(), SpaceError<C::Coord>> {
        if self.cells.contains_key(cell.coordinate()) {
            return Err(SpaceError::DuplicateCell {
                coord: cell.coordinate().clone(),
            });
        }
        log::trace!("space {}: add cell {:?}", self.instance_id, cell.coordinate());
        self.insert_unchecked(cell);
        Ok(())
    }

    fn remove_cell(&mut self, coord: &C::Coord) -> Result<C, SpaceError<C::Coord>> {
        let mut cell = self
            .cells
            .shift_remove(coord)
            .ok_or_else(|| SpaceError::CellNotFound {
                coord: coord.clone(),
            })?;
        for peer in cell.connections().values() {
            if let Some(peer_cell) = self.cells.get_mut(peer) {
                peer_cell.disconnect(coord);
            }
        }
        cell.clear_connections();
        log::trace!("space {}: removed cell {:?}", self.instance_id, coord);
        Ok(cell)
    }

    fn add_connection(
        &mut self,
        a: &C::Coord,
        b: &C::Coord,
    ) -> Result<(), SpaceError<C::Coord>> {
        self.require(a)?;
        self.require(b)?;
        self.link(a, b);
        self.link(b, a);
        Ok(())
    }

    fn remove_connection(
        &mut self,
        a: &C::Coord,
        b: &C::Coord,
    ) -> Result<(), SpaceError<C::Coord>> {
        let a_to_b = self.require(a)?.is_connected_to(b);
        let b_to_a = self.require(b)?.is_connected_to(a);
        if !(a_to_b || b_to_a) {
            return Err(SpaceError::ConnectionNotFound {
                from: a.clone(),
                to: b.clone(),
            });
        }
        self.unlink(a, b);
        self.unlink(b, a);
        Ok(())
    }

    fn instance_id(&self) -> SpaceInstanceId {
        self.instance_id
    }
}

impl<C: SpaceCell> fmt::Debug for DiscreteSpace<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscreteSpace")
            .field("cells", &self.cells.len())
            .field("capacity", &self.capacity)
            .field("instance_id", &self.instance_id)
            .finish_non_exhaustive()
    }
}
