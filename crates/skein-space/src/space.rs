//! The [`CellSpace`] trait: the structural mutation contract.

use crate::cell::SpaceCell;
use crate::error::SpaceError;
use skein_core::SpaceInstanceId;

/// Coordinate type of a space's cells.
pub type CoordOf<S> = <<S as CellSpace>::Cell as SpaceCell>::Coord;

/// Structural operations shared by every discrete space.
///
/// [`DiscreteSpace`](crate::DiscreteSpace) implements the base behaviour
/// (cell-side bookkeeping only). [`Network`](crate::Network) implements it
/// again so that every mutation is applied to the cell mapping and the
/// backing graph together; there is no other write path.
pub trait CellSpace {
    /// Cell type held by the space.
    type Cell: SpaceCell;

    /// Look up a cell by coordinate.
    fn cell(&self, coord: &CoordOf<Self>) -> Option<&Self::Cell>;

    /// Whether a cell is registered at `coord`.
    fn contains(&self, coord: &CoordOf<Self>) -> bool {
        self.cell(coord).is_some()
    }

    /// Number of registered cells.
    fn cell_count(&self) -> usize;

    /// All registered coordinates in a deterministic order.
    ///
    /// Two calls on an unmodified space return the same sequence.
    fn canonical_ordering(&self) -> Vec<CoordOf<Self>>;

    /// Register a cell.
    ///
    /// Fails with [`SpaceError::DuplicateCell`] if its coordinate is taken.
    fn add_cell(&mut self, cell: Self::Cell) -> Result<(), SpaceError<CoordOf<Self>>>;

    /// Unregister the cell at `coord` and return it.
    ///
    /// Every other cell's connection toward it is dropped as well. Fails
    /// with [`SpaceError::CellNotFound`] if nothing is registered there.
    fn remove_cell(
        &mut self,
        coord: &CoordOf<Self>,
    ) -> Result<Self::Cell, SpaceError<CoordOf<Self>>>;

    /// Connect two registered cells. Re-adding an existing connection is a
    /// no-op.
    fn add_connection(
        &mut self,
        a: &CoordOf<Self>,
        b: &CoordOf<Self>,
    ) -> Result<(), SpaceError<CoordOf<Self>>>;

    /// Remove the connection between two registered cells.
    ///
    /// Fails with [`SpaceError::ConnectionNotFound`] if they are not
    /// connected.
    fn remove_connection(
        &mut self,
        a: &CoordOf<Self>,
        b: &CoordOf<Self>,
    ) -> Result<(), SpaceError<CoordOf<Self>>>;

    /// Unique instance identifier for this space object.
    fn instance_id(&self) -> SpaceInstanceId;
}
