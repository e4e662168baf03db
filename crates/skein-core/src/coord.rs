//! The [`Coordinate`] bound: the join key between graph nodes and cells.

use std::fmt::Debug;
use std::hash::Hash;

/// An opaque, hashable identifier shared by exactly one graph node and
/// exactly one cell.
///
/// Blanket-implemented for every owned `Clone + Eq + Hash + Debug` type,
/// so integers, strings and user-defined keys all qualify. Coordinates are
/// used as map keys on both sides of a network space and must not change
/// once a cell has been created.
pub trait Coordinate: Clone + Eq + Hash + Debug + 'static {}

impl<T: Clone + Eq + Hash + Debug + 'static> Coordinate for T {}
