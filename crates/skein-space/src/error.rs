//! Error types for space mutations and queries.

use skein_core::{CellError, ConfigError};
use std::fmt::Debug;
use thiserror::Error;

/// Errors arising from structural operations on a space.
///
/// Generic over the coordinate type `K` so callers get the offending
/// coordinate back without string formatting.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SpaceError<K: Debug> {
    /// A cell with this coordinate is already registered.
    #[error("cell {coord:?} is already registered")]
    DuplicateCell {
        /// The conflicting coordinate.
        coord: K,
    },
    /// No cell is registered at this coordinate.
    #[error("no cell registered at {coord:?}")]
    CellNotFound {
        /// The missing coordinate.
        coord: K,
    },
    /// There is no connection between the two cells.
    #[error("no connection from {from:?} to {to:?}")]
    ConnectionNotFound {
        /// Source coordinate.
        from: K,
        /// Target coordinate.
        to: K,
    },
    /// Neighbourhood queries need a radius of at least one.
    #[error("neighbourhood radius must be at least 1, got {radius}")]
    InvalidRadius {
        /// The rejected radius.
        radius: usize,
    },
    /// A cell rejected an occupancy operation.
    #[error("cell {coord:?}: {source}")]
    Cell {
        /// The cell that failed.
        coord: K,
        /// The underlying cell error.
        #[source]
        source: CellError,
    },
    /// Cell state and graph topology disagree.
    ///
    /// Only produced by explicit consistency checks; reachable only if the
    /// graph or a cell was mutated without going through the space.
    #[error("space is inconsistent: {reason}")]
    Inconsistent {
        /// Description of the first violation found.
        reason: String,
    },
    /// A cell factory asked for one coordinate built a cell at another.
    #[error("cell factory asked for {requested:?} built a cell at {produced:?}")]
    FactoryMismatch {
        /// The coordinate the space asked for.
        requested: K,
        /// The coordinate of the cell the factory returned.
        produced: K,
    },
    /// The space configuration was rejected before anything was built.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
