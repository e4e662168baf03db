//! Error types for cells and space configuration.
//!
//! Space-level structural errors are generic over the coordinate type and
//! live next to the space implementations in `skein-space`.

use crate::id::AgentId;
use thiserror::Error;

/// Errors arising from cell occupancy operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CellError {
    /// The cell already holds `capacity` agents.
    #[error("cell is full (capacity {capacity})")]
    Full {
        /// The cell's capacity limit.
        capacity: usize,
    },
    /// The agent is already placed on this cell.
    #[error("agent {agent} already occupies this cell")]
    AgentAlreadyPresent {
        /// The duplicate agent.
        agent: AgentId,
    },
    /// The agent is not on this cell.
    #[error("agent {agent} not found in cell")]
    AgentNotFound {
        /// The missing agent.
        agent: AgentId,
    },
}

/// Errors detected while validating a space configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A capacity of zero would make every cell permanently full.
    /// Use `None` for unlimited capacity.
    #[error("cell capacity must be at least 1 (use None for unlimited)")]
    ZeroCapacity,
}
