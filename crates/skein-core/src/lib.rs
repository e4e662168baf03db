//! Core types for the Skein graph-backed discrete space.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the identifiers, the [`Coordinate`] bound shared by graph nodes and
//! cells, and the error types raised by cells and configuration.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod coord;
pub mod error;
pub mod id;

pub use coord::Coordinate;
pub use error::{CellError, ConfigError};
pub use id::{AgentId, SpaceInstanceId};
