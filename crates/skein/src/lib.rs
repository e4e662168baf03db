//! Skein: graph-backed discrete spaces for agent-based simulations.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Skein sub-crates. For most users, adding `skein` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use skein::petgraph::graphmap::UnGraphMap;
//! use skein::prelude::*;
//!
//! // A three-node path: 1 - 2 - 3.
//! let graph = UnGraphMap::<u32, ()>::from_edges([(1, 2), (2, 3)]);
//! let mut network = Network::builder(graph)
//!     .capacity(Some(1))
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! network.create_cell(4).unwrap();
//! network.add_connection(&1, &3).unwrap();
//! network.remove_cell(&2).unwrap();
//!
//! assert_eq!(network.graph().edge_count(), 1);
//! assert!(network.cell(&1).unwrap().is_connected_to(&3));
//!
//! network.place_agent(&4, AgentId(0)).unwrap();
//! assert_eq!(network.empties().len(), 2);
//! assert!(network.verify_consistency().is_ok());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `skein-core` | IDs, the coordinate bound, cell and config errors |
//! | [`space`] | `skein-space` | Cells, discrete spaces, graph backends, networks |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and IDs (`skein-core`).
///
/// Contains [`types::AgentId`], [`types::SpaceInstanceId`], the
/// [`types::Coordinate`] bound, and the cell/configuration errors.
pub use skein_core as types;

/// Cells, discrete spaces, and graph-backed networks (`skein-space`).
///
/// Provides the [`space::CellSpace`] trait, [`space::DiscreteSpace`],
/// [`space::Network`], and the [`space::GraphBackend`] contract.
pub use skein_space as space;

/// The graph library backing the default [`space::GraphBackend`] impls.
pub use petgraph;

/// Common imports for typical Skein usage.
///
/// ```rust
/// use skein::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use skein_core::{AgentId, CellError, ConfigError, Coordinate, SpaceInstanceId};

    // Cells and collections
    pub use skein_space::{Cell, CellCollection, SpaceCell};

    // Spaces
    pub use skein_space::{CellSpace, DiscreteSpace, GraphBackend, Network, SpaceError};

    // Configuration
    pub use skein_space::{NetworkBuilder, SpaceConfig, SpaceRng};
}
