//! Graph-backed discrete cell spaces for Skein simulations.
//!
//! This crate defines the [`CellSpace`] trait, the structural contract
//! every discrete space honours, together with two implementations:
//!
//! - [`DiscreteSpace`]: a coordinate-indexed set of cells with labelled
//!   connections, occupancy, neighbourhood queries and seeded random
//!   selection.
//! - [`Network`]: a [`DiscreteSpace`] whose cells and connections mirror a
//!   [`GraphBackend`]. Every structural mutation is applied to the cells
//!   and to the graph together.
//!
//! # Graph backends
//!
//! [`GraphBackend`] is implemented for petgraph's `GraphMap` (undirected
//! and directed) and for `&mut G`, so a network may own its graph or
//! borrow a caller's graph for its lifetime.
//!
//! # Cells
//!
//! [`Cell`] is the default cell type. Any [`SpaceCell`] implementation can
//! be plugged in through [`NetworkBuilder::cell_type`] or a factory closure
//! via [`NetworkBuilder::factory`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod collection;
pub mod config;
pub mod discrete;
pub mod error;
pub mod graph;
pub mod network;
pub mod space;

#[cfg(test)]
pub(crate) mod compliance;

pub use cell::{Cell, SpaceCell};
pub use collection::CellCollection;
pub use config::{CellFactory, NetworkBuilder, SpaceBuilder, SpaceConfig, SpaceRng};
pub use discrete::DiscreteSpace;
pub use error::SpaceError;
pub use graph::GraphBackend;
pub use network::Network;
pub use space::{CellSpace, CoordOf};
