//! Space configuration, validation, and builders.
//!
//! [`SpaceConfig`] carries the two scalar settings every discrete space
//! shares (default cell capacity and RNG seed). [`SpaceBuilder`] and
//! [`NetworkBuilder`] add the non-scalar inputs: an explicit RNG and a
//! cell factory closure.

use crate::cell::{Cell, SpaceCell};
use crate::discrete::DiscreteSpace;
use crate::error::SpaceError;
use crate::graph::GraphBackend;
use crate::network::Network;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use skein_core::ConfigError;

/// The randomness source owned by every space.
///
/// Seeded deterministically so that two spaces built with the same seed
/// make the same random selections.
pub type SpaceRng = ChaCha8Rng;

/// Injected cell constructor: `(coordinate, capacity, rng) -> cell`.
///
/// Overrides [`SpaceCell::new`] when supplied to a builder.
pub type CellFactory<C> =
    Box<dyn Fn(<C as SpaceCell>::Coord, Option<usize>, &mut SpaceRng) -> C + Send + Sync>;

// ── SpaceConfig ────────────────────────────────────────────────────

/// Scalar configuration shared by all discrete spaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpaceConfig {
    /// Capacity applied to every cell the space creates. `None` = unlimited.
    pub capacity: Option<usize>,
    /// Seed for the space RNG. Ignored when an explicit RNG is supplied.
    /// Default: 0.
    pub seed: u64,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            capacity: None,
            seed: 0,
        }
    }
}

impl SpaceConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == Some(0) {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

// ── SpaceBuilder ───────────────────────────────────────────────────

/// Builder for [`DiscreteSpace`].
///
/// # Examples
///
/// ```
/// use skein_space::{Cell, CellSpace, DiscreteSpace};
///
/// let mut space = DiscreteSpace::<Cell<u32>>::builder()
///     .capacity(Some(2))
///     .seed(7)
///     .build()
///     .unwrap();
/// let cell = space.make_cell(1);
/// space.add_cell(cell).unwrap();
/// assert_eq!(space.len(), 1);
/// ```
pub struct SpaceBuilder<C: SpaceCell> {
    config: SpaceConfig,
    rng: Option<SpaceRng>,
    factory: Option<CellFactory<C>>,
}

impl<C: SpaceCell + 'static> SpaceBuilder<C> {
    pub(crate) fn new() -> Self {
        Self {
            config: SpaceConfig::default(),
            rng: None,
            factory: None,
        }
    }

    /// Replace the whole scalar configuration.
    pub fn config(mut self, config: SpaceConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default cell capacity (default: unlimited).
    pub fn capacity(mut self, capacity: Option<usize>) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Set the RNG seed (default: 0).
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Use an existing RNG instead of seeding a fresh one.
    pub fn rng(mut self, rng: SpaceRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Build cells of type `D` with [`SpaceCell::new`].
    ///
    /// Discards any factory set earlier, since it produced the old type.
    pub fn cell_type<D: SpaceCell + 'static>(self) -> SpaceBuilder<D> {
        SpaceBuilder {
            config: self.config,
            rng: self.rng,
            factory: None,
        }
    }

    /// Build cells with `factory` instead of [`SpaceCell::new`].
    ///
    /// The factory's return type becomes the space's cell type.
    pub fn factory<D, F>(self, factory: F) -> SpaceBuilder<D>
    where
        D: SpaceCell + 'static,
        F: Fn(D::Coord, Option<usize>, &mut SpaceRng) -> D + Send + Sync + 'static,
    {
        SpaceBuilder {
            config: self.config,
            rng: self.rng,
            factory: Some(Box::new(factory)),
        }
    }

    /// Validate the configuration and build the space.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroCapacity`] if the capacity is `Some(0)`.
    pub fn build(self) -> Result<DiscreteSpace<C>, ConfigError> {
        self.config.validate()?;
        let rng = self
            .rng
            .unwrap_or_else(|| SpaceRng::seed_from_u64(self.config.seed));
        let factory = self.factory.unwrap_or_else(|| Box::new(C::new));
        Ok(DiscreteSpace::from_parts(self.config.capacity, rng, factory))
    }
}

// ── NetworkBuilder ─────────────────────────────────────────────────

/// Builder for [`Network`].
///
/// # Examples
///
/// ```
/// use petgraph::graphmap::UnGraphMap;
/// use skein_space::{CellSpace, Network, SpaceCell};
///
/// let graph = UnGraphMap::<u32, ()>::from_edges([(1, 2), (2, 3)]);
/// let network = Network::builder(graph)
///     .capacity(Some(1))
///     .seed(42)
///     .build()
///     .unwrap();
/// assert_eq!(network.len(), 3);
/// assert_eq!(network.cell(&1).unwrap().capacity(), Some(1));
/// ```
pub struct NetworkBuilder<G, C = Cell<<G as GraphBackend>::Node>>
where
    G: GraphBackend,
    C: SpaceCell<Coord = G::Node>,
{
    graph: G,
    space: SpaceBuilder<C>,
}

impl<G, C> NetworkBuilder<G, C>
where
    G: GraphBackend,
    C: SpaceCell<Coord = G::Node> + 'static,
{
    pub(crate) fn new(graph: G) -> Self {
        Self {
            graph,
            space: SpaceBuilder::new(),
        }
    }

    /// Replace the whole scalar configuration.
    pub fn config(mut self, config: SpaceConfig) -> Self {
        self.space = self.space.config(config);
        self
    }

    /// Set the capacity applied to every materialised cell.
    pub fn capacity(mut self, capacity: Option<usize>) -> Self {
        self.space = self.space.capacity(capacity);
        self
    }

    /// Set the RNG seed (default: 0).
    pub fn seed(mut self, seed: u64) -> Self {
        self.space = self.space.seed(seed);
        self
    }

    /// Use an existing RNG instead of seeding a fresh one.
    pub fn rng(mut self, rng: SpaceRng) -> Self {
        self.space = self.space.rng(rng);
        self
    }

    /// Build cells of type `D` with [`SpaceCell::new`].
    pub fn cell_type<D>(self) -> NetworkBuilder<G, D>
    where
        D: SpaceCell<Coord = G::Node> + 'static,
    {
        NetworkBuilder {
            graph: self.graph,
            space: self.space.cell_type(),
        }
    }

    /// Build cells with `factory` instead of [`SpaceCell::new`].
    ///
    /// The factory's return type becomes the network's cell type.
    pub fn factory<D, F>(self, factory: F) -> NetworkBuilder<G, D>
    where
        D: SpaceCell<Coord = G::Node> + 'static,
        F: Fn(G::Node, Option<usize>, &mut SpaceRng) -> D + Send + Sync + 'static,
    {
        NetworkBuilder {
            graph: self.graph,
            space: self.space.factory(factory),
        }
    }

    /// Validate the configuration, then materialise cells and connections
    /// from the graph.
    ///
    /// # Errors
    ///
    /// - [`SpaceError::Config`] wrapping [`ConfigError::ZeroCapacity`] if
    ///   the capacity is `Some(0)`.
    /// - [`SpaceError::FactoryMismatch`] if the cell factory returns a cell
    ///   for a coordinate other than the node it was given.
    pub fn build(self) -> Result<Network<G, C>, SpaceError<G::Node>> {
        let base = self.space.build()?;
        Network::from_base(self.graph, base)
    }
}
