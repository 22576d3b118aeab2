#![cfg_attr(docsrs, feature(doc_cfg))]
//! # pore-network
//!
//! pore-network is the topology engine of a pore network model. A porous
//! medium is represented as a graph of **pores** (nodes) joined by **throats**
//! (edges); this crate stores their per-element properties, derives sparse
//! adjacency and incidence matrices from the throat connectivity, and answers
//! neighbor and interpolation queries against them at the scale of hundreds of
//! thousands of elements.
//!
//! ## Features
//! - Named pore and throat arrays with strict length checking ([`data`])
//! - Adjacency (pore × pore) and incidence (pore × throat) matrices in
//!   coordinate, compressed-row and list-of-rows layouts, cached per weight
//!   array ([`topology`])
//! - Neighbor queries with type filtering and flatten/per-element output, and
//!   averaging between pores and throats ([`algs`])
//! - A facade tying it together, with non-owning associations to geometry,
//!   fluid and physics objects ([`network`], [`associations`], [`simulation`])
//!
//! ## Caching
//!
//! Matrices are built the first time a query needs them and are never
//! invalidated behind the caller's back. After editing `connections`, call
//! [`NetworkStore::update`](network::NetworkStore::update) to rebuild them;
//! until then queries see the old topology, or fail with
//! [`NetworkError::StaleMatrix`](network_error::NetworkError::StaleMatrix) once
//! the throat count no longer matches.
//!
//! ## Determinism
//!
//! Flattened query results are sorted and deduplicated. Per-element results
//! keep input order and ascending order within each row.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! pore-network = "0.3"
//! # Optional features:
//! # features = ["rayon", "check-invariants"]
//! ```
//!
//! ```rust
//! # fn try_main() -> Result<(), pore_network::network_error::NetworkError> {
//! use pore_network::prelude::*;
//!
//! let mut net = NetworkStore::new(5, vec![[0, 1], [1, 2], [2, 3], [3, 4]])?;
//! net.set(Domain::Pore, "type", vec![0; 5])?;
//! let n = net.neighbor_pores(&[1], None, false)?;
//! assert_eq!(n, Neighbors::PerElement(vec![vec![0, 2]]));
//! assert_eq!(net.neighbor_count(&[0, 1, 2, 3, 4], None)?, vec![1, 2, 2, 2, 1]);
//! # Ok(())
//! # }
//! # try_main().unwrap();
//! ```

pub mod algs;
pub mod associations;
pub mod data;
pub mod debug_invariants;
pub mod network;
pub mod network_error;
pub mod simulation;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::interpolate::{Interpolant, Interpolator};
    pub use crate::algs::neighbors::{NeighborQuery, Neighbors};
    pub use crate::associations::{ObjectKind, RefreshTarget, Refreshable};
    pub use crate::data::property::{Domain, PropertyArray, TypeFilter};
    pub use crate::data::property_store::PropertyStore;
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::network::{NetworkConfig, NetworkStore};
    pub use crate::network_error::NetworkError;
    pub use crate::simulation::Simulation;
    pub use crate::topology::cache::InvalidateCache;
    pub use crate::topology::matrix_cache::{
        AdjacencyOpts, IncidenceOpts, MatrixKind, SparseMatrixCache, Weights,
    };
    pub use crate::topology::sparse::{Layout, LayoutSelection, SparseMatrix};
}
