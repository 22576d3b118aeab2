//! Derived topology: sparse matrices and their cache.
//!
//! - [`sparse`] holds the three storage layouts (COO, CSR, list-of-rows);
//! - [`matrix_cache`] builds adjacency and incidence matrices from a
//!   [`PropertyStore`](crate::data::PropertyStore) and keeps them per layout;
//! - [`cache`] is the invalidation hook shared by everything that caches.

pub mod cache;
pub mod matrix_cache;
pub mod sparse;

pub use cache::InvalidateCache;
pub use matrix_cache::{AdjacencyOpts, CacheKey, IncidenceOpts, MatrixKind, SparseMatrixCache, Weights};
pub use sparse::{CooMatrix, CsrMatrix, Layout, LayoutSelection, LilMatrix, SparseMatrix};
