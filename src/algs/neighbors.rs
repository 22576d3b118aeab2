//! Neighbor queries over the cached list-of-rows matrices.
//!
//! - pore → pore rows come from the unit-weight adjacency matrix;
//! - pore → throat rows come from the unit-weight incidence matrix;
//! - throat → pore pairs come straight from `connections`.
//!
//! Rows are built lazily on the first query and reused afterwards, stale or
//! not, until the cache is rebuilt.
//!
//! Determinism:
//! - flattened results are sorted and deduplicated;
//! - per-element results keep input order and per-row (ascending) order.

use hashbrown::HashSet;
use itertools::{EitherOrBoth, Itertools};

use crate::data::property::{Domain, TypeFilter};
use crate::data::property_store::PropertyStore;
use crate::network_error::NetworkError;
use crate::topology::matrix_cache::{MatrixKind, SparseMatrixCache, lil_rows};

/// Result of a neighbor query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Neighbors {
    /// One sorted, deduplicated sequence for all inputs.
    Flat(Vec<usize>),
    /// One sequence per input element, in input order.
    PerElement(Vec<Vec<usize>>),
}

impl Neighbors {
    /// Flat view; per-element results are concatenated in order.
    pub fn into_flat(self) -> Vec<usize> {
        match self {
            Neighbors::Flat(v) => v,
            Neighbors::PerElement(rows) => rows.into_iter().flatten().collect(),
        }
    }

    /// Per-element view; a flat result becomes a single row.
    pub fn into_per_element(self) -> Vec<Vec<usize>> {
        match self {
            Neighbors::Flat(v) => vec![v],
            Neighbors::PerElement(rows) => rows,
        }
    }

    pub fn as_flat(&self) -> Option<&[usize]> {
        match self {
            Neighbors::Flat(v) => Some(v),
            Neighbors::PerElement(_) => None,
        }
    }

    pub fn as_per_element(&self) -> Option<&[Vec<usize>]> {
        match self {
            Neighbors::Flat(_) => None,
            Neighbors::PerElement(rows) => Some(rows),
        }
    }

    /// True when no neighbor was found for any input.
    pub fn is_empty(&self) -> bool {
        match self {
            Neighbors::Flat(v) => v.is_empty(),
            Neighbors::PerElement(rows) => rows.iter().all(Vec::is_empty),
        }
    }
}

/// Neighbor query engine borrowing a store and its matrix cache.
#[derive(Clone, Copy, Debug)]
pub struct NeighborQuery<'a> {
    props: &'a PropertyStore,
    cache: &'a SparseMatrixCache,
}

impl<'a> NeighborQuery<'a> {
    pub fn new(props: &'a PropertyStore, cache: &'a SparseMatrixCache) -> Self {
        Self { props, cache }
    }

    /// Pores adjacent to `pores`, filtered by pore `type`.
    ///
    /// With `flatten`, the union of all rows is returned sorted and
    /// deduplicated, with the input pores themselves removed.
    pub fn neighbor_pores(
        &self,
        pores: &[usize],
        filter: &TypeFilter,
        flatten: bool,
    ) -> Result<Neighbors, NetworkError> {
        self.rows(MatrixKind::Adjacency, pores, filter, flatten)
    }

    /// Throats incident to `pores`, filtered by throat `type`.
    pub fn neighbor_throats(
        &self,
        pores: &[usize],
        filter: &TypeFilter,
        flatten: bool,
    ) -> Result<Neighbors, NetworkError> {
        self.rows(MatrixKind::Incidence, pores, filter, flatten)
    }

    /// Number of `filter`-passing pore neighbors of each input pore.
    pub fn neighbor_count(&self, pores: &[usize], filter: &TypeFilter) -> Result<Vec<usize>, NetworkError> {
        Ok(self
            .neighbor_pores(pores, filter, false)?
            .into_per_element()
            .iter()
            .map(Vec::len)
            .collect())
    }

    /// Throats joining `a` and `b`, sorted. Empty when they are not connected.
    ///
    /// Computed as the intersection of both pores' throat rows, so
    /// `connecting_throat(a, b) == connecting_throat(b, a)`.
    pub fn connecting_throat(&self, a: usize, b: usize) -> Result<Vec<usize>, NetworkError> {
        self.props.check_ids(Domain::Pore, &[a, b])?;
        let m = self.cache.lil(self.props, MatrixKind::Incidence)?;
        let lil = lil_rows(&m)?;
        Ok(lil
            .row(a)
            .iter()
            .merge_join_by(lil.row(b), |x, y| x.cmp(y))
            .filter_map(|e| match e {
                EitherOrBoth::Both(&t, _) => Some(t),
                _ => None,
            })
            .collect())
    }

    /// Pores at the ends of `throats`.
    ///
    /// Per element this is each throat's `(p1, p2)` pair in stored order; with
    /// `flatten` it is the sorted, deduplicated union.
    pub fn connected_pores(&self, throats: &[usize], flatten: bool) -> Result<Neighbors, NetworkError> {
        self.props.check_ids(Domain::Throat, throats)?;
        let conns = self.props.connections();
        if flatten {
            let pores = throats
                .iter()
                .flat_map(|&t| conns[t])
                .sorted_unstable()
                .dedup()
                .collect();
            Ok(Neighbors::Flat(pores))
        } else {
            Ok(Neighbors::PerElement(
                throats.iter().map(|&t| conns[t].to_vec()).collect(),
            ))
        }
    }

    fn rows(
        &self,
        kind: MatrixKind,
        pores: &[usize],
        filter: &TypeFilter,
        flatten: bool,
    ) -> Result<Neighbors, NetworkError> {
        self.props.check_ids(Domain::Pore, pores)?;
        let target = match kind {
            MatrixKind::Adjacency => Domain::Pore,
            MatrixKind::Incidence => Domain::Throat,
        };
        let m = self.cache.lil(self.props, kind)?;
        let lil = lil_rows(&m)?;

        if !flatten {
            let rows = pores
                .iter()
                .map(|&p| {
                    let mut row = lil.row(p).to_vec();
                    self.props.retain_by_type(target, &mut row, filter);
                    row
                })
                .collect();
            return Ok(Neighbors::PerElement(rows));
        }

        // Empty rows are skipped before merging; each row is already sorted.
        let mut merged: Vec<usize> = pores
            .iter()
            .map(|&p| lil.row(p))
            .filter(|row| !row.is_empty())
            .map(|row| row.iter().copied())
            .kmerge()
            .dedup()
            .collect();
        if kind == MatrixKind::Adjacency {
            let inputs: HashSet<usize> = pores.iter().copied().collect();
            merged.retain(|p| !inputs.contains(p));
        }
        self.props.retain_by_type(target, &mut merged, filter);
        Ok(Neighbors::Flat(merged))
    }
}
