//! Adjacency and incidence matrices, built on demand and cached per layout.
//!
//! Entries are keyed by `(kind, layout, weight name)`. Unweighted matrices use
//! the key [`UNIT_WEIGHT_KEY`] (`"connections"`).
//!
//! The cache never watches the [`PropertyStore`]: a matrix stays as built until
//! it is overwritten by another build or the whole cache is rebuilt or
//! invalidated. Callers that edit `connections` must call
//! [`SparseMatrixCache::rebuild`] (or `NetworkStore::update`) themselves.
//! A stale entry whose shape no longer fits the store is refused with
//! [`NetworkError::StaleMatrix`] instead of being read.
//!
//! Lookups take `&self`; the map sits behind a `parking_lot::RwLock` and the
//! lazy path holds an upgradable read across check-and-populate, so two
//! threads missing the same key build it once.

use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use serde::{Deserialize, Serialize};

use crate::data::property::{CONNECTIONS, Domain};
use crate::data::property_store::{PropertyStore, check_numbering};
use crate::network_error::NetworkError;
use crate::topology::cache::InvalidateCache;
use crate::topology::sparse::{CooMatrix, Layout, LayoutSelection, LilMatrix, SparseMatrix};

/// Cache key used for unit-weight (pure connectivity) matrices.
pub const UNIT_WEIGHT_KEY: &str = CONNECTIONS;

/// Which pair of domains a matrix relates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MatrixKind {
    /// Pore × pore.
    Adjacency,
    /// Pore × throat.
    Incidence,
}

impl MatrixKind {
    /// Shape of a matrix of this kind over `props`.
    pub fn shape(self, props: &PropertyStore) -> (usize, usize) {
        match self {
            MatrixKind::Adjacency => (props.num_pores(), props.num_pores()),
            MatrixKind::Incidence => (props.num_pores(), props.num_throats()),
        }
    }
}

/// Cache key: `(kind, layout, weight name)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub kind: MatrixKind,
    pub layout: Layout,
    pub weight: String,
}

impl CacheKey {
    pub fn new(kind: MatrixKind, layout: Layout, weight: &str) -> Self {
        Self {
            kind,
            layout,
            weight: weight.to_string(),
        }
    }

    fn unit(kind: MatrixKind, layout: Layout) -> Self {
        Self::new(kind, layout, UNIT_WEIGHT_KEY)
    }
}

/// A named throat array used to weight matrix entries.
#[derive(Clone, Copy, Debug)]
pub struct Weights<'a> {
    pub name: &'a str,
    pub values: &'a [f64],
}

impl<'a> Weights<'a> {
    pub fn new(name: &'a str, values: &'a [f64]) -> Self {
        Self { name, values }
    }
}

/// Options for [`SparseMatrixCache::build_adjacency`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdjacencyOpts {
    /// Layouts to build and cache.
    pub layout: LayoutSelection,
    /// Leave out throats whose weight is exactly zero.
    pub drop_zeros: bool,
    /// Store every edge in both directions.
    pub symmetric: bool,
}

impl Default for AdjacencyOpts {
    fn default() -> Self {
        Self {
            layout: LayoutSelection::All,
            drop_zeros: true,
            symmetric: true,
        }
    }
}

/// Options for [`SparseMatrixCache::build_incidence`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IncidenceOpts {
    pub layout: LayoutSelection,
    pub drop_zeros: bool,
}

impl Default for IncidenceOpts {
    fn default() -> Self {
        Self {
            layout: LayoutSelection::All,
            drop_zeros: true,
        }
    }
}

/// Cached sparse adjacency/incidence matrices.
#[derive(Debug, Default)]
pub struct SparseMatrixCache {
    entries: RwLock<HashMap<CacheKey, Arc<SparseMatrix>>>,
}

impl SparseMatrixCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the Np×Np adjacency matrix and cache it in the selected layouts.
    ///
    /// Returns the matrix when exactly one layout was requested.
    ///
    /// # Errors
    /// `LengthMismatch` if `weights` does not have one value per throat.
    pub fn build_adjacency(
        &self,
        props: &PropertyStore,
        weights: Option<Weights<'_>>,
        opts: AdjacencyOpts,
    ) -> Result<Option<Arc<SparseMatrix>>, NetworkError> {
        let (name, values) = resolve_weights(props, weights)?;
        let coo = assemble_adjacency(props, &values, opts.drop_zeros, opts.symmetric);
        Ok(self.store(MatrixKind::Adjacency, name, &coo, opts.layout))
    }

    /// Build the Np×Nt incidence matrix and cache it in the selected layouts.
    ///
    /// Returns the matrix when exactly one layout was requested.
    ///
    /// # Errors
    /// `LengthMismatch` for a bad weight array; `NumberingOutOfRange` if the
    /// throat `numbering` leaves the throat ID space.
    pub fn build_incidence(
        &self,
        props: &PropertyStore,
        weights: Option<Weights<'_>>,
        opts: IncidenceOpts,
    ) -> Result<Option<Arc<SparseMatrix>>, NetworkError> {
        let (name, values) = resolve_weights(props, weights)?;
        let coo = assemble_incidence(props, &values, opts.drop_zeros)?;
        Ok(self.store(MatrixKind::Incidence, name, &coo, opts.layout))
    }

    fn store(
        &self,
        kind: MatrixKind,
        weight: &str,
        coo: &CooMatrix,
        selection: LayoutSelection,
    ) -> Option<Arc<SparseMatrix>> {
        let built: Vec<(CacheKey, Arc<SparseMatrix>)> = selection
            .layouts()
            .iter()
            .map(|&layout| {
                (
                    CacheKey::new(kind, layout, weight),
                    Arc::new(SparseMatrix::from_coo(coo, layout)),
                )
            })
            .collect();
        log::debug!(
            "built {kind:?} `{weight}` {:?}: shape {:?}, nnz {}",
            selection,
            coo.shape(),
            coo.nnz()
        );
        let single = match selection {
            LayoutSelection::Only(_) => built.first().map(|(_, m)| Arc::clone(m)),
            LayoutSelection::All => None,
        };
        self.entries.write().extend(built);
        single
    }

    /// The cached matrix for `(kind, layout, weight)`, if built.
    pub fn get(&self, kind: MatrixKind, layout: Layout, weight: &str) -> Option<Arc<SparseMatrix>> {
        self.entries
            .read()
            .get(&CacheKey::new(kind, layout, weight))
            .cloned()
    }

    /// The unit-weight list-of-rows matrix of `kind`, built on first use.
    ///
    /// # Errors
    /// `StaleMatrix` if the cached entry no longer has the shape `props`
    /// implies, which happens when throats are added or removed without a
    /// rebuild. Same-shape stale entries are returned as they are.
    pub fn lil(&self, props: &PropertyStore, kind: MatrixKind) -> Result<Arc<SparseMatrix>, NetworkError> {
        let key = CacheKey::unit(kind, Layout::Lil);
        let expected = kind.shape(props);
        if let Some(m) = self.entries.read().get(&key) {
            return check_shape(m, kind, expected);
        }
        let guard = self.entries.upgradable_read();
        if let Some(m) = guard.get(&key) {
            return check_shape(m, kind, expected);
        }
        log::debug!("cache miss for {kind:?} lil; building");
        let values = vec![1.0; props.num_throats()];
        let coo = match kind {
            MatrixKind::Adjacency => assemble_adjacency(props, &values, true, true),
            MatrixKind::Incidence => assemble_incidence(props, &values, true)?,
        };
        let m = Arc::new(SparseMatrix::from_coo(&coo, Layout::Lil));
        let mut entries = RwLockUpgradableReadGuard::upgrade(guard);
        entries.insert(key, Arc::clone(&m));
        Ok(m)
    }

    /// Discard everything and rebuild unit-weight adjacency and incidence in all layouts.
    ///
    /// Weighted entries are dropped; rebuild them with the weight arrays if needed.
    /// On error the previous cache contents are left in place.
    pub fn rebuild(&self, props: &PropertyStore) -> Result<(), NetworkError> {
        let values = vec![1.0; props.num_throats()];
        let adjacency = assemble_adjacency(props, &values, true, true);
        let incidence = assemble_incidence(props, &values, true)?;
        let mut fresh = HashMap::with_capacity(2 * Layout::ALL.len());
        for layout in Layout::ALL {
            fresh.insert(
                CacheKey::unit(MatrixKind::Adjacency, layout),
                Arc::new(SparseMatrix::from_coo(&adjacency, layout)),
            );
            fresh.insert(
                CacheKey::unit(MatrixKind::Incidence, layout),
                Arc::new(SparseMatrix::from_coo(&incidence, layout)),
            );
        }
        log::debug!(
            "rebuilt matrix cache: adjacency nnz {}, incidence nnz {}",
            adjacency.nnz(),
            incidence.nnz()
        );
        *self.entries.write() = fresh;
        Ok(())
    }

    /// Cached keys, sorted.
    pub fn keys(&self) -> Vec<CacheKey> {
        let mut keys: Vec<CacheKey> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl InvalidateCache for SparseMatrixCache {
    fn cached_matrices(&self) -> usize {
        self.entries.read().len()
    }

    fn invalidate_cache(&mut self) {
        self.entries.get_mut().clear();
    }
}

impl Clone for SparseMatrixCache {
    fn clone(&self) -> Self {
        Self {
            entries: RwLock::new(self.entries.read().clone()),
        }
    }
}

fn check_shape(
    m: &Arc<SparseMatrix>,
    kind: MatrixKind,
    expected: (usize, usize),
) -> Result<Arc<SparseMatrix>, NetworkError> {
    let cached = m.shape();
    if cached != expected {
        log::warn!("cached {kind:?} matrix is {cached:?} but the network is {expected:?}");
        return Err(NetworkError::StaleMatrix {
            kind,
            cached,
            expected,
        });
    }
    Ok(Arc::clone(m))
}

/// Borrow the rows of a cached list-of-rows matrix.
pub(crate) fn lil_rows(m: &SparseMatrix) -> Result<&LilMatrix, NetworkError> {
    m.as_lil().ok_or_else(|| {
        NetworkError::MatrixInvariant(format!("expected a lil matrix, found {:?}", m.layout()))
    })
}

fn resolve_weights<'a>(
    props: &PropertyStore,
    weights: Option<Weights<'a>>,
) -> Result<(&'a str, std::borrow::Cow<'a, [f64]>), NetworkError> {
    let nt = props.num_throats();
    match weights {
        Some(w) if w.values.len() != nt => Err(NetworkError::LengthMismatch {
            domain: Domain::Throat,
            name: w.name.to_string(),
            expected: nt,
            found: w.values.len(),
        }),
        Some(w) => Ok((w.name, std::borrow::Cow::Borrowed(w.values))),
        None => Ok((UNIT_WEIGHT_KEY, std::borrow::Cow::Owned(vec![1.0; nt]))),
    }
}

/// Assemble adjacency triplets: all kept edges, then (if symmetric) their mirrors.
///
/// Edges are deduplicated on insert: by unordered pair when symmetric, by
/// ordered pair otherwise. The first throat seen for a pair supplies the weight.
fn assemble_adjacency(
    props: &PropertyStore,
    values: &[f64],
    drop_zeros: bool,
    symmetric: bool,
) -> CooMatrix {
    let np = props.num_pores();
    let conns = props.connections();
    let mut seen: HashSet<(usize, usize)> = HashSet::with_capacity(conns.len());
    let mut kept: Vec<(usize, usize, f64)> = Vec::with_capacity(conns.len());
    for (&[a, b], &w) in conns.iter().zip(values) {
        if drop_zeros && w == 0.0 {
            continue;
        }
        let key = if symmetric { (a.min(b), a.max(b)) } else { (a, b) };
        if seen.insert(key) {
            kept.push((a, b, w));
        }
    }

    let mut coo = CooMatrix::new((np, np));
    for &(a, b, w) in &kept {
        coo.push(a, b, w);
    }
    if symmetric {
        for &(a, b, w) in kept.iter().filter(|(a, b, _)| a != b) {
            coo.push(b, a, w);
        }
    }
    coo
}

/// Assemble incidence triplets: first-endpoint rows, then second-endpoint rows,
/// each against the throat's `numbering` column.
fn assemble_incidence(
    props: &PropertyStore,
    values: &[f64],
    drop_zeros: bool,
) -> Result<CooMatrix, NetworkError> {
    let np = props.num_pores();
    let nt = props.num_throats();
    let numbering = props.numbering();
    check_numbering(&numbering, nt)?;

    let kept: Vec<(usize, usize, usize, f64)> = props
        .connections()
        .iter()
        .zip(numbering.iter())
        .zip(values)
        .filter(|&(_, &w)| !(drop_zeros && w == 0.0))
        .map(|((&[a, b], &col), &w)| (a, b, col, w))
        .collect();

    let mut coo = CooMatrix::new((np, nt));
    for &(a, _, col, w) in &kept {
        coo.push(a, col, w);
    }
    for &(_, b, col, w) in &kept {
        coo.push(b, col, w);
    }
    Ok(coo)
}
