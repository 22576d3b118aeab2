//! Dropping matrices derived from `connections`.
//!
//! Invalidation is the cheap alternative to a full rebuild: the list-of-rows
//! matrices that neighbor and interpolation queries need come back lazily,
//! while CSR and COO entries stay gone until asked for again.

/// A holder of matrices built from the network's throat connectivity.
pub trait InvalidateCache {
    /// Number of matrices currently held.
    fn cached_matrices(&self) -> usize;

    /// Drop every matrix.
    fn invalidate_cache(&mut self);

    /// Drop every matrix and return how many were held.
    fn drain_cache(&mut self) -> usize {
        let held = self.cached_matrices();
        if held > 0 {
            log::debug!("dropping {held} cached matrices");
        }
        self.invalidate_cache();
        held
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::property_store::PropertyStore;
    use crate::topology::matrix_cache::{MatrixKind, SparseMatrixCache};

    #[test]
    fn drain_reports_what_was_dropped() {
        let props = PropertyStore::with_connections(3, vec![[0, 1], [1, 2]]).unwrap();
        let mut cache = SparseMatrixCache::new();
        cache.lil(&props, MatrixKind::Incidence).unwrap();
        cache.lil(&props, MatrixKind::Adjacency).unwrap();
        assert_eq!(cache.cached_matrices(), 2);
        assert_eq!(cache.drain_cache(), 2);
        assert_eq!(cache.drain_cache(), 0);

        cache.rebuild(&props).unwrap();
        assert_eq!(cache.drain_cache(), 6);
    }
}
