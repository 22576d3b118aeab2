//! Averaging values between pores and throats.
//!
//! - pore ← throats: each *internal* pore takes the mean over its incident
//!   throats (all of them, regardless of throat `type`). Boundary pores, pores
//!   with no throats, and every pore when the `type` array is missing stay at
//!   zero.
//! - throat ← pores: every throat takes the mean of its two endpoints.
//!
//! A one-element input stands for a uniform field. Pore values from a
//! scalar are that scalar everywhere, whatever the pore `type`. Throat
//! values from a scalar are likewise the scalar on every throat. A network
//! with exactly one element in the source domain reads the slice as data.

use std::borrow::Cow;
use std::ops::{AddAssign, Div};

use num_traits::{FromPrimitive, Zero};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::data::property::Domain;
use crate::data::property_store::PropertyStore;
use crate::network_error::NetworkError;
use crate::topology::matrix_cache::{MatrixKind, SparseMatrixCache, lil_rows};

/// Numeric types that can be averaged.
pub trait Interpolant:
    Copy + Send + Sync + Zero + FromPrimitive + AddAssign + Div<Output = Self>
{
}

impl<V> Interpolant for V where
    V: Copy + Send + Sync + Zero + FromPrimitive + AddAssign + Div<Output = V>
{
}

/// Interpolation between the two domains of a network.
#[derive(Clone, Copy, Debug)]
pub struct Interpolator<'a> {
    props: &'a PropertyStore,
    cache: &'a SparseMatrixCache,
    internal_pore_type: i32,
}

impl<'a> Interpolator<'a> {
    pub fn new(props: &'a PropertyStore, cache: &'a SparseMatrixCache, internal_pore_type: i32) -> Self {
        Self {
            props,
            cache,
            internal_pore_type,
        }
    }

    /// Pore values as the mean of incident throat values.
    pub fn pore_values_from_throats<V: Interpolant>(&self, throat_values: &[V]) -> Result<Vec<V>, NetworkError> {
        self.pores_from_throats("throat_values", throat_values)
    }

    /// Throat values as the mean of their two endpoint pore values.
    pub fn throat_values_from_pores<V: Interpolant>(&self, pore_values: &[V]) -> Result<Vec<V>, NetworkError> {
        self.throats_from_pores("pore_values", pore_values)
    }

    pub(crate) fn pores_from_throats<V: Interpolant>(
        &self,
        name: &str,
        throat_values: &[V],
    ) -> Result<Vec<V>, NetworkError> {
        let np = self.props.num_pores();
        if let [scalar] = throat_values {
            if self.props.num_throats() != 1 {
                return Ok(vec![*scalar; np]);
            }
        }
        let values = broadcast(throat_values, self.props.num_throats(), Domain::Throat, name)?;
        let mut out = vec![V::zero(); np];
        let Some(types) = self.props.types(Domain::Pore) else {
            log::warn!("pore `type` array missing; no pore is internal, leaving `{name}` at zero");
            return Ok(out);
        };
        let m = self.cache.lil(self.props, MatrixKind::Incidence)?;
        let lil = lil_rows(&m)?;
        for (p, slot) in out.iter_mut().enumerate() {
            if types[p] != self.internal_pore_type {
                continue;
            }
            let throats = lil.row(p);
            if throats.is_empty() {
                continue;
            }
            let mut sum = V::zero();
            for &t in throats {
                sum += values[t];
            }
            *slot = sum / divisor(throats.len())?;
        }
        Ok(out)
    }

    pub(crate) fn throats_from_pores<V: Interpolant>(
        &self,
        name: &str,
        pore_values: &[V],
    ) -> Result<Vec<V>, NetworkError> {
        let values = broadcast(pore_values, self.props.num_pores(), Domain::Pore, name)?;
        let two = divisor::<V>(2)?;
        let conns = self.props.connections();
        let mean = |&[a, b]: &[usize; 2]| {
            let mut sum = values[a];
            sum += values[b];
            sum / two
        };
        #[cfg(feature = "rayon")]
        let out = conns.par_iter().map(mean).collect();
        #[cfg(not(feature = "rayon"))]
        let out = conns.iter().map(mean).collect();
        Ok(out)
    }
}

/// Expand a one-element slice to `len` copies; otherwise require `len` values.
fn broadcast<'v, V: Copy>(
    values: &'v [V],
    len: usize,
    domain: Domain,
    name: &str,
) -> Result<Cow<'v, [V]>, NetworkError> {
    match values {
        [scalar] if len != 1 => Ok(Cow::Owned(vec![*scalar; len])),
        _ if values.len() == len => Ok(Cow::Borrowed(values)),
        _ => Err(NetworkError::LengthMismatch {
            domain,
            name: name.to_string(),
            expected: len,
            found: values.len(),
        }),
    }
}

fn divisor<V: FromPrimitive>(count: usize) -> Result<V, NetworkError> {
    V::from_usize(count).ok_or(NetworkError::PrimitiveConversion(count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::property::TYPE;

    fn line() -> PropertyStore {
        // 0-1-2-3 with boundary pores at both ends
        let mut s = PropertyStore::with_connections(4, vec![[0, 1], [1, 2], [2, 3]]).unwrap();
        s.set(Domain::Pore, TYPE, vec![1, 0, 0, 2]).unwrap();
        s
    }

    #[test]
    fn only_internal_pores_are_interpolated() {
        let s = line();
        let cache = SparseMatrixCache::new();
        let i = Interpolator::new(&s, &cache, 0);
        let p = i.pore_values_from_throats(&[2.0, 4.0, 8.0]).unwrap();
        assert_eq!(p, vec![0.0, 3.0, 6.0, 0.0]);
    }

    #[test]
    fn throats_average_both_endpoints() {
        let s = line();
        let cache = SparseMatrixCache::new();
        let i = Interpolator::new(&s, &cache, 0);
        let t = i.throat_values_from_pores(&[1.0, 3.0, 5.0, 9.0]).unwrap();
        assert_eq!(t, vec![2.0, 4.0, 7.0]);
    }

    #[test]
    fn scalar_is_broadcast() {
        let s = line();
        let cache = SparseMatrixCache::new();
        let i = Interpolator::new(&s, &cache, 0);
        assert_eq!(i.throat_values_from_pores(&[2.5]).unwrap(), vec![2.5; 3]);
        assert_eq!(i.pore_values_from_throats(&[7.0f32]).unwrap(), vec![7.0; 4]);
    }

    #[test]
    fn scalar_reaches_boundary_and_isolated_pores() {
        // pore 3 has no throats and pore 0 is a boundary pore
        let mut s = PropertyStore::with_connections(4, vec![[0, 1], [1, 2]]).unwrap();
        s.set(Domain::Pore, TYPE, vec![1, 0, 0, 0]).unwrap();
        let cache = SparseMatrixCache::new();
        let p = Interpolator::new(&s, &cache, 0)
            .pore_values_from_throats(&[3.5])
            .unwrap();
        assert_eq!(p, vec![3.5; 4]);
        assert!(cache.is_empty());

        let bare = PropertyStore::with_connections(3, vec![[0, 1], [1, 2]]).unwrap();
        let p = Interpolator::new(&bare, &cache, 0)
            .pore_values_from_throats(&[2.0])
            .unwrap();
        assert_eq!(p, vec![2.0; 3]);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let s = line();
        let cache = SparseMatrixCache::new();
        let i = Interpolator::new(&s, &cache, 0);
        let err = i.pore_values_from_throats(&[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            NetworkError::LengthMismatch {
                domain: Domain::Throat,
                name: "throat_values".into(),
                expected: 3,
                found: 2
            }
        );
        assert!(i.throat_values_from_pores(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn isolated_internal_pore_stays_zero() {
        let mut s = PropertyStore::with_connections(3, vec![[0, 1]]).unwrap();
        s.set(Domain::Pore, TYPE, vec![0, 0, 0]).unwrap();
        let cache = SparseMatrixCache::new();
        let p = Interpolator::new(&s, &cache, 0)
            .pore_values_from_throats(&[4.0])
            .unwrap();
        assert_eq!(p, vec![4.0, 4.0, 0.0]);
    }

    #[test]
    fn missing_types_leave_everything_zero() {
        let s = PropertyStore::with_connections(2, vec![[0, 1]]).unwrap();
        let cache = SparseMatrixCache::new();
        let p = Interpolator::new(&s, &cache, 0)
            .pore_values_from_throats(&[4.0])
            .unwrap();
        assert_eq!(p, vec![0.0, 0.0]);
    }
}
