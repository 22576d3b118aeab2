//! Compressed sparse row layout.
//!
//! `indptr[i] .. indptr[i+1]` indexes into `indices`/`data` for row `i`.
//! Column indices are strictly increasing within each row.

use super::coo::CooMatrix;
use super::lil::LilMatrix;
use crate::debug_invariants::DebugInvariants;
use crate::network_error::NetworkError;

/// CSR sparse matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct CsrMatrix {
    shape: (usize, usize),
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

impl CsrMatrix {
    pub(crate) fn from_parts(
        shape: (usize, usize),
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<f64>,
    ) -> Self {
        let m = Self {
            shape,
            indptr,
            indices,
            data,
        };
        m.debug_assert_invariants();
        m
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Column indices of row `i`.
    #[inline]
    pub fn row_indices(&self, i: usize) -> &[usize] {
        &self.indices[self.indptr[i]..self.indptr[i + 1]]
    }

    /// Values of row `i`, aligned with [`row_indices`](Self::row_indices).
    #[inline]
    pub fn row_data(&self, i: usize) -> &[f64] {
        &self.data[self.indptr[i]..self.indptr[i + 1]]
    }

    /// Stored value at `(i, j)`, if any.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.shape.0 {
            return None;
        }
        self.row_indices(i)
            .binary_search(&j)
            .ok()
            .map(|k| self.row_data(i)[k])
    }

    /// `y = A x`.
    pub fn matvec(&self, x: &[f64]) -> Result<Vec<f64>, NetworkError> {
        if x.len() != self.shape.1 {
            return Err(NetworkError::MatrixInvariant(format!(
                "vector of length {} cannot multiply a {}x{} matrix",
                x.len(),
                self.shape.0,
                self.shape.1
            )));
        }
        Ok((0..self.shape.0)
            .map(|i| {
                self.row_indices(i)
                    .iter()
                    .zip(self.row_data(i))
                    .map(|(&j, &a)| a * x[j])
                    .sum()
            })
            .collect())
    }

    /// Is the stored pattern and every value mirrored across the diagonal?
    pub fn is_symmetric(&self) -> bool {
        self.shape.0 == self.shape.1
            && (0..self.shape.0).all(|i| {
                self.row_indices(i)
                    .iter()
                    .zip(self.row_data(i))
                    .all(|(&j, &v)| self.get(j, i) == Some(v))
            })
    }

    pub fn to_coo(&self) -> CooMatrix {
        let mut row = Vec::with_capacity(self.nnz());
        for i in 0..self.shape.0 {
            row.extend(std::iter::repeat_n(i, self.indptr[i + 1] - self.indptr[i]));
        }
        CooMatrix::from_parts(self.shape, row, self.indices.clone(), self.data.clone())
    }

    pub fn to_lil(&self) -> LilMatrix {
        let rows = (0..self.shape.0)
            .map(|i| self.row_indices(i).to_vec())
            .collect();
        let data = (0..self.shape.0)
            .map(|i| self.row_data(i).to_vec())
            .collect();
        LilMatrix::from_parts(self.shape.1, rows, data)
    }
}

impl DebugInvariants for CsrMatrix {
    fn validate_invariants(&self) -> Result<(), NetworkError> {
        let (nrows, ncols) = self.shape;
        if self.indptr.len() != nrows + 1 || self.indptr.first() != Some(&0) {
            return Err(NetworkError::MatrixInvariant(format!(
                "indptr must have {} entries starting at 0",
                nrows + 1
            )));
        }
        if self.indptr[nrows] != self.indices.len() || self.indices.len() != self.data.len() {
            return Err(NetworkError::MatrixInvariant(
                "indptr, indices and data disagree on nnz".into(),
            ));
        }
        for i in 0..nrows {
            if self.indptr[i] > self.indptr[i + 1] {
                return Err(NetworkError::MatrixInvariant(format!(
                    "indptr decreases at row {i}"
                )));
            }
            let cols = self.row_indices(i);
            if cols.windows(2).any(|w| w[0] >= w[1]) {
                return Err(NetworkError::MatrixInvariant(format!(
                    "row {i} columns are not strictly increasing"
                )));
            }
            if cols.last().is_some_and(|&c| c >= ncols) {
                return Err(NetworkError::MatrixInvariant(format!(
                    "row {i} has a column outside [0, {ncols})"
                )));
            }
        }
        Ok(())
    }
}
