//! List-of-rows sparse layout: one sorted column list per row.

use super::csr::CsrMatrix;

/// Sparse matrix as a vector of per-row `(columns, values)` lists.
#[derive(Clone, Debug, PartialEq)]
pub struct LilMatrix {
    ncols: usize,
    rows: Vec<Vec<usize>>,
    data: Vec<Vec<f64>>,
}

impl LilMatrix {
    pub(crate) fn from_parts(ncols: usize, rows: Vec<Vec<usize>>, data: Vec<Vec<f64>>) -> Self {
        debug_assert_eq!(rows.len(), data.len());
        Self { ncols, rows, data }
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.ncols)
    }

    pub fn nnz(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Sorted column indices of row `i`.
    #[inline]
    pub fn row(&self, i: usize) -> &[usize] {
        &self.rows[i]
    }

    /// Values of row `i`, aligned with [`row`](Self::row).
    #[inline]
    pub fn row_data(&self, i: usize) -> &[f64] {
        &self.data[i]
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<usize>] {
        &self.rows
    }

    /// Is `(i, j)` stored?
    pub fn contains(&self, i: usize, j: usize) -> bool {
        self.rows
            .get(i)
            .is_some_and(|r| r.binary_search(&j).is_ok())
    }

    pub fn to_csr(&self) -> CsrMatrix {
        let mut indptr = Vec::with_capacity(self.rows.len() + 1);
        indptr.push(0);
        let mut indices = Vec::with_capacity(self.nnz());
        let mut data = Vec::with_capacity(self.nnz());
        for (cols, vals) in self.rows.iter().zip(&self.data) {
            indices.extend_from_slice(cols);
            data.extend_from_slice(vals);
            indptr.push(indices.len());
        }
        CsrMatrix::from_parts(self.shape(), indptr, indices, data)
    }
}
