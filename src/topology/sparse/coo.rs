//! Coordinate-list (triplet) sparse layout.

use itertools::Itertools;

use super::csr::CsrMatrix;
use super::lil::LilMatrix;
use crate::network_error::NetworkError;

/// Sparse matrix stored as parallel `(row, col, value)` arrays.
///
/// Entries are kept in insertion order and may repeat; repeated coordinates
/// are summed on conversion to [`CsrMatrix`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CooMatrix {
    shape: (usize, usize),
    row: Vec<usize>,
    col: Vec<usize>,
    data: Vec<f64>,
}

impl CooMatrix {
    /// An empty matrix of the given shape.
    pub fn new(shape: (usize, usize)) -> Self {
        Self {
            shape,
            ..Self::default()
        }
    }

    /// Assemble from triplet arrays of equal length.
    ///
    /// # Errors
    /// `MatrixInvariant` if the arrays differ in length or a coordinate lies
    /// outside `shape`.
    pub fn from_triplets(
        shape: (usize, usize),
        row: Vec<usize>,
        col: Vec<usize>,
        data: Vec<f64>,
    ) -> Result<Self, NetworkError> {
        if row.len() != col.len() || col.len() != data.len() {
            return Err(NetworkError::MatrixInvariant(format!(
                "triplet arrays have lengths {}/{}/{}",
                row.len(),
                col.len(),
                data.len()
            )));
        }
        if let Some((r, c)) = row
            .iter()
            .zip(&col)
            .find(|&(&r, &c)| r >= shape.0 || c >= shape.1)
        {
            return Err(NetworkError::MatrixInvariant(format!(
                "triplet ({r}, {c}) outside {shape:?}"
            )));
        }
        Ok(Self::from_parts(shape, row, col, data))
    }

    /// Assemble from triplets already known to be consistent.
    pub(crate) fn from_parts(
        shape: (usize, usize),
        row: Vec<usize>,
        col: Vec<usize>,
        data: Vec<f64>,
    ) -> Self {
        debug_assert!(row.len() == col.len() && col.len() == data.len());
        Self {
            shape,
            row,
            col,
            data,
        }
    }

    /// Append one entry.
    #[inline]
    pub fn push(&mut self, r: usize, c: usize, v: f64) {
        debug_assert!(r < self.shape.0 && c < self.shape.1);
        self.row.push(r);
        self.col.push(c);
        self.data.push(v);
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    pub fn row(&self) -> &[usize] {
        &self.row
    }

    pub fn col(&self) -> &[usize] {
        &self.col
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Iterate `(row, col, value)` in insertion order.
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.row
            .iter()
            .zip(&self.col)
            .zip(&self.data)
            .map(|((&r, &c), &v)| (r, c, v))
    }

    /// Compress into CSR, summing duplicates and sorting each row by column.
    pub fn to_csr(&self) -> CsrMatrix {
        let (nrows, _) = self.shape;
        let nnz = self.nnz();

        // 1) row counts -> offsets
        let mut offsets = vec![0usize; nrows + 1];
        for &r in &self.row {
            offsets[r + 1] += 1;
        }
        for i in 0..nrows {
            offsets[i + 1] += offsets[i];
        }

        // 2) bucket entries by row, keeping insertion order within a row
        let mut cols = vec![0usize; nnz];
        let mut vals = vec![0f64; nnz];
        let mut write = offsets.clone();
        for (r, c, v) in self.triplets() {
            let pos = write[r];
            cols[pos] = c;
            vals[pos] = v;
            write[r] += 1;
        }

        // 3) sort each row and merge repeated columns
        let mut indptr = Vec::with_capacity(nrows + 1);
        let mut indices = Vec::with_capacity(nnz);
        let mut data = Vec::with_capacity(nnz);
        indptr.push(0);
        for r in 0..nrows {
            let (lo, hi) = (offsets[r], offsets[r + 1]);
            let merged = cols[lo..hi]
                .iter()
                .copied()
                .zip(vals[lo..hi].iter().copied())
                .sorted_by_key(|&(c, _)| c)
                .coalesce(|a, b| {
                    if a.0 == b.0 {
                        Ok((a.0, a.1 + b.1))
                    } else {
                        Err((a, b))
                    }
                });
            for (c, v) in merged {
                indices.push(c);
                data.push(v);
            }
            indptr.push(indices.len());
        }

        CsrMatrix::from_parts(self.shape, indptr, indices, data)
    }

    /// Convert to list-of-rows via CSR.
    pub fn to_lil(&self) -> LilMatrix {
        self.to_csr().to_lil()
    }
}
