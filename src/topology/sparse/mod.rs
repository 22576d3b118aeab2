//! Sparse matrix layouts used for adjacency and incidence.
//!
//! Three interchangeable layouts are provided:
//! - [`CooMatrix`]: coordinate triplets, the construction format;
//! - [`CsrMatrix`]: compressed rows, for row slicing and matrix algebra;
//! - [`LilMatrix`]: one sorted list per row, for per-row neighbor retrieval.
//!
//! Conversions always go COO → CSR → LIL. Duplicate `(row, col)` entries are
//! summed when a COO matrix is compressed; explicit zeros are kept.

pub mod coo;
pub mod csr;
pub mod lil;

pub use coo::CooMatrix;
pub use csr::CsrMatrix;
pub use lil::LilMatrix;

use serde::{Deserialize, Serialize};

/// Storage layout of a sparse matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Layout {
    Coo,
    Csr,
    Lil,
}

impl Layout {
    pub const ALL: [Layout; 3] = [Layout::Coo, Layout::Csr, Layout::Lil];
}

/// Which layouts a build should produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutSelection {
    #[default]
    All,
    Only(Layout),
}

impl LayoutSelection {
    /// The selected layouts, in construction order.
    pub fn layouts(self) -> &'static [Layout] {
        match self {
            LayoutSelection::All => &Layout::ALL,
            LayoutSelection::Only(Layout::Coo) => &[Layout::Coo],
            LayoutSelection::Only(Layout::Csr) => &[Layout::Csr],
            LayoutSelection::Only(Layout::Lil) => &[Layout::Lil],
        }
    }

    pub fn contains(self, layout: Layout) -> bool {
        self.layouts().contains(&layout)
    }
}

impl From<Layout> for LayoutSelection {
    fn from(layout: Layout) -> Self {
        LayoutSelection::Only(layout)
    }
}

/// A sparse matrix in any of the three layouts.
#[derive(Clone, Debug, PartialEq)]
pub enum SparseMatrix {
    Coo(CooMatrix),
    Csr(CsrMatrix),
    Lil(LilMatrix),
}

impl SparseMatrix {
    /// Convert a freshly assembled COO matrix into `layout`.
    pub fn from_coo(coo: &CooMatrix, layout: Layout) -> Self {
        match layout {
            Layout::Coo => SparseMatrix::Coo(coo.clone()),
            Layout::Csr => SparseMatrix::Csr(coo.to_csr()),
            Layout::Lil => SparseMatrix::Lil(coo.to_lil()),
        }
    }

    pub fn layout(&self) -> Layout {
        match self {
            SparseMatrix::Coo(_) => Layout::Coo,
            SparseMatrix::Csr(_) => Layout::Csr,
            SparseMatrix::Lil(_) => Layout::Lil,
        }
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        match self {
            SparseMatrix::Coo(m) => m.shape(),
            SparseMatrix::Csr(m) => m.shape(),
            SparseMatrix::Lil(m) => m.shape(),
        }
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        match self {
            SparseMatrix::Coo(m) => m.nnz(),
            SparseMatrix::Csr(m) => m.nnz(),
            SparseMatrix::Lil(m) => m.nnz(),
        }
    }

    pub fn as_coo(&self) -> Option<&CooMatrix> {
        match self {
            SparseMatrix::Coo(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_csr(&self) -> Option<&CsrMatrix> {
        match self {
            SparseMatrix::Csr(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_lil(&self) -> Option<&LilMatrix> {
        match self {
            SparseMatrix::Lil(m) => Some(m),
            _ => None,
        }
    }

    /// Compressed-row copy of this matrix regardless of its layout.
    pub fn to_csr(&self) -> CsrMatrix {
        match self {
            SparseMatrix::Coo(m) => m.to_csr(),
            SparseMatrix::Csr(m) => m.clone(),
            SparseMatrix::Lil(m) => m.to_csr(),
        }
    }
}
