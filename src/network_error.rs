//! NetworkError: Unified error type for pore-network public APIs
//!
//! Every fallible operation in this crate returns `Result<_, NetworkError>`.
//! Empty query results and the degraded `count` fallback are *not* errors and
//! have no variant here.

use thiserror::Error;

use crate::data::property::Domain;
use crate::topology::matrix_cache::MatrixKind;

/// Unified error type for pore-network operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NetworkError {
    /// A per-element array does not match the cardinality of its domain.
    #[error("{domain} array `{name}` has length {found}, expected {expected}")]
    LengthMismatch {
        domain: Domain,
        name: String,
        expected: usize,
        found: usize,
    },
    /// A query referenced an element outside `[0, len)`.
    #[error("{domain} index {index} out of range (count = {len})")]
    IndexOutOfRange {
        domain: Domain,
        index: usize,
        len: usize,
    },
    /// A throat's `connections` pair names a pore that does not exist.
    #[error("throat {throat} connects to pore {pore}, but the network has {num_pores} pores")]
    InvalidConnection {
        throat: usize,
        pore: usize,
        num_pores: usize,
    },
    /// `numbering` maps a throat outside the throat ID space.
    #[error("throat {throat} is numbered {value}, outside [0, {num_throats})")]
    NumberingOutOfRange {
        throat: usize,
        value: usize,
        num_throats: usize,
    },
    /// A sparse matrix's internal arrays are inconsistent.
    #[error("sparse matrix invariant violated: {0}")]
    MatrixInvariant(String),
    /// A cached matrix was built for a different network size; call `update`.
    #[error("cached {kind:?} matrix has shape {cached:?}, network needs {expected:?}; rebuild the cache")]
    StaleMatrix {
        kind: MatrixKind,
        cached: (usize, usize),
        expected: (usize, usize),
    },
    /// A named array was required but is not stored.
    #[error("{domain} property `{name}` is not defined")]
    MissingProperty { domain: Domain, name: String },
    /// A named array exists but holds the wrong element kind.
    #[error("{domain} property `{name}` must hold {expected} values")]
    PropertyKind {
        domain: Domain,
        name: String,
        expected: &'static str,
    },
    /// An object with this name is already registered.
    #[error("object `{0}` is already registered")]
    DuplicateObject(String),
    /// No object with this name is registered.
    #[error("no object named `{0}`")]
    UnknownObject(String),
    /// Some of the requested locations already belong to another object of the same kind.
    #[error("{domain} locations requested for `{name}` are already assigned to `{other}`")]
    LocationsAlreadyAssigned {
        domain: Domain,
        name: String,
        other: String,
    },
    /// A count could not be represented in the value type being averaged.
    #[error("cannot represent {0} in the target numeric type")]
    PrimitiveConversion(usize),
    /// An associated object failed to regenerate its data.
    #[error("regenerating `{name}` failed: {reason}")]
    Regenerate { name: String, reason: String },
}
