//! Structural checks on network data.
//!
//! - [`PropertyStore`](crate::data::property_store::PropertyStore): every
//!   throat connects existing pores, every array has its domain's length, and
//!   `numbering` stays inside the throat ID space.
//! - [`CsrMatrix`](crate::topology::sparse::CsrMatrix): `indptr` starts at 0 and
//!   never decreases, and each row holds sorted in-range columns.
//! - [`NetworkStore`](crate::network::NetworkStore): its store plus every cached
//!   CSR entry.
//!
//! `validate_invariants` always runs. `debug_assert_invariants` compiles to
//! nothing in release builds unless the `check-invariants` feature is on.

use crate::network_error::NetworkError;

/// Data with structural invariants that can be checked on demand.
pub trait DebugInvariants {
    /// The first violated invariant, if any.
    fn validate_invariants(&self) -> Result<(), NetworkError>;

    /// Panic on a violated invariant when checking is compiled in.
    #[inline]
    fn debug_assert_invariants(&self) {
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        if let Err(e) = self.validate_invariants() {
            panic!("{} invariant broken: {e}", short_type_name::<Self>());
        }
    }
}

#[cfg(any(debug_assertions, feature = "check-invariants"))]
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
