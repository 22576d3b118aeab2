//! Data module: per-element property arrays
#![warn(missing_docs)]

pub mod property;
pub mod property_store;

pub use property::{Domain, PropertyArray, TypeFilter};
pub use property_store::PropertyStore;
