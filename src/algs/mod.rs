//! Query algorithms over a network's property store and matrix cache.

pub mod interpolate;
pub mod neighbors;

pub use interpolate::{Interpolant, Interpolator};
pub use neighbors::{NeighborQuery, Neighbors};
