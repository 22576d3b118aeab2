//! Per-element property arrays and the small value types that describe them.
//!
//! A property is a named array aligned with one [`Domain`]: entry `i` of a pore
//! array belongs to pore `i`, entry `i` of a throat array to throat `i`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the mandatory throat array holding `(p1, p2)` pore pairs.
pub const CONNECTIONS: &str = "connections";
/// Name of the throat array holding each throat's own sequential ID.
pub const NUMBERING: &str = "numbering";
/// Name of the category array on either domain.
pub const TYPE: &str = "type";

/// The two element kinds of a pore network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Domain {
    Pore,
    Throat,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Pore => f.write_str("pore"),
            Domain::Throat => f.write_str("throat"),
        }
    }
}

/// A named per-element array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PropertyArray {
    /// Small signed categories such as `type`.
    Int(Vec<i32>),
    /// Element indices such as `numbering`.
    Index(Vec<usize>),
    /// Scalar field values (diameters, pressures, ...).
    Float(Vec<f64>),
    /// Pore pairs; only meaningful as the throat `connections` array.
    Pairs(Vec<[usize; 2]>),
    /// Boolean masks, e.g. subdomain labels.
    Bool(Vec<bool>),
}

impl PropertyArray {
    /// Number of elements in the array.
    pub fn len(&self) -> usize {
        match self {
            PropertyArray::Int(v) => v.len(),
            PropertyArray::Index(v) => v.len(),
            PropertyArray::Float(v) => v.len(),
            PropertyArray::Pairs(v) => v.len(),
            PropertyArray::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short element-kind name used in overviews and errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            PropertyArray::Int(_) => "int",
            PropertyArray::Index(_) => "index",
            PropertyArray::Float(_) => "float",
            PropertyArray::Pairs(_) => "pairs",
            PropertyArray::Bool(_) => "bool",
        }
    }

    pub fn as_int(&self) -> Option<&[i32]> {
        match self {
            PropertyArray::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_index(&self) -> Option<&[usize]> {
        match self {
            PropertyArray::Index(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<&[f64]> {
        match self {
            PropertyArray::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_pairs(&self) -> Option<&[[usize; 2]]> {
        match self {
            PropertyArray::Pairs(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<&[bool]> {
        match self {
            PropertyArray::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Vec<i32>> for PropertyArray {
    fn from(v: Vec<i32>) -> Self {
        PropertyArray::Int(v)
    }
}

impl From<Vec<usize>> for PropertyArray {
    fn from(v: Vec<usize>) -> Self {
        PropertyArray::Index(v)
    }
}

impl From<Vec<f64>> for PropertyArray {
    fn from(v: Vec<f64>) -> Self {
        PropertyArray::Float(v)
    }
}

impl From<Vec<[usize; 2]>> for PropertyArray {
    fn from(v: Vec<[usize; 2]>) -> Self {
        PropertyArray::Pairs(v)
    }
}

impl From<Vec<bool>> for PropertyArray {
    fn from(v: Vec<bool>) -> Self {
        PropertyArray::Bool(v)
    }
}

/// Category filter applied to query results and counts.
///
/// `Any` never consults the `type` array. `Codes` keeps an element only if its
/// `type` is one of the listed codes; when the `type` array is missing or is
/// not an integer array, nothing matches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeFilter {
    #[default]
    Any,
    Codes(Vec<i32>),
}

impl TypeFilter {
    /// Filter over the given codes. Codes are kept sorted for binary search.
    pub fn codes<I: IntoIterator<Item = i32>>(codes: I) -> Self {
        let mut v: Vec<i32> = codes.into_iter().collect();
        v.sort_unstable();
        v.dedup();
        TypeFilter::Codes(v)
    }

    /// Internal pores plus the six boundary faces: `0..=6`.
    pub fn pore_default() -> Self {
        Self::codes(0..=6)
    }

    /// Every signed throat category: `-6..=6`.
    pub fn throat_default() -> Self {
        Self::codes(-6..=6)
    }

    /// Does `code` pass this filter?
    #[inline]
    pub fn admits(&self, code: i32) -> bool {
        match self {
            TypeFilter::Any => true,
            TypeFilter::Codes(v) => v.binary_search(&code).is_ok(),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, TypeFilter::Any)
    }
}

impl From<&[i32]> for TypeFilter {
    fn from(codes: &[i32]) -> Self {
        TypeFilter::codes(codes.iter().copied())
    }
}

impl<const N: usize> From<[i32; N]> for TypeFilter {
    fn from(codes: [i32; N]) -> Self {
        TypeFilter::codes(codes)
    }
}
