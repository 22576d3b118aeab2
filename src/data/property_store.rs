//! PropertyStore: named per-pore and per-throat arrays.
//!
//! The store owns the cardinalities of both domains. The pore count is fixed at
//! construction; the throat count is whatever the last `connections` assignment
//! set it to. Every other array must match its domain's cardinality exactly.
//!
//! Arrays are append/overwrite-only. Nothing in this store tracks derived
//! matrices: after changing `connections`, callers must rebuild the cache
//! themselves (see [`crate::network::NetworkStore::update`]).

use hashbrown::HashMap;
use itertools::Itertools;

use crate::data::property::{CONNECTIONS, Domain, NUMBERING, PropertyArray, TYPE, TypeFilter};
use crate::debug_invariants::DebugInvariants;
use crate::network_error::NetworkError;

/// Per-element property arrays for both domains of a pore network.
#[derive(Clone, Debug, Default)]
pub struct PropertyStore {
    num_pores: usize,
    num_throats: usize,
    pores: HashMap<String, PropertyArray>,
    throats: HashMap<String, PropertyArray>,
}

impl PropertyStore {
    /// An empty store over `num_pores` pores and no throats.
    pub fn new(num_pores: usize) -> Self {
        let mut store = Self {
            num_pores,
            ..Self::default()
        };
        store
            .throats
            .insert(CONNECTIONS.to_string(), PropertyArray::Pairs(Vec::new()));
        store
            .throats
            .insert(NUMBERING.to_string(), PropertyArray::Index(Vec::new()));
        store
    }

    /// Build a store from a pore count and the throat pore pairs.
    pub fn with_connections(
        num_pores: usize,
        connections: Vec<[usize; 2]>,
    ) -> Result<Self, NetworkError> {
        let mut store = Self::new(num_pores);
        store.set_connections(connections)?;
        Ok(store)
    }

    /// Number of elements in `domain`.
    #[inline]
    pub fn len(&self, domain: Domain) -> usize {
        match domain {
            Domain::Pore => self.num_pores,
            Domain::Throat => self.num_throats,
        }
    }

    #[inline]
    pub fn num_pores(&self) -> usize {
        self.num_pores
    }

    #[inline]
    pub fn num_throats(&self) -> usize {
        self.num_throats
    }

    fn map(&self, domain: Domain) -> &HashMap<String, PropertyArray> {
        match domain {
            Domain::Pore => &self.pores,
            Domain::Throat => &self.throats,
        }
    }

    fn map_mut(&mut self, domain: Domain) -> &mut HashMap<String, PropertyArray> {
        match domain {
            Domain::Pore => &mut self.pores,
            Domain::Throat => &mut self.throats,
        }
    }

    /// Replace the throat connectivity.
    ///
    /// Sets the throat count to `connections.len()` and resets `numbering` to
    /// the identity. Fails if any pair references a missing pore, or if another
    /// throat array would be left with a stale length.
    pub fn set_connections(&mut self, connections: Vec<[usize; 2]>) -> Result<(), NetworkError> {
        for (t, pair) in connections.iter().enumerate() {
            if let Some(&p) = pair.iter().find(|&&p| p >= self.num_pores) {
                return Err(NetworkError::InvalidConnection {
                    throat: t,
                    pore: p,
                    num_pores: self.num_pores,
                });
            }
        }
        let nt = connections.len();
        if let Some((name, arr)) = self
            .throats
            .iter()
            .filter(|(name, _)| name.as_str() != CONNECTIONS && name.as_str() != NUMBERING)
            .sorted_by(|a, b| a.0.cmp(b.0))
            .find(|(_, arr)| arr.len() != nt)
        {
            return Err(NetworkError::LengthMismatch {
                domain: Domain::Throat,
                name: name.clone(),
                expected: nt,
                found: arr.len(),
            });
        }
        self.num_throats = nt;
        self.throats
            .insert(CONNECTIONS.to_string(), PropertyArray::Pairs(connections));
        self.throats.insert(
            NUMBERING.to_string(),
            PropertyArray::Index((0..nt).collect()),
        );
        log::debug!("connections set: {} pores, {} throats", self.num_pores, nt);
        Ok(())
    }

    /// Store `array` under `name`, overwriting any previous array.
    ///
    /// Setting the throat `connections` array is routed through
    /// [`set_connections`](Self::set_connections).
    pub fn set(
        &mut self,
        domain: Domain,
        name: &str,
        array: impl Into<PropertyArray>,
    ) -> Result<(), NetworkError> {
        let array = array.into();
        if domain == Domain::Throat && name == CONNECTIONS {
            return match array {
                PropertyArray::Pairs(pairs) => self.set_connections(pairs),
                _ => Err(NetworkError::PropertyKind {
                    domain,
                    name: name.to_string(),
                    expected: "pairs",
                }),
            };
        }
        let expected = self.len(domain);
        if array.len() != expected {
            return Err(NetworkError::LengthMismatch {
                domain,
                name: name.to_string(),
                expected,
                found: array.len(),
            });
        }
        if domain == Domain::Throat && name == NUMBERING {
            let values = array.as_index().ok_or_else(|| NetworkError::PropertyKind {
                domain,
                name: name.to_string(),
                expected: "index",
            })?;
            check_numbering(values, self.num_throats)?;
        }
        self.map_mut(domain).insert(name.to_string(), array);
        Ok(())
    }

    /// The array stored under `name`, if any.
    pub fn get(&self, domain: Domain, name: &str) -> Option<&PropertyArray> {
        self.map(domain).get(name)
    }

    pub fn contains(&self, domain: Domain, name: &str) -> bool {
        self.map(domain).contains_key(name)
    }

    /// Property names of `domain`, sorted.
    pub fn keys(&self, domain: Domain) -> Vec<&str> {
        self.map(domain).keys().map(String::as_str).sorted().collect()
    }

    /// The `(p1, p2)` pairs of every throat.
    pub fn connections(&self) -> &[[usize; 2]] {
        self.throats
            .get(CONNECTIONS)
            .and_then(PropertyArray::as_pairs)
            .unwrap_or(&[])
    }

    /// The throat → column map used by incidence matrices.
    ///
    /// Falls back to the identity when `numbering` is absent or not an index array.
    pub fn numbering(&self) -> std::borrow::Cow<'_, [usize]> {
        match self.throats.get(NUMBERING).and_then(PropertyArray::as_index) {
            Some(v) if v.len() == self.num_throats => std::borrow::Cow::Borrowed(v),
            _ => std::borrow::Cow::Owned((0..self.num_throats).collect()),
        }
    }

    /// The `type` array of `domain`, if present and well-formed.
    pub fn types(&self, domain: Domain) -> Option<&[i32]> {
        self.map(domain)
            .get(TYPE)
            .and_then(PropertyArray::as_int)
            .filter(|v| v.len() == self.len(domain))
    }

    /// A float array by name, with kind checking.
    pub fn float(&self, domain: Domain, name: &str) -> Result<&[f64], NetworkError> {
        let arr = self
            .get(domain, name)
            .ok_or_else(|| NetworkError::MissingProperty {
                domain,
                name: name.to_string(),
            })?;
        arr.as_float().ok_or_else(|| NetworkError::PropertyKind {
            domain,
            name: name.to_string(),
            expected: "float",
        })
    }

    /// Count the elements of `domain` whose `type` passes `filter`.
    ///
    /// With [`TypeFilter::Any`] this is the domain cardinality. With explicit
    /// codes and a missing or malformed `type` array, the count is 0.
    pub fn count(&self, domain: Domain, filter: &TypeFilter) -> usize {
        if filter.is_any() {
            return self.len(domain);
        }
        match self.types(domain) {
            Some(types) => types.iter().filter(|&&t| filter.admits(t)).count(),
            None => {
                log::warn!("{domain} `type` array missing or malformed; counting 0");
                0
            }
        }
    }

    /// Keep the IDs in `ids` whose `type` passes `filter`, preserving order.
    pub(crate) fn retain_by_type(&self, domain: Domain, ids: &mut Vec<usize>, filter: &TypeFilter) {
        if filter.is_any() {
            return;
        }
        match self.types(domain) {
            Some(types) => ids.retain(|&i| filter.admits(types[i])),
            None => ids.clear(),
        }
    }

    /// Fail with `IndexOutOfRange` on the first ID outside the domain.
    pub(crate) fn check_ids(&self, domain: Domain, ids: &[usize]) -> Result<(), NetworkError> {
        let len = self.len(domain);
        match ids.iter().find(|&&i| i >= len) {
            Some(&index) => Err(NetworkError::IndexOutOfRange { domain, index, len }),
            None => Ok(()),
        }
    }
}

pub(crate) fn check_numbering(values: &[usize], num_throats: usize) -> Result<(), NetworkError> {
    match values.iter().position(|&v| v >= num_throats) {
        Some(throat) => Err(NetworkError::NumberingOutOfRange {
            throat,
            value: values[throat],
            num_throats,
        }),
        None => Ok(()),
    }
}

impl DebugInvariants for PropertyStore {
    fn validate_invariants(&self) -> Result<(), NetworkError> {
        for (t, pair) in self.connections().iter().enumerate() {
            if let Some(&p) = pair.iter().find(|&&p| p >= self.num_pores) {
                return Err(NetworkError::InvalidConnection {
                    throat: t,
                    pore: p,
                    num_pores: self.num_pores,
                });
            }
        }
        for domain in [Domain::Pore, Domain::Throat] {
            let expected = self.len(domain);
            for name in self.keys(domain) {
                let found = self.map(domain)[name].len();
                if found != expected {
                    return Err(NetworkError::LengthMismatch {
                        domain,
                        name: name.to_string(),
                        expected,
                        found,
                    });
                }
            }
        }
        if let Some(values) = self.throats.get(NUMBERING).and_then(PropertyArray::as_index) {
            check_numbering(values, self.num_throats)?;
        }
        Ok(())
    }
}
