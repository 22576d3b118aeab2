//! NetworkStore: a pore network with its derived matrices and sub-objects.
//!
//! The store owns the [`PropertyStore`] and the [`SparseMatrixCache`] for its
//! whole lifetime and answers every topology query against them. Matrices are
//! built lazily on first use and then reused until [`NetworkStore::update`] is
//! called; nothing here watches property edits, so after changing
//! `connections` through [`NetworkStore::props_mut`] the caller must call
//! `update` (or [`InvalidateCache::invalidate_cache`]).
//!
//! Sub-objects (geometry, fluid, physics) are associated through non-owning
//! handles; see [`crate::associations`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::algs::interpolate::{Interpolant, Interpolator};
use crate::algs::neighbors::{NeighborQuery, Neighbors};
use crate::associations::{AssociationList, Locations, ObjectKind, RefreshTarget, Refreshable};
use crate::data::property::{Domain, PropertyArray, TypeFilter};
use crate::data::property_store::PropertyStore;
use crate::debug_invariants::DebugInvariants;
use crate::network_error::NetworkError;
use crate::topology::cache::InvalidateCache;
use crate::topology::matrix_cache::{
    AdjacencyOpts, IncidenceOpts, MatrixKind, SparseMatrixCache, Weights,
};
use crate::topology::sparse::{Layout, SparseMatrix};

/// Defaults applied by the facade's convenience calls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Pore `type` code of internal pores; only these receive interpolated values.
    pub internal_pore_type: i32,
    /// Pore filter used when a query passes `None`.
    pub pore_types: TypeFilter,
    /// Throat filter used by `count` when passed `None`.
    pub throat_types: TypeFilter,
    /// Throat filter used by `neighbor_throats` when passed `None`.
    /// Negative-typed throats are left out unless asked for.
    pub neighbor_throat_types: TypeFilter,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            internal_pore_type: 0,
            pore_types: TypeFilter::pore_default(),
            throat_types: TypeFilter::throat_default(),
            neighbor_throat_types: TypeFilter::codes(0..=6),
        }
    }
}

/// A pore network: properties, cached matrices and associated sub-objects.
#[derive(Clone, Debug)]
pub struct NetworkStore {
    props: PropertyStore,
    cache: SparseMatrixCache,
    config: NetworkConfig,
    geometries: AssociationList,
    fluids: AssociationList,
    physics: AssociationList,
    locations: BTreeMap<(ObjectKind, String), Locations>,
}

static_assertions::assert_impl_all!(NetworkStore: Send, Sync);

impl NetworkStore {
    /// A network of `num_pores` pores joined by `connections`.
    pub fn new(num_pores: usize, connections: Vec<[usize; 2]>) -> Result<Self, NetworkError> {
        Self::with_config(num_pores, connections, NetworkConfig::default())
    }

    pub fn with_config(
        num_pores: usize,
        connections: Vec<[usize; 2]>,
        config: NetworkConfig,
    ) -> Result<Self, NetworkError> {
        Ok(Self::from_props(
            PropertyStore::with_connections(num_pores, connections)?,
            config,
        ))
    }

    /// Wrap an already populated property store. The cache starts empty.
    pub fn from_props(props: PropertyStore, config: NetworkConfig) -> Self {
        Self {
            props,
            cache: SparseMatrixCache::new(),
            config,
            geometries: AssociationList::new(),
            fluids: AssociationList::new(),
            physics: AssociationList::new(),
            locations: BTreeMap::new(),
        }
    }

    // ---- properties ----------------------------------------------------

    pub fn props(&self) -> &PropertyStore {
        &self.props
    }

    /// Mutable access to the properties. Cached matrices are not touched.
    pub fn props_mut(&mut self) -> &mut PropertyStore {
        &mut self.props
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn num_pores(&self) -> usize {
        self.props.num_pores()
    }

    pub fn num_throats(&self) -> usize {
        self.props.num_throats()
    }

    pub fn get(&self, domain: Domain, name: &str) -> Option<&PropertyArray> {
        self.props.get(domain, name)
    }

    pub fn set(
        &mut self,
        domain: Domain,
        name: &str,
        array: impl Into<PropertyArray>,
    ) -> Result<(), NetworkError> {
        self.props.set(domain, name, array)
    }

    /// Number of `domain` elements passing `filter` (configured default on `None`).
    pub fn count(&self, domain: Domain, filter: Option<&TypeFilter>) -> usize {
        self.props.count(domain, self.filter_for(domain, filter))
    }

    fn filter_for<'f>(&'f self, domain: Domain, filter: Option<&'f TypeFilter>) -> &'f TypeFilter {
        filter.unwrap_or(match domain {
            Domain::Pore => &self.config.pore_types,
            Domain::Throat => &self.config.throat_types,
        })
    }

    // ---- neighbor queries ----------------------------------------------

    fn query(&self) -> NeighborQuery<'_> {
        NeighborQuery::new(&self.props, &self.cache)
    }

    /// See [`NeighborQuery::neighbor_pores`].
    pub fn neighbor_pores(
        &self,
        pores: &[usize],
        filter: Option<&TypeFilter>,
        flatten: bool,
    ) -> Result<Neighbors, NetworkError> {
        self.query()
            .neighbor_pores(pores, self.filter_for(Domain::Pore, filter), flatten)
    }

    /// See [`NeighborQuery::neighbor_throats`]. `None` selects
    /// [`NetworkConfig::neighbor_throat_types`], not the counting default.
    pub fn neighbor_throats(
        &self,
        pores: &[usize],
        filter: Option<&TypeFilter>,
        flatten: bool,
    ) -> Result<Neighbors, NetworkError> {
        let filter = filter.unwrap_or(&self.config.neighbor_throat_types);
        self.query().neighbor_throats(pores, filter, flatten)
    }

    pub fn neighbor_count(
        &self,
        pores: &[usize],
        filter: Option<&TypeFilter>,
    ) -> Result<Vec<usize>, NetworkError> {
        self.query()
            .neighbor_count(pores, self.filter_for(Domain::Pore, filter))
    }

    pub fn connecting_throat(&self, a: usize, b: usize) -> Result<Vec<usize>, NetworkError> {
        self.query().connecting_throat(a, b)
    }

    pub fn connected_pores(&self, throats: &[usize], flatten: bool) -> Result<Neighbors, NetworkError> {
        self.query().connected_pores(throats, flatten)
    }

    // ---- matrices ------------------------------------------------------

    /// Read a built matrix by `(kind, layout, weight name)`.
    pub fn matrix(&self, kind: MatrixKind, layout: Layout, weight: &str) -> Option<Arc<SparseMatrix>> {
        self.cache.get(kind, layout, weight)
    }

    pub fn cache(&self) -> &SparseMatrixCache {
        &self.cache
    }

    pub fn build_adjacency(
        &self,
        weights: Option<Weights<'_>>,
        opts: AdjacencyOpts,
    ) -> Result<Option<Arc<SparseMatrix>>, NetworkError> {
        self.cache.build_adjacency(&self.props, weights, opts)
    }

    pub fn build_incidence(
        &self,
        weights: Option<Weights<'_>>,
        opts: IncidenceOpts,
    ) -> Result<Option<Arc<SparseMatrix>>, NetworkError> {
        self.cache.build_incidence(&self.props, weights, opts)
    }

    /// Build the adjacency matrix weighted by the throat float array `name`.
    pub fn build_adjacency_by(
        &self,
        name: &str,
        opts: AdjacencyOpts,
    ) -> Result<Option<Arc<SparseMatrix>>, NetworkError> {
        let values = self.props.float(Domain::Throat, name)?;
        self.build_adjacency(Some(Weights::new(name, values)), opts)
    }

    /// Build the incidence matrix weighted by the throat float array `name`.
    pub fn build_incidence_by(
        &self,
        name: &str,
        opts: IncidenceOpts,
    ) -> Result<Option<Arc<SparseMatrix>>, NetworkError> {
        let values = self.props.float(Domain::Throat, name)?;
        self.build_incidence(Some(Weights::new(name, values)), opts)
    }

    /// Rebuild unit-weight adjacency and incidence in every layout.
    ///
    /// Weighted entries are discarded.
    pub fn update(&self) -> Result<(), NetworkError> {
        self.props.debug_assert_invariants();
        self.cache.rebuild(&self.props)
    }

    // ---- interpolation -------------------------------------------------

    fn interpolator(&self) -> Interpolator<'_> {
        Interpolator::new(&self.props, &self.cache, self.config.internal_pore_type)
    }

    /// See [`Interpolator::pore_values_from_throats`].
    pub fn pore_values_from_throats<V: Interpolant>(&self, throat_values: &[V]) -> Result<Vec<V>, NetworkError> {
        self.interpolator().pore_values_from_throats(throat_values)
    }

    /// See [`Interpolator::throat_values_from_pores`].
    pub fn throat_values_from_pores<V: Interpolant>(&self, pore_values: &[V]) -> Result<Vec<V>, NetworkError> {
        self.interpolator().throat_values_from_pores(pore_values)
    }

    /// Interpolate the throat array `throat_prop` onto pores and store it as `pore_prop`.
    ///
    /// On error the store is left unmodified.
    pub fn interpolate_into_pores(&mut self, throat_prop: &str, pore_prop: &str) -> Result<(), NetworkError> {
        let values = self.props.float(Domain::Throat, throat_prop)?;
        let out = self.interpolator().pores_from_throats(throat_prop, values)?;
        self.props.set(Domain::Pore, pore_prop, out)
    }

    /// Interpolate the pore array `pore_prop` onto throats and store it as `throat_prop`.
    ///
    /// On error the store is left unmodified.
    pub fn interpolate_into_throats(&mut self, pore_prop: &str, throat_prop: &str) -> Result<(), NetworkError> {
        let values = self.props.float(Domain::Pore, pore_prop)?;
        let out = self.interpolator().throats_from_pores(pore_prop, values)?;
        self.props.set(Domain::Throat, throat_prop, out)
    }

    // ---- associations --------------------------------------------------

    fn list(&self, kind: ObjectKind) -> &AssociationList {
        match kind {
            ObjectKind::Geometry => &self.geometries,
            ObjectKind::Fluid => &self.fluids,
            ObjectKind::Physics => &self.physics,
        }
    }

    fn list_mut(&mut self, kind: ObjectKind) -> &mut AssociationList {
        match kind {
            ObjectKind::Geometry => &mut self.geometries,
            ObjectKind::Fluid => &mut self.fluids,
            ObjectKind::Physics => &mut self.physics,
        }
    }

    /// Associate `obj` under its own kind, without taking ownership.
    pub fn associate(&mut self, obj: &Arc<dyn Refreshable>) -> Result<(), NetworkError> {
        self.list_mut(obj.kind()).push(obj)?;
        log::debug!("associated {} `{}`", obj.kind(), obj.name());
        Ok(())
    }

    /// Remove the association to `name`. Returns whether it existed.
    pub fn dissociate(&mut self, kind: ObjectKind, name: &str) -> bool {
        self.list_mut(kind).remove(name)
    }

    /// Names of the live associated objects of `kind`.
    pub fn associations(&self, kind: ObjectKind) -> Vec<String> {
        self.list(kind).names()
    }

    /// The live associated object of `kind` called `name`.
    pub fn fetch(&self, kind: ObjectKind, name: &str) -> Option<Arc<dyn Refreshable>> {
        self.list(kind).get(name)
    }

    /// Ask associated objects of `kind` to regenerate; returns how many did.
    pub fn refresh(&mut self, kind: ObjectKind, target: &RefreshTarget) -> Result<usize, NetworkError> {
        self.list_mut(kind).refresh(kind, target)
    }

    // ---- subdomain locations -------------------------------------------

    /// Assign `ids` of `domain` to the subdomain object `(kind, name)`.
    ///
    /// Fails if any ID is out of range or already belongs to another object
    /// of the same kind; nothing is assigned in that case.
    pub fn add_locations(
        &mut self,
        kind: ObjectKind,
        name: &str,
        domain: Domain,
        ids: &[usize],
    ) -> Result<(), NetworkError> {
        self.props.check_ids(domain, ids)?;
        let taken = self
            .locations
            .iter()
            .filter(|((k, n), _)| *k == kind && n != name)
            .find(|(_, locs)| ids.iter().any(|i| locs.get(domain).contains(i)));
        if let Some(((_, other), _)) = taken {
            return Err(NetworkError::LocationsAlreadyAssigned {
                domain,
                name: name.to_string(),
                other: other.clone(),
            });
        }
        self.locations
            .entry((kind, name.to_string()))
            .or_default()
            .get_mut(domain)
            .extend(ids.iter().copied());
        Ok(())
    }

    /// Remove `ids` of `domain` from `(kind, name)`.
    ///
    /// With `complete`, every location in both domains is removed together
    /// with the label itself and `ids` is ignored.
    pub fn drop_locations(
        &mut self,
        kind: ObjectKind,
        name: &str,
        domain: Domain,
        ids: &[usize],
        complete: bool,
    ) -> Result<(), NetworkError> {
        let key = (kind, name.to_string());
        if complete {
            return self
                .locations
                .remove(&key)
                .map(|_| ())
                .ok_or_else(|| NetworkError::UnknownObject(name.to_string()));
        }
        self.props.check_ids(domain, ids)?;
        let locs = self
            .locations
            .get_mut(&key)
            .ok_or_else(|| NetworkError::UnknownObject(name.to_string()))?;
        let set = locs.get_mut(domain);
        for i in ids {
            set.remove(i);
        }
        Ok(())
    }

    /// Sorted `domain` locations of `(kind, name)`; empty if it has none.
    pub fn locations(&self, kind: ObjectKind, name: &str, domain: Domain) -> Vec<usize> {
        self.locations
            .get(&(kind, name.to_string()))
            .map(|l| l.get(domain).iter().copied().collect())
            .unwrap_or_default()
    }

    pub(crate) fn forget(&mut self, kind: ObjectKind, name: &str) {
        self.dissociate(kind, name);
        self.locations.remove(&(kind, name.to_string()));
    }

    // ---- health --------------------------------------------------------

    /// Check connections, array lengths and numbering, and the cached matrices.
    pub fn validate(&self) -> Result<(), NetworkError> {
        self.validate_invariants()
    }
}

impl DebugInvariants for NetworkStore {
    fn validate_invariants(&self) -> Result<(), NetworkError> {
        self.props.validate_invariants()?;
        for key in self.cache.keys() {
            if let Some(csr) = self
                .cache
                .get(key.kind, key.layout, &key.weight)
                .as_deref()
                .and_then(SparseMatrix::as_csr)
            {
                csr.validate_invariants()?;
            }
        }
        Ok(())
    }
}

impl InvalidateCache for NetworkStore {
    fn cached_matrices(&self) -> usize {
        self.cache.len()
    }

    fn invalidate_cache(&mut self) {
        self.cache.invalidate_cache();
    }
}

impl fmt::Display for NetworkStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "pore network: {} pores, {} throats",
            self.num_pores(),
            self.num_throats()
        )?;
        for domain in [Domain::Pore, Domain::Throat] {
            for name in self.props.keys(domain) {
                if let Some(arr) = self.props.get(domain, name) {
                    writeln!(f, "  {domain}.{name:<24} {:<6} {}", arr.kind_name(), arr.len())?;
                }
            }
        }
        for kind in ObjectKind::ALL {
            let names = self.associations(kind);
            if !names.is_empty() {
                writeln!(f, "  {kind}: {}", names.join(", "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::property::TYPE;

    fn line() -> NetworkStore {
        let mut net = NetworkStore::new(5, vec![[0, 1], [1, 2], [2, 3], [3, 4]]).unwrap();
        net.set(Domain::Pore, TYPE, vec![0; 5]).unwrap();
        net.set(Domain::Throat, TYPE, vec![0; 4]).unwrap();
        net
    }

    #[test]
    fn none_filter_uses_configured_defaults() {
        let mut net = line();
        net.set(Domain::Pore, TYPE, vec![0, 0, 0, 0, 9]).unwrap();
        assert_eq!(net.count(Domain::Pore, None), 4);
        assert_eq!(net.neighbor_count(&[3], None).unwrap(), vec![1]);
        assert_eq!(net.neighbor_count(&[3], Some(&TypeFilter::Any)).unwrap(), vec![2]);
    }

    #[test]
    fn negative_throats_are_counted_but_not_neighbors_by_default() {
        let mut net = NetworkStore::new(3, vec![[0, 1], [1, 2]]).unwrap();
        net.set(Domain::Pore, TYPE, vec![0; 3]).unwrap();
        net.set(Domain::Throat, TYPE, vec![0, -1]).unwrap();
        assert_eq!(
            net.neighbor_throats(&[1], None, true).unwrap(),
            Neighbors::Flat(vec![0])
        );
        assert_eq!(
            net.neighbor_throats(&[1], Some(&TypeFilter::throat_default()), true)
                .unwrap(),
            Neighbors::Flat(vec![0, 1])
        );
        assert_eq!(net.count(Domain::Throat, None), 2);
    }

    #[test]
    fn update_fills_every_layout() {
        let net = line();
        net.update().unwrap();
        for layout in Layout::ALL {
            for kind in [MatrixKind::Adjacency, MatrixKind::Incidence] {
                assert!(net.matrix(kind, layout, "connections").is_some());
            }
        }
        assert!(net.validate().is_ok());
    }

    #[test]
    fn weighted_build_by_name() {
        let mut net = line();
        assert!(matches!(
            net.build_adjacency_by("diameter", AdjacencyOpts::default()),
            Err(NetworkError::MissingProperty { .. })
        ));
        net.set(Domain::Throat, "diameter", vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let m = net
            .build_adjacency_by(
                "diameter",
                AdjacencyOpts {
                    layout: Layout::Csr.into(),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(m.as_csr().unwrap().get(2, 1), Some(2.0));
        assert!(net.matrix(MatrixKind::Adjacency, Layout::Csr, "diameter").is_some());
    }

    #[test]
    fn interpolate_into_pores_writes_back() {
        let mut net = line();
        net.set(Domain::Throat, "area", vec![2.0, 4.0, 6.0, 8.0]).unwrap();
        net.interpolate_into_pores("area", "area").unwrap();
        assert_eq!(
            net.props().float(Domain::Pore, "area").unwrap(),
            &[2.0, 3.0, 5.0, 7.0, 8.0]
        );
    }

    #[test]
    fn locations_are_exclusive_per_kind() {
        let mut net = line();
        net.add_locations(ObjectKind::Geometry, "left", Domain::Pore, &[0, 1]).unwrap();
        let err = net
            .add_locations(ObjectKind::Geometry, "right", Domain::Pore, &[1, 2])
            .unwrap_err();
        assert_eq!(
            err,
            NetworkError::LocationsAlreadyAssigned {
                domain: Domain::Pore,
                name: "right".into(),
                other: "left".into()
            }
        );
        assert!(net.locations(ObjectKind::Geometry, "right", Domain::Pore).is_empty());
        net.add_locations(ObjectKind::Physics, "phys", Domain::Pore, &[1, 2]).unwrap();

        net.drop_locations(ObjectKind::Geometry, "left", Domain::Pore, &[1], false)
            .unwrap();
        net.add_locations(ObjectKind::Geometry, "right", Domain::Pore, &[1, 2]).unwrap();
        assert_eq!(net.locations(ObjectKind::Geometry, "right", Domain::Pore), vec![1, 2]);

        net.drop_locations(ObjectKind::Geometry, "left", Domain::Pore, &[], true)
            .unwrap();
        assert!(net.locations(ObjectKind::Geometry, "left", Domain::Pore).is_empty());
        assert!(net
            .drop_locations(ObjectKind::Geometry, "left", Domain::Pore, &[], true)
            .is_err());
    }

    #[test]
    fn display_lists_properties() {
        let net = line();
        let text = net.to_string();
        assert!(text.starts_with("pore network: 5 pores, 4 throats"));
        assert!(text.contains("throat.connections"));
        assert!(text.contains("pore.type"));
    }
}
