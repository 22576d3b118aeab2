//! Simulation: owning registry of a network's sub-objects.
//!
//! The network itself only holds weak handles. A `Simulation` keeps the strong
//! ones, indexed by unique name, and is the place where objects are attached
//! and detached. Detaching walks the network's association lists and location
//! labels so nothing refers to the object afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::associations::{ObjectKind, Refreshable};
use crate::network::NetworkStore;
use crate::network_error::NetworkError;

/// A network plus the objects attached to it.
pub struct Simulation {
    network: NetworkStore,
    objects: BTreeMap<String, Arc<dyn Refreshable>>,
}

impl Simulation {
    pub fn new(network: NetworkStore) -> Self {
        Self {
            network,
            objects: BTreeMap::new(),
        }
    }

    pub fn network(&self) -> &NetworkStore {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut NetworkStore {
        &mut self.network
    }

    /// Take ownership of `obj` and associate it with the network.
    ///
    /// # Errors
    /// `DuplicateObject` if an object with the same name is already registered.
    pub fn add(&mut self, obj: Arc<dyn Refreshable>) -> Result<(), NetworkError> {
        let name = obj.name().to_string();
        if self.objects.contains_key(&name) {
            return Err(NetworkError::DuplicateObject(name));
        }
        self.network.associate(&obj)?;
        self.objects.insert(name, obj);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Refreshable>> {
        self.objects.get(name)
    }

    /// Registered objects of `kind`, by name.
    pub fn objects(&self, kind: ObjectKind) -> impl Iterator<Item = &Arc<dyn Refreshable>> + '_ {
        self.objects.values().filter(move |o| o.kind() == kind)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Remove `name` from the registry, the network's associations and its
    /// location labels, and hand the object back.
    pub fn detach(&mut self, name: &str) -> Result<Arc<dyn Refreshable>, NetworkError> {
        let obj = self
            .objects
            .remove(name)
            .ok_or_else(|| NetworkError::UnknownObject(name.to_string()))?;
        self.network.forget(obj.kind(), name);
        log::debug!("detached {} `{name}`", obj.kind());
        Ok(obj)
    }

    /// Consume the simulation, returning the network.
    ///
    /// The network's associations go dead once the objects are dropped.
    pub fn into_network(self) -> NetworkStore {
        self.network
    }
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("network", &self.network)
            .field("objects", &self.objects.keys().collect::<Vec<_>>())
            .finish()
    }
}
