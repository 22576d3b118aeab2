//! Sub-objects attached to a network and the regenerate hook.
//!
//! Geometry, fluid and physics objects compute their own data from the
//! network. The network only keeps non-owning [`Weak`] handles to them, grouped
//! by [`ObjectKind`], so that a refresh can ask each live object to regenerate.
//! Ownership lives with the caller, usually a [`Simulation`](crate::simulation::Simulation).

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};

use crate::data::property::Domain;
use crate::network_error::NetworkError;

/// Kind tag of an associated object, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    Geometry,
    Fluid,
    Physics,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 3] = [ObjectKind::Geometry, ObjectKind::Fluid, ObjectKind::Physics];
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Geometry => f.write_str("geometry"),
            ObjectKind::Fluid => f.write_str("fluid"),
            ObjectKind::Physics => f.write_str("physics"),
        }
    }
}

/// An object that derives its data from the network and can recompute it.
pub trait Refreshable: Send + Sync {
    /// Unique name of the object.
    fn name(&self) -> &str;
    /// Which association list the object belongs to.
    fn kind(&self) -> ObjectKind;
    /// Recompute all derived data.
    ///
    /// Failures should be reported as [`NetworkError::Regenerate`].
    fn regenerate(&self) -> Result<(), NetworkError>;
}

/// Which associated objects a refresh should touch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RefreshTarget {
    /// Every live object of the kind.
    #[default]
    All,
    /// Only the objects with these names.
    Named(Vec<String>),
}

impl RefreshTarget {
    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RefreshTarget::Named(names.into_iter().map(Into::into).collect())
    }
}

/// Non-owning list of associated objects of one kind.
#[derive(Clone, Debug, Default)]
pub struct AssociationList {
    members: Vec<Weak<dyn Refreshable>>,
}

impl AssociationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handle to `obj`. Names must be unique among live members.
    pub fn push(&mut self, obj: &Arc<dyn Refreshable>) -> Result<(), NetworkError> {
        if self.get(obj.name()).is_some() {
            return Err(NetworkError::DuplicateObject(obj.name().to_string()));
        }
        self.members.push(Arc::downgrade(obj));
        Ok(())
    }

    /// Remove the member called `name`. Returns whether one was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let Some(pos) = self
            .members
            .iter()
            .position(|w| w.upgrade().is_some_and(|o| o.name() == name))
        else {
            return false;
        };
        self.members.remove(pos);
        true
    }

    /// The live member called `name`.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Refreshable>> {
        self.members
            .iter()
            .filter_map(Weak::upgrade)
            .find(|o| o.name() == name)
    }

    /// Names of the live members, in association order.
    pub fn names(&self) -> Vec<String> {
        self.members
            .iter()
            .filter_map(Weak::upgrade)
            .map(|o| o.name().to_string())
            .collect()
    }

    /// Number of handles, live or not.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Drop handles whose object has been freed; returns how many were dropped.
    pub fn prune(&mut self) -> usize {
        let before = self.members.len();
        self.members.retain(|w| w.strong_count() > 0);
        before - self.members.len()
    }

    /// Regenerate the targeted members in association order.
    ///
    /// Dead handles are pruned first. A named target that matches no live
    /// member fails with `UnknownObject` before anything is regenerated. The
    /// first failing `regenerate` stops the refresh and is returned as is.
    pub fn refresh(&mut self, kind: ObjectKind, target: &RefreshTarget) -> Result<usize, NetworkError> {
        let dead = self.prune();
        if dead > 0 {
            log::warn!("dropped {dead} freed {kind} association(s)");
        }
        let live: Vec<Arc<dyn Refreshable>> = self.members.iter().filter_map(Weak::upgrade).collect();
        let selected: Vec<&Arc<dyn Refreshable>> = match target {
            RefreshTarget::All => live.iter().collect(),
            RefreshTarget::Named(names) => {
                let wanted: BTreeSet<&str> = names.iter().map(String::as_str).collect();
                if let Some(missing) = wanted
                    .iter()
                    .find(|n| !live.iter().any(|o| o.name() == **n))
                {
                    return Err(NetworkError::UnknownObject(missing.to_string()));
                }
                live.iter().filter(|o| wanted.contains(o.name())).collect()
            }
        };
        for obj in &selected {
            obj.regenerate()?;
            log::info!("refreshed {kind} `{}`", obj.name());
        }
        Ok(selected.len())
    }
}

/// Pore and throat locations assigned to one subdomain object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locations {
    pub pores: BTreeSet<usize>,
    pub throats: BTreeSet<usize>,
}

impl Locations {
    pub fn get(&self, domain: Domain) -> &BTreeSet<usize> {
        match domain {
            Domain::Pore => &self.pores,
            Domain::Throat => &self.throats,
        }
    }

    pub fn get_mut(&mut self, domain: Domain) -> &mut BTreeSet<usize> {
        match domain {
            Domain::Pore => &mut self.pores,
            Domain::Throat => &mut self.throats,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pores.is_empty() && self.throats.is_empty()
    }
}
