use std::sync::Arc;

use pore_network::prelude::*;

struct Named {
    name: &'static str,
    kind: ObjectKind,
}

impl Refreshable for Named {
    fn name(&self) -> &str {
        self.name
    }

    fn kind(&self) -> ObjectKind {
        self.kind
    }

    fn regenerate(&self) -> Result<(), NetworkError> {
        Ok(())
    }
}

fn obj(name: &'static str, kind: ObjectKind) -> Arc<dyn Refreshable> {
    Arc::new(Named { name, kind })
}

#[test]
fn detach_walks_associations_and_locations() {
    let net = NetworkStore::new(4, vec![[0, 1], [1, 2], [2, 3]]).unwrap();
    let mut sim = Simulation::new(net);
    sim.add(obj("geo_a", ObjectKind::Geometry)).unwrap();
    sim.add(obj("geo_b", ObjectKind::Geometry)).unwrap();
    sim.add(obj("air", ObjectKind::Fluid)).unwrap();

    let net = sim.network_mut();
    net.add_locations(ObjectKind::Geometry, "geo_a", Domain::Pore, &[0, 1])
        .unwrap();
    net.add_locations(ObjectKind::Geometry, "geo_a", Domain::Throat, &[0])
        .unwrap();
    assert!(matches!(
        net.add_locations(ObjectKind::Geometry, "geo_b", Domain::Throat, &[0, 1]),
        Err(NetworkError::LocationsAlreadyAssigned { .. })
    ));

    sim.detach("geo_a").unwrap();
    assert!(sim.get("geo_a").is_none());
    assert_eq!(
        sim.network().associations(ObjectKind::Geometry),
        vec!["geo_b"]
    );
    // geo_a's locations are gone, so geo_b can take them
    sim.network_mut()
        .add_locations(ObjectKind::Geometry, "geo_b", Domain::Throat, &[0, 1])
        .unwrap();
    assert!(sim
        .network()
        .locations(ObjectKind::Geometry, "geo_a", Domain::Pore)
        .is_empty());
}

#[test]
fn objects_are_listed_by_kind_in_name_order() {
    let mut sim = Simulation::new(NetworkStore::new(2, vec![[0, 1]]).unwrap());
    sim.add(obj("water", ObjectKind::Fluid)).unwrap();
    sim.add(obj("air", ObjectKind::Fluid)).unwrap();
    sim.add(obj("stokes", ObjectKind::Physics)).unwrap();
    let fluids: Vec<&str> = sim.objects(ObjectKind::Fluid).map(|o| o.name()).collect();
    assert_eq!(fluids, vec!["air", "water"]);
    assert_eq!(sim.objects(ObjectKind::Geometry).count(), 0);
    assert_eq!(
        sim.network_mut()
            .refresh(ObjectKind::Fluid, &RefreshTarget::All)
            .unwrap(),
        2
    );
}

#[test]
fn dropping_the_registry_kills_associations() {
    let mut sim = Simulation::new(NetworkStore::new(2, vec![[0, 1]]).unwrap());
    sim.add(obj("water", ObjectKind::Fluid)).unwrap();
    assert_eq!(sim.len(), 1);
    let mut net = sim.into_network();
    assert!(net.associations(ObjectKind::Fluid).is_empty());
    assert_eq!(net.refresh(ObjectKind::Fluid, &RefreshTarget::All).unwrap(), 0);
}

#[test]
fn duplicate_and_unknown_names() {
    let mut sim = Simulation::new(NetworkStore::new(2, vec![[0, 1]]).unwrap());
    sim.add(obj("water", ObjectKind::Fluid)).unwrap();
    assert_eq!(
        sim.add(obj("water", ObjectKind::Physics)),
        Err(NetworkError::DuplicateObject("water".into()))
    );
    assert_eq!(
        sim.detach("oil").map(|_| ()),
        Err(NetworkError::UnknownObject("oil".into()))
    );
}
