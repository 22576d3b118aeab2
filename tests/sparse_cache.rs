mod util;
use pore_network::prelude::*;
use pore_network::topology::sparse::CsrMatrix;
use util::*;

fn undirected_edges(csr: &CsrMatrix) -> usize {
    let (n, _) = csr.shape();
    (0..n)
        .map(|i| csr.row_indices(i).iter().filter(|&&j| j >= i).count())
        .sum()
}

#[test]
fn one_zero_weight_removes_exactly_one_edge() {
    let mut net = line(5);
    net.set(Domain::Throat, "conductance", vec![1.0, 0.0, 2.0, 3.0]).unwrap();
    let csr_only = AdjacencyOpts {
        layout: Layout::Csr.into(),
        ..Default::default()
    };
    let unit = net.build_adjacency(None, csr_only).unwrap().unwrap();
    let weighted = net.build_adjacency_by("conductance", csr_only).unwrap().unwrap();
    let (unit, weighted) = (unit.as_csr().unwrap(), weighted.as_csr().unwrap());
    assert_eq!(undirected_edges(unit), 4);
    assert_eq!(undirected_edges(weighted), 3);
    assert_eq!(weighted.get(1, 2), None);
    assert_eq!(weighted.get(3, 2), Some(2.0));
}

#[test]
fn every_layout_holds_the_same_matrix() {
    let net = NetworkStore::new(27, cubic_connections(3, 3, 3)).unwrap();
    net.update().unwrap();
    for kind in [MatrixKind::Adjacency, MatrixKind::Incidence] {
        let reference = net.matrix(kind, Layout::Csr, "connections").unwrap().to_csr();
        for layout in Layout::ALL {
            let m = net.matrix(kind, layout, "connections").unwrap();
            assert_eq!(m.layout(), layout);
            assert_eq!(m.to_csr(), reference, "{kind:?} {layout:?}");
        }
    }
    let adj = net
        .matrix(MatrixKind::Adjacency, Layout::Csr, "connections")
        .unwrap();
    assert_eq!(adj.shape(), (27, 27));
    assert_eq!(adj.nnz(), 2 * 54);
    assert!(adj.as_csr().unwrap().is_symmetric());
    let inc = net
        .matrix(MatrixKind::Incidence, Layout::Lil, "connections")
        .unwrap();
    assert_eq!(inc.shape(), (27, 54));
    assert_eq!(inc.nnz(), 2 * 54);
}

#[test]
fn update_twice_is_bit_identical() {
    let net = NetworkStore::new(8, cubic_connections(2, 2, 2)).unwrap();
    net.update().unwrap();
    let first: Vec<_> = net
        .cache()
        .keys()
        .into_iter()
        .map(|k| net.matrix(k.kind, k.layout, &k.weight).unwrap())
        .collect();
    net.update().unwrap();
    let second: Vec<_> = net
        .cache()
        .keys()
        .into_iter()
        .map(|k| net.matrix(k.kind, k.layout, &k.weight).unwrap())
        .collect();
    assert_eq!(first.len(), 6);
    assert_eq!(first, second);
}

#[test]
fn queries_see_old_topology_until_update() {
    let mut net = line(4);
    assert_eq!(net.neighbor_pores(&[0], None, true).unwrap().into_flat(), vec![1]);

    net.props_mut()
        .set_connections(vec![[0, 3], [1, 2], [2, 3]])
        .unwrap();
    assert_eq!(net.neighbor_pores(&[0], None, true).unwrap().into_flat(), vec![1]);

    net.update().unwrap();
    assert_eq!(net.neighbor_pores(&[0], None, true).unwrap().into_flat(), vec![3]);
}

#[test]
fn dropping_throats_without_update_is_an_error_not_a_panic() {
    let mut net = NetworkStore::new(3, vec![[0, 1], [1, 2]]).unwrap();
    net.set(Domain::Pore, "type", vec![0; 3]).unwrap();
    assert_eq!(
        net.pore_values_from_throats(&[1.0, 2.0]).unwrap(),
        vec![1.0, 1.5, 2.0]
    );

    net.props_mut().set_connections(vec![[0, 1]]).unwrap();
    let stale = NetworkError::StaleMatrix {
        kind: MatrixKind::Incidence,
        cached: (3, 2),
        expected: (3, 1),
    };
    assert_eq!(net.pore_values_from_throats(&[5.0]), Err(stale.clone()));
    assert_eq!(net.neighbor_throats(&[1], None, true), Err(stale.clone()));
    assert_eq!(net.connecting_throat(0, 1), Err(stale));

    net.update().unwrap();
    assert_eq!(
        net.pore_values_from_throats(&[5.0]).unwrap(),
        vec![5.0, 5.0, 0.0]
    );
    assert_eq!(net.connecting_throat(1, 2).unwrap(), Vec::<usize>::new());
}

#[test]
fn invalidate_empties_the_cache() {
    let mut net = line(3);
    net.update().unwrap();
    assert!(!net.cache().is_empty());
    assert_eq!(net.drain_cache(), 6);
    assert!(net.cache().is_empty());
    assert_eq!(net.neighbor_count(&[1], None).unwrap(), vec![2]);
    assert_eq!(net.cache().len(), 1);
}

#[test]
fn asymmetric_adjacency_keeps_direction() {
    let net = NetworkStore::new(3, vec![[0, 1], [1, 2]]).unwrap();
    let m = net
        .build_adjacency(
            None,
            AdjacencyOpts {
                layout: Layout::Csr.into(),
                symmetric: false,
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    let csr = m.as_csr().unwrap();
    assert_eq!(csr.get(0, 1), Some(1.0));
    assert_eq!(csr.get(1, 0), None);
    assert!(!csr.is_symmetric());
}

#[test]
fn incidence_weights_and_bad_weight_length() {
    let mut net = line(3);
    net.set(Domain::Throat, "length", vec![0.5, 0.25]).unwrap();
    let m = net
        .build_incidence_by(
            "length",
            IncidenceOpts {
                layout: Layout::Csr.into(),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    let csr = m.as_csr().unwrap();
    assert_eq!(csr.row_indices(1), &[0, 1]);
    assert_eq!(csr.row_data(1), &[0.5, 0.25]);

    let err = net
        .build_incidence(Some(Weights::new("short", &[1.0])), IncidenceOpts::default())
        .unwrap_err();
    assert!(matches!(err, NetworkError::LengthMismatch { expected: 2, found: 1, .. }));
}
