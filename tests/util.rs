#![allow(dead_code)]
use pore_network::prelude::*;
use rand::Rng;

/// `n` pores in a line, all internal, throats `(i, i+1)`.
pub fn line(n: usize) -> NetworkStore {
    let conns = (1..n).map(|i| [i - 1, i]).collect();
    let mut net = NetworkStore::new(n, conns).unwrap();
    net.set(Domain::Pore, "type", vec![0; n]).unwrap();
    net.set(Domain::Throat, "type", vec![0; n.saturating_sub(1)]).unwrap();
    net
}

/// `n` pores in a ring, all internal.
pub fn cycle(n: usize) -> NetworkStore {
    let conns = (0..n).map(|i| [i, (i + 1) % n]).collect();
    let mut net = NetworkStore::new(n, conns).unwrap();
    net.set(Domain::Pore, "type", vec![0; n]).unwrap();
    net
}

/// Connection pairs of an `nx × ny × nz` cubic lattice with 6-neighbor throats.
pub fn cubic_connections(nx: usize, ny: usize, nz: usize) -> Vec<[usize; 2]> {
    let idx = |i: usize, j: usize, k: usize| i + nx * (j + ny * k);
    let mut conns = Vec::new();
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                if i + 1 < nx {
                    conns.push([idx(i, j, k), idx(i + 1, j, k)]);
                }
                if j + 1 < ny {
                    conns.push([idx(i, j, k), idx(i, j + 1, k)]);
                }
                if k + 1 < nz {
                    conns.push([idx(i, j, k), idx(i, j, k + 1)]);
                }
            }
        }
    }
    conns
}

/// Random pairs over `np` pores; may contain self-loops and repeated pairs.
pub fn random_connections<R: Rng>(rng: &mut R, np: usize, nt: usize) -> Vec<[usize; 2]> {
    (0..nt)
        .map(|_| [rng.gen_range(0..np), rng.gen_range(0..np)])
        .collect()
}
