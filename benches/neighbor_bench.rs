use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use pore_network::prelude::*;

fn cubic(n: usize) -> NetworkStore {
    let idx = |i: usize, j: usize, k: usize| i + n * (j + n * k);
    let mut conns = Vec::with_capacity(3 * n * n * n);
    for k in 0..n {
        for j in 0..n {
            for i in 0..n {
                if i + 1 < n {
                    conns.push([idx(i, j, k), idx(i + 1, j, k)]);
                }
                if j + 1 < n {
                    conns.push([idx(i, j, k), idx(i, j + 1, k)]);
                }
                if k + 1 < n {
                    conns.push([idx(i, j, k), idx(i, j, k + 1)]);
                }
            }
        }
    }
    let np = n * n * n;
    let mut net = NetworkStore::new(np, conns).expect("lattice connections are in range");
    net.set(Domain::Pore, "type", vec![0; np]).expect("pore types");
    net
}

fn bench_neighbors(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbor_queries");

    for &n in &[20usize, 40usize] {
        let net = cubic(n);
        let np = net.num_pores();
        let pores: Vec<usize> = (0..np).step_by(7).collect();

        group.bench_with_input(BenchmarkId::new("update", n), &n, |b, _| {
            b.iter(|| net.update().expect("rebuild"));
        });

        net.update().expect("rebuild");

        group.bench_with_input(BenchmarkId::new("pores_flat", n), &n, |b, _| {
            b.iter(|| {
                let out = net.neighbor_pores(&pores, None, true);
                black_box(out)
            });
        });

        group.bench_with_input(BenchmarkId::new("pores_per_element", n), &n, |b, _| {
            b.iter(|| {
                let out = net.neighbor_pores(&pores, None, false);
                black_box(out)
            });
        });

        group.bench_with_input(BenchmarkId::new("throats_flat", n), &n, |b, _| {
            b.iter(|| {
                let out = net.neighbor_throats(&pores, Some(&TypeFilter::Any), true);
                black_box(out)
            });
        });

        let throat_values = vec![1.0f64; net.num_throats()];
        group.bench_with_input(BenchmarkId::new("pore_values_from_throats", n), &n, |b, _| {
            b.iter(|| black_box(net.pore_values_from_throats(&throat_values)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_neighbors);
criterion_main!(benches);
