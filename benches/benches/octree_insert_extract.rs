// Copyright 2025 the Octant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use glam::Vec3;
use octant_stream::{ChunkConfig, OctreeChunk};
use octant_tree::{Aabb3D, Octree, OctreeConfig};

const SIDE: f32 = 64.0;

fn bounds() -> Aabb3D {
    Aabb3D::new(Vec3::ZERO, Vec3::splat(SIDE))
}

fn gen_lattice_points(n: usize) -> Vec<Vec3> {
    let step = SIDE / n as f32;
    let mut out = Vec::with_capacity(n * n * n);
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                out.push(Vec3::new(x as f32, y as f32, z as f32) * step + step * 0.5);
            }
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f32(&mut self) -> f32 {
        let v = self.next_u64() >> 40;
        (v as f32) / ((1u64 << 24) as f32)
    }
}

fn gen_random_points(count: usize) -> Vec<Vec3> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| Vec3::new(rng.next_f32(), rng.next_f32(), rng.next_f32()) * SIDE)
        .collect()
}

fn gen_clustered_points(n_clusters: usize, per_cluster: usize, spread: f32) -> Vec<Vec3> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    for _ in 0..n_clusters {
        let c = Vec3::new(rng.next_f32(), rng.next_f32(), rng.next_f32()) * (SIDE - spread);
        for _ in 0..per_cluster {
            let d = Vec3::new(rng.next_f32(), rng.next_f32(), rng.next_f32()) * spread;
            out.push(c + d);
        }
    }
    out
}

fn build(points: &[Vec3], config: OctreeConfig) -> Octree<u32> {
    let mut tree = Octree::new(bounds(), config).unwrap();
    for (i, p) in points.iter().copied().enumerate() {
        tree.insert_point(i as u32, p).unwrap();
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[8usize, 16, 32] {
        let points = gen_lattice_points(n);
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_function(format!("lattice_n{}", n), |b| {
            b.iter_batched(
                || Octree::<u32>::new(bounds(), OctreeConfig::new(1, 6)).unwrap(),
                |mut tree| {
                    for (i, p) in points.iter().copied().enumerate() {
                        tree.insert_point(i as u32, p).unwrap();
                    }
                    black_box(tree.node_count());
                },
                BatchSize::SmallInput,
            )
        });
    }
    let points = gen_random_points(4096);
    group.throughput(Throughput::Elements(points.len() as u64));
    for &cap in &[1u32, 8] {
        group.bench_function(format!("random_cap{}", cap), |b| {
            b.iter_batched(
                || Octree::<u32>::new(bounds(), OctreeConfig::new(cap, 8)).unwrap(),
                |mut tree| {
                    for (i, p) in points.iter().copied().enumerate() {
                        tree.insert_point(i as u32, p).unwrap();
                    }
                    black_box(tree.node_count());
                },
                BatchSize::SmallInput,
            )
        });
    }
    let points = gen_clustered_points(16, 256, 1.0);
    group.bench_function("clustered_depth_ceiling", |b| {
        b.iter_batched(
            || Octree::<u32>::new(bounds(), OctreeConfig::new(1, 10)).unwrap(),
            |mut tree| {
                for (i, p) in points.iter().copied().enumerate() {
                    tree.insert_point(i as u32, p).unwrap();
                }
                black_box(tree.depth());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");
    let tree = build(&gen_random_points(4096), OctreeConfig::new(1, 8));
    for &cutoff in &[2u32, 4, 8] {
        let mut out = Vec::new();
        group.bench_function(format!("random_cutoff{}", cutoff), |b| {
            b.iter(|| {
                tree.leaf_nodes_into(&mut out, cutoff).unwrap();
                black_box(out.len());
            })
        });
    }
    group.finish();
}

fn bench_chunk_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunk_refresh");
    let config = ChunkConfig {
        scale: SIDE,
        max_tree_depth: 6,
        ..Default::default()
    };
    let mut chunk = OctreeChunk::init(config, u32::MAX).unwrap();
    let half = SIDE * 0.5;
    for (i, p) in gen_random_points(2048).into_iter().enumerate() {
        chunk
            .insert_point(i as u32, p - Vec3::new(half, 0.0, half))
            .unwrap();
    }
    let leaves = chunk.refresh().unwrap().leaf_count();
    group.throughput(Throughput::Elements(leaves as u64));
    group.bench_function("random_2048", |b| {
        b.iter(|| {
            let frame = chunk.refresh().unwrap();
            black_box(frame.dispatch_groups());
        })
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_extract, bench_chunk_refresh);
criterion_main!(benches);
