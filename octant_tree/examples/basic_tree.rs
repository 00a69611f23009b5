// Copyright 2025 the Octant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Octant Tree: insert points, split, and extract leaves.

use glam::Vec3;
use octant_tree::{Aabb3D, Octree, OctreeConfig, leaf_bytes};

fn main() {
    let bounds = Aabb3D::new(Vec3::ZERO, Vec3::splat(8.0));
    let mut tree = Octree::new(bounds, OctreeConfig::new(1, 3)).unwrap();
    tree.insert_point(1_u32, Vec3::new(1.0, 1.0, 1.0)).unwrap();
    tree.insert_point(2_u32, Vec3::new(7.0, 7.0, 7.0)).unwrap();
    tree.insert_point(3_u32, Vec3::new(1.5, 0.5, 1.5)).unwrap();

    for cutoff in 0..=3 {
        let leaves = tree.leaf_nodes(cutoff).unwrap();
        println!("cutoff={cutoff} -> {} leaves", leaves.len());
        for leaf in leaves.iter().filter(|l| l.item_count > 0) {
            println!(
                "  node {:#o} depth={} center={:?} items={}",
                leaf.node_id, leaf.depth, leaf.center, leaf.item_count
            );
        }
    }

    let leaves = tree.leaf_nodes(3).unwrap();
    println!("upload size: {} bytes", leaf_bytes(&leaves).len());
}
