// Copyright 2025 the Octant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaf-list example: extract the same tree at several depth cutoffs.
//!
//! Run:
//! - `cargo run -p octant_demos --example tree_leaf_list`

use glam::Vec3;
use octant_tree::{Aabb3D, Octree, OctreeConfig};

fn main() {
    let bounds = Aabb3D::new(Vec3::ZERO, Vec3::splat(8.0));
    let mut tree = Octree::new(bounds, OctreeConfig::new(1, 2)).unwrap();

    tree.insert_point("a", Vec3::new(1.0, 1.0, 1.0)).unwrap();
    tree.insert_point("b", Vec3::new(7.0, 7.0, 7.0)).unwrap();
    // On the x = 4 plane: belongs to the positive-x child.
    tree.insert_point("c", Vec3::new(4.0, 1.0, 1.0)).unwrap();
    // Straddles x = 4: stored in both children it overlaps.
    let slab = Aabb3D::new(Vec3::new(3.0, 6.0, 6.0), Vec3::new(5.0, 7.0, 7.0));
    tree.insert("slab", slab).unwrap();

    for cutoff in 0..=2 {
        let leaves = tree.leaf_nodes(cutoff).unwrap();
        let occupied: Vec<_> = leaves
            .iter()
            .filter(|l| l.item_count > 0)
            .map(|l| (format!("{:#o}", l.node_id), l.item_count))
            .collect();
        println!(
            "cutoff={cutoff} -> {} leaves, occupied: {:?}",
            leaves.len(),
            occupied
        );
    }

    for p in [Vec3::ONE, Vec3::new(4.0, 1.0, 1.0), Vec3::splat(6.5)] {
        let leaf = tree.leaf_at(p).unwrap().unwrap();
        let names: Vec<_> = leaf.items.iter().map(|(name, _)| *name).collect();
        println!(
            "leaf at {p}: node {:#o} depth {} -> {:?}",
            leaf.node_id, leaf.depth, names
        );
    }
}
