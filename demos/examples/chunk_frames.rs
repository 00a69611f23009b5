// Copyright 2025 the Octant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chunk lifecycle example: init, insert between frames, refresh, release.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p octant_demos --example chunk_frames`

use glam::Vec3;
use octant_stream::{ChunkConfig, OctreeChunk};

#[derive(Clone, Debug)]
struct SplitMarker;

fn main() {
    env_logger::init();

    let config = ChunkConfig {
        scale: 8.0,
        max_tree_depth: 4,
        ..Default::default()
    };
    let mut chunk = OctreeChunk::init(config, SplitMarker).unwrap();

    // Simulate a few frames, each adding one point before the refresh.
    let points = [
        Vec3::new(-3.0, 1.0, -3.0),
        Vec3::new(2.5, 6.0, 1.0),
        Vec3::new(-1.0, 3.0, 3.5),
    ];
    for p in points {
        chunk.insert_point(SplitMarker, p).unwrap();
        let frame = chunk.refresh().unwrap();
        log::info!(
            "frame {} uploaded {} bytes",
            frame.number(),
            frame.leaf_bytes().len()
        );
        println!(
            "frame={} leaves={} groups={} args={:?} allocations={}",
            frame.number(),
            frame.leaf_count(),
            frame.dispatch_groups(),
            frame.args().to_array(),
            frame.allocations()
        );
        let deepest = frame
            .leaves()
            .iter()
            .zip(frame.transforms())
            .max_by_key(|(l, _)| l.depth);
        if let Some((leaf, t)) = deepest {
            println!("  deepest leaf depth={} color={:?}", leaf.depth, t.color());
        }
    }

    chunk.release().unwrap();
    println!("released: {}", chunk.is_released());
}
