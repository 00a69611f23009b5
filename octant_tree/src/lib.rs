// Copyright 2025 the Octant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Octant Tree: a bounded, depth-limited sparse octree with leaf extraction.
//!
//! Octant Tree partitions a cubic volume into nested axis-aligned cells and
//! flattens the result into fixed-stride records for a parallel consumer.
//!
//! - Insert payloads with an [`Aabb3D`]; leaves split into eight children once
//!   they hold more than `max_items_per_node` items, down to `max_depth`.
//! - Extract a deterministic, pre-order list of [`LeafDescriptor`]s with
//!   [`Octree::leaf_nodes`]. Empty leaves are included so the list always tiles
//!   the whole volume.
//! - Upload the list as bytes with [`leaf_bytes`]; each record is
//!   [`LEAF_RECORD_STRIDE`] bytes with a fixed field order.
//!
//! # Example
//!
//! ```rust
//! use glam::Vec3;
//! use octant_tree::{Aabb3D, Octree, OctreeConfig};
//!
//! let bounds = Aabb3D::new(Vec3::ZERO, Vec3::splat(8.0));
//! let mut tree = Octree::new(bounds, OctreeConfig::new(1, 2)).unwrap();
//!
//! tree.insert_point("low", Vec3::splat(1.0)).unwrap();
//! tree.insert_point("high", Vec3::splat(7.0)).unwrap();
//!
//! // The second item split the root: eight children at depth 1.
//! let leaves = tree.leaf_nodes(2).unwrap();
//! assert_eq!(leaves.len(), 8);
//! assert!(leaves.iter().all(|l| l.depth == 1 && l.extents == [2.0; 3]));
//! assert_eq!(leaves[0].item_count, 1);
//! assert_eq!(leaves[7].item_count, 1);
//! ```
//!
//! ## Routing
//!
//! Child slots follow [`Octant`]: bit 0 selects +x, bit 1 +y, bit 2 +z.
//! A coordinate equal to a node's center belongs to the positive side, so points
//! on a splitting plane land in exactly one child. Boxes that strictly straddle a
//! plane are duplicated into every child they overlap; internal nodes never hold
//! items.
//!
//! ## Depth ceiling
//!
//! Leaves at `max_depth` never split. Extra items accumulate there without error.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod config;
pub mod error;
pub mod leaf;
pub mod tree;
pub mod types;

pub use config::{BOUNDS_TOLERANCE, MAX_DEPTH_LIMIT, OctreeConfig};
pub use error::OctreeError;
pub use leaf::{LEAF_RECORD_STRIDE, LEAF_RECORD_VERSION, LeafDescriptor, leaf_bytes, leaves_from_bytes};
pub use tree::{LeafRef, Octree};
pub use types::{Aabb3D, Octant};
