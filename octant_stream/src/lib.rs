// Copyright 2025 the Octant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Octant Stream: per-frame leaf snapshots of an octree for instanced rendering.
//!
//! ## Overview
//!
//! This crate sits between an [`octant_tree::Octree`] and a GPU-style parallel
//! stage. It does not talk to a graphics API.
//! Instead, it produces the buffers such a stage consumes: the leaf records, one
//! instance transform per leaf, the indirect draw arguments, and the number of
//! dispatch groups.
//!
//! ## Lifecycle
//!
//! The host calls three entry points directly:
//!
//! 1) [`OctreeChunk::init`] validates a [`ChunkConfig`], creates the tree,
//!    inserts a marker covering the whole chunk, and builds the first frame.
//!    The marker sits in every leaf, so each later insertion refines the cells
//!    along its path down to the depth ceiling. [`OctreeChunk::init_empty`]
//!    starts from an empty tree instead.
//! 2) [`OctreeChunk::refresh`] takes a fresh snapshot with
//!    [`Octree::leaf_nodes`](octant_tree::Octree::leaf_nodes), resizes the frame
//!    buffers if the leaf count changed, and runs the [`TransformStage`].
//! 3) [`OctreeChunk::release`] frees the tree and the buffers. Anything after it
//!    fails with [`ChunkError::Released`].
//!
//! Insertions made between refreshes show up in the next frame.
//!
//! ## Consumer contract
//!
//! A frame hands the consumer the leaf buffer ([`LeafFrame::leaf_bytes`]), the
//! leaf count, and the depth used to normalize colors ([`LeafFrame::max_depth`]).
//! Leaves are independent: the transform stage maps them in groups of
//! [`ChunkConfig::group_size`] with no ordering between groups, and treats
//! `node_id` as opaque.
//!
//! # Example
//!
//! ```rust
//! use glam::Vec3;
//! use octant_stream::{ChunkConfig, OctreeChunk};
//!
//! let config = ChunkConfig { max_tree_depth: 2, ..Default::default() };
//! let mut chunk = OctreeChunk::init(config, 0_u32).unwrap();
//! assert_eq!(chunk.tree().unwrap().len(), 1);
//! chunk.insert_point(1, Vec3::new(-3.0, 1.0, -3.0)).unwrap();
//! chunk.insert_point(2, Vec3::new(3.0, 7.0, 3.0)).unwrap();
//!
//! // Six untouched octants plus two octants split down to depth 2.
//! let frame = chunk.refresh().unwrap();
//! assert_eq!(frame.leaf_count(), 22);
//! assert_eq!(frame.args().instance_count, 22);
//! assert_eq!(frame.dispatch_groups(), 1);
//!
//! chunk.release().unwrap();
//! assert!(chunk.refresh().is_err());
//! ```

pub mod chunk;
pub mod config;
pub mod error;
pub mod transform;

pub use chunk::{DrawArgs, LeafFrame, OctreeChunk, dispatch_groups};
pub use config::{ChunkConfig, MeshInfo};
pub use error::ChunkError;
pub use transform::{INSTANCE_RECORD_STRIDE, InstanceTransform, TransformStage};
