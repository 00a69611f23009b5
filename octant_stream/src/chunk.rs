// Copyright 2025 the Octant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chunk driver: owns a tree and the buffers derived from its latest snapshot.

#![allow(unsafe_code, reason = "bytemuck Pod/Zeroable derives emit unsafe impls")]

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use octant_tree::{Aabb3D, LeafDescriptor, Octree, leaf_bytes};

use crate::config::{ChunkConfig, MeshInfo};
use crate::error::ChunkError;
use crate::transform::{InstanceTransform, TransformStage};

/// Number of groups needed to cover `leaf_count` leaves, `group_size` at a time.
///
/// A `group_size` of zero is treated as one.
pub const fn dispatch_groups(leaf_count: u32, group_size: u32) -> u32 {
    let group_size = if group_size == 0 { 1 } else { group_size };
    leaf_count.div_ceil(group_size)
}

/// Indirect draw arguments, in the order an indexed indirect draw reads them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct DrawArgs {
    /// Indices per instance.
    pub index_count: u32,
    /// Number of instances, one per leaf.
    pub instance_count: u32,
    /// First index.
    pub index_start: u32,
    /// Vertex offset.
    pub base_vertex: u32,
    /// First instance.
    pub start_instance: u32,
}

impl DrawArgs {
    /// Arguments drawing `mesh` once per leaf.
    pub const fn new(mesh: &MeshInfo, instance_count: u32) -> Self {
        Self {
            index_count: mesh.index_count,
            instance_count,
            index_start: mesh.index_start,
            base_vertex: mesh.base_vertex,
            start_instance: 0,
        }
    }

    /// Arguments as the five words of an indirect buffer.
    pub const fn to_array(self) -> [u32; 5] {
        [
            self.index_count,
            self.instance_count,
            self.index_start,
            self.base_vertex,
            self.start_instance,
        ]
    }
}

/// One snapshot of the tree and everything derived from it.
///
/// Buffers are reallocated whenever the leaf count changes between frames, so
/// their lengths always match the snapshot they were filled from.
#[derive(Clone, Debug, Default)]
pub struct LeafFrame {
    leaves: Vec<LeafDescriptor>,
    transforms: Vec<InstanceTransform>,
    args: DrawArgs,
    dispatch_groups: u32,
    max_depth: u32,
    number: u64,
    allocations: u64,
}

impl LeafFrame {
    /// Leaf records in extraction order.
    pub fn leaves(&self) -> &[LeafDescriptor] {
        &self.leaves
    }

    /// Leaf records as upload bytes.
    pub fn leaf_bytes(&self) -> &[u8] {
        leaf_bytes(&self.leaves)
    }

    /// One transform per leaf, in leaf order.
    pub fn transforms(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    /// Transforms as upload bytes.
    pub fn transform_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.transforms)
    }

    /// Number of leaves in this frame.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Indirect draw arguments for this frame.
    pub fn args(&self) -> DrawArgs {
        self.args
    }

    /// Groups the transform stage was dispatched with.
    pub fn dispatch_groups(&self) -> u32 {
        self.dispatch_groups
    }

    /// Depth used to normalize leaf colors.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Frames produced so far, including this one.
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Times the instance buffer has been (re)allocated.
    pub fn allocations(&self) -> u64 {
        self.allocations
    }
}

/// A cubic chunk of space backed by an octree, with an explicit lifecycle.
///
/// - [`OctreeChunk::init`] builds the tree, inserts a marker over the whole
///   chunk, and builds the first frame. [`OctreeChunk::init_empty`] skips the
///   marker.
/// - Insert between frames with [`OctreeChunk::insert`] or [`OctreeChunk::tree_mut`].
/// - [`OctreeChunk::refresh`] snapshots the tree and rebuilds the frame.
/// - [`OctreeChunk::release`] frees the tree and buffers.
///
/// `refresh` takes `&mut self` and finishes the transform stage before it
/// returns, so no insertion can land between a snapshot and its consumption.
pub struct OctreeChunk<T> {
    config: ChunkConfig,
    tree: Octree<T>,
    stage: TransformStage,
    frame: LeafFrame,
}

impl<T> core::fmt::Debug for OctreeChunk<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OctreeChunk")
            .field("config", &self.config)
            .field("tree", &self.tree)
            .field("frame", &self.frame.number)
            .field("leaves", &self.frame.leaves.len())
            .finish_non_exhaustive()
    }
}

impl<T> OctreeChunk<T> {
    /// Create the chunk's tree with no items and build its first frame.
    ///
    /// Without the whole-chunk marker that [`OctreeChunk::init`] inserts, a
    /// lone point leaves the root unsplit.
    pub fn init_empty(config: ChunkConfig) -> Result<Self, ChunkError> {
        let mut chunk = Self::create(config)?;
        chunk.refresh()?;
        Ok(chunk)
    }

    fn create(config: ChunkConfig) -> Result<Self, ChunkError> {
        config.validate()?;
        let tree = Octree::new(config.bounds(), config.tree_config())?;
        log::debug!(
            "chunk initialized: scale={} depth={} capacity={}",
            config.scale,
            config.max_tree_depth,
            config.max_items_per_node
        );
        Ok(Self {
            config,
            tree,
            stage: TransformStage::from_config(&config),
            frame: LeafFrame {
                max_depth: config.max_tree_depth,
                ..LeafFrame::default()
            },
        })
    }

    /// Settings the chunk was created with.
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Whether [`OctreeChunk::release`] has been called.
    pub fn is_released(&self) -> bool {
        self.tree.is_released()
    }

    /// The chunk's tree.
    pub fn tree(&self) -> Result<&Octree<T>, ChunkError> {
        self.ensure_live()?;
        Ok(&self.tree)
    }

    /// Mutable access to the tree for insertion between frames.
    pub fn tree_mut(&mut self) -> Result<&mut Octree<T>, ChunkError> {
        self.ensure_live()?;
        Ok(&mut self.tree)
    }

    /// The most recent frame.
    pub fn frame(&self) -> Result<&LeafFrame, ChunkError> {
        self.ensure_live()?;
        Ok(&self.frame)
    }

    /// Snapshot the tree and rebuild the frame buffers from it.
    pub fn refresh(&mut self) -> Result<&LeafFrame, ChunkError> {
        self.ensure_live()?;
        let frame = &mut self.frame;
        self.tree
            .leaf_nodes_into(&mut frame.leaves, self.config.max_tree_depth)?;

        let count = frame.leaves.len();
        if frame.transforms.len() != count {
            log::debug!(
                "leaf count {} -> {count}, reallocating instance buffer",
                frame.transforms.len()
            );
            frame.transforms = vec![InstanceTransform::zeroed(); count];
            frame.allocations += 1;
        }
        self.stage.run(&frame.leaves, &mut frame.transforms)?;

        let instance_count = u32::try_from(count).unwrap_or(u32::MAX);
        frame.args = DrawArgs::new(&self.config.mesh, instance_count);
        frame.dispatch_groups = dispatch_groups(instance_count, self.config.group_size);
        frame.number += 1;
        log::trace!(
            "frame {}: {count} leaves in {} groups",
            frame.number,
            frame.dispatch_groups
        );
        Ok(&self.frame)
    }

    /// Free the tree and every frame buffer.
    pub fn release(&mut self) -> Result<(), ChunkError> {
        self.ensure_live()?;
        self.tree.release()?;
        self.frame = LeafFrame::default();
        log::debug!("chunk released");
        Ok(())
    }

    fn ensure_live(&self) -> Result<(), ChunkError> {
        if self.tree.is_released() {
            Err(ChunkError::Released)
        } else {
            Ok(())
        }
    }
}

impl<T: Clone> OctreeChunk<T> {
    /// Create the chunk's tree, insert `marker` over the whole chunk, and build
    /// the first frame.
    ///
    /// The marker occupies every leaf, so each later insertion refines the cells
    /// along its path down to the depth ceiling.
    pub fn init(config: ChunkConfig, marker: T) -> Result<Self, ChunkError> {
        let mut chunk = Self::create(config)?;
        chunk.tree.insert(marker, config.bounds())?;
        chunk.refresh()?;
        Ok(chunk)
    }

    /// Insert an item into the tree. Takes effect at the next [`OctreeChunk::refresh`].
    pub fn insert(&mut self, item: T, bounds: Aabb3D) -> Result<(), ChunkError> {
        self.tree_mut()?.insert(item, bounds)?;
        Ok(())
    }

    /// Insert a zero-extent item at `p`.
    pub fn insert_point(&mut self, item: T, p: Vec3) -> Result<(), ChunkError> {
        self.tree_mut()?.insert_point(item, p)?;
        Ok(())
    }
}
