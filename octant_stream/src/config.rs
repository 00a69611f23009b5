// Copyright 2025 the Octant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chunk configuration, fixed at [`OctreeChunk::init`](crate::OctreeChunk::init).

use glam::{Vec3, Vec4};
use octant_tree::{Aabb3D, OctreeConfig};

use crate::error::ChunkError;

/// Index layout of the mesh drawn once per leaf.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MeshInfo {
    /// Indices per instance.
    pub index_count: u32,
    /// First index in the index buffer.
    pub index_start: u32,
    /// Value added to each index before fetching a vertex.
    pub base_vertex: u32,
}

impl Default for MeshInfo {
    /// A 12-triangle cube.
    fn default() -> Self {
        Self {
            index_count: 36,
            index_start: 0,
            base_vertex: 0,
        }
    }
}

/// Settings for one octree chunk and its frame buffers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChunkConfig {
    /// Side length of the cubic chunk. Its bottom face sits at `y = 0`.
    pub scale: f32,
    /// Depth ceiling of the tree, also the extraction cutoff and the depth used
    /// to normalize leaf colors.
    pub max_tree_depth: u32,
    /// Items per leaf before it splits.
    pub max_items_per_node: u32,
    /// Leaves per dispatch group of the transform stage.
    pub group_size: u32,
    /// Color of depth-0 leaves.
    pub base_color: Vec4,
    /// Added to `base_color`, scaled by `depth / max_tree_depth`.
    pub depth_color_factor: Vec4,
    /// Mesh instanced once per leaf.
    pub mesh: MeshInfo,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            scale: 8.0,
            max_tree_depth: 4,
            max_items_per_node: 1,
            group_size: 256,
            base_color: Vec4::new(1.0, 0.0, 0.0, 1.0),
            depth_color_factor: Vec4::new(0.5, 0.0, 0.8, 1.0),
            mesh: MeshInfo::default(),
        }
    }
}

impl ChunkConfig {
    /// World bounds of the chunk: centered on x/z, resting on `y = 0`.
    pub fn bounds(&self) -> Aabb3D {
        let half = self.scale * 0.5;
        Aabb3D::new(
            Vec3::new(-half, 0.0, -half),
            Vec3::new(half, self.scale, half),
        )
    }

    /// Tree limits derived from this config.
    pub fn tree_config(&self) -> OctreeConfig {
        OctreeConfig::new(self.max_items_per_node, self.max_tree_depth)
    }

    /// Check chunk-level settings and the derived tree limits.
    pub fn validate(&self) -> Result<(), ChunkError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ChunkError::Config("scale must be finite and positive"));
        }
        if self.group_size == 0 {
            return Err(ChunkError::Config("group_size must be at least 1"));
        }
        self.tree_config().validate(&self.bounds())?;
        Ok(())
    }
}
