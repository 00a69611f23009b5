// Copyright 2025 the Octant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU reference of the parallel transform stage.
//!
//! Each leaf record maps independently to one [`InstanceTransform`]: a model
//! matrix that scales a unit cube to the leaf and moves it to the leaf center,
//! and a color weighted by the leaf depth. Work is split into fixed-size groups
//! the way a compute dispatch would be, with no ordering between groups.

#![allow(unsafe_code, reason = "bytemuck Pod/Zeroable derives emit unsafe impls")]

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec4};
use octant_tree::LeafDescriptor;
use rayon::prelude::*;

use crate::config::ChunkConfig;
use crate::error::ChunkError;

/// Size of one [`InstanceTransform`] in bytes: `f32x16 model | f32x4 color`.
pub const INSTANCE_RECORD_STRIDE: usize = 80;

const _: () = assert!(size_of::<InstanceTransform>() == INSTANCE_RECORD_STRIDE);

/// Per-instance output of the transform stage.
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct InstanceTransform {
    /// Column-major model matrix for a unit cube centered on the origin.
    pub model: [f32; 16],
    /// Linear RGBA color.
    pub color: [f32; 4],
}

impl InstanceTransform {
    /// Model matrix as a glam matrix.
    pub fn model(&self) -> Mat4 {
        Mat4::from_cols_array(&self.model)
    }

    /// Color as a vector.
    pub fn color(&self) -> Vec4 {
        Vec4::from_array(self.color)
    }
}

/// Parameters of the transform stage.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransformStage {
    /// Depth that maps to full `depth_color_factor`.
    pub max_depth: u32,
    /// Color of depth-0 leaves.
    pub base_color: Vec4,
    /// Added to `base_color`, scaled by `depth / max_depth`.
    pub depth_color_factor: Vec4,
    /// Leaves per group.
    pub group_size: u32,
}

impl TransformStage {
    /// Stage parameters matching a chunk.
    pub fn from_config(config: &ChunkConfig) -> Self {
        Self {
            max_depth: config.max_tree_depth,
            base_color: config.base_color,
            depth_color_factor: config.depth_color_factor,
            group_size: config.group_size,
        }
    }

    /// Transform for a single leaf. `node_id` is ignored.
    pub fn transform(&self, leaf: &LeafDescriptor) -> InstanceTransform {
        let model = Mat4::from_scale_rotation_translation(
            leaf.extents() * 2.0,
            Quat::IDENTITY,
            leaf.center(),
        );
        InstanceTransform {
            model: model.to_cols_array(),
            color: self.depth_color(leaf.depth).to_array(),
        }
    }

    /// Color for a leaf at `depth`, clamped to `[0, 1]`.
    pub fn depth_color(&self, depth: i32) -> Vec4 {
        let weight = depth.max(0) as f32 / self.max_depth.max(1) as f32;
        (self.base_color + self.depth_color_factor * weight).clamp(Vec4::ZERO, Vec4::ONE)
    }

    /// Fill `out[i]` from `leaves[i]` for every leaf, one group per task.
    ///
    /// `out` must be sized for exactly this snapshot.
    pub fn run(
        &self,
        leaves: &[LeafDescriptor],
        out: &mut [InstanceTransform],
    ) -> Result<(), ChunkError> {
        if leaves.len() != out.len() {
            return Err(ChunkError::BufferSize {
                expected: leaves.len(),
                actual: out.len(),
            });
        }
        let group = self.group_size.max(1) as usize;
        out.par_chunks_mut(group)
            .zip(leaves.par_chunks(group))
            .for_each(|(dst, src)| {
                for (d, s) in dst.iter_mut().zip(src) {
                    *d = self.transform(s);
                }
            });
        Ok(())
    }
}
