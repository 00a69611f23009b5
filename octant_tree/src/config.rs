// Copyright 2025 the Octant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction-time configuration for [`Octree`](crate::Octree).

use crate::error::OctreeError;
use crate::types::Aabb3D;

/// Deepest supported `max_depth`.
///
/// Node ids are 32-bit locational codes: a sentinel bit plus three bits per level.
pub const MAX_DEPTH_LIMIT: u32 = 10;

/// Root bounds must span more than this on every axis.
pub const BOUNDS_TOLERANCE: f32 = 1e-6;

/// Capacity and depth limits, fixed at construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OctreeConfig {
    /// Items a leaf may hold before it splits. Must be at least 1.
    pub max_items_per_node: u32,
    /// Depth ceiling; leaves at this depth never split. Must be in `1..=MAX_DEPTH_LIMIT`.
    pub max_depth: u32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_items_per_node: 1,
            max_depth: 4,
        }
    }
}

impl OctreeConfig {
    /// Create a config from its two limits.
    pub const fn new(max_items_per_node: u32, max_depth: u32) -> Self {
        Self {
            max_items_per_node,
            max_depth,
        }
    }

    /// Check the limits, and the root bounds they will be applied to.
    pub fn validate(&self, bounds: &Aabb3D) -> Result<(), OctreeError> {
        if self.max_items_per_node == 0 {
            return Err(OctreeError::ZeroCapacity);
        }
        if self.max_depth == 0 {
            return Err(OctreeError::ZeroDepth);
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(OctreeError::DepthTooLarge {
                max_depth: self.max_depth,
                limit: MAX_DEPTH_LIMIT,
            });
        }
        if bounds.is_degenerate(BOUNDS_TOLERANCE) {
            return Err(OctreeError::DegenerateBounds);
        }
        Ok(())
    }

    pub(crate) const fn capacity(&self) -> usize {
        self.max_items_per_node as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn unit() -> Aabb3D {
        Aabb3D::new(Vec3::ZERO, Vec3::ONE)
    }

    #[test]
    fn default_matches_observed_chunk_settings() {
        let c = OctreeConfig::default();
        assert_eq!(c.max_items_per_node, 1);
        assert_eq!(c.max_depth, 4);
        assert_eq!(c.validate(&unit()), Ok(()));
    }

    #[test]
    fn rejects_bad_limits() {
        assert_eq!(
            OctreeConfig::new(0, 3).validate(&unit()),
            Err(OctreeError::ZeroCapacity)
        );
        assert_eq!(
            OctreeConfig::new(1, 0).validate(&unit()),
            Err(OctreeError::ZeroDepth)
        );
        assert_eq!(
            OctreeConfig::new(1, MAX_DEPTH_LIMIT + 1).validate(&unit()),
            Err(OctreeError::DepthTooLarge {
                max_depth: MAX_DEPTH_LIMIT + 1,
                limit: MAX_DEPTH_LIMIT,
            })
        );
        assert_eq!(OctreeConfig::new(1, MAX_DEPTH_LIMIT).validate(&unit()), Ok(()));
    }

    #[test]
    fn rejects_flat_bounds() {
        let flat = Aabb3D::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(
            OctreeConfig::default().validate(&flat),
            Err(OctreeError::DegenerateBounds)
        );
    }
}
