// Copyright 2025 the Octant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-stride leaf records handed to the parallel transform stage.
//!
//! The consumer indexes records positionally, so field order and stride are part
//! of the contract. Bump [`LEAF_RECORD_VERSION`] whenever either changes.

#![allow(unsafe_code, reason = "bytemuck Pod/Zeroable derives emit unsafe impls")]

use alloc::vec::Vec;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::error::OctreeError;
use crate::types::Aabb3D;

/// Layout version of [`LeafDescriptor`].
pub const LEAF_RECORD_VERSION: u32 = 1;

/// Size of one [`LeafDescriptor`] in bytes:
/// `u32 node_id | f32x3 center | f32x3 extents | i32 item_count | i32 depth`.
pub const LEAF_RECORD_STRIDE: usize = 36;

const _: () = assert!(size_of::<LeafDescriptor>() == LEAF_RECORD_STRIDE);

/// One emitted leaf, laid out exactly as the GPU reads it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct LeafDescriptor {
    /// Locational code of the node: root is `1`, a child is `(parent << 3) | octant`.
    ///
    /// Consumers should treat this as opaque correlation data.
    pub node_id: u32,
    /// Center of the node bounds.
    pub center: [f32; 3],
    /// Half-size of the node bounds.
    pub extents: [f32; 3],
    /// Items stored at or below the node (duplicated straddlers count once per leaf).
    pub item_count: i32,
    /// True depth of the node; the root is 0.
    pub depth: i32,
}

impl LeafDescriptor {
    /// Center as a vector.
    pub fn center(&self) -> Vec3 {
        Vec3::from_array(self.center)
    }

    /// Extents as a vector.
    pub fn extents(&self) -> Vec3 {
        Vec3::from_array(self.extents)
    }

    /// Bounds of the described node.
    pub fn bounds(&self) -> Aabb3D {
        Aabb3D::from_center_extents(self.center(), self.extents())
    }
}

/// View a leaf buffer as raw bytes for upload (native endianness).
pub fn leaf_bytes(leaves: &[LeafDescriptor]) -> &[u8] {
    bytemuck::cast_slice(leaves)
}

/// Decode records from bytes produced by [`leaf_bytes`].
///
/// The input does not need any particular alignment.
pub fn leaves_from_bytes(bytes: &[u8]) -> Result<Vec<LeafDescriptor>, OctreeError> {
    if bytes.len() % LEAF_RECORD_STRIDE != 0 {
        return Err(OctreeError::RecordLayout {
            len: bytes.len(),
            stride: LEAF_RECORD_STRIDE,
        });
    }
    Ok(bytes
        .chunks_exact(LEAF_RECORD_STRIDE)
        .map(bytemuck::pod_read_unaligned)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn sample() -> LeafDescriptor {
        LeafDescriptor {
            node_id: 0b1_101,
            center: [6.0, 2.0, 6.0],
            extents: [2.0, 2.0, 2.0],
            item_count: 3,
            depth: 1,
        }
    }

    #[test]
    fn fields_sit_at_fixed_offsets() {
        let leaves = [sample()];
        let bytes = leaf_bytes(&leaves);
        assert_eq!(bytes.len(), LEAF_RECORD_STRIDE);
        let word = |i: usize| [bytes[i * 4], bytes[i * 4 + 1], bytes[i * 4 + 2], bytes[i * 4 + 3]];
        assert_eq!(u32::from_ne_bytes(word(0)), 0b1_101);
        assert_eq!(f32::from_ne_bytes(word(1)), 6.0);
        assert_eq!(f32::from_ne_bytes(word(3)), 6.0);
        assert_eq!(f32::from_ne_bytes(word(4)), 2.0);
        assert_eq!(i32::from_ne_bytes(word(7)), 3);
        assert_eq!(i32::from_ne_bytes(word(8)), 1);
    }

    #[test]
    fn decodes_from_unaligned_bytes() {
        let leaves = vec![sample(), LeafDescriptor::default()];
        let mut shifted = vec![0_u8];
        shifted.extend_from_slice(leaf_bytes(&leaves));
        assert_eq!(leaves_from_bytes(&shifted[1..]), Ok(leaves));
    }

    #[test]
    fn rejects_partial_records() {
        let leaves = [sample()];
        let bytes = leaf_bytes(&leaves);
        assert_eq!(
            leaves_from_bytes(&bytes[..LEAF_RECORD_STRIDE - 4]),
            Err(OctreeError::RecordLayout {
                len: LEAF_RECORD_STRIDE - 4,
                stride: LEAF_RECORD_STRIDE,
            })
        );
    }

    #[test]
    fn bounds_round_trip_through_center_and_extents() {
        let b = sample().bounds();
        assert_eq!(b.min, Vec3::new(4.0, 0.0, 4.0));
        assert_eq!(b.max, Vec3::new(8.0, 4.0, 8.0));
    }
}
