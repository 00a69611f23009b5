// Copyright 2025 the Octant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by tree construction, insertion, and record decoding.

/// Errors reported by [`Octree`](crate::Octree) and the leaf record helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OctreeError {
    /// `max_items_per_node` was zero.
    #[error("max_items_per_node must be at least 1")]
    ZeroCapacity,
    /// `max_depth` was zero.
    #[error("max_depth must be at least 1")]
    ZeroDepth,
    /// `max_depth` does not fit the 32-bit node id encoding.
    #[error("max_depth {max_depth} exceeds the node id limit of {limit}")]
    DepthTooLarge {
        /// Requested depth ceiling.
        max_depth: u32,
        /// Largest supported depth ceiling.
        limit: u32,
    },
    /// Root bounds are flat on some axis, inverted, or not finite.
    #[error("root bounds are degenerate or not finite")]
    DegenerateBounds,
    /// Item bounds are inverted or not finite.
    #[error("item bounds are inverted or not finite")]
    InvalidItemBounds,
    /// Item bounds do not touch the root bounds.
    #[error("item bounds do not overlap the tree bounds")]
    OutOfBounds,
    /// The tree was released with [`Octree::release`](crate::Octree::release).
    #[error("octree has been released")]
    Released,
    /// A byte buffer does not hold a whole number of leaf records.
    #[error("buffer of {len} bytes does not hold whole {stride}-byte leaf records")]
    RecordLayout {
        /// Length of the rejected buffer in bytes.
        len: usize,
        /// Expected record stride in bytes.
        stride: usize,
    },
}
