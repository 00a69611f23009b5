// Copyright 2025 the Octant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chunk-level errors.

use octant_tree::OctreeError;

/// Errors reported by [`OctreeChunk`](crate::OctreeChunk) and [`TransformStage`](crate::TransformStage).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChunkError {
    /// A chunk setting is out of range.
    #[error("invalid chunk configuration: {0}")]
    Config(&'static str),
    /// The underlying tree rejected an operation.
    #[error(transparent)]
    Tree(#[from] OctreeError),
    /// The chunk was released with [`OctreeChunk::release`](crate::OctreeChunk::release).
    #[error("chunk has been released")]
    Released,
    /// An output buffer was sized for a different snapshot.
    #[error("instance buffer holds {actual} records but the snapshot has {expected} leaves")]
    BufferSize {
        /// Leaves in the snapshot.
        expected: usize,
        /// Records in the output buffer.
        actual: usize,
    },
}
