// Copyright 2025 the Octant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: arena, insertion and splitting, leaf extraction.

use alloc::vec;
use alloc::vec::Vec;
use glam::Vec3;

use crate::config::OctreeConfig;
use crate::error::OctreeError;
use crate::leaf::LeafDescriptor;
use crate::types::{Aabb3D, Octant};

/// A bounded, depth-limited octree over payloads `T`.
///
/// Nodes live in a single arena owned by the tree. A split appends eight
/// contiguous children in [`Octant`] order; nodes are never merged or moved, so
/// the arena only grows until [`Octree::release`].
///
/// The tree is single-threaded: mutation takes `&mut self` and extraction hands
/// out owned snapshots.
pub struct Octree<T> {
    bounds: Aabb3D,
    config: OctreeConfig,
    arena: Vec<Node<T>>,
    len: usize,
    released: bool,
}

enum Kind<T> {
    Leaf(Vec<(T, Aabb3D)>),
    Internal { first: NodeIdx },
}

struct Node<T> {
    bounds: Aabb3D,
    depth: u32,
    code: u32,
    kind: Kind<T>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct NodeIdx(usize);

impl NodeIdx {
    const ROOT: Self = Self(0);

    const fn new(i: usize) -> Self {
        Self(i)
    }

    const fn get(self) -> usize {
        self.0
    }

    const fn child(self, octant: Octant) -> usize {
        self.0 + octant.index()
    }
}

/// Read-only view of one leaf, returned by [`Octree::leaf_at`].
#[derive(Debug)]
pub struct LeafRef<'a, T> {
    /// Bounds of the leaf.
    pub bounds: Aabb3D,
    /// Depth of the leaf; the root is 0.
    pub depth: u32,
    /// Locational code, as written to [`LeafDescriptor::node_id`].
    pub node_id: u32,
    /// Items stored in the leaf with the bounds they were inserted with.
    pub items: &'a [(T, Aabb3D)],
}

impl<T> core::fmt::Debug for Octree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Octree")
            .field("bounds", &self.bounds)
            .field("config", &self.config)
            .field("nodes", &self.arena.len())
            .field("len", &self.len)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

impl<T> Octree<T> {
    /// Create a tree whose single root leaf covers `bounds`.
    pub fn new(bounds: Aabb3D, config: OctreeConfig) -> Result<Self, OctreeError> {
        config.validate(&bounds)?;
        Ok(Self {
            bounds,
            config,
            arena: vec![Node {
                bounds,
                depth: 0,
                code: 1,
                kind: Kind::Leaf(Vec::new()),
            }],
            len: 0,
            released: false,
        })
    }

    /// Shorthand for [`Octree::new`] with positional limits.
    pub fn with_limits(
        bounds: Aabb3D,
        max_items_per_node: u32,
        max_depth: u32,
    ) -> Result<Self, OctreeError> {
        Self::new(bounds, OctreeConfig::new(max_items_per_node, max_depth))
    }

    /// Root bounds.
    pub fn bounds(&self) -> Aabb3D {
        self.bounds
    }

    /// Limits the tree was built with.
    pub fn config(&self) -> OctreeConfig {
        self.config
    }

    /// Number of accepted insertions.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if nothing has been inserted (or the tree was released).
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total number of nodes, internal and leaf.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.arena
            .iter()
            .filter(|n| matches!(n.kind, Kind::Leaf(_)))
            .count()
    }

    /// Depth of the deepest node.
    pub fn depth(&self) -> u32 {
        self.arena.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Whether [`Octree::release`] has been called.
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// All stored items with their bounds, leaf by leaf.
    ///
    /// An item duplicated across several leaves appears once per leaf.
    pub fn iter(&self) -> impl Iterator<Item = (&T, &Aabb3D)> + '_ {
        self.arena
            .iter()
            .filter_map(|n| match &n.kind {
                Kind::Leaf(items) => Some(items),
                Kind::Internal { .. } => None,
            })
            .flatten()
            .map(|(item, b)| (item, b))
    }

    /// Deepest leaf containing `p`, or `None` if `p` is outside the root.
    ///
    /// Points on a splitting plane resolve to the positive child.
    pub fn leaf_at(&self, p: Vec3) -> Result<Option<LeafRef<'_, T>>, OctreeError> {
        self.ensure_live()?;
        if !self.bounds.contains_point(p) {
            return Ok(None);
        }
        let mut idx = NodeIdx::ROOT;
        loop {
            let node = &self.arena[idx.get()];
            match &node.kind {
                Kind::Internal { first } => {
                    let octant = Octant::of_point(node.bounds.center(), p);
                    idx = NodeIdx::new(first.child(octant));
                }
                Kind::Leaf(items) => {
                    return Ok(Some(LeafRef {
                        bounds: node.bounds,
                        depth: node.depth,
                        node_id: node.code,
                        items,
                    }));
                }
            }
        }
    }

    /// Emit leaf descriptors in deterministic pre-order, cutting off at `max_depth`.
    ///
    /// A node is emitted when it has no children or when its depth equals
    /// `max_depth`; its descendants are then skipped. Empty leaves are emitted
    /// too, so the output always tiles the whole root volume.
    pub fn leaf_nodes(&self, max_depth: u32) -> Result<Vec<LeafDescriptor>, OctreeError> {
        let mut out = Vec::new();
        self.leaf_nodes_into(&mut out, max_depth)?;
        Ok(out)
    }

    /// Like [`Octree::leaf_nodes`], reusing `out`. `out` is cleared first.
    pub fn leaf_nodes_into(
        &self,
        out: &mut Vec<LeafDescriptor>,
        max_depth: u32,
    ) -> Result<(), OctreeError> {
        self.ensure_live()?;
        out.clear();
        let mut stack = vec![NodeIdx::ROOT];
        while let Some(idx) = stack.pop() {
            let node = &self.arena[idx.get()];
            match node.kind {
                Kind::Internal { first } if node.depth < max_depth => {
                    for octant in Octant::ALL.into_iter().rev() {
                        stack.push(NodeIdx::new(first.child(octant)));
                    }
                }
                _ => out.push(self.describe(idx)),
            }
        }
        log::trace!("extracted {} leaves at cutoff {max_depth}", out.len());
        Ok(())
    }

    /// Free every node. A second call, or any fallible call afterwards, fails
    /// with [`OctreeError::Released`].
    pub fn release(&mut self) -> Result<(), OctreeError> {
        self.ensure_live()?;
        log::debug!("releasing octree with {} nodes", self.arena.len());
        self.arena = Vec::new();
        self.len = 0;
        self.released = true;
        Ok(())
    }

    fn ensure_live(&self) -> Result<(), OctreeError> {
        if self.released {
            Err(OctreeError::Released)
        } else {
            Ok(())
        }
    }

    fn describe(&self, idx: NodeIdx) -> LeafDescriptor {
        let node = &self.arena[idx.get()];
        LeafDescriptor {
            node_id: node.code,
            center: node.bounds.center().to_array(),
            extents: node.bounds.extents().to_array(),
            item_count: i32::try_from(self.subtree_items(idx)).unwrap_or(i32::MAX),
            depth: i32::try_from(node.depth).unwrap_or(i32::MAX),
        }
    }

    fn subtree_items(&self, idx: NodeIdx) -> usize {
        match &self.arena[idx.get()].kind {
            Kind::Leaf(items) => items.len(),
            Kind::Internal { first } => Octant::ALL
                .into_iter()
                .map(|o| self.subtree_items(NodeIdx::new(first.child(o))))
                .sum(),
        }
    }
}

impl<T: Clone> Octree<T> {
    /// Insert `item` occupying `item_bounds`.
    ///
    /// The item is appended to every leaf it routes into (see [`Octant::routes`]).
    /// A leaf that goes over `max_items_per_node` below the depth ceiling splits
    /// into eight children and re-inserts its items there, which may split the
    /// children in turn. At the depth ceiling the leaf simply grows.
    ///
    /// Straddling items are copied into every child they overlap, so large
    /// items multiply node count. With capacity 1, two items covering the whole
    /// root refine every cell down to the ceiling: `8^max_depth` leaves, over a
    /// billion at [`MAX_DEPTH_LIMIT`](crate::MAX_DEPTH_LIMIT).
    ///
    /// Items are not deduplicated: inserting the same item twice stores it twice.
    pub fn insert(&mut self, item: T, item_bounds: Aabb3D) -> Result<(), OctreeError> {
        self.ensure_live()?;
        if !item_bounds.is_valid() {
            return Err(OctreeError::InvalidItemBounds);
        }
        if !self.bounds.overlaps(&item_bounds) {
            return Err(OctreeError::OutOfBounds);
        }
        Self::insert_node(&mut self.arena, NodeIdx::ROOT, item, item_bounds, self.config);
        self.len += 1;
        Ok(())
    }

    /// Insert a zero-extent item at `p`.
    pub fn insert_point(&mut self, item: T, p: Vec3) -> Result<(), OctreeError> {
        self.insert(item, Aabb3D::from_point(p))
    }

    fn insert_node(
        arena: &mut Vec<Node<T>>,
        idx: NodeIdx,
        item: T,
        bounds: Aabb3D,
        config: OctreeConfig,
    ) {
        let kind = core::mem::replace(&mut arena[idx.get()].kind, Kind::Leaf(Vec::new()));
        match kind {
            Kind::Internal { first } => {
                arena[idx.get()].kind = Kind::Internal { first };
                let center = arena[idx.get()].bounds.center();
                Self::insert_routed(arena, first, center, item, bounds, config);
            }
            Kind::Leaf(mut items) => {
                items.push((item, bounds));
                let depth = arena[idx.get()].depth;
                if items.len() <= config.capacity() {
                    arena[idx.get()].kind = Kind::Leaf(items);
                    return;
                }
                if depth >= config.max_depth {
                    log::trace!(
                        "leaf at depth ceiling {depth} holds {} items (capacity {})",
                        items.len(),
                        config.max_items_per_node
                    );
                    arena[idx.get()].kind = Kind::Leaf(items);
                    return;
                }
                let first = Self::split(arena, idx);
                let center = arena[idx.get()].bounds.center();
                log::debug!(
                    "split node {:#o} at depth {depth}, re-homing {} items",
                    arena[idx.get()].code,
                    items.len()
                );
                for (item, b) in items {
                    Self::insert_routed(arena, first, center, item, b, config);
                }
            }
        }
    }

    fn insert_routed(
        arena: &mut Vec<Node<T>>,
        first: NodeIdx,
        center: Vec3,
        item: T,
        bounds: Aabb3D,
        config: OctreeConfig,
    ) {
        let mut routes = Octant::routes(center, &bounds);
        // Valid bounds always route to at least one octant.
        let Some(mut current) = routes.next() else {
            return;
        };
        for next in routes {
            let child = NodeIdx::new(first.child(current));
            Self::insert_node(arena, child, item.clone(), bounds, config);
            current = next;
        }
        Self::insert_node(arena, NodeIdx::new(first.child(current)), item, bounds, config);
    }

    /// Append eight children for the node at `idx` and mark it internal.
    fn split(arena: &mut Vec<Node<T>>, idx: NodeIdx) -> NodeIdx {
        let (bounds, depth, code) = {
            let n = &arena[idx.get()];
            (n.bounds, n.depth, n.code)
        };
        let first = NodeIdx::new(arena.len());
        for (octant, child_bounds) in Octant::ALL.into_iter().zip(bounds.subdivide()) {
            arena.push(Node {
                bounds: child_bounds,
                depth: depth + 1,
                code: (code << 3) | u32::from(octant.bits()),
                kind: Kind::Leaf(Vec::new()),
            });
        }
        arena[idx.get()].kind = Kind::Internal { first };
        first
    }
}
