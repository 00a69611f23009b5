// Copyright 2025 the Octant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types: 3D AABBs and octant indices.

use glam::Vec3;

/// Axis-aligned bounding box in 3D.
///
/// Boxes are plain values: every operation returns a new box and never mutates
/// the receiver. Containment and overlap use closed intervals on every face.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3D {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb3D {
    /// Create a new AABB from min/max corners.
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from its center and half-size.
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Zero-extent box at `p`.
    pub const fn from_point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    /// Midpoint of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half-size of the box along each axis.
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Full size of the box along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Volume of the box; inverted boxes have zero volume.
    pub fn volume(&self) -> f32 {
        self.size().max(Vec3::ZERO).element_product()
    }

    /// Whether this AABB contains the point.
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.min.cmple(p).all() && p.cmple(self.max).all()
    }

    /// Whether `other` lies entirely inside this AABB.
    pub fn contains(&self, other: &Self) -> bool {
        self.min.cmple(other.min).all() && other.max.cmple(self.max).all()
    }

    /// Whether the two boxes share at least one point.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    /// The intersection of two AABBs. May be empty; see [`Aabb3D::is_empty`].
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        }
    }

    /// Return true if the AABB is inverted on any axis. Assumes no NaN.
    pub fn is_empty(&self) -> bool {
        self.max.cmplt(self.min).any()
    }

    /// Finite corners with `min <= max` on every axis.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min.cmple(self.max).all()
    }

    /// True if any axis spans no more than `tolerance`, or the box is not valid.
    pub fn is_degenerate(&self, tolerance: f32) -> bool {
        !self.is_valid() || self.size().cmple(Vec3::splat(tolerance)).any()
    }

    /// Bounds of one of the eight children produced by [`Aabb3D::subdivide`].
    ///
    /// Child faces are taken directly from this box's min, center, and max, so
    /// siblings share their faces exactly.
    pub fn octant_bounds(&self, octant: Octant) -> Self {
        let c = self.center();
        let pick = |positive: bool, lo: f32, mid: f32, hi: f32| {
            if positive {
                (mid, hi)
            } else {
                (lo, mid)
            }
        };
        let (min_x, max_x) = pick(octant.contains(Octant::POS_X), self.min.x, c.x, self.max.x);
        let (min_y, max_y) = pick(octant.contains(Octant::POS_Y), self.min.y, c.y, self.max.y);
        let (min_z, max_z) = pick(octant.contains(Octant::POS_Z), self.min.z, c.z, self.max.z);
        Self {
            min: Vec3::new(min_x, min_y, min_z),
            max: Vec3::new(max_x, max_y, max_z),
        }
    }

    /// Split into eight half-extent children, indexed by [`Octant::index`].
    pub fn subdivide(&self) -> [Self; 8] {
        Octant::ALL.map(|o| self.octant_bounds(o))
    }
}

bitflags::bitflags! {
    /// Child slot of an octree node.
    ///
    /// Each set bit selects the positive half of one axis: bit 0 is x, bit 1 is y,
    /// bit 2 is z. The empty set is the `(-,-,-)` octant at index 0 and
    /// [`Octant::all`] is the `(+,+,+)` octant at index 7. This ordering fixes the
    /// traversal order and therefore the position of every leaf record.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Octant: u8 {
        /// Positive half of the x axis.
        const POS_X = 0b0000_0001;
        /// Positive half of the y axis.
        const POS_Y = 0b0000_0010;
        /// Positive half of the z axis.
        const POS_Z = 0b0000_0100;
    }
}

impl Octant {
    /// All octants in index order.
    pub const ALL: [Self; 8] = [
        Self::from_bits_retain(0),
        Self::from_bits_retain(1),
        Self::from_bits_retain(2),
        Self::from_bits_retain(3),
        Self::from_bits_retain(4),
        Self::from_bits_retain(5),
        Self::from_bits_retain(6),
        Self::from_bits_retain(7),
    ];

    /// Child index in `0..8`.
    pub const fn index(self) -> usize {
        self.bits() as usize
    }

    /// Octant for a child index, if it is in `0..8`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The octant of `center` that owns `p`.
    ///
    /// Coordinates equal to the center go to the positive side, so a point on a
    /// splitting plane belongs to exactly one child.
    pub fn of_point(center: Vec3, p: Vec3) -> Self {
        let mut o = Self::empty();
        o.set(Self::POS_X, p.x >= center.x);
        o.set(Self::POS_Y, p.y >= center.y);
        o.set(Self::POS_Z, p.z >= center.z);
        o
    }

    /// Octants of `center` that a box is routed into.
    ///
    /// Per axis, a box spanning `[lo, hi]` takes the negative side when `lo < c` and
    /// the positive side when `hi > c` or `lo >= c`. Boxes touching a plane only from
    /// below stay negative, boxes starting on it go positive, and boxes strictly
    /// straddling it take both. A valid box always yields at least one octant and a
    /// point yields exactly [`Octant::of_point`].
    pub fn routes(center: Vec3, bounds: &Aabb3D) -> impl Iterator<Item = Self> + use<> {
        let neg = bounds.min.cmplt(center);
        let pos = bounds.max.cmpgt(center) | bounds.min.cmpge(center);
        let allowed = move |o: Self| {
            let side = |flag: Self, n: bool, p: bool| if o.contains(flag) { p } else { n };
            side(Self::POS_X, neg.x, pos.x)
                && side(Self::POS_Y, neg.y, pos.y)
                && side(Self::POS_Z, neg.z, pos.z)
        };
        Self::ALL.into_iter().filter(move |o| allowed(*o))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn cube8() -> Aabb3D {
        Aabb3D::new(Vec3::ZERO, Vec3::splat(8.0))
    }

    #[test]
    fn center_and_extents() {
        let b = Aabb3D::new(Vec3::new(-2.0, 0.0, 4.0), Vec3::new(2.0, 6.0, 5.0));
        assert_eq!(b.center(), Vec3::new(0.0, 3.0, 4.5));
        assert_eq!(b.extents(), Vec3::new(2.0, 3.0, 0.5));
        assert_eq!(Aabb3D::from_center_extents(b.center(), b.extents()), b);
    }

    #[test]
    fn containment_is_closed() {
        let b = cube8();
        assert!(b.contains_point(Vec3::ZERO));
        assert!(b.contains_point(Vec3::splat(8.0)));
        assert!(!b.contains_point(Vec3::new(8.0, 8.0, 8.01)));
        assert!(b.contains(&Aabb3D::new(Vec3::ONE, Vec3::splat(2.0))));
        assert!(!b.contains(&Aabb3D::new(Vec3::ONE, Vec3::splat(9.0))));
    }

    #[test]
    fn overlap_and_intersection() {
        let a = cube8();
        let touching = Aabb3D::new(Vec3::new(8.0, 0.0, 0.0), Vec3::new(9.0, 1.0, 1.0));
        let apart = Aabb3D::new(Vec3::splat(9.0), Vec3::splat(10.0));
        assert!(a.overlaps(&touching));
        assert!(!a.overlaps(&apart));
        assert!(a.intersect(&apart).is_empty());
        assert_eq!(a.intersect(&touching).volume(), 0.0);
    }

    #[test]
    fn degenerate_detection() {
        assert!(!cube8().is_degenerate(1e-6));
        let flat = Aabb3D::new(Vec3::ZERO, Vec3::new(8.0, 0.0, 8.0));
        assert!(flat.is_degenerate(1e-6));
        let inverted = Aabb3D::new(Vec3::ONE, Vec3::ZERO);
        assert!(inverted.is_degenerate(1e-6));
        let nan = Aabb3D::new(Vec3::ZERO, Vec3::new(f32::NAN, 1.0, 1.0));
        assert!(nan.is_degenerate(1e-6));
    }

    #[test]
    fn subdivision_tiles_parent_exactly() {
        let parent = Aabb3D::new(Vec3::new(-3.0, 1.0, 0.5), Vec3::new(5.0, 7.0, 2.5));
        let children = parent.subdivide();
        let total: f32 = children.iter().map(Aabb3D::volume).sum();
        assert!((total - parent.volume()).abs() < 1e-4);
        for (i, a) in children.iter().enumerate() {
            assert!(parent.contains(a));
            assert_eq!(a.extents(), parent.extents() * 0.5);
            for b in &children[i + 1..] {
                assert_eq!(a.intersect(b).volume(), 0.0);
            }
        }
    }

    #[test]
    fn child_centers_follow_index_bits() {
        let parent = cube8();
        let children = parent.subdivide();
        let c = parent.center();
        let q = parent.extents() * 0.5;
        for (i, child) in children.iter().enumerate() {
            let sign = |bit: usize| if i & bit != 0 { 1.0 } else { -1.0 };
            let expected = c + Vec3::new(sign(1) * q.x, sign(2) * q.y, sign(4) * q.z);
            assert_eq!(child.center(), expected, "child {i}");
        }
        assert_eq!(children[0].min, Vec3::ZERO);
        assert_eq!(children[7].max, Vec3::splat(8.0));
    }

    #[test]
    fn octant_index_round_trip() {
        for (i, o) in Octant::ALL.iter().enumerate() {
            assert_eq!(o.index(), i);
            assert_eq!(Octant::from_index(i), Some(*o));
        }
        assert_eq!(Octant::from_index(8), None);
        assert_eq!(Octant::ALL[7], Octant::all());
    }

    #[test]
    fn point_on_plane_goes_positive() {
        let c = Vec3::splat(4.0);
        assert_eq!(Octant::of_point(c, Vec3::splat(4.0)), Octant::all());
        assert_eq!(Octant::of_point(c, Vec3::new(4.0, 1.0, 1.0)), Octant::POS_X);
        let on_plane = Aabb3D::from_point(Vec3::new(4.0, 1.0, 7.0));
        let routed: Vec<_> = Octant::routes(c, &on_plane).collect();
        assert_eq!(routed, [Octant::POS_X | Octant::POS_Z]);
    }

    #[test]
    fn straddling_box_routes_to_every_overlapped_octant() {
        let c = Vec3::splat(4.0);
        let across_x = Aabb3D::new(Vec3::new(3.0, 1.0, 1.0), Vec3::new(5.0, 2.0, 2.0));
        let routed: Vec<_> = Octant::routes(c, &across_x).collect();
        assert_eq!(routed, [Octant::empty(), Octant::POS_X]);

        let everywhere = Aabb3D::new(Vec3::splat(3.0), Vec3::splat(5.0));
        assert_eq!(Octant::routes(c, &everywhere).count(), 8);
    }

    #[test]
    fn box_touching_plane_from_below_stays_negative() {
        let c = Vec3::splat(4.0);
        let below = Aabb3D::new(Vec3::new(2.0, 1.0, 1.0), Vec3::new(4.0, 2.0, 2.0));
        let routed: Vec<_> = Octant::routes(c, &below).collect();
        assert_eq!(routed, [Octant::empty()]);
    }
}
