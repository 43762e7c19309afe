//! Axis-aligned rectangle arithmetic over grid coordinates.

use crate::errors::GeometryError;
use crate::types::Coordinate2;

/// An axis-aligned rectangle on the grid, edge-inclusive.
///
/// Invariant: `l <= r` and `b <= t`, checked at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    l: i32,
    b: i32,
    r: i32,
    t: i32,
}

impl BoundingBox {
    pub fn new(l: i32, b: i32, r: i32, t: i32) -> Result<BoundingBox, GeometryError> {
        if l > r || b > t {
            return Err(GeometryError::InvalidBoundingBox { l, b, r, t });
        }
        Ok(BoundingBox { l, b, r, t })
    }

    /// A degenerate box covering a single coordinate.
    pub fn at(coord: Coordinate2) -> BoundingBox {
        BoundingBox {
            l: coord.x,
            b: coord.y,
            r: coord.x,
            t: coord.y,
        }
    }

    pub fn left(&self) -> i32 {
        self.l
    }

    pub fn bottom(&self) -> i32 {
        self.b
    }

    pub fn right(&self) -> i32 {
        self.r
    }

    pub fn top(&self) -> i32 {
        self.t
    }

    /// Whether a coordinate lies inside the box, edges included.
    pub fn contains(&self, coord: Coordinate2) -> bool {
        self.l <= coord.x && self.r >= coord.x && self.b <= coord.y && self.t >= coord.y
    }

    /// Whether another box lies entirely inside this one, edges included.
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        self.l <= other.l && self.b <= other.b && self.r >= other.r && self.t >= other.t
    }

    /// Edge-inclusive overlap test.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.l <= other.r && other.l <= self.r && self.b <= other.t && other.b <= self.t
    }

    /// The overlapping region, or `None` when the boxes are disjoint.
    pub fn intersect(&self, other: &BoundingBox) -> Option<BoundingBox> {
        if !self.intersects(other) {
            return None;
        }

        Some(BoundingBox {
            l: self.l.max(other.l),
            b: self.b.max(other.b),
            r: self.r.min(other.r),
            t: self.t.min(other.t),
        })
    }

    /// The smallest box containing both.
    pub fn merge(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            l: self.l.min(other.l),
            b: self.b.min(other.b),
            r: self.r.max(other.r),
            t: self.t.max(other.t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bb(l: i32, b: i32, r: i32, t: i32) -> BoundingBox {
        BoundingBox::new(l, b, r, t).unwrap()
    }

    #[test]
    fn construction_accepts_ordered_bounds() {
        assert!(BoundingBox::new(0, 0, 5, 5).is_ok());
        assert!(BoundingBox::new(-3, -3, -3, -3).is_ok());
    }

    #[test]
    fn construction_rejects_back_to_front() {
        assert!(matches!(
            BoundingBox::new(5, 0, 0, 5),
            Err(GeometryError::InvalidBoundingBox { .. }),
        ));
    }

    #[test]
    fn construction_rejects_upside_down() {
        assert!(matches!(
            BoundingBox::new(0, 5, 5, 0),
            Err(GeometryError::InvalidBoundingBox { .. }),
        ));
    }

    #[test]
    fn contains_is_edge_inclusive() {
        let b = bb(0, 0, 4, 4);
        assert!(b.contains(Coordinate2::new(0, 0)));
        assert!(b.contains(Coordinate2::new(4, 4)));
        assert!(b.contains(Coordinate2::new(2, 3)));
        assert!(!b.contains(Coordinate2::new(5, 2)));
        assert!(!b.contains(Coordinate2::new(2, -1)));
    }

    #[test]
    fn contains_box_requires_full_overlap() {
        let outer = bb(0, 0, 10, 10);
        assert!(outer.contains_box(&bb(2, 2, 8, 8)));
        assert!(outer.contains_box(&outer));
        assert!(!outer.contains_box(&bb(2, 2, 11, 8)));
    }

    #[test]
    fn intersects_is_edge_inclusive() {
        let a = bb(0, 0, 4, 4);
        assert!(a.intersects(&bb(4, 4, 8, 8)));
        assert!(a.intersects(&bb(2, 2, 3, 3)));
        assert!(!a.intersects(&bb(5, 0, 8, 4)));
        assert!(!a.intersects(&bb(0, 5, 4, 8)));
    }

    #[test]
    fn intersects_is_symmetric() {
        let a = bb(0, 0, 4, 4);
        let b = bb(3, 3, 9, 9);
        let c = bb(6, 6, 9, 9);
        assert_eq!(a.intersects(&b), b.intersects(&a));
        assert_eq!(a.intersects(&c), c.intersects(&a));
    }

    #[test]
    fn intersect_is_none_exactly_when_disjoint() {
        let a = bb(0, 0, 4, 4);
        let touching = bb(4, 0, 8, 4);
        let disjoint = bb(5, 0, 8, 4);

        assert_eq!(a.intersect(&touching), Some(bb(4, 0, 4, 4)));
        assert_eq!(a.intersect(&disjoint), None);
        assert!(!a.intersects(&disjoint));
    }

    #[test]
    fn intersect_with_self_is_identity() {
        let a = bb(1, 2, 7, 9);
        assert_eq!(a.intersect(&a), Some(a));
    }

    #[test]
    fn merge_with_self_is_identity() {
        let a = bb(1, 2, 7, 9);
        assert_eq!(a.merge(&a), a);
    }

    #[test]
    fn merge_contains_both_inputs() {
        let a = bb(0, 0, 2, 2);
        let b = bb(5, 7, 9, 8);
        let merged = a.merge(&b);
        assert_eq!(merged, bb(0, 0, 9, 8));
        assert!(merged.contains_box(&a));
        assert!(merged.contains_box(&b));
    }
}
