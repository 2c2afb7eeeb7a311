/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/
use super::{LineSegment, Point2D};

/// An axis-aligned 2-D bounding rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for BoundingBox {
    fn default() -> BoundingBox {
        BoundingBox {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }
}

impl BoundingBox {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> BoundingBox {
        let (x1, x2) = if min_x < max_x {
            (min_x, max_x)
        } else {
            (max_x, min_x)
        };
        let (y1, y2) = if min_y < max_y {
            (min_y, max_y)
        } else {
            (max_y, min_y)
        };
        BoundingBox {
            min_x: x1,
            min_y: y1,
            max_x: x2,
            max_y: y2,
        }
    }

    pub fn from_points(points: &[Point2D]) -> BoundingBox {
        let mut bb = BoundingBox::default();
        for p in points {
            if p.x < bb.min_x {
                bb.min_x = p.x;
            }
            if p.x > bb.max_x {
                bb.max_x = p.x;
            }
            if p.y < bb.min_y {
                bb.min_y = p.y;
            }
            if p.y > bb.max_y {
                bb.max_y = p.y;
            }
        }
        bb
    }

    pub fn from_two_points(p1: Point2D, p2: Point2D) -> BoundingBox {
        BoundingBox::new(p1.x, p2.x, p1.y, p2.y)
    }

    /// A degenerate box around a single point expanded by half-width `delta`.
    /// Used to turn a picked coordinate into a small query region.
    pub fn around_point(p: Point2D, delta: f64) -> BoundingBox {
        BoundingBox::new(p.x - delta, p.x + delta, p.y - delta, p.y + delta)
    }

    pub fn get_width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn get_height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn get_centre(&self) -> Point2D {
        Point2D::new(
            (self.min_x + self.max_x) / 2f64,
            (self.min_y + self.max_y) / 2f64,
        )
    }

    pub fn overlaps(&self, other: BoundingBox) -> bool {
        !(self.max_y < other.min_y
            || self.max_x < other.min_x
            || self.min_y > other.max_y
            || self.min_x > other.max_x)
    }

    pub fn within(&self, other: BoundingBox) -> bool {
        self.max_y <= other.max_y
            && self.max_x <= other.max_x
            && self.min_y >= other.min_y
            && self.min_x >= other.min_x
    }

    pub fn contains(&self, other: BoundingBox) -> bool {
        other.within(*self)
    }

    pub fn intersect(&self, other: BoundingBox) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        }
    }

    pub fn is_point_in_box(&self, x: f64, y: f64) -> bool {
        !(self.max_y < y || self.max_x < x || self.min_y > y || self.min_x > x)
    }

    /// Tests whether a line segment touches or crosses the box. True when
    /// either endpoint is inside, or when the segment crosses any box edge.
    pub fn intersects_segment(&self, seg: &LineSegment) -> bool {
        if self.is_point_in_box(seg.p1.x, seg.p1.y) || self.is_point_in_box(seg.p2.x, seg.p2.y) {
            return true;
        }
        let corners = [
            Point2D::new(self.min_x, self.min_y),
            Point2D::new(self.max_x, self.min_y),
            Point2D::new(self.max_x, self.max_y),
            Point2D::new(self.min_x, self.max_y),
        ];
        for a in 0..4 {
            let edge = LineSegment::new(corners[a], corners[(a + 1) % 4]);
            if seg.get_intersection(&edge).is_some() {
                return true;
            }
        }
        false
    }

    pub fn expand_to(&mut self, other: BoundingBox) {
        self.max_y = self.max_y.max(other.max_y);
        self.max_x = self.max_x.max(other.max_x);
        self.min_y = self.min_y.min(other.min_y);
        self.min_x = self.min_x.min(other.min_x);
    }
}
