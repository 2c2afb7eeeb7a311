/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/
use super::{BoundingBox, Point2D};

const EPSILON: f64 = f64::EPSILON;

/// A line segment defined by starting and ending points.
#[derive(Default, Copy, Clone, Debug)]
pub struct LineSegment {
    pub p1: Point2D,
    pub p2: Point2D,
}

impl PartialEq for LineSegment {
    fn eq(&self, other: &Self) -> bool {
        (self.p1.nearly_equals(&other.p1) && self.p2.nearly_equals(&other.p2))
            || (self.p1.nearly_equals(&other.p2) && self.p2.nearly_equals(&other.p1))
    }
}

impl LineSegment {
    pub fn new(p1: Point2D, p2: Point2D) -> LineSegment {
        LineSegment { p1, p2 }
    }

    /// Finds intersections between two line segments. Segments can intersect
    /// at points or along coincident intervals. The function returns a line
    /// segment; when the two test segments intersect at a point instead,
    /// output.p1 == output.p2.
    ///
    /// Based on https://en.wikipedia.org/wiki/Line%E2%80%93line_intersection
    pub fn get_intersection(&self, other: &Self) -> Option<LineSegment> {
        if self == other {
            return Some(*self);
        }
        if self.p1 == self.p2 || other.p1 == other.p2 {
            return None;
        }
        let box1 = self.get_bounding_box();
        let box2 = other.get_bounding_box();
        if box1.overlaps(box2) {
            let denom = (self.p1.x - self.p2.x) * (other.p1.y - other.p2.y)
                - (self.p1.y - self.p2.y) * (other.p1.x - other.p2.x);
            if denom != 0f64 {
                let t = ((self.p1.x - other.p1.x) * (other.p1.y - other.p2.y)
                    - (self.p1.y - other.p1.y) * (other.p1.x - other.p2.x))
                    / denom;

                let u = -((self.p1.x - self.p2.x) * (self.p1.y - other.p1.y)
                    - (self.p1.y - self.p2.y) * (self.p1.x - other.p1.x))
                    / denom;

                if (0f64..=1f64).contains(&t) && (0f64..=1f64).contains(&u) {
                    let p = Point2D::new(
                        self.p1.x + t * (self.p2.x - self.p1.x),
                        self.p1.y + t * (self.p2.y - self.p1.y),
                    );
                    return Some(LineSegment::new(p, p));
                }
                return None;
            }

            // are the lines coincident?
            if self.is_point_on_line(other.p1) {
                // what is the coincident interval?
                let contained = [
                    self.p1.is_between(&other.p1, &other.p2),
                    other.p1.is_between(&self.p1, &self.p2),
                    self.p2.is_between(&other.p1, &other.p2),
                    other.p2.is_between(&self.p1, &self.p2),
                ];
                let ends = [self.p1, other.p1, self.p2, other.p2];

                let mut i = 4;
                let mut j = 4;
                for a in 0..4 {
                    if contained[a] {
                        i = a;
                        break;
                    }
                }
                for a in (0..4).rev() {
                    if contained[a] {
                        j = a;
                        break;
                    }
                }
                if i == 4 || j == 4 {
                    return None;
                }
                return Some(LineSegment::new(ends[i], ends[j]));
            }
        }

        // the lines are parallel but not coincident
        None
    }

    pub fn get_bounding_box(&self) -> BoundingBox {
        BoundingBox::from_two_points(self.p1, self.p2)
    }

    /// Checks if a point is on the infinite line passing through the
    /// segment, not on the segment itself.
    fn is_point_on_line(&self, p: Point2D) -> bool {
        let r = (self.p2 - self.p1).cross(p - self.p1);
        r.abs() < EPSILON
    }

    pub fn dist_to_segment_squared(&self, p: Point2D) -> f64 {
        let l2 = self.p1.distance_squared(&self.p2);
        if l2 == 0.0 {
            return p.distance_squared(&self.p1);
        }
        let mut t = ((p.x - self.p1.x) * (self.p2.x - self.p1.x)
            + (p.y - self.p1.y) * (self.p2.y - self.p1.y))
            / l2;
        t = t.clamp(0f64, 1f64);
        p.distance_squared(&Point2D::new(
            self.p1.x + t * (self.p2.x - self.p1.x),
            self.p1.y + t * (self.p2.y - self.p1.y),
        ))
    }

    pub fn dist_to_segment(&self, p: Point2D) -> f64 {
        self.dist_to_segment_squared(p).sqrt()
    }
}

#[cfg(test)]
mod test {
    use super::LineSegment;
    use crate::structures::Point2D;

    #[test]
    fn test_point_intersection() {
        let s1 = LineSegment::new(Point2D::new(0.0, 0.0), Point2D::new(10.0, 10.0));
        let s2 = LineSegment::new(Point2D::new(0.0, 10.0), Point2D::new(10.0, 0.0));
        let ls = s1.get_intersection(&s2).unwrap();
        assert_eq!(ls.p1, Point2D::new(5.0, 5.0));
        assert_eq!(ls.p1, ls.p2);
    }

    #[test]
    fn test_no_intersection() {
        let s1 = LineSegment::new(Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0));
        let s2 = LineSegment::new(Point2D::new(0.0, 1.0), Point2D::new(1.0, 1.0));
        assert!(s1.get_intersection(&s2).is_none());
    }

    #[test]
    fn test_coincident_interval() {
        let s1 = LineSegment::new(Point2D::new(0.0, 0.0), Point2D::new(10.0, 10.0));
        let s2 = LineSegment::new(Point2D::new(5.0, 5.0), Point2D::new(18.0, 18.0));
        let ls = s1.get_intersection(&s2).unwrap();
        assert_eq!(
            ls,
            LineSegment::new(Point2D::new(5.0, 5.0), Point2D::new(10.0, 10.0))
        );
    }

    #[test]
    fn test_dist_to_segment() {
        let s = LineSegment::new(Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0));
        assert_eq!(s.dist_to_segment(Point2D::new(5.0, 3.0)), 3.0);
        assert_eq!(s.dist_to_segment(Point2D::new(-4.0, 0.0)), 4.0);
    }
}
