/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/
use crate::structures::{BoundingBox, LineSegment, Point2D, Polyline};

/// Perpendicular distance from a point to a line.
pub fn point_line_distance(point: &Point2D, start: &Point2D, end: &Point2D) -> f64 {
    if start == end {
        return point.distance(start);
    }
    let numerator = ((end.x - start.x) * (start.y - point.y)
        - (start.x - point.x) * (end.y - start.y))
        .abs();
    let denominator = start.distance(end);
    numerator / denominator
}

/// Finds all intersections between two vertex sequences. Intersections can
/// be points or coincident intervals; point results have p1 == p2.
pub fn find_line_intersections(line1: &[Point2D], line2: &[Point2D]) -> Vec<LineSegment> {
    let mut ret: Vec<LineSegment> = vec![];
    let box1 = BoundingBox::from_points(line1);
    let box2 = BoundingBox::from_points(line2);
    if box1.overlaps(box2) {
        let mut ls1: LineSegment;
        let mut ls2: LineSegment;
        for a in 0..line1.len() - 1 {
            ls1 = LineSegment::new(line1[a], line1[a + 1]);
            for b in 0..line2.len() - 1 {
                ls2 = LineSegment::new(line2[b], line2[b + 1]);
                if let Some(p) = ls1.get_intersection(&ls2) {
                    ret.push(p);
                }
            }
        }
    }
    ret
}

/// Tests whether two polylines share at least one intersection point.
pub fn do_polylines_intersect(line1: &Polyline, line2: &Polyline) -> bool {
    let box1 = line1.get_bounding_box();
    let box2 = line2.get_bounding_box();
    if box1.overlaps(box2) {
        let mut ls1: LineSegment;
        let mut ls2: LineSegment;
        for a in 0..line1.len() - 1 {
            ls1 = LineSegment::new(line1[a], line1[a + 1]);
            for b in 0..line2.len() - 1 {
                ls2 = LineSegment::new(line2[b], line2[b + 1]);
                if ls1.get_intersection(&ls2).is_some() {
                    return true;
                }
            }
        }
    }
    false
}

/// Finds the mutual crossing points of two polylines and registers them as
/// split points on both lines.
pub fn find_split_points_at_line_intersections(line1: &mut Polyline, line2: &mut Polyline) {
    let box1 = line1.get_bounding_box();
    let box2 = line2.get_bounding_box();
    if box1.overlaps(box2) {
        let mut ls1: LineSegment;
        let mut ls2: LineSegment;
        for a in 0..line1.len() - 1 {
            ls1 = LineSegment::new(line1[a], line1[a + 1]);
            for b in 0..line2.len() - 1 {
                ls2 = LineSegment::new(line2[b], line2[b + 1]);
                if let Some(ls) = ls1.get_intersection(&ls2) {
                    line1.insert_split_point(
                        a as f64 + ls.p1.distance_squared(&ls1.p1) / ls1.p2.distance_squared(&ls1.p1),
                        ls.p1,
                    );
                    line2.insert_split_point(
                        b as f64 + ls.p1.distance_squared(&ls2.p1) / ls2.p2.distance_squared(&ls2.p1),
                        ls.p1,
                    );
                    if ls.p1 != ls.p2 {
                        line1.insert_split_point(
                            a as f64
                                + ls.p2.distance_squared(&ls1.p1) / ls1.p2.distance_squared(&ls1.p1),
                            ls.p2,
                        );
                        line2.insert_split_point(
                            b as f64
                                + ls.p2.distance_squared(&ls2.p1) / ls2.p2.distance_squared(&ls2.p1),
                            ls.p2,
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::{find_line_intersections, find_split_points_at_line_intersections};
    use crate::structures::{LineSegment, Point2D, Polyline};

    #[test]
    fn test_find_line_intersections() {
        let line1 = vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(12.0, 6.0),
            Point2D::new(6.0, 0.0),
        ];
        let line2 = vec![
            Point2D::new(-1.0, 5.0),
            Point2D::new(6.0, 5.0),
            Point2D::new(6.0, 2.0),
            Point2D::new(12.0, 2.0),
        ];

        let intersections = find_line_intersections(&line1, &line2);
        let should_be = vec![
            LineSegment::new(Point2D::new(5.0, 5.0), Point2D::new(5.0, 5.0)),
            LineSegment::new(Point2D::new(8.0, 2.0), Point2D::new(8.0, 2.0)),
        ];
        assert_eq!(intersections, should_be);
    }

    #[test]
    fn test_no_line_intersections() {
        let line1 = vec![Point2D::new(0.0, 0.0), Point2D::new(10.0, 10.0)];
        let line2 = vec![Point2D::new(-1.0, -5.0), Point2D::new(-6.0, -5.0)];
        assert_eq!(find_line_intersections(&line1, &line2).len(), 0);
    }

    #[test]
    fn test_split_points_inserted_on_both_lines() {
        let mut line1 = Polyline::new(&[Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0)], 0);
        let mut line2 = Polyline::new(&[Point2D::new(5.0, -5.0), Point2D::new(5.0, 5.0)], 0);
        find_split_points_at_line_intersections(&mut line1, &mut line2);
        assert_eq!(line1.num_splits(), 1);
        assert_eq!(line2.num_splits(), 1);
        assert_eq!(line1.split_points[0].1, Point2D::new(5.0, 0.0));
    }
}
