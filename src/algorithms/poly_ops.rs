/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/
use super::do_polylines_intersect;
use crate::structures::{Point2D, Polyline};

const EPSILON: f64 = f64::EPSILON;

/// Tests whether a point is within a polygon using the winding number (wn).
/// Notice that points on the edge of the poly will be deemed outside.
/// Input:   p = a point,
///          poly[] = vertex points of a polygon v[n+1] with v[n]=v[0]
pub fn point_in_poly(p: &Point2D, poly: &[Point2D]) -> bool {
    winding_number(p, poly) % 2 != 0i32
}

/// Calculates the winding number (wn) of a point with respect to a polygon.
/// The point falls within the test polygon if the winding number is
/// non-zero.
///
/// Input:   p = a point,
///          poly[] = vertex points of a polygon poly[n+1] with poly[n]=poly[0]
pub fn winding_number(p: &Point2D, poly: &[Point2D]) -> i32 {
    if !poly[0].nearly_equals(&poly[poly.len() - 1]) {
        panic!("Error (from poly_ops::winding_number): point sequence does not form a closed polygon.");
    }
    let mut wn = 0i32;
    // loop through all edges of the polygon
    for i in 0..poly.len() - 1 {
        // edge from poly[i] to poly[i+1]
        if poly[i].y <= p.y {
            if poly[i + 1].y > p.y {
                // an upward crossing
                if p.is_left(&poly[i], &poly[i + 1]) > 0f64 {
                    wn += 1i32;
                }
            }
        } else {
            if poly[i + 1].y <= p.y {
                // a downward crossing
                if p.is_left(&poly[i], &poly[i + 1]) < 0f64 {
                    wn -= 1i32;
                }
            }
        }
    }
    wn
}

/// Returns a point guaranteed to lie in the interior of a closed polygon.
pub fn interior_point(poly: &[Point2D]) -> Point2D {
    if !poly[0].nearly_equals(&poly[poly.len() - 1]) {
        panic!("Error (from poly_ops::interior_point): point sequence does not form a closed polygon.");
    }
    let num_points = poly.len();
    if num_points > 4 {
        for a in 1..num_points - 1 {
            if poly[a].is_left(&poly[a - 1], &poly[a + 1]).abs() > EPSILON {
                // it's not co-linear
                let midpoint = Point2D::midpoint(&poly[a - 1], &poly[a + 1]);
                if point_in_poly(&midpoint, poly) {
                    return midpoint;
                }
            }
        }
        // none of the tested points were interior; return an edge point
        poly[0]
    } else {
        // it's a triangle; return the centroid
        Point2D::new(
            (poly[0].x + poly[1].x + poly[2].x) / 3f64,
            (poly[0].y + poly[1].y + poly[2].y) / 3f64,
        )
    }
}

/// Tests whether one polygon is contained within another polygon. For
/// polygons not contained within the test poly, failure occurs very
/// quickly, usually from the first tested vertex.
pub fn poly_in_poly(contained_poly: &[Point2D], containing_poly: &[Point2D]) -> bool {
    if !point_in_poly(&interior_point(contained_poly), containing_poly) {
        return false;
    }
    for p in contained_poly {
        if !point_in_poly(p, containing_poly) {
            return false;
        }
    }
    true
}

/// Tests whether one polygon overlaps another polygon.
pub fn poly_overlaps_poly(poly1: &[Point2D], poly2: &[Point2D]) -> bool {
    for p in poly1 {
        if point_in_poly(p, poly2) {
            return true;
        }
    }
    if poly_in_poly(poly1, poly2) || poly_in_poly(poly2, poly1) {
        return true;
    }
    if point_in_poly(&interior_point(poly1), poly2) {
        return true;
    }
    if point_in_poly(&interior_point(poly2), poly1) {
        return true;
    }
    if do_polylines_intersect(&Polyline::new(poly1, 0), &Polyline::new(poly2, 0)) {
        return true;
    }
    false
}

/// Calculates the area of a polygon defined by a series of vertices.
pub fn polygon_area(vertices: &[Point2D]) -> f64 {
    let num_vertices = vertices.len();
    let mut area = 0f64;
    for i in 0..num_vertices - 1 {
        area += vertices[i].x * vertices[i + 1].y - vertices[i + 1].x * vertices[i].y;
    }
    area +=
        vertices[num_vertices - 1].x * vertices[0].y - vertices[0].x * vertices[num_vertices - 1].y;
    area.abs() / 2.0f64
}

/// Checks whether a sequence of Point2Ds are in clockwise order.
///
/// This approach is based on the method described by Paul Bourke, March 1998
/// http://paulbourke.net/geometry/clockwise/index.html
pub fn is_clockwise_order(points: &[Point2D]) -> bool {
    let end_point = if points[0] == points[points.len() - 1] {
        // the last point repeats the first; it's not a legitimate point
        points.len() - 2
    } else {
        points.len() - 1
    };

    let num_points = end_point + 1;
    if num_points < 3 {
        return false;
    }

    // signed shoelace area: negative means clockwise
    let mut area = 0f64;
    for j in 0..num_points {
        let n1 = j;
        let n2 = if j < num_points - 1 { j + 1 } else { 0 };
        area += points[n1].x * points[n2].y - points[n2].x * points[n1].y;
    }
    area / 2.0 < 0f64
}
