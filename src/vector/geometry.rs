/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/
use crate::algorithms::{
    find_split_points_at_line_intersections, is_clockwise_order, overlay_rings, point_in_poly,
    OverlayMode,
};
use crate::structures::{BoundingBox, LineSegment, Point2D, Polyline};
use serde::{Deserialize, Serialize};
use std::f64;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VectorGeometry {
    pub shape_type: ShapeType,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub parts: Vec<usize>,
    pub points: Vec<Point2D>,
}

impl VectorGeometry {
    /// VectorGeometry constructor method.
    pub fn new(shape_type: ShapeType) -> VectorGeometry {
        VectorGeometry {
            shape_type,
            ..Default::default()
        }
    }

    pub fn num_parts(&self) -> usize {
        self.parts.len()
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Adds a single Point2D to the VectorGeometry's points array.
    pub fn add_point(&mut self, p: Point2D) {
        if self.parts.is_empty() {
            self.parts.push(0);
        }
        self.points.push(p);
        if p.x < self.x_min {
            self.x_min = p.x;
        }
        if p.x > self.x_max {
            self.x_max = p.x;
        }
        if p.y < self.y_min {
            self.y_min = p.y;
        }
        if p.y > self.y_max {
            self.y_max = p.y;
        }
    }

    /// Adds a part of Point2Ds to the VectorGeometry.
    pub fn add_part(&mut self, points: &[Point2D]) {
        self.parts.push(self.points.len());
        for p in points {
            self.points.push(*p);
            if p.x < self.x_min {
                self.x_min = p.x;
            }
            if p.x > self.x_max {
                self.x_max = p.x;
            }
            if p.y < self.y_min {
                self.y_min = p.y;
            }
            if p.y > self.y_max {
                self.y_max = p.y;
            }
        }
    }

    /// Returns the vertices of the part at `part_num`.
    pub fn get_part(&self, part_num: usize) -> &[Point2D] {
        let st = self.parts[part_num];
        let end = if part_num < self.parts.len() - 1 {
            self.parts[part_num + 1]
        } else {
            self.points.len()
        };
        &self.points[st..end]
    }

    pub fn get_bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.x_min, self.x_max, self.y_min, self.y_max)
    }

    /// Decomposes the geometry into one Polyline per part. Point and
    /// MultiPoint geometries have no linear parts and yield an empty vector.
    pub fn to_polylines(&self) -> Vec<Polyline> {
        match self.shape_type.base_shape_type() {
            ShapeType::PolyLine | ShapeType::Polygon => (0..self.num_parts())
                .map(|part| Polyline::new(self.get_part(part), part))
                .collect(),
            _ => vec![],
        }
    }

    /// Rebuilds a geometry of the given shape type from part polylines,
    /// recomputing the bounding extent from scratch.
    pub fn from_polylines(shape_type: ShapeType, lines: &[Polyline]) -> VectorGeometry {
        let mut geometry = VectorGeometry::new(shape_type);
        for line in lines {
            geometry.add_part(&line.vertices);
        }
        geometry
    }

    /// The arithmetic mean of the geometry's vertices.
    pub fn centroid(&self) -> Point2D {
        if self.points.is_empty() {
            return Point2D::new(0f64, 0f64);
        }
        let mut x = 0f64;
        let mut y = 0f64;
        for p in &self.points {
            x += p.x;
            y += p.y;
        }
        let n = self.points.len() as f64;
        Point2D::new(x / n, y / n)
    }

    /// Tests whether a point falls within the geometry. Only meaningful for
    /// polygons, where hole parts are accounted for by even-odd counting;
    /// for other shape types the test is vertex equality.
    pub fn contains_point(&self, p: &Point2D) -> bool {
        match self.shape_type.base_shape_type() {
            ShapeType::Polygon => {
                let mut containing_parts = 0;
                for part in 0..self.num_parts() {
                    if point_in_poly(p, self.get_part(part)) {
                        containing_parts += 1;
                    }
                }
                containing_parts % 2 == 1
            }
            ShapeType::Point | ShapeType::MultiPoint => {
                self.points.iter().any(|v| v.nearly_equals(p))
            }
            _ => false,
        }
    }

    /// Tests whether any edge of the geometry passes through the box, or any
    /// vertex lies within it.
    pub fn intersects_box(&self, bb: &BoundingBox) -> bool {
        if !self.get_bounding_box().overlaps(*bb) {
            return false;
        }
        for p in &self.points {
            if bb.is_point_in_box(p.x, p.y) {
                return true;
            }
        }
        for part in 0..self.num_parts() {
            let vertices = self.get_part(part);
            for i in 0..vertices.len().saturating_sub(1) {
                if bb.intersects_segment(&LineSegment::new(vertices[i], vertices[i + 1])) {
                    return true;
                }
            }
        }
        false
    }

    /// Computes the geometric intersection of this geometry with a polygon.
    /// The result carries this geometry's shape type, so intersecting a
    /// PolyLine with a Polygon yields the clipped line work. Returns None
    /// when the two geometries don't share any interior, or when the
    /// combination of shape types isn't supported.
    pub fn intersect_with(&self, other: &VectorGeometry) -> Option<VectorGeometry> {
        if other.shape_type.base_shape_type() != ShapeType::Polygon {
            return None;
        }
        if !self.get_bounding_box().overlaps(other.get_bounding_box()) {
            return None;
        }
        match self.shape_type.base_shape_type() {
            ShapeType::Point | ShapeType::MultiPoint => {
                let kept: Vec<Point2D> = self
                    .points
                    .iter()
                    .filter(|p| other.contains_point(p))
                    .cloned()
                    .collect();
                if kept.is_empty() {
                    return None;
                }
                let mut geometry = VectorGeometry::new(self.shape_type);
                for p in kept {
                    geometry.add_point(p);
                }
                Some(geometry)
            }
            ShapeType::PolyLine => {
                let mut out_parts: Vec<Polyline> = vec![];
                for part in self.to_polylines() {
                    let mut line = part;
                    for ring_num in 0..other.num_parts() {
                        let mut ring = Polyline::new(other.get_part(ring_num), ring_num);
                        find_split_points_at_line_intersections(&mut line, &mut ring);
                    }
                    let pieces = if line.num_splits() > 0 {
                        line.split()
                    } else {
                        vec![line]
                    };
                    for piece in pieces {
                        if piece.len() < 2 {
                            continue;
                        }
                        let m = piece.len() / 2;
                        let p = Point2D::midpoint(&piece[m - 1], &piece[m]);
                        if other.contains_point(&p) {
                            out_parts.push(piece);
                        }
                    }
                }
                if out_parts.is_empty() {
                    return None;
                }
                Some(VectorGeometry::from_polylines(self.shape_type, &out_parts))
            }
            ShapeType::Polygon => {
                let mut out_rings: Vec<Polyline> = vec![];
                for part_a in 0..self.num_parts() {
                    if self.num_parts() > 1 && self.is_hole(part_a) {
                        continue;
                    }
                    let ring_a = Polyline::new(self.get_part(part_a), part_a);
                    for part_b in 0..other.num_parts() {
                        if other.num_parts() > 1 && other.is_hole(part_b) {
                            continue;
                        }
                        let ring_b = Polyline::new(other.get_part(part_b), part_b);
                        out_rings.extend(overlay_rings(&ring_a, &ring_b, OverlayMode::Intersect));
                    }
                }
                // carve the interior rings of both inputs out of the result
                for geom in [self, other] {
                    if geom.num_parts() < 2 {
                        continue;
                    }
                    for part in 0..geom.num_parts() {
                        if !geom.is_hole(part) {
                            continue;
                        }
                        let hole = Polyline::new(geom.get_part(part), part);
                        let mut carved: Vec<Polyline> = vec![];
                        for ring in &out_rings {
                            carved.extend(overlay_rings(ring, &hole, OverlayMode::Difference));
                        }
                        out_rings = carved;
                    }
                }
                if out_rings.is_empty() {
                    return None;
                }
                Some(VectorGeometry::from_polylines(self.shape_type, &out_rings))
            }
            _ => None,
        }
    }

    /// Checks whether or not a part in a polygon is a hole.
    /// Holes are parts with vertices in counter-clockwise order.
    pub fn is_hole(&self, part_num: usize) -> bool {
        if self.shape_type.base_shape_type() != ShapeType::Polygon {
            return false;
        }
        if part_num >= self.num_parts() {
            return false;
        }
        !is_clockwise_order(self.get_part(part_num))
    }
}

impl Default for VectorGeometry {
    fn default() -> VectorGeometry {
        VectorGeometry {
            shape_type: ShapeType::Null,
            x_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_min: f64::INFINITY,
            y_max: f64::NEG_INFINITY,
            parts: vec![],
            points: vec![],
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeType {
    Null,
    Point,
    PolyLine,
    Polygon,
    MultiPoint,
}

impl ShapeType {
    pub fn base_shape_type(&self) -> ShapeType {
        *self
    }

    /// Tests whether two records of this shape type can hold a line-based
    /// geometry.
    pub fn is_linear(&self) -> bool {
        matches!(self, ShapeType::PolyLine | ShapeType::Polygon)
    }
}

impl Default for ShapeType {
    fn default() -> ShapeType {
        ShapeType::Null
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match *self {
            ShapeType::Null => "Null",
            ShapeType::Point => "Point",
            ShapeType::PolyLine => "PolyLine",
            ShapeType::Polygon => "Polygon",
            ShapeType::MultiPoint => "MultiPoint",
        };
        write!(f, "{}", printable)
    }
}

#[cfg(test)]
mod test {
    use super::{ShapeType, VectorGeometry};
    use crate::structures::{BoundingBox, Point2D};

    fn square_part(x0: f64, y0: f64, size: f64) -> Vec<Point2D> {
        vec![
            Point2D::new(x0, y0),
            Point2D::new(x0 + size, y0),
            Point2D::new(x0 + size, y0 + size),
            Point2D::new(x0, y0 + size),
            Point2D::new(x0, y0),
        ]
    }

    #[test]
    fn test_multipart_to_polylines_preserves_order() {
        let mut geometry = VectorGeometry::new(ShapeType::Polygon);
        geometry.add_part(&square_part(0.0, 0.0, 5.0));
        geometry.add_part(&square_part(20.0, 0.0, 5.0));
        let lines = geometry.to_polylines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].first_vertex(), Point2D::new(0.0, 0.0));
        assert_eq!(lines[1].first_vertex(), Point2D::new(20.0, 0.0));
        assert!(lines[0].is_closed());
        assert!(lines[1].is_closed());
    }

    #[test]
    fn test_point_geometry_has_no_lines() {
        let mut geometry = VectorGeometry::new(ShapeType::Point);
        geometry.add_point(Point2D::new(3.0, 4.0));
        assert!(geometry.to_polylines().is_empty());
    }

    #[test]
    fn test_contains_point_with_hole() {
        let mut geometry = VectorGeometry::new(ShapeType::Polygon);
        // outer ring in clockwise order, hole in counter-clockwise order
        let mut outer = square_part(0.0, 0.0, 10.0);
        outer.reverse();
        geometry.add_part(&outer);
        geometry.add_part(&square_part(4.0, 4.0, 2.0));
        assert!(geometry.contains_point(&Point2D::new(1.0, 1.0)));
        assert!(!geometry.contains_point(&Point2D::new(5.0, 5.0)));
        assert!(!geometry.contains_point(&Point2D::new(15.0, 5.0)));
    }

    #[test]
    fn test_intersects_box() {
        let mut geometry = VectorGeometry::new(ShapeType::PolyLine);
        geometry.add_part(&[Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0)]);
        assert!(geometry.intersects_box(&BoundingBox::new(4.0, 6.0, -1.0, 1.0)));
        assert!(!geometry.intersects_box(&BoundingBox::new(4.0, 6.0, 2.0, 3.0)));
    }

    #[test]
    fn test_intersect_with_clips_line_to_polygon() {
        let mut line = VectorGeometry::new(ShapeType::PolyLine);
        line.add_part(&[Point2D::new(-5.0, 5.0), Point2D::new(15.0, 5.0)]);
        let mut poly = VectorGeometry::new(ShapeType::Polygon);
        poly.add_part(&square_part(0.0, 0.0, 10.0));
        let clipped = line.intersect_with(&poly).unwrap();
        assert_eq!(clipped.shape_type, ShapeType::PolyLine);
        assert_eq!(clipped.num_parts(), 1);
        assert_eq!(clipped.points.first(), Some(&Point2D::new(0.0, 5.0)));
        assert_eq!(clipped.points.last(), Some(&Point2D::new(10.0, 5.0)));
    }

    #[test]
    fn test_intersect_with_disjoint_polygons_is_none() {
        let mut a = VectorGeometry::new(ShapeType::Polygon);
        a.add_part(&square_part(0.0, 0.0, 5.0));
        let mut b = VectorGeometry::new(ShapeType::Polygon);
        b.add_part(&square_part(20.0, 20.0, 5.0));
        assert!(a.intersect_with(&b).is_none());
    }

    #[test]
    fn test_intersect_with_carves_holes() {
        let mut donut = VectorGeometry::new(ShapeType::Polygon);
        let mut outer = square_part(0.0, 0.0, 10.0);
        outer.reverse(); // clockwise shell
        donut.add_part(&outer);
        donut.add_part(&square_part(4.0, 4.0, 2.0)); // counter-clockwise hole
        let mut other = VectorGeometry::new(ShapeType::Polygon);
        other.add_part(&square_part(3.0, 3.0, 4.0));

        let result = donut.intersect_with(&other).unwrap();
        assert_eq!(result.num_parts(), 2);
        assert!(result.contains_point(&Point2D::new(3.5, 3.5)));
        // the hole region is not part of the intersection
        assert!(!result.contains_point(&Point2D::new(5.0, 5.0)));
    }

    #[test]
    fn test_is_hole() {
        let mut geometry = VectorGeometry::new(ShapeType::Polygon);
        let mut outer = square_part(0.0, 0.0, 10.0);
        outer.reverse(); // clockwise shell
        geometry.add_part(&outer);
        geometry.add_part(&square_part(4.0, 4.0, 2.0)); // counter-clockwise hole
        assert!(!geometry.is_hole(0));
        assert!(geometry.is_hole(1));
    }
}
