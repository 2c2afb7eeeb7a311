/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT

Vertex-level editing tools. Each operation decomposes the geometry into
its part polylines, edits the targeted line, and rebuilds the geometry so
that its bounding extent stays consistent with the vertices.
*/
use crate::algorithms::point_line_distance;
use crate::edit::EditError;
use crate::structures::{BoundingBox, LineSegment, Point2D, Polyline};
use crate::vector::VectorGeometry;

/// Addresses one vertex within a multi-part geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexIndex {
    pub line: usize,
    pub vertex: usize,
}

/// Returns the geometry's linear parts as polylines. Point and MultiPoint
/// geometries have none.
pub fn get_lines(geometry: &VectorGeometry) -> Vec<Polyline> {
    geometry.to_polylines()
}

/// Scans the geometry's segments in part order and returns the first one
/// that passes through the search envelope. The returned index addresses
/// the segment's start vertex.
pub fn find_segment(geometry: &VectorGeometry, env: &BoundingBox) -> Option<VertexIndex> {
    for (line_num, line) in geometry.to_polylines().iter().enumerate() {
        for i in 0..line.len().saturating_sub(1) {
            let seg = LineSegment::new(line[i], line[i + 1]);
            if env.intersects_segment(&seg) {
                return Some(VertexIndex {
                    line: line_num,
                    vertex: i,
                });
            }
        }
    }
    None
}

// On a closed ring the first and last vertices are the same point stored
// twice; moving either one must move both.
fn is_ring_closure_vertex(line: &Polyline, vertex: usize) -> bool {
    line.is_closed() && (vertex == 0 || vertex == line.len() - 1)
}

/// Moves one vertex to a new position. On closed rings the shared
/// first/last vertex is kept consistent, so the ring stays closed.
pub fn move_vertex(
    geometry: &mut VectorGeometry,
    index: &VertexIndex,
    new_position: Point2D,
) -> Result<(), EditError> {
    if !geometry.shape_type.is_linear() {
        return Err(EditError::UnsupportedGeometry);
    }
    let mut lines = get_lines(geometry);
    let line = lines.get_mut(index.line).ok_or(EditError::InvalidIndex)?;
    if index.vertex >= line.len() {
        return Err(EditError::InvalidIndex);
    }
    if is_ring_closure_vertex(line, index.vertex) {
        let last = line.len() - 1;
        line.vertices[0] = new_position;
        line.vertices[last] = new_position;
    } else {
        line.vertices[index.vertex] = new_position;
    }
    *geometry = VectorGeometry::from_polylines(geometry.shape_type, &lines);
    Ok(())
}

/// Removes one vertex. Closed rings are re-closed after the removal, and
/// the edit is refused when it would leave a ring with fewer than three
/// distinct vertices or an open line with fewer than two.
pub fn remove_vertex(geometry: &mut VectorGeometry, index: &VertexIndex) -> Result<(), EditError> {
    if !geometry.shape_type.is_linear() {
        return Err(EditError::UnsupportedGeometry);
    }
    let mut lines = get_lines(geometry);
    let line = lines.get_mut(index.line).ok_or(EditError::InvalidIndex)?;
    if index.vertex >= line.len() {
        return Err(EditError::InvalidIndex);
    }
    if line.is_closed() {
        if line.len() < 5 {
            return Err(EditError::DegenerateRing);
        }
        if is_ring_closure_vertex(line, index.vertex) {
            let last = line.len() - 1;
            line.remove(last);
            line.remove(0);
            line.close_ring();
        } else {
            line.remove(index.vertex);
        }
    } else {
        if line.len() < 3 {
            return Err(EditError::DegenerateRing);
        }
        line.remove(index.vertex);
    }
    *geometry = VectorGeometry::from_polylines(geometry.shape_type, &lines);
    Ok(())
}

/// Inserts a vertex into the segment nearest the new point among those
/// passing through the search envelope, immediately after the segment's
/// start vertex. Returns the index of the inserted vertex.
pub fn add_vertex(
    geometry: &mut VectorGeometry,
    env: &BoundingBox,
    point: Point2D,
) -> Result<VertexIndex, EditError> {
    if !geometry.shape_type.is_linear() {
        return Err(EditError::UnsupportedGeometry);
    }
    let mut nearest: Option<(VertexIndex, f64)> = None;
    for (line_num, line) in geometry.to_polylines().iter().enumerate() {
        for i in 0..line.len().saturating_sub(1) {
            let seg = LineSegment::new(line[i], line[i + 1]);
            if !env.intersects_segment(&seg) {
                continue;
            }
            let dist = point_line_distance(&point, &line[i], &line[i + 1]);
            if nearest.map_or(true, |(_, d)| dist < d) {
                nearest = Some((
                    VertexIndex {
                        line: line_num,
                        vertex: i,
                    },
                    dist,
                ));
            }
        }
    }
    let (index, _) = nearest.ok_or(EditError::SegmentNotFound)?;
    let mut lines = get_lines(geometry);
    lines[index.line].insert(index.vertex + 1, point);
    *geometry = VectorGeometry::from_polylines(geometry.shape_type, &lines);
    Ok(VertexIndex {
        line: index.line,
        vertex: index.vertex + 1,
    })
}

/// Translates every vertex of the geometry by the given offsets.
pub fn move_geometry(geometry: &mut VectorGeometry, delta_x: f64, delta_y: f64) {
    for p in &mut geometry.points {
        *p = p.translate(delta_x, delta_y);
    }
    geometry.x_min += delta_x;
    geometry.x_max += delta_x;
    geometry.y_min += delta_y;
    geometry.y_max += delta_y;
}

#[cfg(test)]
mod test {
    use super::{add_vertex, find_segment, move_geometry, move_vertex, remove_vertex, VertexIndex};
    use crate::edit::EditError;
    use crate::structures::{BoundingBox, Point2D};
    use crate::vector::{ShapeType, VectorGeometry};

    fn square_polygon() -> VectorGeometry {
        let mut geometry = VectorGeometry::new(ShapeType::Polygon);
        geometry.add_part(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(0.0, 10.0),
            Point2D::new(0.0, 0.0),
        ]);
        geometry
    }

    #[test]
    fn test_move_ring_closure_vertex_keeps_ring_closed() {
        let mut geometry = square_polygon();
        move_vertex(
            &mut geometry,
            &VertexIndex { line: 0, vertex: 0 },
            Point2D::new(-2.0, -2.0),
        )
        .unwrap();
        let lines = geometry.to_polylines();
        assert!(lines[0].is_closed());
        assert_eq!(lines[0].first_vertex(), Point2D::new(-2.0, -2.0));
        assert_eq!(lines[0].last_vertex(), Point2D::new(-2.0, -2.0));
    }

    #[test]
    fn test_move_vertex_invalid_index() {
        let mut geometry = square_polygon();
        assert_eq!(
            move_vertex(
                &mut geometry,
                &VertexIndex { line: 0, vertex: 99 },
                Point2D::new(0.0, 0.0)
            ),
            Err(EditError::InvalidIndex)
        );
        assert_eq!(
            move_vertex(
                &mut geometry,
                &VertexIndex { line: 3, vertex: 0 },
                Point2D::new(0.0, 0.0)
            ),
            Err(EditError::InvalidIndex)
        );
    }

    #[test]
    fn test_remove_closure_vertex_recloses_ring() {
        let mut geometry = square_polygon();
        remove_vertex(&mut geometry, &VertexIndex { line: 0, vertex: 0 }).unwrap();
        let lines = geometry.to_polylines();
        assert_eq!(lines[0].len(), 4);
        assert!(lines[0].is_closed());
        assert_eq!(lines[0].first_vertex(), Point2D::new(10.0, 0.0));
    }

    #[test]
    fn test_remove_vertex_degenerate_ring() {
        let mut geometry = VectorGeometry::new(ShapeType::Polygon);
        geometry.add_part(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(5.0, 8.0),
            Point2D::new(0.0, 0.0),
        ]);
        assert_eq!(
            remove_vertex(&mut geometry, &VertexIndex { line: 0, vertex: 1 }),
            Err(EditError::DegenerateRing)
        );
    }

    #[test]
    fn test_add_vertex_inserts_after_segment_start() {
        let mut geometry = square_polygon();
        let inserted = add_vertex(
            &mut geometry,
            &BoundingBox::around_point(Point2D::new(5.0, 0.0), 0.5),
            Point2D::new(5.0, 0.2),
        )
        .unwrap();
        assert_eq!(inserted, VertexIndex { line: 0, vertex: 1 });
        let lines = geometry.to_polylines();
        assert_eq!(lines[0].len(), 6);
        assert_eq!(lines[0].get(1), Point2D::new(5.0, 0.2));
    }

    #[test]
    fn test_add_vertex_snaps_to_nearest_segment() {
        // the envelope around the corner touches two segments; the new
        // point is much closer to the second one
        let mut geometry = square_polygon();
        let inserted = add_vertex(
            &mut geometry,
            &BoundingBox::around_point(Point2D::new(10.0, 0.0), 1.0),
            Point2D::new(9.9, 0.5),
        )
        .unwrap();
        assert_eq!(inserted, VertexIndex { line: 0, vertex: 2 });
        let lines = geometry.to_polylines();
        assert_eq!(lines[0].get(2), Point2D::new(9.9, 0.5));
    }

    #[test]
    fn test_add_vertex_misses_all_segments() {
        let mut geometry = square_polygon();
        assert_eq!(
            add_vertex(
                &mut geometry,
                &BoundingBox::around_point(Point2D::new(50.0, 50.0), 0.5),
                Point2D::new(50.0, 50.0)
            ),
            Err(EditError::SegmentNotFound)
        );
        assert!(find_segment(&geometry, &BoundingBox::around_point(Point2D::new(50.0, 50.0), 0.5)).is_none());
    }

    #[test]
    fn test_remove_then_add_does_not_restore_original() {
        // a spike vertex well away from the base line
        let mut geometry = VectorGeometry::new(ShapeType::PolyLine);
        geometry.add_part(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(5.0, 5.0),
            Point2D::new(10.0, 0.0),
        ]);
        let original = geometry.clone();
        remove_vertex(&mut geometry, &VertexIndex { line: 0, vertex: 1 }).unwrap();
        // the surviving segment no longer passes anywhere near the old vertex
        let result = add_vertex(
            &mut geometry,
            &BoundingBox::around_point(Point2D::new(5.0, 5.0), 0.5),
            Point2D::new(5.0, 5.0),
        );
        assert_eq!(result, Err(EditError::SegmentNotFound));
        assert_ne!(geometry.points, original.points);
    }

    #[test]
    fn test_move_geometry_translates_bounds() {
        let mut geometry = square_polygon();
        move_geometry(&mut geometry, 100.0, -50.0);
        assert_eq!(geometry.points[0], Point2D::new(100.0, -50.0));
        assert_eq!(geometry.x_min, 100.0);
        assert_eq!(geometry.x_max, 110.0);
        assert_eq!(geometry.y_min, -50.0);
        assert_eq!(geometry.y_max, -40.0);
    }
}
