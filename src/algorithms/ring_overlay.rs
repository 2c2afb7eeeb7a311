/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/
use crate::algorithms::{find_split_points_at_line_intersections, point_in_poly, poly_in_poly};
use crate::structures::{Point2D, Polyline};
use std::collections::HashSet;

const PRECISION: usize = 7;

/// Boolean operation applied by `overlay_rings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayMode {
    Intersect,
    Union,
    Difference,
}

/// Overlays two closed rings, returning the rings of the result polygon.
/// Both inputs must be closed (first vertex equals last vertex). The result
/// may contain zero, one, or several rings depending on how the inputs
/// interact.
pub fn overlay_rings(subject: &Polyline, clip: &Polyline, mode: OverlayMode) -> Vec<Polyline> {
    if subject.len() < 4 || clip.len() < 4 {
        return vec![];
    }

    let mut line1 = subject.clone();
    let mut line2 = clip.clone();
    line1.split_points.clear();
    line2.split_points.clear();
    find_split_points_at_line_intersections(&mut line1, &mut line2);

    if line1.num_splits() == 0 {
        // No crossings; the rings are nested or disjoint.
        return overlay_disjoint(subject, clip, mode);
    }

    let pieces1 = line1.split();
    let pieces2 = line2.split();

    let mut selected: Vec<Polyline> = vec![];
    for piece in &pieces1 {
        let inside = piece_is_inside(piece, &clip.vertices);
        let keep = match mode {
            OverlayMode::Intersect => inside,
            OverlayMode::Union => !inside,
            OverlayMode::Difference => !inside,
        };
        if keep {
            selected.push(piece.clone());
        }
    }
    for piece in &pieces2 {
        let inside = piece_is_inside(piece, &subject.vertices);
        let keep = match mode {
            OverlayMode::Intersect => inside,
            OverlayMode::Union => !inside,
            OverlayMode::Difference => inside,
        };
        if keep && !selected.iter().any(|s| s == piece) {
            selected.push(piece.clone());
        }
    }

    stitch_pieces(selected, subject.id, subject.source)
}

fn overlay_disjoint(subject: &Polyline, clip: &Polyline, mode: OverlayMode) -> Vec<Polyline> {
    let subject_in_clip = poly_in_poly(&subject.vertices, &clip.vertices);
    let clip_in_subject = poly_in_poly(&clip.vertices, &subject.vertices);
    match mode {
        OverlayMode::Intersect => {
            if subject_in_clip {
                vec![subject.clone()]
            } else if clip_in_subject {
                vec![clip.clone()]
            } else {
                vec![]
            }
        }
        OverlayMode::Union => {
            if subject_in_clip {
                vec![clip.clone()]
            } else if clip_in_subject {
                vec![subject.clone()]
            } else {
                vec![subject.clone(), clip.clone()]
            }
        }
        OverlayMode::Difference => {
            if subject_in_clip {
                vec![]
            } else if clip_in_subject {
                // The clip ring punches a hole through the subject.
                vec![subject.clone(), clip.clone()]
            } else {
                vec![subject.clone()]
            }
        }
    }
}

// Classifies a piece by testing the midpoint of its middle segment against
// the other ring. Points exactly on the ring boundary test as outside.
fn piece_is_inside(piece: &Polyline, other_ring: &[Point2D]) -> bool {
    let m = piece.len() / 2;
    let p = Point2D::midpoint(&piece[m - 1], &piece[m]);
    point_in_poly(&p, other_ring)
}

fn endpoint_key(p: &Point2D) -> (i64, i64) {
    let q = p.fix_precision(PRECISION as i32);
    let scale = 10_f64.powi(PRECISION as i32);
    ((q.x * scale).round() as i64, (q.y * scale).round() as i64)
}

// Chains the selected pieces into closed rings by matching endpoints at
// fixed precision. Pieces are reversed as needed during the walk. Open
// chains that cannot be closed are dropped.
fn stitch_pieces(pieces: Vec<Polyline>, id: usize, source: usize) -> Vec<Polyline> {
    let mut used: HashSet<usize> = HashSet::new();
    let mut rings: Vec<Polyline> = vec![];
    for i in 0..pieces.len() {
        if used.contains(&i) {
            continue;
        }
        used.insert(i);
        let mut ring = pieces[i].clone();
        loop {
            if ring.len() > 3 && endpoint_key(&ring.first_vertex()) == endpoint_key(&ring.last_vertex()) {
                break;
            }
            let end_key = endpoint_key(&ring.last_vertex());
            let mut found = false;
            for (j, piece) in pieces.iter().enumerate() {
                if used.contains(&j) {
                    continue;
                }
                if endpoint_key(&piece.first_vertex()) == end_key {
                    used.insert(j);
                    for k in 1..piece.len() {
                        ring.push(piece[k]);
                    }
                    found = true;
                    break;
                } else if endpoint_key(&piece.last_vertex()) == end_key {
                    used.insert(j);
                    for k in (0..piece.len() - 1).rev() {
                        ring.push(piece[k]);
                    }
                    found = true;
                    break;
                }
            }
            if !found {
                break;
            }
        }
        if ring.len() > 3
            && endpoint_key(&ring.first_vertex()) == endpoint_key(&ring.last_vertex())
        {
            ring.close_ring();
            ring.id = id;
            ring.source = source;
            ring.split_points.clear();
            rings.push(ring);
        }
    }
    rings
}

#[cfg(test)]
mod test {
    use super::{overlay_rings, OverlayMode};
    use crate::algorithms::polygon_area;
    use crate::structures::{Point2D, Polyline};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polyline {
        Polyline::new(
            &[
                Point2D::new(x0, y0),
                Point2D::new(x1, y0),
                Point2D::new(x1, y1),
                Point2D::new(x0, y1),
                Point2D::new(x0, y0),
            ],
            0,
        )
    }

    #[test]
    fn test_intersect_overlapping_rectangles() {
        let subject = rect(0.0, 0.0, 10.0, 10.0);
        let clip = rect(5.0, 5.0, 15.0, 15.0);
        let result = overlay_rings(&subject, &clip, OverlayMode::Intersect);
        assert_eq!(result.len(), 1);
        assert!(result[0].is_closed());
        assert!((polygon_area(&result[0].vertices) - 25.0).abs() < 1e-9);
        for p in &result[0].vertices {
            assert!(p.x >= 5.0 - 1e-9 && p.x <= 10.0 + 1e-9);
            assert!(p.y >= 5.0 - 1e-9 && p.y <= 10.0 + 1e-9);
        }
    }

    #[test]
    fn test_union_overlapping_rectangles() {
        let subject = rect(0.0, 0.0, 10.0, 10.0);
        let clip = rect(5.0, 5.0, 15.0, 15.0);
        let result = overlay_rings(&subject, &clip, OverlayMode::Union);
        assert_eq!(result.len(), 1);
        assert!(result[0].is_closed());
        // 100 + 100 - 25
        assert!((polygon_area(&result[0].vertices) - 175.0).abs() < 1e-9);
    }

    #[test]
    fn test_difference_overlapping_rectangles() {
        let subject = rect(0.0, 0.0, 10.0, 10.0);
        let clip = rect(5.0, 5.0, 15.0, 15.0);
        let result = overlay_rings(&subject, &clip, OverlayMode::Difference);
        assert_eq!(result.len(), 1);
        assert!(result[0].is_closed());
        assert!((polygon_area(&result[0].vertices) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_rectangles() {
        let subject = rect(0.0, 0.0, 10.0, 10.0);
        let clip = rect(20.0, 20.0, 30.0, 30.0);
        assert_eq!(
            overlay_rings(&subject, &clip, OverlayMode::Intersect).len(),
            0
        );
        assert_eq!(overlay_rings(&subject, &clip, OverlayMode::Union).len(), 2);
        let diff = overlay_rings(&subject, &clip, OverlayMode::Difference);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0], subject);
    }

    #[test]
    fn test_contained_rectangle() {
        let subject = rect(0.0, 0.0, 10.0, 10.0);
        let clip = rect(2.0, 2.0, 4.0, 4.0);
        let result = overlay_rings(&subject, &clip, OverlayMode::Intersect);
        assert_eq!(result.len(), 1);
        assert!((polygon_area(&result[0].vertices) - 4.0).abs() < 1e-9);

        let union = overlay_rings(&subject, &clip, OverlayMode::Union);
        assert_eq!(union.len(), 1);
        assert!((polygon_area(&union[0].vertices) - 100.0).abs() < 1e-9);
    }
}
