/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/
use super::{BoundingBox, Point2D};
use std::ops::Index;

/// An ordered run of vertices, used both for open polylines and for
/// polygon rings (closed; first vertex repeated as the last).
///
/// `id` carries the record number the line was extracted from and `source`
/// distinguishes the dataset of origin during overlay operations. Split
/// points can be inserted along the line and later used to break it into
/// multiple new lines.
#[derive(Default, Clone, Debug)]
pub struct Polyline {
    pub vertices: Vec<Point2D>,
    pub id: usize,
    pub source: usize,
    pub split_points: Vec<(f64, Point2D)>,
}

impl Index<usize> for Polyline {
    type Output = Point2D;

    fn index(&self, index: usize) -> &Point2D {
        &self.vertices[index]
    }
}

impl PartialEq for Polyline {
    fn eq(&self, other: &Self) -> bool {
        // Equality is based on vertex coordinates only; id, source and
        // split points don't impact equality. A line and its reverse are
        // considered equal, which is what duplicate detection needs.
        if self.len() != other.len() {
            return false;
        }
        let forward = (0..self.len()).all(|p| self[p] == other[p]);
        if forward {
            return true;
        }
        (0..self.len()).all(|p| self[p] == other[other.len() - 1 - p])
    }
}

impl Polyline {
    /// Creates a new Polyline from vertices.
    pub fn new(vertices: &[Point2D], id: usize) -> Polyline {
        Polyline {
            vertices: vertices.to_vec(),
            id,
            source: 0,
            split_points: vec![],
        }
    }

    /// Creates a new empty Polyline.
    pub fn new_empty(id: usize) -> Polyline {
        Polyline {
            vertices: vec![],
            id,
            source: 0,
            split_points: vec![],
        }
    }

    /// Returns the number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn num_splits(&self) -> usize {
        self.split_points.len()
    }

    pub fn get(&self, index: usize) -> Point2D {
        self.vertices[index]
    }

    pub fn first_vertex(&self) -> Point2D {
        self.vertices[0]
    }

    pub fn last_vertex(&self) -> Point2D {
        self.vertices[self.vertices.len() - 1]
    }

    /// A ring is closed when its first and last vertices coincide.
    pub fn is_closed(&self) -> bool {
        self.len() > 1 && self.first_vertex() == self.last_vertex()
    }

    /// Closes the line by pushing a duplicate of the first vertex.
    pub fn close_ring(&mut self) {
        if !self.is_closed() {
            let v = self.first_vertex();
            self.vertices.push(v);
        }
    }

    /// Returns the geometric length of the line.
    pub fn length(&self) -> f64 {
        let mut ret = 0f64;
        for a in 0..self.len() - 1 {
            ret += self[a].distance(&self[a + 1]);
        }
        ret
    }

    /// Inserts a point vertex at the end of the line.
    pub fn push(&mut self, v: Point2D) {
        self.vertices.push(v);
    }

    /// Inserts a point vertex at a specific index.
    pub fn insert(&mut self, index: usize, v: Point2D) {
        if index <= self.len() {
            self.vertices.insert(index, v);
        }
    }

    /// Removes a point vertex at a specified index.
    pub fn remove(&mut self, index: usize) {
        if index < self.len() {
            self.vertices.remove(index);
        }
    }

    /// Inserts a split point into the polyline, to eventually break the
    /// original polyline into new lines. `position` is a floating point
    /// value representing the position along the polyline: 3.5 means
    /// halfway along the segment connecting vertex 3 and vertex 4; an
    /// integer value splits exactly at that vertex.
    ///
    /// Split points cannot be inserted at line endpoints.
    pub fn insert_split_point(&mut self, position: f64, point: Point2D) {
        if position > 0f64 && position < (self.len() - 1) as f64 {
            self.split_points.push((position, point));
        }
    }

    /// Breaks the line into sub-lines at the inserted split points. When no
    /// split points exist, returns a single copy of the whole line.
    pub fn split(&mut self) -> Vec<Polyline> {
        self.split_points
            .sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

        // duplicate detections of the same crossing collapse to one
        self.split_points
            .dedup_by(|a, b| (a.0 - b.0).abs() < 1e-9 && a.1.nearly_equals(&b.1));

        let mut ret: Vec<Polyline> = Vec::with_capacity(self.num_splits() + 1);
        if self.num_splits() == 0 {
            let mut pl = Polyline::new(&self.vertices, self.id);
            pl.source = self.source;
            ret.push(pl);
            return ret;
        }

        let mut line: Vec<Point2D> = vec![self.vertices[0]];
        let mut s = 0;
        for i in 0..self.len() - 1 {
            while s < self.num_splits() && self.split_points[s].0 < (i + 1) as f64 {
                let (pos, p) = self.split_points[s];
                if pos > i as f64 {
                    // strictly within the segment (i, i+1)
                    line.push(p);
                    ret.push(self.sub_line(&line));
                    line = vec![p];
                } else if line.len() > 1 {
                    // split exactly at vertex i
                    ret.push(self.sub_line(&line));
                    line = vec![self.vertices[i]];
                }
                s += 1;
            }
            line.push(self.vertices[i + 1]);
        }
        ret.push(self.sub_line(&line));
        ret
    }

    fn sub_line(&self, vertices: &[Point2D]) -> Polyline {
        let mut pl = Polyline::new(vertices, self.id);
        pl.source = self.source;
        pl
    }

    pub fn get_bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.vertices)
    }

    pub fn nearly_equals(&self, other: &Self, precision: f64) -> bool {
        let prec = precision * precision;
        if self.len() != other.len() {
            return false;
        }
        // lines are considered equal even when reversed in order
        let (starting_point_same, reversed) = if self[0].distance_squared(&other[0]) <= prec {
            (true, false)
        } else if self[0].distance_squared(&other[other.len() - 1]) <= prec {
            (true, true)
        } else {
            (false, false)
        };
        if !starting_point_same {
            return false;
        }
        if !reversed {
            (1..self.len()).all(|p| self[p].distance_squared(&other[p]) <= prec)
        } else {
            (1..self.len()).all(|p| self[p].distance_squared(&other[other.len() - 1 - p]) <= prec)
        }
    }
}
