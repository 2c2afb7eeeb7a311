/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/
use rstar::primitives::Rectangle;
use rstar::{Envelope, Point, PointDistance, RTreeObject, AABB};

type RectangleF64 = Rectangle<[f64; 2]>;

/// An axis-aligned rectangle carrying a payload, insertable into an rstar
/// R-tree. Overlay operators use it to index dataset records by their
/// bounding boxes, with the record number as payload.
#[derive(Debug)]
pub struct RectangleWithData<T> {
    pub data: T,
    pub rectangle: RectangleF64,
}

impl<T> RectangleWithData<T> {
    pub fn new(data: T, corner1: [f64; 2], corner2: [f64; 2]) -> Self {
        let rectangle = Rectangle::from_corners(corner1, corner2);
        RectangleWithData { data, rectangle }
    }

    /// Returns the nearest point within this rectangle to a given point.
    /// If `query_point` is contained within this rectangle, `query_point`
    /// is returned.
    pub fn nearest_point(&self, query_point: &[f64; 2]) -> [f64; 2] {
        self.rectangle.nearest_point(query_point)
    }
}

impl<T> RTreeObject for RectangleWithData<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.rectangle.envelope()
    }
}

impl<T> PointDistance for RectangleWithData<T> {
    fn distance_2(
        &self,
        point: &<Self::Envelope as Envelope>::Point,
    ) -> <<Self::Envelope as Envelope>::Point as Point>::Scalar {
        self.rectangle.distance_2(point)
    }

    fn contains_point(&self, point: &<Self::Envelope as Envelope>::Point) -> bool {
        self.rectangle.contains_point(point)
    }

    fn distance_2_if_less_or_equal(
        &self,
        point: &<Self::Envelope as Envelope>::Point,
        max_distance_2: <<Self::Envelope as Envelope>::Point as Point>::Scalar,
    ) -> Option<<<Self::Envelope as Envelope>::Point as Point>::Scalar> {
        let distance_2 = self.distance_2(point);
        if distance_2 <= max_distance_2 {
            Some(distance_2)
        } else {
            None
        }
    }
}
