/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/

// private sub-modules defined in other files
mod bounding_box;
mod line_segment;
mod point2d;
mod polyline;
mod rectangle_with_data;

// exports identifiers from private sub-modules in the current module namespace
pub use self::bounding_box::BoundingBox;
pub use self::line_segment::LineSegment;
pub use self::point2d::Point2D;
pub use self::polyline::Polyline;
pub use self::rectangle_with_data::RectangleWithData;
