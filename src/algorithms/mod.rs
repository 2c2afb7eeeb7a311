/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/
// private sub-modules defined in other files
mod line_ops;
mod poly_ops;
mod ring_overlay;

// exports identifiers from private sub-modules in the current module namespace
pub use self::line_ops::{
    do_polylines_intersect, find_line_intersections, find_split_points_at_line_intersections,
    point_line_distance,
};
pub use self::poly_ops::{
    interior_point, is_clockwise_order, point_in_poly, poly_in_poly, poly_overlaps_poly,
    polygon_area, winding_number,
};
pub use self::ring_overlay::{overlay_rings, OverlayMode};
