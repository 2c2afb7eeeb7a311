/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/

// private sub-modules defined in other files
mod error;
mod feature;
mod repository;
mod session;
mod undo;
mod utils;

// exports identifiers from private sub-modules in the current module namespace
pub use self::error::EditError;
pub use self::feature::{Feature, FeatureType, ObjectId};
pub use self::repository::{pick_matches, Repository};
pub use self::session::EditSession;
pub use self::undo::{EditCommand, UndoStack};
pub use self::utils::{
    add_vertex, find_segment, get_lines, move_geometry, move_vertex, remove_vertex, VertexIndex,
};
