/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/
use std::fmt;
use std::io;

/// Errors reported by geometry editing operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// A line or vertex index fell outside the geometry being edited.
    InvalidIndex,
    /// Removing the vertex would leave the line with too few vertices to
    /// remain valid.
    DegenerateRing,
    /// The operation doesn't apply to the geometry's shape type.
    UnsupportedGeometry,
    /// No segment of the geometry passes through the search envelope.
    SegmentNotFound,
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EditError::InvalidIndex => write!(f, "Line or vertex index is out of range."),
            EditError::DegenerateRing => {
                write!(f, "The edit would leave too few vertices for a valid line.")
            }
            EditError::UnsupportedGeometry => {
                write!(f, "The operation is not supported for this geometry type.")
            }
            EditError::SegmentNotFound => {
                write!(f, "No line segment intersects the search envelope.")
            }
        }
    }
}

impl std::error::Error for EditError {}

impl From<EditError> for io::Error {
    fn from(e: EditError) -> io::Error {
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    }
}
