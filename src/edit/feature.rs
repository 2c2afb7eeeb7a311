/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/
use crate::structures::Point2D;
use crate::vector::{FieldData, VectorGeometry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How a staged feature relates to the stored dataset when the session is
/// committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    /// The feature is being edited and must not be drawn or committed yet.
    BlockEdit,
    /// A new feature, absent from the stored dataset.
    Add,
    /// An existing feature whose geometry or attributes changed.
    Update,
    /// An existing feature marked for removal.
    Delete,
}

/// Identifies a feature within its source dataset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn new(id: &str) -> ObjectId {
        ObjectId(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A staged edit: a copy of one feature with its pending geometry, changed
/// attribute values, and the kind of change it represents. Cloning a
/// Feature deep-copies the geometry and attribute values, so two staged
/// copies never alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: ObjectId,
    pub geometry: VectorGeometry,
    pub feature_type: FeatureType,
    /// Changed attribute values keyed by field index. Fields absent from
    /// the map keep their stored values on commit.
    pub data: BTreeMap<usize, FieldData>,
    /// Coordinates accumulated while the feature is still being digitized.
    pub coords: Vec<Point2D>,
    pub fill_color: Option<[u8; 4]>,
    pub contour_color: Option<[u8; 4]>,
    pub color_changed: bool,
}

impl Feature {
    pub fn new(id: ObjectId, geometry: VectorGeometry, feature_type: FeatureType) -> Feature {
        Feature {
            id,
            geometry,
            feature_type,
            data: BTreeMap::new(),
            coords: vec![],
            fill_color: None,
            contour_color: None,
            color_changed: false,
        }
    }

    pub fn set_value(&mut self, field_index: usize, value: FieldData) {
        self.data.insert(field_index, value);
    }

    pub fn set_colors(&mut self, fill: Option<[u8; 4]>, contour: Option<[u8; 4]>) {
        self.fill_color = fill;
        self.contour_color = contour;
        self.color_changed = true;
    }
}
