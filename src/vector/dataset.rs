/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/
use crate::structures::BoundingBox;
use crate::vector::{AttributeTable, ShapeType, VectorGeometry};
use serde::{Deserialize, Serialize};
use std::io::{Error, ErrorKind};

/// An in-memory vector dataset: a homogeneous collection of geometry
/// records, an attribute table with one row per record, and a spatial
/// reference identifier.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct VectorDataset {
    pub name: String,
    pub shape_type: ShapeType,
    pub srid: i32,
    pub records: Vec<VectorGeometry>,
    pub attributes: AttributeTable,
}

impl VectorDataset {
    pub fn new(name: &str, shape_type: ShapeType, srid: i32) -> VectorDataset {
        VectorDataset {
            name: name.to_string(),
            shape_type,
            srid,
            records: vec![],
            attributes: AttributeTable::default(),
        }
    }

    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    /// Adds a geometry record. The geometry's shape type must match the
    /// dataset's.
    pub fn add_record(&mut self, geometry: VectorGeometry) -> Result<(), Error> {
        if geometry.shape_type != self.shape_type {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!(
                    "Attempted to add a {} record to a {} dataset.",
                    geometry.shape_type, self.shape_type
                ),
            ));
        }
        self.records.push(geometry);
        Ok(())
    }

    pub fn get_record(&self, index: usize) -> &VectorGeometry {
        &self.records[index]
    }

    /// The extent of all records in the dataset.
    pub fn get_total_bounds(&self) -> BoundingBox {
        let mut bb = BoundingBox::default();
        for record in &self.records {
            bb.expand_to(record.get_bounding_box());
        }
        bb
    }
}

#[cfg(test)]
mod test {
    use super::VectorDataset;
    use crate::structures::Point2D;
    use crate::vector::{ShapeType, VectorGeometry};

    #[test]
    fn test_add_record_rejects_shape_mismatch() {
        let mut ds = VectorDataset::new("ds", ShapeType::Polygon, 4326);
        let mut geometry = VectorGeometry::new(ShapeType::Point);
        geometry.add_point(Point2D::new(1.0, 2.0));
        assert!(ds.add_record(geometry).is_err());
        assert_eq!(ds.num_records(), 0);
    }

    #[test]
    fn test_total_bounds() {
        let mut ds = VectorDataset::new("ds", ShapeType::Point, 4326);
        let mut g1 = VectorGeometry::new(ShapeType::Point);
        g1.add_point(Point2D::new(-5.0, 2.0));
        let mut g2 = VectorGeometry::new(ShapeType::Point);
        g2.add_point(Point2D::new(7.0, 12.0));
        ds.add_record(g1).unwrap();
        ds.add_record(g2).unwrap();
        let bb = ds.get_total_bounds();
        assert_eq!(bb.min_x, -5.0);
        assert_eq!(bb.max_y, 12.0);
    }
}
