/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/
use crate::overlay::{
    check_intersection_shape_types, check_matching_srids, lock_source, validate_overlay_params,
    OverlayOp,
};
use crate::structures::RectangleWithData;
use crate::utils::get_formatted_elapsed_time;
use crate::vector::{
    merge_field_schemas, AttributeTable, DataSourcePtr, VectorDataset, VectorGeometry,
};
use rstar::{RTree, AABB};
use std::io::{Error, ErrorKind};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Computes the pairwise intersection of two datasets in process memory.
/// Records of the first dataset are matched against the second through an
/// R-tree over the second dataset's record bounds, and the candidate pairs
/// are intersected on worker threads. The output carries the first
/// dataset's shape type and the merged, prefixed attribute schema of both
/// inputs.
pub struct IntersectionMemory {
    input_source: DataSourcePtr,
    first: String,
    second: String,
    output_source: DataSourcePtr,
    output_name: String,
}

impl IntersectionMemory {
    pub fn new(
        input_source: DataSourcePtr,
        first: &str,
        second: &str,
        output_source: DataSourcePtr,
        output_name: &str,
    ) -> IntersectionMemory {
        IntersectionMemory {
            input_source,
            first: first.to_string(),
            second: second.to_string(),
            output_source,
            output_name: output_name.to_string(),
        }
    }
}

impl OverlayOp for IntersectionMemory {
    fn validate(&self) -> Result<(), Error> {
        validate_overlay_params(
            &self.input_source,
            &[&self.first, &self.second],
            &self.output_source,
            &self.output_name,
        )?;
        let guard = lock_source(&self.input_source)?;
        let input1 = guard.get_dataset(&self.first)?;
        let input2 = guard.get_dataset(&self.second)?;
        check_matching_srids(input1.srid, input2.srid)?;
        check_intersection_shape_types(input1.shape_type, input2.shape_type)
    }

    fn run(&mut self, verbose: bool) -> Result<(), Error> {
        self.validate()?;

        let start = Instant::now();
        let mut progress: usize;
        let mut old_progress: usize = 1;

        if verbose {
            println!("Reading data...")
        };
        let (input1, input2) = {
            let guard = lock_source(&self.input_source)?;
            (
                Arc::new(guard.get_dataset(&self.first)?),
                Arc::new(guard.get_dataset(&self.second)?),
            )
        };
        let num_records1 = input1.num_records();

        let mut output =
            VectorDataset::new(&self.output_name, input1.shape_type, input1.srid);
        output.attributes = AttributeTable::new(merge_field_schemas(&input1, &input2));

        // index the second dataset's records by their bounding boxes
        let mut record_aabb = Vec::with_capacity(input2.num_records());
        for record_num in 0..input2.num_records() {
            let record = input2.get_record(record_num);
            record_aabb.push(RectangleWithData::new(
                record_num,
                [record.x_min, record.y_min],
                [record.x_max, record.y_max],
            ));
        }
        let tree = Arc::new(RTree::bulk_load(record_aabb));

        let num_procs = num_cpus::get();
        let (tx, rx) = mpsc::channel();
        for tid in 0..num_procs {
            let input1 = input1.clone();
            let input2 = input2.clone();
            let tree = tree.clone();
            let tx = tx.clone();
            thread::spawn(move || {
                for record_num in (0..num_records1).filter(|r| r % num_procs == tid) {
                    let record = input1.get_record(record_num);
                    let mut hits: Vec<(usize, VectorGeometry)> = vec![];
                    let envelope =
                        AABB::from_corners([record.x_min, record.y_min], [record.x_max, record.y_max]);
                    for candidate in tree.locate_in_envelope_intersecting(&envelope) {
                        if let Some(geometry) =
                            record.intersect_with(input2.get_record(candidate.data))
                        {
                            hits.push((candidate.data, geometry));
                        }
                    }
                    tx.send((record_num, hits)).unwrap();
                }
            });
        }
        // hold no sender on this thread, so a dead worker closes the
        // channel instead of stalling the collection loop
        drop(tx);

        // collect per-record results, keeping the first dataset's record
        // order in the output
        let mut results: Vec<Vec<(usize, VectorGeometry)>> = vec![vec![]; num_records1];
        for r in 0..num_records1 {
            let (record_num, hits) = rx.recv().map_err(|_| {
                Error::new(
                    ErrorKind::Other,
                    "An intersection worker stopped before finishing its records.",
                )
            })?;
            results[record_num] = hits;
            if verbose {
                progress = (100.0_f64 * (r + 1) as f64 / num_records1 as f64) as usize;
                if progress != old_progress {
                    println!("Progress: {}%", progress);
                    old_progress = progress;
                }
            }
        }

        for record_num in 0..num_records1 {
            for (other_num, geometry) in results[record_num].drain(..) {
                output.add_record(geometry)?;
                let mut rec = input1.attributes.get_record_or_nulls(record_num);
                rec.append(&mut input2.attributes.get_record_or_nulls(other_num));
                output.attributes.add_record(rec);
            }
        }

        if output.num_records() == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "The input layers do not intersect.",
            ));
        }

        if verbose {
            println!("Saving data...")
        };
        lock_source(&self.output_source)?.put_dataset(output)?;

        if verbose {
            println!(
                "{}",
                &format!("Elapsed Time: {}", get_formatted_elapsed_time(start))
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::IntersectionMemory;
    use crate::overlay::OverlayOp;
    use crate::structures::Point2D;
    use crate::vector::{
        AttributeField, AttributeTable, DataSource, FieldData, MemoryDataSource, ShapeType,
        VectorDataset, VectorGeometry,
    };

    fn square(x0: f64, y0: f64, size: f64) -> VectorGeometry {
        let mut geometry = VectorGeometry::new(ShapeType::Polygon);
        geometry.add_part(&[
            Point2D::new(x0, y0),
            Point2D::new(x0 + size, y0),
            Point2D::new(x0 + size, y0 + size),
            Point2D::new(x0, y0 + size),
            Point2D::new(x0, y0),
        ]);
        geometry
    }

    fn polygon_dataset(name: &str, squares: &[(f64, f64, f64)]) -> VectorDataset {
        let mut ds = VectorDataset::new(name, ShapeType::Polygon, 4326);
        ds.attributes = AttributeTable::new(vec![AttributeField::new("FID", 'N', 7u8, 0u8)]);
        for (i, &(x0, y0, size)) in squares.iter().enumerate() {
            ds.add_record(square(x0, y0, size)).unwrap();
            ds.attributes.add_record(vec![FieldData::Int(i as i32 + 1)]);
        }
        ds
    }

    #[test]
    fn test_polygon_intersection() {
        let mut source = MemoryDataSource::new();
        source
            .put_dataset(polygon_dataset("a", &[(0.0, 0.0, 10.0), (100.0, 100.0, 10.0)]))
            .unwrap();
        source
            .put_dataset(polygon_dataset("b", &[(5.0, 5.0, 10.0)]))
            .unwrap();
        let ptr = source.into_ptr();

        let mut op = IntersectionMemory::new(ptr.clone(), "a", "b", ptr.clone(), "out");
        op.run(false).unwrap();

        let out = ptr.lock().unwrap().get_dataset("out").unwrap();
        assert_eq!(out.num_records(), 1);
        assert_eq!(out.shape_type, ShapeType::Polygon);
        assert_eq!(out.attributes.num_fields(), 2);
        assert_eq!(out.attributes.get_field_num("a_FID"), Some(0));
        assert_eq!(out.attributes.get_field_num("b_FID"), Some(1));
        assert_eq!(out.attributes.get_value(0, 0), FieldData::Int(1));
        assert_eq!(out.attributes.get_value(0, 1), FieldData::Int(1));
        // the clipped square spans 5..10 in both axes
        let bb = out.records[0].get_bounding_box();
        assert!((bb.min_x - 5.0).abs() < 1e-9);
        assert!((bb.max_x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_layers_error() {
        let mut source = MemoryDataSource::new();
        source
            .put_dataset(polygon_dataset("a", &[(0.0, 0.0, 10.0)]))
            .unwrap();
        source
            .put_dataset(polygon_dataset("b", &[(50.0, 50.0, 10.0)]))
            .unwrap();
        let ptr = source.into_ptr();

        let mut op = IntersectionMemory::new(ptr.clone(), "a", "b", ptr.clone(), "out");
        let err = op.run(false).unwrap_err();
        assert!(err.to_string().contains("do not intersect"));
        // nothing was written
        assert!(!ptr.lock().unwrap().dataset_exists("out"));
    }

    #[test]
    fn test_input_without_attribute_rows() {
        // the first input carries geometry but no attribute table
        let mut bare = VectorDataset::new("a", ShapeType::Polygon, 4326);
        bare.add_record(square(0.0, 0.0, 10.0)).unwrap();
        let mut source = MemoryDataSource::new();
        source.put_dataset(bare).unwrap();
        source
            .put_dataset(polygon_dataset("b", &[(5.0, 5.0, 10.0)]))
            .unwrap();
        let ptr = source.into_ptr();

        let mut op = IntersectionMemory::new(ptr.clone(), "a", "b", ptr.clone(), "out");
        op.run(false).unwrap();

        let out = ptr.lock().unwrap().get_dataset("out").unwrap();
        assert_eq!(out.num_records(), 1);
        assert_eq!(out.attributes.num_fields(), 1);
        assert_eq!(out.attributes.get_field_num("b_FID"), Some(0));
        assert_eq!(out.attributes.get_value(0, 0), FieldData::Int(1));
    }

    #[test]
    fn test_failed_worker_reports_error() {
        // an unclosed ring makes the pairwise kernel panic on its worker
        // thread; the run must fail rather than wait forever
        let mut open_ring = VectorGeometry::new(ShapeType::Polygon);
        open_ring.add_part(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(0.0, 10.0),
        ]);
        let mut bad = VectorDataset::new("a", ShapeType::Polygon, 4326);
        bad.add_record(open_ring).unwrap();
        let mut source = MemoryDataSource::new();
        source.put_dataset(bad).unwrap();
        source
            .put_dataset(polygon_dataset("b", &[(5.0, 5.0, 10.0)]))
            .unwrap();
        let ptr = source.into_ptr();

        let mut op = IntersectionMemory::new(ptr.clone(), "a", "b", ptr.clone(), "out");
        assert!(op.run(false).is_err());
        assert!(!ptr.lock().unwrap().dataset_exists("out"));
    }

    #[test]
    fn test_validate_rejects_existing_output() {
        let mut source = MemoryDataSource::new();
        source
            .put_dataset(polygon_dataset("a", &[(0.0, 0.0, 10.0)]))
            .unwrap();
        source
            .put_dataset(polygon_dataset("b", &[(5.0, 5.0, 10.0)]))
            .unwrap();
        source
            .put_dataset(polygon_dataset("out", &[(0.0, 0.0, 1.0)]))
            .unwrap();
        let ptr = source.into_ptr();
        let op = IntersectionMemory::new(ptr.clone(), "a", "b", ptr, "out");
        assert!(op.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_srid_mismatch() {
        let mut source = MemoryDataSource::new();
        let mut a = polygon_dataset("a", &[(0.0, 0.0, 10.0)]);
        a.srid = 4326;
        let mut b = polygon_dataset("b", &[(5.0, 5.0, 10.0)]);
        b.srid = 31982;
        source.put_dataset(a).unwrap();
        source.put_dataset(b).unwrap();
        let ptr = source.into_ptr();
        let op = IntersectionMemory::new(ptr.clone(), "a", "b", ptr, "out");
        assert!(op.validate().is_err());
    }
}
