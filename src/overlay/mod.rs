/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/

// private sub-modules defined in other files
mod aggregation;
mod intersection;
mod intersection_query;

// exports identifiers from private sub-modules in the current module namespace
pub use self::aggregation::AggregationMemory;
pub use self::intersection::IntersectionMemory;
pub use self::intersection_query::IntersectionQuery;

use crate::vector::{DataSourcePtr, ShapeType};
use std::io::{Error, ErrorKind};

/// A single-shot overlay operation. `validate` checks the parameters
/// without touching any data; `run` materializes the result fully in
/// memory and only writes it to the output source after success, so a
/// failed run never leaves a partial output dataset behind.
pub trait OverlayOp {
    fn validate(&self) -> Result<(), Error>;
    fn run(&mut self, verbose: bool) -> Result<(), Error>;
}

/// Where an intersection is computed: in process memory, or pushed down to
/// a data source that can run spatial queries itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayStrategy {
    Memory,
    Query,
}

/// Builds an intersection operator for the chosen strategy.
pub fn new_intersection_op(
    strategy: OverlayStrategy,
    input_source: DataSourcePtr,
    first: &str,
    second: &str,
    output_source: DataSourcePtr,
    output_name: &str,
) -> Box<dyn OverlayOp> {
    match strategy {
        OverlayStrategy::Memory => Box::new(IntersectionMemory::new(
            input_source,
            first,
            second,
            output_source,
            output_name,
        )),
        OverlayStrategy::Query => Box::new(IntersectionQuery::new(
            input_source,
            first,
            second,
            output_source,
            output_name,
        )),
    }
}

// Parameter checks shared by the overlay operators.
pub(crate) fn validate_overlay_params(
    input_source: &DataSourcePtr,
    inputs: &[&str],
    output_source: &DataSourcePtr,
    output_name: &str,
) -> Result<(), Error> {
    if output_name.is_empty() {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            "An output dataset name is required.",
        ));
    }
    {
        let guard = lock_source(input_source)?;
        for name in inputs {
            if !guard.dataset_exists(name) {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    format!("The input dataset '{}' does not exist.", name),
                ));
            }
        }
    }
    let guard = lock_source(output_source)?;
    if guard.dataset_exists(output_name) {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!(
                "A dataset named '{}' already exists in the output data source.",
                output_name
            ),
        ));
    }
    Ok(())
}

pub(crate) fn check_intersection_shape_types(
    first: ShapeType,
    second: ShapeType,
) -> Result<(), Error> {
    if second.base_shape_type() != ShapeType::Polygon {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            "The second input dataset must be of POLYGON base shape type.",
        ));
    }
    if first == ShapeType::Null {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            "The first input dataset must have a geometry type.",
        ));
    }
    Ok(())
}

pub(crate) fn check_matching_srids(srid1: i32, srid2: i32) -> Result<(), Error> {
    if srid1 != srid2 {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!(
                "The input datasets must share a spatial reference (found SRIDs {} and {}).",
                srid1, srid2
            ),
        ));
    }
    Ok(())
}

pub(crate) fn lock_source(
    source: &DataSourcePtr,
) -> Result<std::sync::MutexGuard<'_, dyn crate::vector::DataSource + Send + 'static>, Error> {
    source
        .lock()
        .map_err(|_| Error::new(ErrorKind::Other, "The data source mutex was poisoned."))
}
