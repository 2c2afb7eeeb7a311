/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/
use crate::overlay::{
    check_intersection_shape_types, check_matching_srids, lock_source, validate_overlay_params,
    OverlayOp,
};
use crate::utils::get_formatted_elapsed_time;
use crate::vector::DataSourcePtr;
use std::io::{Error, ErrorKind};
use std::time::Instant;

/// Computes the intersection of two datasets by pushing the work down to
/// the input data source. Only valid when the source advertises the
/// spatial-query capability; the result is fetched in one call and written
/// to the output source.
pub struct IntersectionQuery {
    input_source: DataSourcePtr,
    first: String,
    second: String,
    output_source: DataSourcePtr,
    output_name: String,
}

impl IntersectionQuery {
    pub fn new(
        input_source: DataSourcePtr,
        first: &str,
        second: &str,
        output_source: DataSourcePtr,
        output_name: &str,
    ) -> IntersectionQuery {
        IntersectionQuery {
            input_source,
            first: first.to_string(),
            second: second.to_string(),
            output_source,
            output_name: output_name.to_string(),
        }
    }
}

impl OverlayOp for IntersectionQuery {
    fn validate(&self) -> Result<(), Error> {
        validate_overlay_params(
            &self.input_source,
            &[&self.first, &self.second],
            &self.output_source,
            &self.output_name,
        )?;
        let guard = lock_source(&self.input_source)?;
        if !guard.capabilities().spatial_query {
            return Err(Error::new(
                ErrorKind::Unsupported,
                "The input data source does not support spatial queries; use the in-memory strategy instead.",
            ));
        }
        let input1 = guard.get_dataset(&self.first)?;
        let input2 = guard.get_dataset(&self.second)?;
        check_matching_srids(input1.srid, input2.srid)?;
        check_intersection_shape_types(input1.shape_type, input2.shape_type)
    }

    fn run(&mut self, verbose: bool) -> Result<(), Error> {
        self.validate()?;

        let start = Instant::now();
        if verbose {
            println!("Querying the data source...")
        };
        let output = {
            let guard = lock_source(&self.input_source)?;
            guard.query_intersection(&self.first, &self.second, &self.output_name)?
        };

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
