/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/
use crate::algorithms::{overlay_rings, OverlayMode};
use crate::overlay::{lock_source, validate_overlay_params, OverlayOp};
use crate::structures::Polyline;
use crate::utils::get_formatted_elapsed_time;
use crate::vector::{
    AttributeField, AttributeTable, DataSourcePtr, FieldData, ShapeType, VectorDataset,
    VectorGeometry,
};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use std::io::{Error, ErrorKind};
use std::time::Instant;

/// Dissolves a polygon dataset by an attribute: records sharing a value of
/// the group field are merged into one output record whose geometry is the
/// union of the members' rings (disjoint members become parts of a
/// multi-part polygon). Numeric summary fields get min/max/sum/mean/
/// std-dev columns, text summary fields lexicographic min/max, and every
/// group gets a member count.
pub struct AggregationMemory {
    input_source: DataSourcePtr,
    input: String,
    group_field: String,
    summary_fields: Vec<String>,
    output_source: DataSourcePtr,
    output_name: String,
}

impl AggregationMemory {
    pub fn new(
        input_source: DataSourcePtr,
        input: &str,
        group_field: &str,
        summary_fields: &[&str],
        output_source: DataSourcePtr,
        output_name: &str,
    ) -> AggregationMemory {
        AggregationMemory {
            input_source,
            input: input.to_string(),
            group_field: group_field.to_string(),
            summary_fields: summary_fields.iter().map(|s| s.to_string()).collect(),
            output_source,
            output_name: output_name.to_string(),
        }
    }
}

impl OverlayOp for AggregationMemory {
    fn validate(&self) -> Result<(), Error> {
        validate_overlay_params(
            &self.input_source,
            &[&self.input],
            &self.output_source,
            &self.output_name,
        )?;
        let guard = lock_source(&self.input_source)?;
        let input = guard.get_dataset(&self.input)?;
        if input.shape_type.base_shape_type() != ShapeType::Polygon {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "The input dataset must be of POLYGON base shape type.",
            ));
        }
        if input.attributes.get_field_num(&self.group_field).is_none() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!(
                    "The input dataset has no field named '{}' to group by.",
                    self.group_field
                ),
            ));
        }
        for name in &self.summary_fields {
            if input.attributes.get_field_num(name).is_none() {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    format!("The input dataset has no field named '{}'.", name),
                ));
            }
        }
        Ok(())
    }

    fn run(&mut self, verbose: bool) -> Result<(), Error> {
        self.validate()?;

        let start = Instant::now();
        let mut progress: usize;
        let mut old_progress: usize = 1;

        if verbose {
            println!("Reading data...")
        };
        let input = {
            let guard = lock_source(&self.input_source)?;
            guard.get_dataset(&self.input)?
        };
        let group_field_num = input
            .attributes
            .get_field_num(&self.group_field)
            .expect("validated above");

        // group record numbers by the group field's value
        let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for record_num in 0..input.num_records() {
            let key = input
                .attributes
                .get_value(record_num, group_field_num)
                .to_string();
            groups.entry(key).or_default().push(record_num);
        }

        let mut output = VectorDataset::new(&self.output_name, input.shape_type, input.srid);
        output.attributes = AttributeTable::new(self.output_schema(&input));

        let num_groups = groups.len();
        for (group_num, (_, members)) in groups.iter().enumerate() {
            let geometry = union_of_records(&input, members);
            output.add_record(geometry)?;

            let mut rec: Vec<FieldData> =
                vec![input.attributes.get_value(members[0], group_field_num)];
            rec.push(FieldData::Int(members.len() as i32));
            for name in &self.summary_fields {
                let field_num = input.attributes.get_field_num(name).expect("validated above");
                if input.attributes.is_field_numeric(field_num) {
                    rec.append(&mut numeric_summary(&input, members, field_num));
                } else {
                    rec.append(&mut text_summary(&input, members, field_num));
                }
            }
            output.attributes.add_record(rec);

            if verbose {
                progress = (100.0_f64 * (group_num + 1) as f64 / num_groups as f64) as usize;
                if progress != old_progress {
                    println!("Progress: {}%", progress);
                    old_progress = progress;
                }
            }
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

impl AggregationMemory {
    fn output_schema(&self, input: &VectorDataset) -> Vec<AttributeField> {
        let group_field_num = input
            .attributes
            .get_field_num(&self.group_field)
            .expect("validated before use");
        let mut fields = vec![
            input.attributes.get_field_info(group_field_num),
            AttributeField::new("COUNT", 'N', 9u8, 0u8),
        ];
        for name in &self.summary_fields {
            let field_num = input.attributes.get_field_num(name).expect("validated before use");
            if input.attributes.is_field_numeric(field_num) {
                for suffix in ["MIN", "MAX", "SUM", "MEAN", "STDDEV"] {
                    fields.push(AttributeField::new(
                        &format!("{}_{}", name, suffix),
                        'F',
                        12u8,
                        4u8,
                    ));
                }
            } else {
                for suffix in ["MIN", "MAX"] {
                    fields.push(AttributeField::new(
                        &format!("{}_{}", name, suffix),
                        'C',
                        32u8,
                        0u8,
                    ));
                }
            }
            fields.push(AttributeField::new(&format!("{}_VALID", name), 'N', 9u8, 0u8));
        }
        fields
    }
}

// Unions the non-hole rings of the member records. Rings that can be
// merged pairwise collapse into one; rings disjoint from everything else
// survive as separate parts.
fn union_of_records(input: &VectorDataset, members: &[usize]) -> VectorGeometry {
    let mut merged: Vec<Polyline> = vec![];
    for &record_num in members {
        let record = input.get_record(record_num);
        for part in 0..record.num_parts() {
            if record.num_parts() > 1 && record.is_hole(part) {
                continue;
            }
            let mut current = Polyline::new(record.get_part(part), part);
            loop {
                let mut combined: Option<(usize, Polyline)> = None;
                for (i, existing) in merged.iter().enumerate() {
                    let unioned = overlay_rings(existing, &current, OverlayMode::Union);
                    if unioned.len() == 1 {
                        combined = Some((i, unioned.into_iter().next().unwrap()));
                        break;
                    }
                }
                match combined {
                    Some((i, unioned)) => {
                        merged.remove(i);
                        current = unioned;
                    }
                    None => break,
                }
            }
            merged.push(current);
        }
    }
    VectorGeometry::from_polylines(input.shape_type, &merged)
}

fn numeric_summary(input: &VectorDataset, members: &[usize], field_num: usize) -> Vec<FieldData> {
    let values: Vec<f64> = members
        .iter()
        .filter_map(|&r| input.attributes.get_value(r, field_num).as_f64())
        .collect();
    if values.is_empty() {
        let mut rec = vec![FieldData::Null; 5];
        rec.push(FieldData::Int(0));
        return rec;
    }
    let sum: f64 = values.iter().sum();
    let std_dev = if values.len() > 1 {
        Statistics::std_dev(values.iter())
    } else {
        0f64
    };
    vec![
        FieldData::Real(Statistics::min(values.iter())),
        FieldData::Real(Statistics::max(values.iter())),
        FieldData::Real(sum),
        FieldData::Real(Statistics::mean(values.iter())),
        FieldData::Real(std_dev),
        FieldData::Int(values.len() as i32),
    ]
}

fn text_summary(input: &VectorDataset, members: &[usize], field_num: usize) -> Vec<FieldData> {
    let mut values: Vec<String> = members
        .iter()
        .filter_map(|&r| match input.attributes.get_value(r, field_num) {
            FieldData::Text(s) => Some(s),
            _ => None,
        })
        .collect();
    if values.is_empty() {
        return vec![FieldData::Null, FieldData::Null, FieldData::Int(0)];
    }
    values.sort();
    vec![
        FieldData::Text(values.first().cloned().unwrap_or_default()),
        FieldData::Text(values.last().cloned().unwrap_or_default()),
        FieldData::Int(values.len() as i32),
    ]
}
