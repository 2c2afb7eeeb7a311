/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/
use crate::vector::{AttributeField, AttributeTable, VectorDataset};
use std::collections::BTreeMap;
use std::io::{Error, ErrorKind};
use std::sync::{Arc, Mutex};

/// Builds the field list of a dataset produced by combining two inputs.
/// Field names are prefixed with their dataset's name so that columns from
/// the two inputs can't collide.
pub fn merge_field_schemas(first: &VectorDataset, second: &VectorDataset) -> Vec<AttributeField> {
    let mut fields = Vec::with_capacity(
        first.attributes.num_fields() + second.attributes.num_fields(),
    );
    for f in &first.attributes.fields {
        fields.push(AttributeField::new(
            &format!("{}_{}", first.name, f.name),
            f.field_type,
            f.field_length,
            f.decimal_count,
        ));
    }
    for f in &second.attributes.fields {
        fields.push(AttributeField::new(
            &format!("{}_{}", second.name, f.name),
            f.field_type,
            f.field_length,
            f.decimal_count,
        ));
    }
    fields
}

/// A shared handle to a data source. Sessions and overlay operators hold
/// clones of the same handle and borrow the source through the mutex for
/// the duration of each call.
pub type DataSourcePtr = Arc<Mutex<dyn DataSource + Send>>;

/// What a data source can do beyond storing datasets. Operators that can
/// push work down to the source check this before choosing a strategy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DataSourceCapabilities {
    pub spatial_query: bool,
}

/// Storage for named vector datasets.
pub trait DataSource {
    fn capabilities(&self) -> DataSourceCapabilities;

    fn dataset_exists(&self, name: &str) -> bool;

    fn dataset_names(&self) -> Vec<String>;

    fn get_dataset(&self, name: &str) -> Result<VectorDataset, Error>;

    fn put_dataset(&mut self, dataset: VectorDataset) -> Result<(), Error>;

    fn delete_dataset(&mut self, name: &str) -> Result<(), Error>;

    /// Computes the intersection of two stored datasets inside the source,
    /// returning the result without materializing the inputs on the caller's
    /// side. Only sources whose capabilities report `spatial_query` support
    /// this.
    fn query_intersection(
        &self,
        _first: &str,
        _second: &str,
        _output_name: &str,
    ) -> Result<VectorDataset, Error> {
        Err(Error::new(
            ErrorKind::Unsupported,
            "This data source does not support spatial queries.",
        ))
    }
}

/// A data source backed by process memory. Mostly useful for tests and for
/// pipelines that assemble their inputs programmatically.
#[derive(Default)]
pub struct MemoryDataSource {
    datasets: BTreeMap<String, VectorDataset>,
}

impl MemoryDataSource {
    pub fn new() -> MemoryDataSource {
        MemoryDataSource {
            datasets: BTreeMap::new(),
        }
    }

    pub fn into_ptr(self) -> DataSourcePtr {
        Arc::new(Mutex::new(self))
    }
}

impl DataSource for MemoryDataSource {
    fn capabilities(&self) -> DataSourceCapabilities {
        DataSourceCapabilities { spatial_query: true }
    }

    fn dataset_exists(&self, name: &str) -> bool {
        self.datasets.contains_key(name)
    }

    fn dataset_names(&self) -> Vec<String> {
        self.datasets.keys().cloned().collect()
    }

    fn get_dataset(&self, name: &str) -> Result<VectorDataset, Error> {
        self.datasets.get(name).cloned().ok_or_else(|| {
            Error::new(
                ErrorKind::NotFound,
                format!("No dataset named '{}' in the data source.", name),
            )
        })
    }

    fn put_dataset(&mut self, dataset: VectorDataset) -> Result<(), Error> {
        if dataset.name.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Datasets stored in a data source must be named.",
            ));
        }
        self.datasets.insert(dataset.name.clone(), dataset);
        Ok(())
    }

    fn delete_dataset(&mut self, name: &str) -> Result<(), Error> {
        self.datasets.remove(name).map(|_| ()).ok_or_else(|| {
            Error::new(
                ErrorKind::NotFound,
                format!("No dataset named '{}' in the data source.", name),
            )
        })
    }

    fn query_intersection(
        &self,
        first: &str,
        second: &str,
        output_name: &str,
    ) -> Result<VectorDataset, Error> {
        let input1 = self.get_dataset(first)?;
        let input2 = self.get_dataset(second)?;
        let mut output = VectorDataset::new(output_name, input1.shape_type, input1.srid);
        output.attributes =
            AttributeTable::new(merge_field_schemas(&input1, &input2));
        for i in 0..input1.num_records() {
            for j in 0..input2.num_records() {
                if let Some(geometry) = input1.records[i].intersect_with(&input2.records[j]) {
                    output.add_record(geometry)?;
                    let mut rec = input1.attributes.get_record_or_nulls(i);
                    rec.append(&mut input2.attributes.get_record_or_nulls(j));
                    output.attributes.add_record(rec);
                }
            }
        }
        Ok(output)
    }
}
