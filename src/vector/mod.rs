/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/

// private sub-modules defined in other files
mod attributes;
mod dataset;
mod datasource;
mod geojson;
mod geometry;

// exports identifiers from private sub-modules in the current module namespace
pub use self::attributes::{AttributeField, AttributeTable, FieldData};
pub use self::dataset::VectorDataset;
pub use self::datasource::{
    merge_field_schemas, DataSource, DataSourceCapabilities, DataSourcePtr, MemoryDataSource,
};
pub use self::geojson::{read_dataset_from_geojson, save_dataset_to_geojson};
pub use self::geometry::{ShapeType, VectorGeometry};
