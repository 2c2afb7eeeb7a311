/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT

Reads and writes vector datasets as GeoJSON feature collections. Only the
subset of the format needed to round-trip a VectorDataset is handled:
Point, MultiPoint, MultiLineString and Polygon geometries, scalar
properties, and an `srid` foreign member carrying the spatial reference.
*/
use crate::structures::Point2D;
use crate::vector::{AttributeField, AttributeTable, FieldData, ShapeType, VectorDataset, VectorGeometry};
use serde_json::{json, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter, Error, ErrorKind, Write};

pub fn save_dataset_to_geojson(dataset: &VectorDataset, file_name: &str) -> Result<(), Error> {
    let mut features: Vec<Value> = Vec::with_capacity(dataset.num_records());
    for i in 0..dataset.num_records() {
        let record = dataset.get_record(i);
        let mut properties = serde_json::Map::new();
        if dataset.attributes.num_fields() > 0 {
            let rec = dataset.attributes.get_record(i);
            for (field, value) in dataset.attributes.fields.iter().zip(rec.iter()) {
                properties.insert(field.name.clone(), field_data_to_value(value));
            }
        }
        features.push(json!({
            "type": "Feature",
            "geometry": geometry_to_value(record)?,
            "properties": Value::Object(properties),
        }));
    }
    let collection = json!({
        "type": "FeatureCollection",
        "name": dataset.name,
        "srid": dataset.srid,
        "features": features,
    });

    let f = File::create(file_name)?;
    let mut writer = BufWriter::new(f);
    writer.write_all(serde_json::to_string_pretty(&collection)?.as_bytes())?;
    Ok(())
}

pub fn read_dataset_from_geojson(file_name: &str) -> Result<VectorDataset, Error> {
    let f = File::open(file_name)?;
    let reader = BufReader::new(f);
    let root: Value = serde_json::from_reader(reader)?;

    let name = root["name"].as_str().unwrap_or("").to_string();
    let srid = root["srid"].as_i64().unwrap_or(0) as i32;
    let features = root["features"].as_array().ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidData,
            "GeoJSON file does not contain a feature array.",
        )
    })?;

    let mut shape_type = ShapeType::Null;
    let mut records: Vec<VectorGeometry> = Vec::with_capacity(features.len());
    let mut properties: Vec<&Value> = Vec::with_capacity(features.len());
    for feature in features {
        let geometry = value_to_geometry(&feature["geometry"])?;
        if shape_type == ShapeType::Null {
            shape_type = geometry.shape_type;
        } else if geometry.shape_type != shape_type {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "GeoJSON feature collections with mixed geometry types are not supported.",
            ));
        }
        records.push(geometry);
        properties.push(&feature["properties"]);
    }

    let mut dataset = VectorDataset::new(&name, shape_type, srid);
    dataset.attributes = AttributeTable::new(infer_fields(&properties));
    for (geometry, props) in records.into_iter().zip(properties.iter()) {
        dataset.add_record(geometry)?;
        let rec = dataset
            .attributes
            .fields
            .iter()
            .map(|field| value_to_field_data(&props[&field.name]))
            .collect();
        dataset.attributes.add_record(rec);
    }
    Ok(dataset)
}

fn geometry_to_value(geometry: &VectorGeometry) -> Result<Value, Error> {
    let coords = |p: &Point2D| json!([p.x, p.y]);
    let part_coords = |part: &[Point2D]| -> Value {
        Value::Array(part.iter().map(&coords).collect())
    };
    let value = match geometry.shape_type {
        ShapeType::Point => json!({
            "type": "Point",
            "coordinates": coords(&geometry.points[0]),
        }),
        ShapeType::MultiPoint => json!({
            "type": "MultiPoint",
            "coordinates": Value::Array(geometry.points.iter().map(&coords).collect()),
        }),
        ShapeType::PolyLine => json!({
            "type": "MultiLineString",
            "coordinates": Value::Array(
                (0..geometry.num_parts()).map(|p| part_coords(geometry.get_part(p))).collect()
            ),
        }),
        ShapeType::Polygon => json!({
            "type": "Polygon",
            "coordinates": Value::Array(
                (0..geometry.num_parts()).map(|p| part_coords(geometry.get_part(p))).collect()
            ),
        }),
        ShapeType::Null => {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Null geometries cannot be written to GeoJSON.",
            ))
        }
    };
    Ok(value)
}

fn value_to_geometry(value: &Value) -> Result<VectorGeometry, Error> {
    let invalid = || Error::new(ErrorKind::InvalidData, "Malformed GeoJSON geometry.");
    let read_point = |v: &Value| -> Result<Point2D, Error> {
        let arr = v.as_array().ok_or_else(invalid)?;
        if arr.len() < 2 {
            return Err(invalid());
        }
        Ok(Point2D::new(
            arr[0].as_f64().ok_or_else(invalid)?,
            arr[1].as_f64().ok_or_else(invalid)?,
        ))
    };
    let read_part = |v: &Value| -> Result<Vec<Point2D>, Error> {
        v.as_array()
            .ok_or_else(invalid)?
            .iter()
            .map(&read_point)
            .collect()
    };

    let geometry_type = value["type"].as_str().ok_or_else(invalid)?;
    let coordinates = &value["coordinates"];
    match geometry_type {
        "Point" => {
            let mut geometry = VectorGeometry::new(ShapeType::Point);
            geometry.add_point(read_point(coordinates)?);
            Ok(geometry)
        }
        "MultiPoint" => {
            let mut geometry = VectorGeometry::new(ShapeType::MultiPoint);
            for p in read_part(coordinates)? {
                geometry.add_point(p);
            }
            Ok(geometry)
        }
        "LineString" => {
            let mut geometry = VectorGeometry::new(ShapeType::PolyLine);
            geometry.add_part(&read_part(coordinates)?);
            Ok(geometry)
        }
        "MultiLineString" => {
            let mut geometry = VectorGeometry::new(ShapeType::PolyLine);
            for part in coordinates.as_array().ok_or_else(invalid)? {
                geometry.add_part(&read_part(part)?);
            }
            Ok(geometry)
        }
        "Polygon" => {
            let mut geometry = VectorGeometry::new(ShapeType::Polygon);
            for part in coordinates.as_array().ok_or_else(invalid)? {
                let mut ring = read_part(part)?;
                if ring.len() < 3 {
                    return Err(Error::new(
                        ErrorKind::InvalidData,
                        "GeoJSON polygon rings must have at least three vertices.",
                    ));
                }
                // rings are stored closed; tolerate files that omit the
                // closing vertex
                if ring[0] != ring[ring.len() - 1] {
                    let first = ring[0];
                    ring.push(first);
                }
                geometry.add_part(&ring);
            }
            Ok(geometry)
        }
        _ => Err(Error::new(
            ErrorKind::InvalidData,
            format!("Unsupported GeoJSON geometry type '{}'.", geometry_type),
        )),
    }
}

fn field_data_to_value(data: &FieldData) -> Value {
    match data {
        FieldData::Int(v) => json!(v),
        FieldData::Real(v) => json!(v),
        FieldData::Text(v) => json!(v),
        FieldData::Date(v) => json!(v.to_string()),
        FieldData::Bool(v) => json!(v),
        FieldData::Null => Value::Null,
    }
}

fn value_to_field_data(value: &Value) -> FieldData {
    match value {
        Value::Number(n) => {
            if n.is_i64() {
                FieldData::Int(n.as_i64().unwrap_or(0) as i32)
            } else {
                FieldData::Real(n.as_f64().unwrap_or(0f64))
            }
        }
        Value::String(s) => FieldData::Text(s.clone()),
        Value::Bool(b) => FieldData::Bool(*b),
        _ => FieldData::Null,
    }
}

// The field list is inferred from the first feature whose properties are an
// object; GeoJSON itself carries no schema.
fn infer_fields(properties: &[&Value]) -> Vec<AttributeField> {
    for props in properties {
        if let Value::Object(map) = props {
            return map
                .iter()
                .map(|(name, value)| {
                    let field_type = match value {
                        Value::Number(n) if n.is_i64() => 'N',
                        Value::Number(_) => 'F',
                        Value::Bool(_) => 'L',
                        _ => 'C',
                    };
                    AttributeField::new(name, field_type, 32u8, 4u8)
                })
                .collect();
        }
    }
    vec![]
}
