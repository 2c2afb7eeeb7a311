/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT

Structures for the attribute table attached to a vector dataset. Field
descriptors follow the dBASE convention of a type character with a length
and decimal count, which keeps datasets convertible to and from common
GIS interchange formats.
*/
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldData {
    Int(i32),
    Real(f64),
    Text(String),
    Date(NaiveDate),
    Bool(bool),
    Null,
}

impl FieldData {
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldData::Int(_) | FieldData::Real(_))
    }

    /// Numeric value of the field, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldData::Int(v) => Some(*v as f64),
            FieldData::Real(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldData::Int(v) => write!(f, "{}", v),
            FieldData::Real(v) => write!(f, "{}", v),
            FieldData::Text(v) => write!(f, "{}", v),
            FieldData::Date(v) => write!(f, "{}", v),
            FieldData::Bool(v) => write!(f, "{}", v),
            FieldData::Null => write!(f, "null"),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeField {
    pub name: String,
    pub field_type: char,
    pub field_length: u8,
    pub decimal_count: u8,
}

impl AttributeField {
    pub fn new(name: &str, field_type: char, field_length: u8, decimal_count: u8) -> AttributeField {
        AttributeField {
            name: name.to_string(),
            field_type,
            field_length,
            decimal_count,
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AttributeTable {
    pub fields: Vec<AttributeField>,
    data: Vec<Vec<FieldData>>,
}

impl AttributeTable {
    pub fn new(fields: Vec<AttributeField>) -> AttributeTable {
        AttributeTable {
            fields,
            data: vec![],
        }
    }

    pub fn num_records(&self) -> usize {
        self.data.len()
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn add_field(&mut self, field: &AttributeField) {
        self.fields.push(field.clone());
        for record in &mut self.data {
            record.push(FieldData::Null);
        }
    }

    /// Appends a record, padding or truncating it to the table width.
    pub fn add_record(&mut self, mut rec: Vec<FieldData>) {
        rec.resize(self.fields.len(), FieldData::Null);
        self.data.push(rec);
    }

    pub fn get_record(&self, index: usize) -> Vec<FieldData> {
        self.data[index].clone()
    }

    /// The record at `index`, or a row of nulls sized to the table width
    /// when the table holds no record there. Datasets may carry geometry
    /// records without attribute rows.
    pub fn get_record_or_nulls(&self, index: usize) -> Vec<FieldData> {
        if index < self.data.len() {
            self.data[index].clone()
        } else {
            vec![FieldData::Null; self.fields.len()]
        }
    }

    pub fn get_value(&self, record_index: usize, field_index: usize) -> FieldData {
        self.data[record_index][field_index].clone()
    }

    pub fn set_value(&mut self, record_index: usize, field_index: usize, value: FieldData) {
        self.data[record_index][field_index] = value;
    }

    pub fn remove_record(&mut self, index: usize) {
        self.data.remove(index);
    }

    pub fn get_field_num(&self, name: &str) -> Option<usize> {
        for i in 0..self.fields.len() {
            if self.fields[i].name == name {
                return Some(i);
            }
        }
        None
    }

    pub fn get_field_info(&self, index: usize) -> AttributeField {
        self.fields[index].clone()
    }

    pub fn is_field_numeric(&self, index: usize) -> bool {
        match self.fields[index].field_type {
            'N' | 'F' => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{AttributeField, AttributeTable, FieldData};

    #[test]
    fn test_field_lookup() {
        let table = AttributeTable::new(vec![
            AttributeField::new("FID", 'N', 7u8, 0u8),
            AttributeField::new("NAME", 'C', 32u8, 0u8),
        ]);
        assert_eq!(table.get_field_num("NAME"), Some(1));
        assert_eq!(table.get_field_num("AREA"), None);
        assert!(table.is_field_numeric(0));
        assert!(!table.is_field_numeric(1));
    }

    #[test]
    fn test_add_record_pads_to_width() {
        let mut table = AttributeTable::new(vec![
            AttributeField::new("FID", 'N', 7u8, 0u8),
            AttributeField::new("NAME", 'C', 32u8, 0u8),
        ]);
        table.add_record(vec![FieldData::Int(1)]);
        assert_eq!(table.get_value(0, 1), FieldData::Null);
    }

    #[test]
    fn test_get_record_or_nulls_handles_missing_rows() {
        let table = AttributeTable::new(vec![
            AttributeField::new("FID", 'N', 7u8, 0u8),
            AttributeField::new("NAME", 'C', 32u8, 0u8),
        ]);
        assert_eq!(
            table.get_record_or_nulls(0),
            vec![FieldData::Null, FieldData::Null]
        );
        let empty = AttributeTable::default();
        assert!(empty.get_record_or_nulls(0).is_empty());
    }

    #[test]
    fn test_add_field_backfills_null() {
        let mut table = AttributeTable::new(vec![AttributeField::new("FID", 'N', 7u8, 0u8)]);
        table.add_record(vec![FieldData::Int(1)]);
        table.add_field(&AttributeField::new("AREA", 'F', 12u8, 4u8));
        assert_eq!(table.num_fields(), 2);
        assert_eq!(table.get_value(0, 1), FieldData::Null);
    }
}
