//! Loaders for the NEO CSV file and the close approach JSON file
//!
//! Both loaders only map columns to raw records; normalization is done by
//! the record model in `neodb-core`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use neodb_core::{ApproachRecord, CloseApproach, NearEarthObject, NeoRecord};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::csv::parse_records;
use crate::error::ExtractError;

/// NEO CSV columns: designation, name, diameter, hazard code
pub const NEO_COLUMNS: [&str; 4] = ["pdes", "name", "diameter", "pha"];

/// Close approach JSON fields: designation, time, distance, velocity
pub const APPROACH_FIELDS: [&str; 4] = ["des", "cd", "dist", "v_rel"];

/// Load NEOs from a header-bearing CSV file
pub fn load_neos(path: impl AsRef<Path>) -> Result<Vec<NearEarthObject>, ExtractError> {
    let path = path.as_ref();
    let neos = read_neos(File::open(path)?)?;
    info!("Loaded {} NEOs from {}", neos.len(), path.display());
    Ok(neos)
}

/// Load close approaches from a `{"fields": [...], "data": [[...]]}` JSON file
pub fn load_approaches(path: impl AsRef<Path>) -> Result<Vec<CloseApproach>, ExtractError> {
    let path = path.as_ref();
    let approaches = read_approaches(File::open(path)?)?;
    info!("Loaded {} close approaches from {}", approaches.len(), path.display());
    Ok(approaches)
}

pub fn read_neos<R: Read>(reader: R) -> Result<Vec<NearEarthObject>, ExtractError> {
    Ok(read_neo_records(reader)?
        .into_iter()
        .map(NearEarthObject::from_record)
        .collect())
}

pub fn read_approaches<R: Read>(reader: R) -> Result<Vec<CloseApproach>, ExtractError> {
    read_approach_records(reader)?
        .into_iter()
        .map(|record| CloseApproach::from_record(record).map_err(ExtractError::from))
        .collect()
}

/// Raw NEO rows, columns selected by header name
pub fn read_neo_records<R: Read>(mut reader: R) -> Result<Vec<NeoRecord>, ExtractError> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    let mut records = parse_records(&input)?.into_iter();
    let Some(header) = records.next() else {
        return Ok(Vec::new());
    };
    let [pdes, name, diameter, pha] = column_positions(&header, NEO_COLUMNS)?;

    Ok(records
        .map(|row| NeoRecord {
            designation: row.get(pdes).cloned().unwrap_or_default(),
            name: csv_field(&row, name),
            diameter: csv_field(&row, diameter),
            hazardous: csv_field(&row, pha),
        })
        .collect())
}

/// Empty and absent cells are treated as missing
fn csv_field(row: &[String], idx: usize) -> Option<String> {
    row.get(idx).filter(|v| !v.is_empty()).cloned()
}

#[derive(Debug, Deserialize)]
struct ApproachDocument {
    fields: Vec<String>,
    data: Vec<Vec<Value>>,
}

/// Raw close approach rows, each zipped with the document's `fields`
pub fn read_approach_records<R: Read>(reader: R) -> Result<Vec<ApproachRecord>, ExtractError> {
    let document: ApproachDocument = serde_json::from_reader(BufReader::new(reader))?;
    let [des, cd, dist, v_rel] = column_positions(&document.fields, APPROACH_FIELDS)?;

    Ok(document
        .data
        .iter()
        .map(|row| ApproachRecord {
            designation: json_field(row, des).unwrap_or_default(),
            time: json_field(row, cd).unwrap_or_default(),
            distance: json_field(row, dist),
            velocity: json_field(row, v_rel),
        })
        .collect())
}

fn column_positions<const N: usize>(
    header: &[String],
    wanted: [&str; N],
) -> Result<[usize; N], ExtractError> {
    let index: HashMap<&str, usize> = header
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim(), idx))
        .collect();

    let mut positions = [0; N];
    for (slot, column) in positions.iter_mut().zip(wanted) {
        *slot = *index
            .get(column)
            .ok_or_else(|| ExtractError::MissingColumn(column.to_string()))?;
    }
    Ok(positions)
}

/// Null and empty strings are treated as missing
fn json_field(row: &[Value], idx: usize) -> Option<String> {
    match row.get(idx)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
