//! Writers for query results
//!
//! Both writers pull one close approach at a time from the stream they are
//! given, so a truncated query is never evaluated past its bound.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use neodb_core::ApproachRef;
use serde::Serialize;
use tracing::info;

use crate::csv::escape_field;
use crate::error::WriteError;

/// CSV header, one column per flat field
pub const CSV_FIELDS: [&str; 7] = [
    "datetime_utc",
    "distance_au",
    "velocity_km_s",
    "designation",
    "name",
    "diameter_km",
    "potentially_hazardous",
];

/// Output format for query results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, WriteError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        ext.parse()
    }
}

impl FromStr for OutputFormat {
    type Err = WriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(WriteError::UnsupportedFormat(format!(
                "'{}' (expected csv or json)",
                s
            ))),
        }
    }
}

#[derive(Serialize)]
struct ApproachRow<'a> {
    datetime_utc: String,
    distance_au: Option<f64>,
    velocity_km_s: Option<f64>,
    neo: NeoRow<'a>,
}

#[derive(Serialize)]
struct NeoRow<'a> {
    designation: &'a str,
    name: Option<&'a str>,
    diameter_km: Option<f64>,
    potentially_hazardous: bool,
}

impl<'a> ApproachRow<'a> {
    fn new(approach: &ApproachRef<'a>) -> Self {
        let neo = approach.neo().get();
        Self {
            datetime_utc: approach.time_str(),
            distance_au: known(approach.distance()),
            velocity_km_s: known(approach.velocity()),
            neo: NeoRow {
                designation: neo.designation(),
                name: neo.name(),
                diameter_km: known(neo.diameter()),
                potentially_hazardous: neo.hazardous(),
            },
        }
    }
}

fn known(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

fn csv_number(value: f64) -> String {
    match known(value) {
        Some(value) => value.to_string(),
        None => "nan".to_string(),
    }
}

/// Write results to `path`, choosing the format from its extension
pub fn write_results<'a>(
    results: impl IntoIterator<Item = ApproachRef<'a>>,
    path: impl AsRef<Path>,
) -> Result<usize, WriteError> {
    let path = path.as_ref();
    match OutputFormat::from_path(path)? {
        OutputFormat::Csv => write_to_csv(results, path),
        OutputFormat::Json => write_to_json(results, path),
    }
}

pub fn write_to_csv<'a>(
    results: impl IntoIterator<Item = ApproachRef<'a>>,
    path: impl AsRef<Path>,
) -> Result<usize, WriteError> {
    let path = path.as_ref();
    let written = write_csv(results, BufWriter::new(File::create(path)?))?;
    info!("Wrote {} close approaches to {}", written, path.display());
    Ok(written)
}

pub fn write_to_json<'a>(
    results: impl IntoIterator<Item = ApproachRef<'a>>,
    path: impl AsRef<Path>,
) -> Result<usize, WriteError> {
    let path = path.as_ref();
    let written = write_json(results, BufWriter::new(File::create(path)?))?;
    info!("Wrote {} close approaches to {}", written, path.display());
    Ok(written)
}

/// One flat row per approach; unknown numbers are `nan`, a missing name is empty
pub fn write_csv<'a, W: Write>(
    results: impl IntoIterator<Item = ApproachRef<'a>>,
    mut writer: W,
) -> Result<usize, WriteError> {
    writeln!(writer, "{}", CSV_FIELDS.join(","))?;

    let mut written = 0;
    for approach in results {
        let neo = approach.neo();
        writeln!(
            writer,
            "{},{},{},{},{},{},{}",
            approach.time_str(),
            csv_number(approach.distance()),
            csv_number(approach.velocity()),
            escape_field(neo.designation()),
            escape_field(neo.name().unwrap_or_default()),
            csv_number(neo.diameter()),
            neo.hazardous()
        )?;
        written += 1;
    }

    writer.flush()?;
    Ok(written)
}

/// A JSON array of approaches, each with its NEO nested under `neo`
///
/// Unknown numbers and a missing name are `null`.
pub fn write_json<'a, W: Write>(
    results: impl IntoIterator<Item = ApproachRef<'a>>,
    mut writer: W,
) -> Result<usize, WriteError> {
    writer.write_all(b"[")?;

    let mut written = 0;
    for approach in results {
        if written > 0 {
            writer.write_all(b",")?;
        }
        writer.write_all(b"\n  ")?;
        serde_json::to_writer(&mut writer, &ApproachRow::new(&approach))?;
        written += 1;
    }

    writer.write_all(b"\n]\n")?;
    writer.flush()?;
    Ok(written)
}
