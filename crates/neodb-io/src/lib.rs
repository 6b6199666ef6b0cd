//! neodb-io: file formats for the NEO database
//!
//! - `extract`: NEO CSV and close approach JSON loaders
//! - `write`: CSV and nested JSON writers for query results

mod csv;
mod error;
mod extract;
mod write;

pub use error::{ExtractError, WriteError};
pub use extract::{
    load_approaches, load_neos, read_approach_records, read_approaches, read_neo_records,
    read_neos, APPROACH_FIELDS, NEO_COLUMNS,
};
pub use write::{
    write_csv, write_json, write_results, write_to_csv, write_to_json, OutputFormat, CSV_FIELDS,
};

use std::path::Path;

use neodb_core::NeoDatabase;

/// Load both files and build the linked database
pub fn load_database(
    neo_path: impl AsRef<Path>,
    approach_path: impl AsRef<Path>,
) -> Result<NeoDatabase, ExtractError> {
    let neos = load_neos(neo_path)?;
    let approaches = load_approaches(approach_path)?;
    Ok(NeoDatabase::new(neos, approaches)?)
}
