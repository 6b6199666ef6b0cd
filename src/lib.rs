//! neodb: near-Earth object close approach database
//!
//! Re-exports the core engine and the file format crate.

pub use neodb_core::*;
pub use neodb_io::{
    load_approaches, load_database, load_neos, write_results, write_to_csv, write_to_json,
    ExtractError, OutputFormat, WriteError,
};
