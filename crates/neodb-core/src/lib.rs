//! neodb-core: linked in-memory database of near-Earth objects
//!
//! - [`NearEarthObject`] / [`CloseApproach`]: normalized records
//! - [`AttributeFilter`]: one criterion over a close approach
//! - [`NeoDatabase`]: indexes NEOs, links approaches to them, and streams
//!   approaches matching a set of filters
//!
//! ```ignore
//! use neodb_core::{create_filters, limit, FilterCriteria, NeoDatabase};
//!
//! let db = NeoDatabase::from_records(neo_rows, approach_rows)?;
//! let filters = create_filters(&FilterCriteria {
//!     hazardous: Some(true),
//!     ..Default::default()
//! });
//! for approach in limit(db.query(&filters), Some(10)) {
//!     println!("{}", approach);
//! }
//! ```
//!
//! The crate never touches the filesystem; see `neodb-io` for loaders and
//! writers.

mod error;
mod filter;
mod model;
mod store;

pub use error::DatabaseError;
pub use filter::{
    create_filters, limit, AttributeFilter, Comparator, Criterion, FilterCriteria, FilterValue,
};
pub use model::{
    parse_approach_time, ApproachId, ApproachRecord, CloseApproach, NearEarthObject, NeoId,
    NeoRecord, APPROACH_TIME_FORMAT, CANONICAL_TIME_FORMAT, HAZARDOUS_CODE,
};
pub use store::{ApproachRef, NeoDatabase, NeoRef, Query};
