//! Record model for near-Earth objects and their close approaches
//!
//! Loaders hand over raw rows ([`NeoRecord`], [`ApproachRecord`]) with every
//! field still a string. All normalization happens here, once, when the
//! record is turned into a [`NearEarthObject`] or [`CloseApproach`]:
//!
//! - an empty or missing name becomes `None`
//! - a missing or unparseable number becomes `f64::NAN`
//! - only the hazard code `"Y"` means potentially hazardous
//! - the approach time must parse, there is no unknown time

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::DatabaseError;

/// Input format for approach times, e.g. `2015-Jan-01 12:00`
pub const APPROACH_TIME_FORMAT: &str = "%Y-%b-%d %H:%M";

/// Output format for approach times (source data has minute resolution)
pub const CANONICAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// The hazard code that marks a NEO as potentially hazardous
pub const HAZARDOUS_CODE: &str = "Y";

/// Position of a NEO inside its database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeoId(pub(crate) usize);

/// Position of a close approach inside its database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApproachId(pub(crate) usize);

/// Raw NEO row as produced by a loader
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeoRecord {
    /// Primary designation (required)
    pub designation: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub diameter: Option<String>,
    /// Source hazard code, `"Y"` or `"N"`
    #[serde(default)]
    pub hazardous: Option<String>,
}

/// Raw close approach row as produced by a loader
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproachRecord {
    /// Designation of the approaching NEO
    pub designation: String,
    /// Time in [`APPROACH_TIME_FORMAT`]
    pub time: String,
    #[serde(default)]
    pub distance: Option<String>,
    #[serde(default)]
    pub velocity: Option<String>,
}

/// A near-Earth object
#[derive(Debug, Clone, PartialEq)]
pub struct NearEarthObject {
    designation: String,
    name: Option<String>,
    /// Diameter in km, NaN when unknown
    diameter: f64,
    hazardous: bool,
    /// Filled by the database link pass
    pub(crate) approaches: Vec<ApproachId>,
}

impl NearEarthObject {
    pub fn new(
        designation: impl Into<String>,
        name: Option<&str>,
        diameter: Option<&str>,
        hazardous: Option<&str>,
    ) -> Self {
        Self {
            designation: designation.into(),
            name: name.filter(|n| !n.is_empty()).map(str::to_string),
            diameter: parse_or_unknown(diameter),
            hazardous: hazardous == Some(HAZARDOUS_CODE),
            approaches: Vec::new(),
        }
    }

    pub fn from_record(record: NeoRecord) -> Self {
        Self::new(
            record.designation,
            record.name.as_deref(),
            record.diameter.as_deref(),
            record.hazardous.as_deref(),
        )
    }

    pub fn designation(&self) -> &str {
        &self.designation
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn hazardous(&self) -> bool {
        self.hazardous
    }

    /// Ids of this NEO's close approaches, in database order
    pub fn approach_ids(&self) -> &[ApproachId] {
        &self.approaches
    }

    /// Human-readable name, e.g. `433 (Eros)`; never used for lookup
    pub fn full_name(&self) -> String {
        match &self.name {
            Some(name) => format!("{} ({})", self.designation, name),
            None => self.designation.clone(),
        }
    }
}

impl fmt::Display for NearEarthObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NEO {} ", self.full_name())?;
        if self.diameter.is_nan() {
            write!(f, "has an unknown diameter")?;
        } else {
            write!(f, "has a diameter of {:.3} km", self.diameter)?;
        }
        if self.hazardous {
            write!(f, " and is potentially hazardous.")
        } else {
            write!(f, " and is not potentially hazardous.")
        }
    }
}

/// A single close approach of a NEO to Earth
#[derive(Debug, Clone, PartialEq)]
pub struct CloseApproach {
    designation: String,
    /// UTC
    time: NaiveDateTime,
    /// Nominal approach distance in au, NaN when unknown
    distance: f64,
    /// Relative approach velocity in km/s, NaN when unknown
    velocity: f64,
    /// Set by the database link pass
    pub(crate) neo: Option<NeoId>,
}

impl CloseApproach {
    pub fn new(
        designation: impl Into<String>,
        time: &str,
        distance: Option<&str>,
        velocity: Option<&str>,
    ) -> Result<Self, DatabaseError> {
        Ok(Self {
            designation: designation.into(),
            time: parse_approach_time(time)?,
            distance: parse_or_unknown(distance),
            velocity: parse_or_unknown(velocity),
            neo: None,
        })
    }

    pub fn from_record(record: ApproachRecord) -> Result<Self, DatabaseError> {
        Self::new(
            record.designation,
            &record.time,
            record.distance.as_deref(),
            record.velocity.as_deref(),
        )
    }

    /// Designation of the NEO this approach was recorded for
    pub fn designation(&self) -> &str {
        &self.designation
    }

    pub fn time(&self) -> NaiveDateTime {
        self.time
    }

    /// Calendar date of the approach
    pub fn date(&self) -> NaiveDate {
        self.time.date()
    }

    /// Time rendered as `YYYY-MM-DD hh:mm`
    pub fn time_str(&self) -> String {
        self.time.format(CANONICAL_TIME_FORMAT).to_string()
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// The linked NEO; `None` only before the approach joins a database
    pub fn neo_id(&self) -> Option<NeoId> {
        self.neo
    }
}

impl fmt::Display for CloseApproach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "On {}, '{}' approaches Earth at a distance of {:.2} au and a velocity of {:.2} km/s.",
            self.time_str(),
            self.designation,
            self.distance,
            self.velocity
        )
    }
}

/// Parse an approach time in [`APPROACH_TIME_FORMAT`]
pub fn parse_approach_time(value: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(value.trim(), APPROACH_TIME_FORMAT).map_err(|source| {
        DatabaseError::MalformedTime {
            value: value.to_string(),
            source,
        }
    })
}

fn parse_or_unknown(raw: Option<&str>) -> f64 {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neo_normalizes_fields() {
        let neo = NearEarthObject::new("433", Some("Eros"), Some("16.84"), Some("N"));
        assert_eq!(neo.designation(), "433");
        assert_eq!(neo.name(), Some("Eros"));
        assert_eq!(neo.diameter(), 16.84);
        assert!(!neo.hazardous());
        assert!(neo.approach_ids().is_empty());
    }

    #[test]
    fn test_empty_name_is_no_name() {
        let neo = NearEarthObject::new("2020 AB", Some(""), None, None);
        assert_eq!(neo.name(), None);
        assert_eq!(neo.full_name(), "2020 AB");
    }

    #[test]
    fn test_unknown_diameter_is_nan() {
        assert!(NearEarthObject::new("1", None, None, None).diameter().is_nan());
        assert!(NearEarthObject::new("1", None, Some(""), None).diameter().is_nan());
        assert!(NearEarthObject::new("1", None, Some("wide"), None).diameter().is_nan());
    }

    #[test]
    fn test_hazard_codes() {
        assert!(NearEarthObject::new("1", None, None, Some("Y")).hazardous());
        assert!(!NearEarthObject::new("1", None, None, Some("N")).hazardous());
        assert!(!NearEarthObject::new("1", None, None, Some("")).hazardous());
        assert!(!NearEarthObject::new("1", None, None, None).hazardous());
    }

    #[test]
    fn test_full_name_joins_designation_and_name() {
        let neo = NearEarthObject::new("433", Some("Eros"), None, None);
        assert_eq!(neo.full_name(), "433 (Eros)");
    }

    #[test]
    fn test_neo_display() {
        let neo = NearEarthObject::new("433", Some("Eros"), Some("16.84"), Some("N"));
        assert_eq!(
            neo.to_string(),
            "NEO 433 (Eros) has a diameter of 16.840 km and is not potentially hazardous."
        );

        let unknown = NearEarthObject::new("2020 AB", None, None, Some("Y"));
        assert_eq!(
            unknown.to_string(),
            "NEO 2020 AB has an unknown diameter and is potentially hazardous."
        );
    }

    #[test]
    fn test_approach_parses_compact_time() {
        let approach =
            CloseApproach::new("433", "2020-Jan-01 00:00", Some("0.15"), Some("5.2")).unwrap();
        assert_eq!(approach.time_str(), "2020-01-01 00:00");
        assert_eq!(approach.date(), NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(approach.distance(), 0.15);
        assert_eq!(approach.velocity(), 5.2);
        assert_eq!(approach.neo_id(), None);
    }

    #[test]
    fn test_approach_unknown_numbers() {
        let approach = CloseApproach::new("433", "1900-Dec-31 23:59", None, Some("")).unwrap();
        assert!(approach.distance().is_nan());
        assert!(approach.velocity().is_nan());
        assert_eq!(approach.time_str(), "1900-12-31 23:59");
    }

    #[test]
    fn test_malformed_time_is_fatal() {
        let err = CloseApproach::new("433", "2020-01-01T00:00", None, None).unwrap_err();
        assert!(matches!(err, DatabaseError::MalformedTime { ref value, .. } if value == "2020-01-01T00:00"));

        assert!(CloseApproach::new("433", "", None, None).is_err());
    }

    #[test]
    fn test_from_records() {
        let neo = NearEarthObject::from_record(NeoRecord {
            designation: "433".into(),
            name: Some("Eros".into()),
            diameter: Some("16.84".into()),
            hazardous: Some("Y".into()),
        });
        assert!(neo.hazardous());

        let approach = CloseApproach::from_record(ApproachRecord {
            designation: "433".into(),
            time: "2015-Jan-01 12:00".into(),
            distance: None,
            velocity: Some("5.2".into()),
        })
        .unwrap();
        assert_eq!(approach.designation(), "433");
        assert_eq!(approach.time_str(), "2015-01-01 12:00");
    }
}
