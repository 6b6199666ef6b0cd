//! End-to-end scenarios through the re-exported API

use neodb::{
    create_filters, limit, ApproachRecord, AttributeFilter, Comparator, DatabaseError,
    FilterCriteria, NearEarthObject, NeoDatabase, NeoRecord,
};
use serde_json::json;

fn neo_row(designation: &str, name: &str, diameter: &str, hazardous: &str) -> NeoRecord {
    let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
    NeoRecord {
        designation: designation.into(),
        name: opt(name),
        diameter: opt(diameter),
        hazardous: opt(hazardous),
    }
}

fn approach_row(designation: &str, time: &str, distance: &str, velocity: &str) -> ApproachRecord {
    ApproachRecord {
        designation: designation.into(),
        time: time.into(),
        distance: Some(distance.into()),
        velocity: Some(velocity.into()),
    }
}

#[test]
fn test_eros_diameter_scenario() {
    let db = NeoDatabase::from_records(
        vec![neo_row("433", "Eros", "16.84", "N")],
        vec![approach_row("433", "2020-Jan-01 00:00", "0.15", "5.2")],
    )
    .unwrap();

    let eros = db.get_neo_by_designation("433").unwrap();
    assert_eq!(eros.full_name(), "433 (Eros)");
    assert_eq!(eros.approaches().count(), 1);

    let at_least_10 = [AttributeFilter::Diameter { op: Comparator::Ge, value: 10.0 }];
    assert_eq!(db.query(&at_least_10).count(), 1);

    let at_least_20 = [AttributeFilter::Diameter { op: Comparator::Ge, value: 20.0 }];
    assert_eq!(db.query(&at_least_20).count(), 0);
}

#[test]
fn test_unlinkable_approach_scenario() {
    let err = NeoDatabase::from_records(
        vec![neo_row("433", "Eros", "16.84", "N")],
        vec![approach_row("999", "2020-Jan-01 00:00", "0.15", "5.2")],
    )
    .unwrap_err();
    assert!(matches!(err, DatabaseError::UnlinkableApproach { ref designation, .. } if designation == "999"));
}

#[test]
fn test_empty_name_scenario() {
    let db = NeoDatabase::from_records(
        vec![neo_row("2020 AB", "", "", ""), neo_row("2020 CD", "", "", "")],
        vec![],
    )
    .unwrap();
    assert!(db.get_neo_by_name("").is_none());
    assert!(db.get_neo_by_name(None).is_none());
    assert!(db.get_neo_by_designation("2020 CD").is_some());
}

#[test]
fn test_hazard_code_scenario() {
    assert!(NearEarthObject::new("1", None, None, Some("Y")).hazardous());
    assert!(!NearEarthObject::new("1", None, None, Some("N")).hazardous());
    assert!(!NearEarthObject::new("1", None, None, Some("")).hazardous());
    assert!(!NearEarthObject::new("1", None, None, None).hazardous());
}

#[test]
fn test_criteria_from_config_json() {
    let db = NeoDatabase::from_records(
        vec![
            neo_row("433", "Eros", "16.84", "N"),
            neo_row("99942", "Apophis", "0.37", "Y"),
        ],
        vec![
            approach_row("433", "2020-Jan-01 00:00", "0.15", "5.2"),
            approach_row("99942", "2029-Apr-13 21:46", "0.000254", "7.42"),
            approach_row("99942", "2036-Mar-27 06:52", "0.0207", "4.1"),
        ],
    )
    .unwrap();

    let criteria: FilterCriteria = serde_json::from_value(json!({
        "start_date": "2025-01-01",
        "hazardous": true,
    }))
    .unwrap();
    let filters = create_filters(&criteria);

    let times: Vec<_> = db.query(&filters).map(|a| a.time_str()).collect();
    assert_eq!(times, vec!["2029-04-13 21:46", "2036-03-27 06:52"]);

    let first: Vec<_> = limit(db.query(&filters), Some(1)).collect();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].neo().name(), Some("Apophis"));
}
