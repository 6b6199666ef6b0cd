//! Attribute filters over close approaches
//!
//! An [`AttributeFilter`] compares one attribute of a close approach (or of
//! its linked NEO) against a reference value, with the attribute on the
//! left and the reference on the right:
//!
//! | Criterion | Attribute |
//! |---|---|
//! | `date` | calendar date of the approach |
//! | `distance` | approach distance (au) |
//! | `velocity` | relative velocity (km/s) |
//! | `diameter` | diameter of the linked NEO (km) |
//! | `hazardous` | hazard flag of the linked NEO |
//!
//! Filters are pure and combine by conjunction inside
//! [`NeoDatabase::query`](crate::NeoDatabase::query).

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DatabaseError;
use crate::store::ApproachRef;

/// Comparison applied as `attribute OP reference`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    Eq,
    Le,
    Ge,
}

impl Comparator {
    /// Comparisons against NaN are always false
    pub fn apply<T: PartialOrd + ?Sized>(self, lhs: &T, rhs: &T) -> bool {
        match self {
            Comparator::Eq => lhs == rhs,
            Comparator::Le => lhs <= rhs,
            Comparator::Ge => lhs >= rhs,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Le => "<=",
            Comparator::Ge => ">=",
        }
    }
}

/// The attribute a filter extracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    Date,
    Distance,
    Velocity,
    Diameter,
    Hazardous,
}

impl Criterion {
    pub fn as_str(self) -> &'static str {
        match self {
            Criterion::Date => "date",
            Criterion::Distance => "distance",
            Criterion::Velocity => "velocity",
            Criterion::Diameter => "diameter",
            Criterion::Hazardous => "hazardous",
        }
    }
}

impl FromStr for Criterion {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(Criterion::Date),
            "distance" | "dist" => Ok(Criterion::Distance),
            "velocity" | "v_rel" => Ok(Criterion::Velocity),
            "diameter" => Ok(Criterion::Diameter),
            "hazardous" | "pha" => Ok(Criterion::Hazardous),
            other => Err(DatabaseError::UnsupportedCriterion(format!(
                "unknown criterion '{}'",
                other
            ))),
        }
    }
}

/// Untyped reference value, checked against a criterion by [`AttributeFilter::new`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterValue {
    Date(NaiveDate),
    Float(f64),
    Bool(bool),
}

/// One user criterion over a close approach
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeFilter {
    Date { op: Comparator, value: NaiveDate },
    Distance { op: Comparator, value: f64 },
    Velocity { op: Comparator, value: f64 },
    Diameter { op: Comparator, value: f64 },
    Hazardous { op: Comparator, value: bool },
}

impl AttributeFilter {
    /// Build a filter from an untyped value
    ///
    /// Fails with [`DatabaseError::UnsupportedCriterion`] when the value type
    /// does not fit the criterion.
    pub fn new(criterion: Criterion, op: Comparator, value: FilterValue) -> Result<Self, DatabaseError> {
        match (criterion, value) {
            (Criterion::Date, FilterValue::Date(value)) => Ok(AttributeFilter::Date { op, value }),
            (Criterion::Distance, FilterValue::Float(value)) => {
                Ok(AttributeFilter::Distance { op, value })
            }
            (Criterion::Velocity, FilterValue::Float(value)) => {
                Ok(AttributeFilter::Velocity { op, value })
            }
            (Criterion::Diameter, FilterValue::Float(value)) => {
                Ok(AttributeFilter::Diameter { op, value })
            }
            (Criterion::Hazardous, FilterValue::Bool(value)) => {
                Ok(AttributeFilter::Hazardous { op, value })
            }
            (criterion, value) => Err(DatabaseError::UnsupportedCriterion(format!(
                "{} cannot be compared with {:?}",
                criterion.as_str(),
                value
            ))),
        }
    }

    pub fn criterion(&self) -> Criterion {
        match self {
            AttributeFilter::Date { .. } => Criterion::Date,
            AttributeFilter::Distance { .. } => Criterion::Distance,
            AttributeFilter::Velocity { .. } => Criterion::Velocity,
            AttributeFilter::Diameter { .. } => Criterion::Diameter,
            AttributeFilter::Hazardous { .. } => Criterion::Hazardous,
        }
    }

    pub fn op(&self) -> Comparator {
        match *self {
            AttributeFilter::Date { op, .. }
            | AttributeFilter::Distance { op, .. }
            | AttributeFilter::Velocity { op, .. }
            | AttributeFilter::Diameter { op, .. }
            | AttributeFilter::Hazardous { op, .. } => op,
        }
    }

    /// Whether `approach` satisfies this criterion
    pub fn matches(&self, approach: &ApproachRef<'_>) -> bool {
        match self {
            AttributeFilter::Date { op, value } => op.apply(&approach.date(), value),
            AttributeFilter::Distance { op, value } => op.apply(&approach.distance(), value),
            AttributeFilter::Velocity { op, value } => op.apply(&approach.velocity(), value),
            AttributeFilter::Diameter { op, value } => op.apply(&approach.neo().diameter(), value),
            AttributeFilter::Hazardous { op, value } => {
                op.apply(&approach.neo().hazardous(), value)
            }
        }
    }
}

impl fmt::Display for AttributeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.criterion().as_str(), self.op().symbol())?;
        match self {
            AttributeFilter::Date { value, .. } => write!(f, "{}", value),
            AttributeFilter::Distance { value, .. }
            | AttributeFilter::Velocity { value, .. }
            | AttributeFilter::Diameter { value, .. } => write!(f, "{}", value),
            AttributeFilter::Hazardous { value, .. } => write!(f, "{}", value),
        }
    }
}

/// Parses expressions like `distance<=0.1`, `date=2020-01-01` or `hazardous=true`
impl FromStr for AttributeFilter {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, op, raw) = split_expression(s).ok_or_else(|| {
            DatabaseError::UnsupportedCriterion(format!(
                "expected <criterion><op><value> with op one of =, <=, >=, got '{}'",
                s
            ))
        })?;

        let criterion: Criterion = name.parse()?;
        let invalid = || {
            DatabaseError::UnsupportedCriterion(format!(
                "invalid value '{}' for {}",
                raw,
                criterion.as_str()
            ))
        };
        let value = match criterion {
            Criterion::Date => FilterValue::Date(
                NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?,
            ),
            Criterion::Distance | Criterion::Velocity | Criterion::Diameter => {
                FilterValue::Float(raw.parse().map_err(|_| invalid())?)
            }
            Criterion::Hazardous => FilterValue::Bool(raw.parse().map_err(|_| invalid())?),
        };

        AttributeFilter::new(criterion, op, value)
    }
}

fn split_expression(s: &str) -> Option<(&str, Comparator, &str)> {
    // Two-character operators first so `<=` is not read as `=`
    for (token, op) in [("<=", Comparator::Le), (">=", Comparator::Ge), ("=", Comparator::Eq)] {
        if let Some((name, value)) = s.split_once(token) {
            let (name, value) = (name.trim(), value.trim());
            if name.is_empty() || value.is_empty() {
                return None;
            }
            return Some((name, op, value));
        }
    }
    None
}

/// The user's query options; `None` means not specified
///
/// `hazardous: Some(false)` asks for non-hazardous NEOs and is distinct
/// from `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub distance_min: Option<f64>,
    pub distance_max: Option<f64>,
    pub velocity_min: Option<f64>,
    pub velocity_max: Option<f64>,
    pub diameter_min: Option<f64>,
    pub diameter_max: Option<f64>,
    pub hazardous: Option<bool>,
}

/// Turn query options into filters, one per specified option, in field order
pub fn create_filters(criteria: &FilterCriteria) -> Vec<AttributeFilter> {
    use AttributeFilter as F;
    use Comparator::{Eq, Ge, Le};

    [
        criteria.date.map(|value| F::Date { op: Eq, value }),
        criteria.start_date.map(|value| F::Date { op: Ge, value }),
        criteria.end_date.map(|value| F::Date { op: Le, value }),
        criteria.distance_min.map(|value| F::Distance { op: Ge, value }),
        criteria.distance_max.map(|value| F::Distance { op: Le, value }),
        criteria.velocity_min.map(|value| F::Velocity { op: Ge, value }),
        criteria.velocity_max.map(|value| F::Velocity { op: Le, value }),
        criteria.diameter_min.map(|value| F::Diameter { op: Ge, value }),
        criteria.diameter_max.map(|value| F::Diameter { op: Le, value }),
        criteria.hazardous.map(|value| F::Hazardous { op: Eq, value }),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Yield at most `n` items; `None` or `Some(0)` means no limit
///
/// Items past the limit are never pulled from `iter`.
pub fn limit<I: Iterator>(iter: I, n: Option<usize>) -> std::iter::Take<I> {
    match n {
        None | Some(0) => iter.take(usize::MAX),
        Some(n) => iter.take(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_comparator_operand_order() {
        // attribute on the left, reference on the right
        assert!(Comparator::Le.apply(&1.0, &2.0));
        assert!(!Comparator::Ge.apply(&1.0, &2.0));
        assert!(Comparator::Eq.apply(&true, &true));
    }

    #[test]
    fn test_comparator_nan_never_matches() {
        for op in [Comparator::Eq, Comparator::Le, Comparator::Ge] {
            assert!(!op.apply(&f64::NAN, &1.0));
        }
    }

    #[test]
    fn test_no_criteria_no_filters() {
        assert!(create_filters(&FilterCriteria::default()).is_empty());
    }

    #[test]
    fn test_create_filters_in_field_order() {
        let criteria = FilterCriteria {
            date: Some(date(2020, 1, 1)),
            start_date: Some(date(2019, 1, 1)),
            end_date: Some(date(2021, 1, 1)),
            distance_min: Some(0.1),
            distance_max: Some(0.2),
            velocity_min: Some(1.0),
            velocity_max: Some(2.0),
            diameter_min: Some(3.0),
            diameter_max: Some(4.0),
            hazardous: Some(false),
        };
        let filters = create_filters(&criteria);
        assert_eq!(
            filters,
            vec![
                AttributeFilter::Date { op: Comparator::Eq, value: date(2020, 1, 1) },
                AttributeFilter::Date { op: Comparator::Ge, value: date(2019, 1, 1) },
                AttributeFilter::Date { op: Comparator::Le, value: date(2021, 1, 1) },
                AttributeFilter::Distance { op: Comparator::Ge, value: 0.1 },
                AttributeFilter::Distance { op: Comparator::Le, value: 0.2 },
                AttributeFilter::Velocity { op: Comparator::Ge, value: 1.0 },
                AttributeFilter::Velocity { op: Comparator::Le, value: 2.0 },
                AttributeFilter::Diameter { op: Comparator::Ge, value: 3.0 },
                AttributeFilter::Diameter { op: Comparator::Le, value: 4.0 },
                AttributeFilter::Hazardous { op: Comparator::Eq, value: false },
            ]
        );
    }

    #[test]
    fn test_not_hazardous_is_a_criterion() {
        let criteria = FilterCriteria {
            hazardous: Some(false),
            ..Default::default()
        };
        assert_eq!(
            create_filters(&criteria),
            vec![AttributeFilter::Hazardous { op: Comparator::Eq, value: false }]
        );
    }

    #[test]
    fn test_criteria_from_json() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"start_date": "2020-01-01", "diameter_max": 1.5}"#).unwrap();
        assert_eq!(criteria.start_date, Some(date(2020, 1, 1)));
        assert_eq!(criteria.diameter_max, Some(1.5));
        assert_eq!(create_filters(&criteria).len(), 2);
    }

    #[test]
    fn test_new_rejects_mismatched_value() {
        let err = AttributeFilter::new(Criterion::Date, Comparator::Eq, FilterValue::Float(1.0))
            .unwrap_err();
        assert!(matches!(err, DatabaseError::UnsupportedCriterion(_)));

        let ok = AttributeFilter::new(Criterion::Hazardous, Comparator::Eq, FilterValue::Bool(true))
            .unwrap();
        assert_eq!(ok.criterion(), Criterion::Hazardous);
    }

    #[test]
    fn test_parse_expressions() {
        let f: AttributeFilter = "distance<=0.1".parse().unwrap();
        assert_eq!(f, AttributeFilter::Distance { op: Comparator::Le, value: 0.1 });

        let f: AttributeFilter = "date = 2020-01-01".parse().unwrap();
        assert_eq!(f, AttributeFilter::Date { op: Comparator::Eq, value: date(2020, 1, 1) });

        let f: AttributeFilter = "hazardous=true".parse().unwrap();
        assert_eq!(f, AttributeFilter::Hazardous { op: Comparator::Eq, value: true });

        let f: AttributeFilter = "diameter>=1.5".parse().unwrap();
        assert_eq!(f.to_string(), "diameter>=1.5");
    }

    #[test]
    fn test_parse_rejects_bad_expressions() {
        for bad in ["mass>=3", "distance<0.1", "distance<=", "hazardous=maybe", "date=01/02/2020"] {
            let err = bad.parse::<AttributeFilter>().unwrap_err();
            assert!(matches!(err, DatabaseError::UnsupportedCriterion(_)), "{}", bad);
        }
    }

    #[test]
    fn test_limit_bounds() {
        let v: Vec<_> = limit(1..=5, Some(2)).collect();
        assert_eq!(v, vec![1, 2]);
        assert_eq!(limit(1..=5, Some(0)).count(), 5);
        assert_eq!(limit(1..=5, None).count(), 5);
        assert_eq!(limit(1..=5, Some(10)).count(), 5);
    }

    #[test]
    fn test_limit_does_not_pull_past_bound() {
        let mut pulled = 0;
        let taken: Vec<_> = limit(
            (0..100).inspect(|_| pulled += 1),
            Some(3),
        )
        .collect();
        assert_eq!(taken, vec![0, 1, 2]);
        assert_eq!(pulled, 3);
    }
}
