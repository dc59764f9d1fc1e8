//! Expected column schema and the per-column numeric-range policy.
//!
//! Hard requirements decide whether a value is usable at all; typical
//! ranges only flag suspicious-but-parsable values. Both are data, not
//! code, so a bench can ship its own policy file without a rebuild.

use serde::{Deserialize, Serialize};

/// Column order of every test-log export, no-load and load alike.
pub const EXPECTED_COLUMNS: [&str; 6] = ["STEP", "U", "I", "P1", "T", "N"];

/// Hard validity requirement for one column. Violations are Error-severity
/// and exclude the row from aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Requirement {
    /// Finite and strictly greater than zero.
    Positive,
    /// Finite and greater than or equal to zero.
    NonNegative,
    /// Any finite value.
    Finite,
}

impl Requirement {
    pub fn check(self, value: f64) -> bool {
        match self {
            Requirement::Positive => value.is_finite() && value > 0.0,
            Requirement::NonNegative => value.is_finite() && value >= 0.0,
            Requirement::Finite => value.is_finite(),
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Requirement::Positive => "must be positive and finite",
            Requirement::NonNegative => "must be non-negative and finite",
            Requirement::Finite => "must be finite",
        }
    }
}

/// Inclusive band of values considered normal for the instrument.
/// Values outside it are Warning-severity but stay usable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypicalRange {
    pub min: f64,
    pub max: f64,
}

impl TypicalRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnPolicy {
    pub column: String,
    pub requirement: Requirement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typical: Option<TypicalRange>,
}

/// The full per-column policy table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    pub columns: Vec<ColumnPolicy>,
}

impl ValidationPolicy {
    pub fn column(&self, name: &str) -> Option<&ColumnPolicy> {
        self.columns.iter().find(|c| c.column == name)
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        fn col(
            column: &str,
            requirement: Requirement,
            typical: Option<(f64, f64)>,
        ) -> ColumnPolicy {
            ColumnPolicy {
                column: column.to_string(),
                requirement,
                typical: typical.map(|(min, max)| TypicalRange { min, max }),
            }
        }

        // Defaults sized for low-voltage industrial machines; benches
        // outside that envelope override via a policy file.
        Self {
            columns: vec![
                col("STEP", Requirement::Positive, Some((1.0, 200.0))),
                col("U", Requirement::Positive, Some((10.0, 1200.0))),
                col("I", Requirement::NonNegative, Some((0.0, 2000.0))),
                col("P1", Requirement::Positive, Some((1.0, 5.0e6))),
                // No-load runs log torque as near-zero filler, sometimes
                // fractionally negative from transducer offset.
                col("T", Requirement::Finite, Some((-10.0, 5.0e4))),
                col("N", Requirement::Positive, Some((100.0, 3.0e4))),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_covers_every_expected_column() {
        let policy = ValidationPolicy::default();
        for name in EXPECTED_COLUMNS {
            assert!(policy.column(name).is_some(), "missing policy for {name}");
        }
    }

    #[test]
    fn requirement_check_semantics() {
        assert!(Requirement::Positive.check(0.1));
        assert!(!Requirement::Positive.check(0.0));
        assert!(Requirement::NonNegative.check(0.0));
        assert!(!Requirement::NonNegative.check(-0.1));
        assert!(Requirement::Finite.check(-5.0));
        assert!(!Requirement::Finite.check(f64::INFINITY));
        assert!(!Requirement::Positive.check(f64::NAN));
    }

    #[test]
    fn policy_roundtrips_through_yaml() {
        let policy = ValidationPolicy::default();
        let yaml = serde_yaml::to_string(&policy).unwrap();
        let back: ValidationPolicy = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(policy, back);
    }
}
