//! Nameplate constants and the resistance-temperature correction.

use serde::{Deserialize, Serialize};

use crate::{SlError, SlResult};

/// Temperature constant of copper windings (IEC 60034-1), in kelvin-equivalent
/// degrees Celsius. Aluminium windings use 225.
pub const COPPER_TEMPERATURE_CONSTANT: f64 = 235.0;

fn default_temperature_constant() -> f64 {
    COPPER_TEMPERATURE_CONSTANT
}

/// Nameplate and test-bench constants for one machine under test.
///
/// The stator resistance is a DC measurement taken at a known reference
/// temperature; both loss calculators correct it to the winding temperature
/// of the individual test run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorRating {
    pub rated_voltage_v: f64,
    pub pole_count: u32,
    pub frequency_hz: f64,
    /// Per-phase stator DC resistance at `resistance_ref_temp_c`.
    pub stator_resistance_ohm: f64,
    pub resistance_ref_temp_c: f64,
    /// Conductor temperature constant k in `R(T) = R_ref (T + k)/(T_ref + k)`.
    #[serde(default = "default_temperature_constant")]
    pub temperature_constant_k: f64,
}

impl MotorRating {
    pub fn validate(&self) -> SlResult<()> {
        if !self.rated_voltage_v.is_finite() || self.rated_voltage_v <= 0.0 {
            return Err(SlError::InvalidArg {
                what: "rated_voltage_v must be positive and finite",
            });
        }
        if self.pole_count == 0 || self.pole_count % 2 != 0 {
            return Err(SlError::InvalidArg {
                what: "pole_count must be a positive even number",
            });
        }
        if !self.frequency_hz.is_finite() || self.frequency_hz <= 0.0 {
            return Err(SlError::InvalidArg {
                what: "frequency_hz must be positive and finite",
            });
        }
        if !self.stator_resistance_ohm.is_finite() || self.stator_resistance_ohm <= 0.0 {
            return Err(SlError::InvalidArg {
                what: "stator_resistance_ohm must be positive and finite",
            });
        }
        if !self.temperature_constant_k.is_finite() || self.temperature_constant_k <= 0.0 {
            return Err(SlError::InvalidArg {
                what: "temperature_constant_k must be positive and finite",
            });
        }
        // T_ref + k is the correction denominator
        if self.resistance_ref_temp_c <= -self.temperature_constant_k {
            return Err(SlError::InvalidArg {
                what: "resistance_ref_temp_c must exceed -temperature_constant_k",
            });
        }
        Ok(())
    }

    /// `Ns = 120 f / p` in rpm.
    pub fn synchronous_speed_rpm(&self) -> f64 {
        120.0 * self.frequency_hz / self.pole_count as f64
    }

    /// Reference resistance corrected to `winding_temp_c` via the linear
    /// resistance-temperature relation.
    pub fn corrected_resistance_ohm(&self, winding_temp_c: f64) -> f64 {
        self.stator_resistance_ohm * (winding_temp_c + self.temperature_constant_k)
            / (self.resistance_ref_temp_c + self.temperature_constant_k)
    }
}

/// Per-run conditions recorded on the test sheet rather than in the
/// instrument export. The CSV carries electrical channels only, so the
/// winding temperature of the run is supplied alongside the file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestConditions {
    pub winding_temp_c: f64,
}

impl TestConditions {
    /// Conditions equal to the resistance reference temperature, making the
    /// correction the identity. Used when no temperature was recorded.
    pub fn at_reference(rating: &MotorRating) -> Self {
        Self {
            winding_temp_c: rating.resistance_ref_temp_c,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rating() -> MotorRating {
        MotorRating {
            rated_voltage_v: 380.0,
            pole_count: 4,
            frequency_hz: 50.0,
            stator_resistance_ohm: 0.4,
            resistance_ref_temp_c: 20.0,
            temperature_constant_k: COPPER_TEMPERATURE_CONSTANT,
        }
    }

    #[test]
    fn synchronous_speed_four_pole_50hz() {
        assert_eq!(rating().synchronous_speed_rpm(), 1500.0);
    }

    #[test]
    fn correction_is_identity_at_reference() {
        let r = rating();
        assert_eq!(r.corrected_resistance_ohm(20.0), 0.4);
    }

    #[test]
    fn correction_hand_value() {
        // 0.4 * (75 + 235) / (20 + 235)
        let r = rating();
        let got = r.corrected_resistance_ohm(75.0);
        assert!((got - 0.4 * 310.0 / 255.0).abs() < 1e-15);
    }

    #[test]
    fn validate_rejects_odd_pole_count() {
        let mut r = rating();
        r.pole_count = 3;
        assert!(r.validate().is_err());
    }

    #[test]
    fn validate_rejects_nonpositive_resistance() {
        let mut r = rating();
        r.stator_resistance_ohm = 0.0;
        assert!(r.validate().is_err());
    }

    proptest! {
        /// Higher winding temperature always gives higher corrected
        /// resistance (k > 0, T > -k).
        #[test]
        fn correction_is_monotonic(t1 in -100.0f64..300.0, dt in 0.01f64..200.0) {
            let r = rating();
            prop_assume!(t1 > -r.temperature_constant_k);
            let lo = r.corrected_resistance_ohm(t1);
            let hi = r.corrected_resistance_ohm(t1 + dt);
            prop_assert!(hi > lo);
        }
    }
}
