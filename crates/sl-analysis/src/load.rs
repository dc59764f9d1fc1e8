//! Load-test loss chain: slip, copper losses, residual loss per step.

use serde::{Deserialize, Serialize};
use sl_core::{MotorRating, TestConditions, shaft_power_w};

use crate::aggregate::StepAverage;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadResult {
    /// Load step id (% of rated load).
    pub step_pct: f64,
    pub torque_nm: f64,
    /// Shaft output power P2 derived from torque and measured speed.
    pub output_power_w: f64,
    pub sync_speed_rpm: f64,
    pub slip: f64,
    pub corrected_resistance_ohm: f64,
    pub stator_copper_loss_w: f64,
    pub rotor_copper_loss_w: f64,
    /// Input power minus output power and both copper losses. Input to
    /// the stray-load regression.
    pub residual_loss_w: f64,
}

/// One result per step, same order as the input averages.
pub fn compute_load(
    steps: &[StepAverage],
    rating: &MotorRating,
    conditions: &TestConditions,
) -> Vec<LoadResult> {
    let sync_speed_rpm = rating.synchronous_speed_rpm();

    steps
        .iter()
        .map(|step| {
            let slip = (sync_speed_rpm - step.speed_rpm) / sync_speed_rpm;
            let corrected_resistance_ohm =
                rating.corrected_resistance_ohm(conditions.winding_temp_c);
            let stator_copper_loss_w =
                3.0 * step.current_a * step.current_a * corrected_resistance_ohm;
            // Rotor copper loss is slip times air-gap power
            let airgap_power_w = step.power_w - stator_copper_loss_w;
            let rotor_copper_loss_w = slip * airgap_power_w;
            let output_power_w = shaft_power_w(step.torque_nm, step.speed_rpm);
            let residual_loss_w =
                step.power_w - output_power_w - stator_copper_loss_w - rotor_copper_loss_w;
            LoadResult {
                step_pct: step.step_pct,
                torque_nm: step.torque_nm,
                output_power_w,
                sync_speed_rpm,
                slip,
                corrected_resistance_ohm,
                stator_copper_loss_w,
                rotor_copper_loss_w,
                residual_loss_w,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sl_core::COPPER_TEMPERATURE_CONSTANT;

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

    fn step(step_pct: f64, current_a: f64, power_w: f64, torque_nm: f64, speed_rpm: f64) -> StepAverage {
        StepAverage {
            step_pct,
            voltage_v: 380.0,
            current_a,
            power_w,
            torque_nm,
            speed_rpm,
            sample_count: 1,
        }
    }

    #[test]
    fn slip_from_measured_speed() {
        let r = rating();
        let conditions = TestConditions::at_reference(&r);
        let results = compute_load(&[step(100.0, 20.0, 12000.0, 70.0, 1455.0)], &r, &conditions);
        assert_eq!(results[0].sync_speed_rpm, 1500.0);
        assert!((results[0].slip - 0.03).abs() < 1e-12);
    }

    #[test]
    fn loss_chain_hand_calc() {
        let r = rating();
        let conditions = TestConditions::at_reference(&r);
        let results = compute_load(&[step(100.0, 20.0, 12000.0, 70.0, 1455.0)], &r, &conditions);
        let got = results[0];

        // Pcu_s = 3 * 400 * 0.4 = 480 W
        assert_eq!(got.stator_copper_loss_w, 480.0);
        // Pcu_r = 0.03 * (12000 - 480) = 345.6 W
        assert!((got.rotor_copper_loss_w - 345.6).abs() < 1e-9);
        // P2 = 70 * 1455 * 2pi/60
        let p2 = 70.0 * 1455.0 * 2.0 * std::f64::consts::PI / 60.0;
        assert!((got.output_power_w - p2).abs() < 1e-9);
        // Residual closes the power balance
        let residual = 12000.0 - p2 - 480.0 - got.rotor_copper_loss_w;
        assert!((got.residual_loss_w - residual).abs() < 1e-9);
    }

    #[test]
    fn identical_steps_give_identical_slip_and_residual() {
        let r = rating();
        let conditions = TestConditions::at_reference(&r);
        let steps: Vec<StepAverage> = [125.0, 115.0, 100.0, 75.0, 50.0, 25.0]
            .iter()
            .map(|&id| step(id, 10.0, 1200.0, 50.0, 1500.0))
            .collect();
        let results = compute_load(&steps, &r, &conditions);
        assert_eq!(results.len(), 6);
        for pair in results.windows(2) {
            assert_eq!(pair[0].slip, pair[1].slip);
            assert_eq!(pair[0].residual_loss_w, pair[1].residual_loss_w);
        }
        // At exactly synchronous speed the slip is zero.
        assert_eq!(results[0].slip, 0.0);
    }

    #[test]
    fn synchronous_speed_six_pole() {
        let mut r = rating();
        r.pole_count = 6;
        let conditions = TestConditions::at_reference(&r);
        let results = compute_load(&[step(100.0, 20.0, 12000.0, 70.0, 970.0)], &r, &conditions);
        assert_eq!(results[0].sync_speed_rpm, 1000.0);
        assert!((results[0].slip - 0.03).abs() < 1e-12);
    }
}
