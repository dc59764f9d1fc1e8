//! No-load loss chain: resistance correction, stator copper loss,
//! corrected no-load input power.

use serde::{Deserialize, Serialize};
use sl_core::{MotorRating, TestConditions};

use crate::aggregate::StepAverage;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoLoadResult {
    /// Voltage step id (% of rated voltage).
    pub step_pct: f64,
    pub voltage_v: f64,
    pub corrected_resistance_ohm: f64,
    pub stator_copper_loss_w: f64,
    /// Measured input power minus stator copper loss. Feeds the
    /// friction/windage vs iron split.
    pub corrected_power_w: f64,
}

/// One result per step, same order as the input averages.
pub fn compute_no_load(
    steps: &[StepAverage],
    rating: &MotorRating,
    conditions: &TestConditions,
) -> Vec<NoLoadResult> {
    steps
        .iter()
        .map(|step| {
            let corrected_resistance_ohm =
                rating.corrected_resistance_ohm(conditions.winding_temp_c);
            // Three-phase, balanced: 3 I^2 R per-phase
            let stator_copper_loss_w =
                3.0 * step.current_a * step.current_a * corrected_resistance_ohm;
            NoLoadResult {
                step_pct: step.step_pct,
                voltage_v: step.voltage_v,
                corrected_resistance_ohm,
                stator_copper_loss_w,
                corrected_power_w: step.power_w - stator_copper_loss_w,
            }
        })
        .collect()
}
