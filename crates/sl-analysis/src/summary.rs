//! Final report assembly: friction/windage vs iron split and per-step
//! efficiency.

use serde::{Deserialize, Serialize};
use sl_core::MotorRating;
use sl_table::ValidationMessage;

use crate::load::LoadResult;
use crate::no_load::NoLoadResult;
use crate::regression::{AdditionalLossPoint, fit_line};
use crate::{AnalysisError, AnalysisResult};

/// How the no-load curve is extrapolated to separate friction/windage
/// from iron loss. The reference method fits corrected no-load power
/// against voltage squared; fitting against voltage directly is kept as
/// an alternative for benches whose documentation prescribes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FwSplitMethod {
    #[default]
    VoltageSquared,
    Voltage,
}

impl FwSplitMethod {
    fn abscissa(self, voltage_v: f64) -> f64 {
        match self {
            FwSplitMethod::VoltageSquared => voltage_v * voltage_v,
            FwSplitMethod::Voltage => voltage_v,
        }
    }
}

/// Speed-dependent-only loss (intercept at zero voltage) and the
/// voltage-dependent remainder at rated voltage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossSplit {
    pub friction_windage_w: f64,
    pub iron_w: f64,
}

/// Split the corrected no-load power curve into friction/windage and
/// iron loss by extrapolating to zero voltage.
pub fn split_no_load_losses(
    no_load: &[NoLoadResult],
    rated_voltage_v: f64,
    method: FwSplitMethod,
) -> AnalysisResult<(LossSplit, Vec<ValidationMessage>)> {
    if no_load.is_empty() {
        return Err(AnalysisError::EmptyNoLoadCurve);
    }

    let mut messages = Vec::new();
    let points: Vec<(f64, f64)> = no_load
        .iter()
        .map(|p| (method.abscissa(p.voltage_v), p.corrected_power_w))
        .collect();

    let (friction_windage_w, iron_w) = match fit_line(&points) {
        Some(fit) => {
            let fw = fit.intercept;
            let iron = fit.value_at(method.abscissa(rated_voltage_v)) - fw;
            (fw, iron)
        }
        None => {
            messages.push(ValidationMessage::warning(
                None,
                None,
                "Fewer than 2 distinct no-load voltage steps; friction/windage taken as the \
                 lowest-voltage corrected power",
            ));
            // With no curve to extrapolate, attribute the lowest-voltage
            // corrected power wholly to friction/windage and the remainder
            // at the step closest to rated voltage to iron.
            let lowest = no_load
                .iter()
                .min_by(|a, b| a.voltage_v.total_cmp(&b.voltage_v))
                .copied()
                .unwrap_or(no_load[0]);
            let nearest_rated = no_load
                .iter()
                .min_by(|a, b| {
                    (a.voltage_v - rated_voltage_v)
                        .abs()
                        .total_cmp(&(b.voltage_v - rated_voltage_v).abs())
                })
                .copied()
                .unwrap_or(no_load[0]);
            (
                lowest.corrected_power_w,
                nearest_rated.corrected_power_w - lowest.corrected_power_w,
            )
        }
    };

    let friction_windage_w = floor_loss(friction_windage_w, "friction/windage", &mut messages);
    let iron_w = floor_loss(iron_w, "iron", &mut messages);

    Ok((
        LossSplit {
            friction_windage_w,
            iron_w,
        },
        messages,
    ))
}

fn floor_loss(value: f64, what: &str, messages: &mut Vec<ValidationMessage>) -> f64 {
    if value < 0.0 {
        messages.push(ValidationMessage::warning(
            None,
            None,
            format!("Negative {what} loss {value:.3} W floored to 0"),
        ));
        0.0
    } else {
        value
    }
}

/// One row of the compliance report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalSummaryRow {
    pub load_pct: f64,
    pub corrected_resistance_ohm: f64,
    pub stator_copper_loss_w: f64,
    pub rotor_copper_loss_w: f64,
    pub residual_loss_w: f64,
    pub additional_loss_w: f64,
    pub friction_windage_loss_w: f64,
    pub iron_loss_w: f64,
    pub efficiency_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryOutcome {
    /// Rows ordered by ascending load step.
    pub rows: Vec<FinalSummaryRow>,
    pub split: LossSplit,
    pub messages: Vec<ValidationMessage>,
}

/// Combine both test files and the regression output into report rows.
///
/// `additional` must carry exactly one point per load step, in the same
/// order the load results were computed.
pub fn build_summary(
    no_load: &[NoLoadResult],
    loads: &[LoadResult],
    additional: &[AdditionalLossPoint],
    rating: &MotorRating,
    method: FwSplitMethod,
) -> AnalysisResult<SummaryOutcome> {
    if loads.len() != additional.len() {
        return Err(AnalysisError::PointCountMismatch {
            loads: loads.len(),
            points: additional.len(),
        });
    }

    let (split, mut messages) = split_no_load_losses(no_load, rating.rated_voltage_v, method)?;

    let mut rows = Vec::with_capacity(loads.len());
    for (load, extra) in loads.iter().zip(additional) {
        if load.step_pct.to_bits() != extra.step_pct.to_bits() {
            return Err(AnalysisError::StepMismatch {
                step_pct: load.step_pct,
            });
        }

        let p2 = load.output_power_w;
        let total_loss = load.stator_copper_loss_w
            + load.rotor_copper_loss_w
            + extra.additional_loss_w
            + split.friction_windage_w
            + split.iron_w;
        let efficiency_pct = p2 / (p2 + total_loss) * 100.0;

        if !(efficiency_pct > 0.0 && efficiency_pct <= 100.0) {
            messages.push(ValidationMessage::warning(
                None,
                None,
                format!(
                    "Efficiency {efficiency_pct:.2}% at load step {} outside (0, 100]",
                    load.step_pct
                ),
            ));
        }

        rows.push(FinalSummaryRow {
            load_pct: load.step_pct,
            corrected_resistance_ohm: load.corrected_resistance_ohm,
            stator_copper_loss_w: load.stator_copper_loss_w,
            rotor_copper_loss_w: load.rotor_copper_loss_w,
            residual_loss_w: load.residual_loss_w,
            additional_loss_w: extra.additional_loss_w,
            friction_windage_loss_w: split.friction_windage_w,
            iron_loss_w: split.iron_w,
            efficiency_pct,
        });
    }

    rows.sort_by(|a, b| a.load_pct.total_cmp(&b.load_pct));

    Ok(SummaryOutcome {
        rows,
        split,
        messages,
    })
}
