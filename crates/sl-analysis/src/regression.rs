//! Stray-load loss separation.
//!
//! The measured residual loss mixes a torque-dependent stray-load trend
//! with measurement scatter. Fitting residual loss against torque^2 and
//! reading each step back off the line removes the scatter; with fewer
//! than two distinct torque^2 values there is nothing to fit and the
//! measured residuals are used as-is.

use serde::{Deserialize, Serialize};
use sl_table::ValidationMessage;

use crate::load::LoadResult;

/// Ordinary least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LineFit {
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Closed-form normal equations; point counts here are single digits,
/// so no iterative solver is warranted. Returns `None` for fewer than
/// two distinct x values.
pub fn fit_line(points: &[(f64, f64)]) -> Option<LineFit> {
    let first_x = points.first()?.0;
    if !points.iter().any(|p| p.0 != first_x) {
        return None;
    }

    let n = points.len() as f64;
    let sx: f64 = points.iter().map(|p| p.0).sum();
    let sy: f64 = points.iter().map(|p| p.1).sum();
    let sxx: f64 = points.iter().map(|p| p.0 * p.0).sum();
    let sxy: f64 = points.iter().map(|p| p.0 * p.1).sum();

    let denom = n * sxx - sx * sx;
    if denom == 0.0 {
        return None;
    }
    let slope = (n * sxy - sx * sy) / denom;
    let intercept = (sy - slope * sx) / n;
    Some(LineFit { slope, intercept })
}

/// Reconstructed stray-load loss for one load step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdditionalLossPoint {
    pub step_pct: f64,
    pub torque_squared: f64,
    pub additional_loss_w: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegressionOutcome {
    /// `None` when the point set was degenerate and the fallback applied.
    pub fit: Option<LineFit>,
    pub points: Vec<AdditionalLossPoint>,
    pub messages: Vec<ValidationMessage>,
}

pub fn separate_additional_loss(loads: &[LoadResult]) -> RegressionOutcome {
    let fit_points: Vec<(f64, f64)> = loads
        .iter()
        .map(|l| (l.torque_nm * l.torque_nm, l.residual_loss_w))
        .collect();

    let mut messages = Vec::new();
    let fit = fit_line(&fit_points);
    if fit.is_none() && !loads.is_empty() {
        messages.push(ValidationMessage::warning(
            None,
            None,
            "Fewer than 2 distinct torque^2 values; additional loss taken as measured \
             residual loss per step",
        ));
    }

    let points = loads
        .iter()
        .zip(&fit_points)
        .map(|(load, &(torque_squared, residual))| {
            // Only fitted values are floored; the fallback reports the
            // measurement as-is.
            let additional_loss_w = match &fit {
                Some(line) => {
                    let fitted = line.value_at(torque_squared);
                    if fitted < 0.0 {
                        messages.push(ValidationMessage::warning(
                            None,
                            None,
                            format!(
                                "Negative fitted loss {fitted:.3} W at load step {} floored to 0",
                                load.step_pct
                            ),
                        ));
                        0.0
                    } else {
                        fitted
                    }
                }
                None => residual,
            };
            AdditionalLossPoint {
                step_pct: load.step_pct,
                torque_squared,
                additional_loss_w,
            }
        })
        .collect();

    RegressionOutcome {
        fit,
        points,
        messages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sl_table::Severity;

    fn load_point(step_pct: f64, torque_nm: f64, residual_loss_w: f64) -> LoadResult {
        LoadResult {
            step_pct,
            torque_nm,
            output_power_w: 0.0,
            sync_speed_rpm: 1500.0,
            slip: 0.02,
            corrected_resistance_ohm: 0.4,
            stator_copper_loss_w: 0.0,
            rotor_copper_loss_w: 0.0,
            residual_loss_w,
        }
    }

    #[test]
    fn exact_recovery_of_a_linear_point_set() {
        // residual = 0.05 * tau^2 + 12
        let loads: Vec<LoadResult> = [10.0, 20.0, 30.0, 40.0]
            .iter()
            .map(|&tau| load_point(tau, tau, 0.05 * tau * tau + 12.0))
            .collect();
        let outcome = separate_additional_loss(&loads);
        let fit = outcome.fit.unwrap();
        assert!((fit.slope - 0.05).abs() < 1e-9);
        assert!((fit.intercept - 12.0).abs() < 1e-9);
        for (point, load) in outcome.points.iter().zip(&loads) {
            assert!((point.additional_loss_w - load.residual_loss_w).abs() < 1e-9);
        }
        assert!(outcome.messages.is_empty());
    }

    #[test]
    fn repeated_torque_takes_the_fallback() {
        // One distinct torque^2 value: no line, no division by zero.
        let loads: Vec<LoadResult> = (0..6).map(|_| load_point(100.0, 50.0, 80.0)).collect();
        let outcome = separate_additional_loss(&loads);
        assert!(outcome.fit.is_none());
        assert_eq!(outcome.points.len(), 6);
        for point in &outcome.points {
            assert_eq!(point.additional_loss_w, 80.0);
        }
        assert_eq!(outcome.messages.len(), 1);
        assert_eq!(outcome.messages[0].severity, Severity::Warning);
    }

    #[test]
    fn negative_fitted_loss_is_floored_and_warned() {
        // Steep negative trend drives the low-torque end below zero.
        let loads = vec![
            load_point(25.0, 10.0, 500.0),
            load_point(100.0, 40.0, -200.0),
        ];
        let outcome = separate_additional_loss(&loads);
        assert!(outcome.points.iter().any(|p| p.additional_loss_w == 0.0));
        assert!(
            outcome
                .messages
                .iter()
                .any(|m| m.severity == Severity::Warning && m.text.contains("floored"))
        );
        assert!(outcome.points.iter().all(|p| p.additional_loss_w >= 0.0));
    }

    #[test]
    fn empty_input_is_quiet() {
        let outcome = separate_additional_loss(&[]);
        assert!(outcome.fit.is_none());
        assert!(outcome.points.is_empty());
        assert!(outcome.messages.is_empty());
    }

    proptest! {
        /// Fitting synthetic noise-free lines recovers slope and
        /// intercept to within floating tolerance.
        #[test]
        fn fit_recovers_synthetic_lines(
            slope in -10.0f64..10.0,
            intercept in -1000.0f64..1000.0,
        ) {
            let points: Vec<(f64, f64)> = (1..=6)
                .map(|i| {
                    let x = (i as f64) * 100.0;
                    (x, slope * x + intercept)
                })
                .collect();
            let fit = fit_line(&points).unwrap();
            prop_assert!((fit.slope - slope).abs() < 1e-6);
            prop_assert!((fit.intercept - intercept).abs() < 1e-6);
        }
    }
}
