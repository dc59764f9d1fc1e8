//! Per-step averaging of validated readings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sl_table::StepReading;

use crate::{AnalysisError, AnalysisResult};

/// Arithmetic mean of every channel across all samples sharing a step id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepAverage {
    pub step_pct: f64,
    pub voltage_v: f64,
    pub current_a: f64,
    pub power_w: f64,
    pub torque_nm: f64,
    pub speed_rpm: f64,
    pub sample_count: usize,
}

#[derive(Default)]
struct ChannelSums {
    voltage_v: f64,
    current_a: f64,
    power_w: f64,
    torque_nm: f64,
    speed_rpm: f64,
    count: usize,
}

/// Group readings by step id and average each channel.
///
/// Step ids are operator-entered discrete set points, so grouping is by
/// bit-exact equality, no tolerance banding. Output preserves the order
/// of first appearance.
pub fn average_steps(readings: &[StepReading]) -> AnalysisResult<Vec<StepAverage>> {
    if readings.is_empty() {
        return Err(AnalysisError::NoUsableRows);
    }

    let mut order: Vec<f64> = Vec::new();
    let mut groups: HashMap<u64, ChannelSums> = HashMap::new();

    for r in readings {
        let key = r.step_pct.to_bits();
        let sums = groups.entry(key).or_insert_with(|| {
            order.push(r.step_pct);
            ChannelSums::default()
        });
        sums.voltage_v += r.voltage_v;
        sums.current_a += r.current_a;
        sums.power_w += r.power_w;
        sums.torque_nm += r.torque_nm;
        sums.speed_rpm += r.speed_rpm;
        sums.count += 1;
    }

    let averages = order
        .into_iter()
        .map(|step_pct| {
            // Every key in `order` was inserted into `groups` above.
            let sums = &groups[&step_pct.to_bits()];
            let n = sums.count as f64;
            StepAverage {
                step_pct,
                voltage_v: sums.voltage_v / n,
                current_a: sums.current_a / n,
                power_w: sums.power_w / n,
                torque_nm: sums.torque_nm / n,
                speed_rpm: sums.speed_rpm / n,
                sample_count: sums.count,
            }
        })
        .collect();

    Ok(averages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(step: f64, voltage: f64, power: f64) -> StepReading {
        StepReading {
            step_pct: step,
            voltage_v: voltage,
            current_a: 10.0,
            power_w: power,
            torque_nm: 0.0,
            speed_rpm: 1500.0,
        }
    }

    #[test]
    fn single_row_per_step_averages_to_itself() {
        let rows = [reading(100.0, 380.0, 1200.0), reading(75.0, 285.0, 700.0)];
        let avgs = average_steps(&rows).unwrap();
        assert_eq!(avgs.len(), 2);
        assert_eq!(avgs[0].voltage_v, 380.0);
        assert_eq!(avgs[0].power_w, 1200.0);
        assert_eq!(avgs[0].sample_count, 1);
        assert_eq!(avgs[1].voltage_v, 285.0);
    }

    #[test]
    fn repeated_steps_are_averaged() {
        let rows = [
            reading(100.0, 380.0, 1200.0),
            reading(100.0, 382.0, 1220.0),
        ];
        let avgs = average_steps(&rows).unwrap();
        assert_eq!(avgs.len(), 1);
        assert_eq!(avgs[0].voltage_v, 381.0);
        assert_eq!(avgs[0].power_w, 1210.0);
        assert_eq!(avgs[0].sample_count, 2);
    }

    #[test]
    fn first_seen_order_is_preserved() {
        let rows = [
            reading(125.0, 380.0, 1500.0),
            reading(50.0, 380.0, 600.0),
            reading(125.0, 380.0, 1520.0),
            reading(100.0, 380.0, 1200.0),
        ];
        let avgs = average_steps(&rows).unwrap();
        let steps: Vec<f64> = avgs.iter().map(|a| a.step_pct).collect();
        assert_eq!(steps, [125.0, 50.0, 100.0]);
    }

    #[test]
    fn sample_count_matches_rows_per_step() {
        let rows = [
            reading(100.0, 380.0, 1200.0),
            reading(100.0, 380.0, 1200.0),
            reading(100.0, 380.0, 1200.0),
            reading(75.0, 285.0, 700.0),
        ];
        let avgs = average_steps(&rows).unwrap();
        assert_eq!(avgs[0].sample_count, 3);
        assert_eq!(avgs[1].sample_count, 1);
    }

    #[test]
    fn grouping_is_bit_exact() {
        // 100.0 and 100.000001 are different set points, not one group.
        let rows = [
            reading(100.0, 380.0, 1200.0),
            reading(100.000001, 380.0, 1200.0),
        ];
        let avgs = average_steps(&rows).unwrap();
        assert_eq!(avgs.len(), 2);
    }

    #[test]
    fn empty_input_is_an_aggregation_error() {
        assert!(matches!(
            average_steps(&[]),
            Err(AnalysisError::NoUsableRows)
        ));
    }
}
