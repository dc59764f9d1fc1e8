use crate::SlError;

/// Absolute + relative comparison tolerance pair.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: f64, b: f64, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, SlError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(SlError::NonFinite { what, value: v })
    }
}

/// Mechanical power in watts from shaft torque and rotational speed.
///
/// `P = tau * omega`, with omega converted from rpm.
pub fn shaft_power_w(torque_nm: f64, speed_rpm: f64) -> f64 {
    torque_nm * speed_rpm * 2.0 * std::f64::consts::PI / 60.0
}
