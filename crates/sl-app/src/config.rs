//! Config loading and result export.

use std::path::Path;

use sl_analysis::FwSplitMethod;
use sl_core::MotorRating;
use sl_table::ValidationPolicy;

use crate::analysis_service::LossReport;
use crate::error::{AppError, AppResult};

/// Load nameplate constants from a YAML file and validate them.
pub fn load_rating(path: &Path) -> AppResult<MotorRating> {
    let content = read_config(path)?;
    let rating: MotorRating = serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("Failed to parse rating YAML: {e}")))?;
    rating.validate()?;
    Ok(rating)
}

/// Load a validation policy table from a YAML file, or take the defaults.
pub fn load_policy(path: Option<&Path>) -> AppResult<ValidationPolicy> {
    match path {
        Some(path) => {
            let content = read_config(path)?;
            serde_yaml::from_str(&content)
                .map_err(|e| AppError::Config(format!("Failed to parse policy YAML: {e}")))
        }
        None => Ok(ValidationPolicy::default()),
    }
}

/// Parse a friction/windage split method name (CLI flag value).
pub fn parse_split_method(name: &str) -> AppResult<FwSplitMethod> {
    match name {
        "voltage-squared" => Ok(FwSplitMethod::VoltageSquared),
        "voltage" => Ok(FwSplitMethod::Voltage),
        other => Err(AppError::Config(format!(
            "Unknown split method '{other}' (expected 'voltage-squared' or 'voltage')"
        ))),
    }
}

/// Write the combined report as pretty JSON for the document exporter.
pub fn save_report_json(path: &Path, report: &LossReport) -> AppResult<()> {
    let content = serde_json::to_string_pretty(report)?;
    std::fs::write(path, content)?;
    Ok(())
}

fn read_config(path: &Path) -> AppResult<String> {
    std::fs::read_to_string(path).map_err(|e| AppError::ConfigFileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_yaml_roundtrip() {
        let yaml = "\
rated_voltage_v: 380.0
pole_count: 4
frequency_hz: 50.0
stator_resistance_ohm: 0.4
resistance_ref_temp_c: 20.0
";
        let rating: MotorRating = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rating.rated_voltage_v, 380.0);
        // temperature_constant_k defaults to the copper constant
        assert_eq!(rating.temperature_constant_k, 235.0);
        assert!(rating.validate().is_ok());
    }

    #[test]
    fn split_method_names() {
        assert_eq!(
            parse_split_method("voltage-squared").unwrap(),
            FwSplitMethod::VoltageSquared
        );
        assert_eq!(parse_split_method("voltage").unwrap(), FwSplitMethod::Voltage);
        assert!(parse_split_method("quadratic").is_err());
    }
}
