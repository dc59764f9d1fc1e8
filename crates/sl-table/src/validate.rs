//! Batch schema validation.
//!
//! Instrument exports routinely contain a handful of bad rows. The
//! validator therefore never stops at the first defect: every problem in
//! the file becomes one severity-tagged message, Error rows are dropped
//! from the usable set, and the rest of the file stays analyzable.

use serde::{Deserialize, Serialize};

use crate::reader::RawTable;
use crate::schema::{EXPECTED_COLUMNS, Requirement, ValidationPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// One diagnostic about a file, a line, or a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub text: String,
}

impl ValidationMessage {
    pub fn error(line: Option<usize>, column: Option<&str>, text: impl Into<String>) -> Self {
        Self::tagged(Severity::Error, line, column, text)
    }

    pub fn warning(line: Option<usize>, column: Option<&str>, text: impl Into<String>) -> Self {
        Self::tagged(Severity::Warning, line, column, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::tagged(Severity::Info, None, None, text)
    }

    fn tagged(
        severity: Severity,
        line: Option<usize>,
        column: Option<&str>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            line,
            column: column.map(str::to_string),
            text: text.into(),
        }
    }
}

/// One fully parsed sample. Field order mirrors the file columns; the
/// winding temperature of the run is not an instrument channel and is
/// supplied separately to the calculators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepReading {
    pub step_pct: f64,
    pub voltage_v: f64,
    pub current_a: f64,
    pub power_w: f64,
    pub torque_nm: f64,
    pub speed_rpm: f64,
}

/// Outcome of validating one raw table: every message plus the rows that
/// parsed cleanly. Rows with any Error are excluded from `readings` but
/// keep their messages.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationResult {
    pub messages: Vec<ValidationMessage>,
    pub readings: Vec<StepReading>,
}

impl ValidationResult {
    /// A file with zero Error-severity messages is usable downstream.
    pub fn is_usable(&self) -> bool {
        self.error_count() == 0
    }

    pub fn error_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Warning)
            .count()
    }
}

pub fn validate_table(table: &RawTable, policy: &ValidationPolicy) -> ValidationResult {
    let mut result = ValidationResult::default();

    if table.header != EXPECTED_COLUMNS {
        result.messages.push(ValidationMessage::error(
            None,
            None,
            format!(
                "Unexpected column header: expected {}, found {}",
                EXPECTED_COLUMNS.join(","),
                table.header.join(",")
            ),
        ));
        // With unknown columns no row can be interpreted.
        return result;
    }

    if table.data_types.len() != table.header.len() {
        result.messages.push(ValidationMessage::warning(
            None,
            None,
            format!(
                "DATA_TYPE declares {} entries for {} columns",
                table.data_types.len(),
                table.header.len()
            ),
        ));
    }
    if table.units.len() != table.header.len() {
        result.messages.push(ValidationMessage::warning(
            None,
            None,
            format!(
                "UNIT declares {} entries for {} columns",
                table.units.len(),
                table.header.len()
            ),
        ));
    }

    for row in &table.rows {
        validate_row(row, policy, &mut result);
    }

    result
}

fn validate_row(
    row: &crate::reader::RawRow,
    policy: &ValidationPolicy,
    result: &mut ValidationResult,
) {
    if row.fields.len() != EXPECTED_COLUMNS.len() {
        result.messages.push(ValidationMessage::error(
            Some(row.line),
            None,
            format!(
                "Expected {} fields, found {}",
                EXPECTED_COLUMNS.len(),
                row.fields.len()
            ),
        ));
        return;
    }

    let mut values = [0.0f64; 6];
    let mut row_ok = true;

    for (idx, column) in EXPECTED_COLUMNS.iter().copied().enumerate() {
        let raw = row.fields[idx].as_str();

        let value = match raw.parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                result.messages.push(ValidationMessage::error(
                    Some(row.line),
                    Some(column),
                    format!("Not a number: '{raw}'"),
                ));
                row_ok = false;
                continue;
            }
        };

        let requirement = policy
            .column(column)
            .map(|c| c.requirement)
            .unwrap_or(Requirement::Finite);
        if !requirement.check(value) {
            result.messages.push(ValidationMessage::error(
                Some(row.line),
                Some(column),
                format!("Value {value} {}", requirement.describe()),
            ));
            row_ok = false;
            continue;
        }

        if let Some(typical) = policy.column(column).and_then(|c| c.typical)
            && !typical.contains(value)
        {
            result.messages.push(ValidationMessage::warning(
                Some(row.line),
                Some(column),
                format!(
                    "Value {value} outside typical range [{}, {}]",
                    typical.min, typical.max
                ),
            ));
        }

        values[idx] = value;
    }

    if row_ok {
        result.readings.push(StepReading {
            step_pct: values[0],
            voltage_v: values[1],
            current_a: values[2],
            power_w: values[3],
            torque_nm: values[4],
            speed_rpm: values[5],
        });
    }
}
