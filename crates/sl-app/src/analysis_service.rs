//! Per-file analysis entry points and the combined report service.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use sl_analysis::{
    AdditionalLossPoint, FinalSummaryRow, FwSplitMethod, LineFit, LoadResult, LossSplit,
    NoLoadResult, average_steps, build_summary, compute_load, compute_no_load,
    separate_additional_loss,
};
use sl_core::{MotorRating, TestConditions};
use sl_table::{Severity, ValidationMessage, ValidationPolicy, read_table_file, validate_table};

use crate::error::AppResult;

/// Classification of an analysis by its accumulated diagnostics: the
/// "collect, don't throw" result shape. `Failed` blocks downstream use
/// (report export); `Partial` is usable but flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Clean,
    Partial,
    Failed,
}

fn classify(messages: &[ValidationMessage]) -> Outcome {
    if messages.iter().any(|m| m.severity == Severity::Error) {
        Outcome::Failed
    } else if messages.iter().any(|m| m.severity == Severity::Warning) {
        Outcome::Partial
    } else {
        Outcome::Clean
    }
}

fn has_errors(messages: &[ValidationMessage]) -> bool {
    messages.iter().any(|m| m.severity == Severity::Error)
}

/// Validated and computed no-load file. `points` covers the rows that
/// survived validation; the messages always carry the full diagnostic
/// list, and any Error among them marks the file unusable for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoLoadAnalysis {
    pub messages: Vec<ValidationMessage>,
    pub points: Vec<NoLoadResult>,
}

impl NoLoadAnalysis {
    pub fn outcome(&self) -> Outcome {
        classify(&self.messages)
    }
}

/// Validated and computed load file, including the residual-loss
/// regression output for charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadAnalysis {
    pub messages: Vec<ValidationMessage>,
    pub points: Vec<LoadResult>,
    pub additional: Vec<AdditionalLossPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<LineFit>,
}

impl LoadAnalysis {
    pub fn outcome(&self) -> Outcome {
        classify(&self.messages)
    }
}

/// Validate a no-load test file and run the no-load loss chain.
///
/// Fatal preamble failures surface as `Err`; everything row-level is a
/// message. A usable file with zero data rows yields a Failed analysis
/// with an Error message, not an `Err`.
pub fn analyze_no_load(
    path: &Path,
    rating: &MotorRating,
    conditions: &TestConditions,
    policy: &ValidationPolicy,
) -> AppResult<NoLoadAnalysis> {
    rating.validate()?;
    let table = read_table_file(path)?;
    let mut result = validate_table(&table, policy);
    debug!(
        rows = table.rows.len(),
        errors = result.error_count(),
        "validated no-load file"
    );

    // Bad rows are already excluded; the survivors are still analyzed so
    // the frontend can show partial results next to the diagnostics.
    let averages = match average_steps(&result.readings) {
        Ok(averages) => averages,
        Err(err) => {
            result
                .messages
                .push(ValidationMessage::error(None, None, err.to_string()));
            return Ok(NoLoadAnalysis {
                messages: result.messages,
                points: Vec::new(),
            });
        }
    };

    let points = compute_no_load(&averages, rating, conditions);
    Ok(NoLoadAnalysis {
        messages: result.messages,
        points,
    })
}

/// Validate a load test file, run the load loss chain, and separate the
/// stray-load loss by regression.
pub fn analyze_load(
    path: &Path,
    rating: &MotorRating,
    conditions: &TestConditions,
    policy: &ValidationPolicy,
) -> AppResult<LoadAnalysis> {
    rating.validate()?;
    let table = read_table_file(path)?;
    let mut result = validate_table(&table, policy);
    debug!(
        rows = table.rows.len(),
        errors = result.error_count(),
        "validated load file"
    );

    let averages = match average_steps(&result.readings) {
        Ok(averages) => averages,
        Err(err) => {
            result
                .messages
                .push(ValidationMessage::error(None, None, err.to_string()));
            return Ok(LoadAnalysis {
                messages: result.messages,
                points: Vec::new(),
                additional: Vec::new(),
                fit: None,
            });
        }
    };

    let points = compute_load(&averages, rating, conditions);
    let regression = separate_additional_loss(&points);
    let mut messages = result.messages;
    messages.extend(regression.messages);

    Ok(LoadAnalysis {
        messages,
        points,
        additional: regression.points,
        fit: regression.fit,
    })
}

/// Everything needed to analyze one no-load/load file pair.
#[derive(Debug, Clone)]
pub struct ReportRequest<'a> {
    pub no_load_path: &'a Path,
    pub load_path: &'a Path,
    pub rating: &'a MotorRating,
    pub policy: &'a ValidationPolicy,
    pub no_load_conditions: TestConditions,
    pub load_conditions: TestConditions,
    pub split_method: FwSplitMethod,
}

/// Combined output of both analyses and the summary builder. When either
/// file fails, `rows` stays empty and the messages say why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossReport {
    pub messages: Vec<ValidationMessage>,
    pub no_load: Vec<NoLoadResult>,
    pub load: Vec<LoadResult>,
    pub additional: Vec<AdditionalLossPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<LineFit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<LossSplit>,
    pub rows: Vec<FinalSummaryRow>,
}

impl LossReport {
    pub fn outcome(&self) -> Outcome {
        classify(&self.messages)
    }
}

/// Run both analyses and assemble the final report rows.
///
/// The two files are independent until the summary step, so they are
/// analyzed on parallel rayon tasks; diagnostics are joined in a stable
/// order, no-load messages before load messages.
pub fn build_report(req: &ReportRequest<'_>) -> AppResult<LossReport> {
    let (no_load_res, load_res) = rayon::join(
        || analyze_no_load(req.no_load_path, req.rating, &req.no_load_conditions, req.policy),
        || analyze_load(req.load_path, req.rating, &req.load_conditions, req.policy),
    );
    let no_load = no_load_res?;
    let load = load_res?;

    let mut messages = no_load.messages;
    messages.extend(load.messages);

    let mut report = LossReport {
        messages,
        no_load: no_load.points,
        load: load.points,
        additional: load.additional,
        fit: load.fit,
        split: None,
        rows: Vec::new(),
    };

    if has_errors(&report.messages) || report.no_load.is_empty() || report.load.is_empty() {
        debug!("skipping summary: report not usable");
        return Ok(report);
    }

    let summary = build_summary(
        &report.no_load,
        &report.load,
        &report.additional,
        req.rating,
        req.split_method,
    )?;
    report.split = Some(summary.split);
    report.messages.extend(summary.messages);
    report.rows = summary.rows;
    Ok(report)
}
