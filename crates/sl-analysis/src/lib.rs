//! sl-analysis: segregated-loss computation chain.
//!
//! Stages run strictly forward over immutable inputs:
//! aggregate -> {no_load -> load -> regression} -> summary.
//! Each stage owns its output collection; downstream stages only borrow.

pub mod aggregate;
pub mod load;
pub mod no_load;
pub mod regression;
pub mod summary;

pub use aggregate::{StepAverage, average_steps};
pub use load::{LoadResult, compute_load};
pub use no_load::{NoLoadResult, compute_no_load};
pub use regression::{
    AdditionalLossPoint, LineFit, RegressionOutcome, fit_line, separate_additional_loss,
};
pub use summary::{
    FinalSummaryRow, FwSplitMethod, LossSplit, SummaryOutcome, build_summary,
    split_no_load_losses,
};

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Step-set-level impossibilities. Per-row defects never reach this
/// enum; they are Error-severity messages from sl-table.
#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    #[error("No usable rows survived validation")]
    NoUsableRows,

    #[error("No-load curve is empty; cannot split friction/windage from iron loss")]
    EmptyNoLoadCurve,

    #[error("Additional-loss point count {points} does not match load step count {loads}")]
    PointCountMismatch { loads: usize, points: usize },

    #[error("No additional-loss point for load step {step_pct}")]
    StepMismatch { step_pct: f64 },
}
