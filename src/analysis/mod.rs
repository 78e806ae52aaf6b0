//! Historical trend analysis.
//!
//! Loads a history export, scores every row with [`crate::aqi::compute_aqi`]
//! independently and aggregates the results by year, month of year and
//! year-month period.

pub mod records;
pub mod trends;
pub mod utility;

pub use records::{
    EnrichedRow, HistoryRecord, ScoredRecord, load_history, read_history, score_records,
};
pub use trends::{TrendReport, build_trends};

use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Loads `path`, scores it and builds the trend report.
pub fn analyze_history(path: &Path) -> Result<(Vec<ScoredRecord>, TrendReport)> {
    let scored = score_records(load_history(path)?);
    let report = build_trends(&scored);
    info!(
        records = report.record_count,
        out_of_range = report.out_of_range_count,
        missing_pm25 = report.missing_pm25_count,
        years = report.yearly.len(),
        "Trend analysis complete"
    );
    Ok((scored, report))
}
