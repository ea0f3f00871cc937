use anyhow::Context;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::calibration::CalibrationSummary;
use crate::evaluator::TallyReport;
use crate::util::output::{open_output, table_delimiter};

/// Writes the single-line summary for one tally: "auc,ranking_error" with six decimal places and no header.
/// # Arguments
/// * `filename` - the output path
/// * `summary` - the finalized statistics
/// # Errors
/// * if the file cannot be created or written
pub fn write_tally_summary(filename: &Path, summary: &CalibrationSummary) -> anyhow::Result<()> {
    let mut writer = open_output(filename)?;
    writeln!(writer, "{:.6},{:.6}", summary.auc, summary.ranking_error)
        .with_context(|| format!("Error while writing {filename:?}:"))?;
    writer.flush()
        .with_context(|| format!("Error while flushing {filename:?}:"))?;
    Ok(())
}

/// Contains all the data written to each row of the joint summary file
#[derive(Serialize)]
struct SummaryRow<'a> {
    /// User provided tool name
    tool: &'a str,
    /// Trust tier of the tool
    tier: i64,
    /// loose or strict
    correctness: String,
    /// int, orig, or dec
    score_type: String,
    /// Total correct alignments
    total_correct: u64,
    /// Total incorrect alignments
    total_incorrect: u64,
    /// Area under the curve
    auc: f64,
    /// Ranking error
    ranking_error: f64
}

impl<'a> SummaryRow<'a> {
    fn new(report: &'a TallyReport) -> Self {
        Self {
            tool: report.tool.name(),
            tier: report.tool.tier(),
            correctness: report.correctness.to_string(),
            score_type: report.representation.to_string(),
            total_correct: report.summary.total_correct,
            total_incorrect: report.summary.total_incorrect,
            auc: report.summary.auc,
            ranking_error: report.summary.ranking_error
        }
    }
}

/// Writes one row per tally to a single table, delimiter chosen by the extension.
/// # Arguments
/// * `filename` - the output path (tsv/csv)
/// * `reports` - every finalized tally
/// # Errors
/// * if the file cannot be created or written
pub fn write_joint_summary(filename: &Path, reports: &[TallyReport]) -> anyhow::Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(table_delimiter(filename))
        .from_writer(open_output(filename)?);
    for report in reports.iter() {
        csv_writer.serialize(SummaryRow::new(report))
            .with_context(|| format!("Error while writing row to {filename:?}:"))?;
    }
    csv_writer.flush()
        .with_context(|| format!("Error while flushing {filename:?}:"))?;
    Ok(())
}
