use anyhow::Context;
use log::debug;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::evaluator::TallyReport;
use crate::writers::roc_table::write_roc_table;
use crate::writers::summary::{write_joint_summary, write_tally_summary};

/// Name of the joint summary file inside the output folder
pub const JOINT_SUMMARY_FILENAME: &str = "summary.tsv";

/// Path of the ROC table for one tally, e.g. "{output}/bt2_loose_int_roc.csv"
pub fn roc_table_path(output_folder: &Path, report: &TallyReport) -> PathBuf {
    output_folder.join(format!("{}_roc.csv", report.label()))
}

/// Path of the single-line summary for one tally, e.g. "{output}/bt2_loose_int_summ.csv"
pub fn tally_summary_path(output_folder: &Path, report: &TallyReport) -> PathBuf {
    output_folder.join(format!("{}_summ.csv", report.label()))
}

/// Writes the ROC table and summary for every tally, and then the joint summary.
/// The per-tally files are independent, so they get written in parallel.
/// # Arguments
/// * `output_folder` - an existing folder to write into
/// * `reports` - every finalized tally
/// # Errors
/// * if any output fails to write
pub fn write_evaluation_outputs(output_folder: &Path, reports: &[TallyReport]) -> anyhow::Result<()> {
    reports.par_iter()
        .try_for_each(|report| -> anyhow::Result<()> {
            let roc_filename = roc_table_path(output_folder, report);
            debug!("Writing {roc_filename:?}");
            write_roc_table(&roc_filename, report.representation, &report.summary.roc_table)
                .with_context(|| format!("Error while writing ROC table for {}:", report.label()))?;

            let summ_filename = tally_summary_path(output_folder, report);
            write_tally_summary(&summ_filename, &report.summary)
                .with_context(|| format!("Error while writing summary for {}:", report.label()))?;
            Ok(())
        })?;

    let joint_filename = output_folder.join(JOINT_SUMMARY_FILENAME);
    write_joint_summary(&joint_filename, reports)
        .with_context(|| format!("Error while writing joint summary to {joint_filename:?}:"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationSummary;
    use crate::data_types::consensus_result::Correctness;
    use crate::data_types::score::Score;
    use crate::data_types::score_tally::{ScoreRepresentation, ScoreTally, ToolTallies};
    use crate::data_types::tools::Tool;

    #[test]
    fn test_write_evaluation_outputs() {
        let out_dir = std::env::temp_dir().join("tiercon_test_evaluation_outputs");
        std::fs::create_dir_all(&out_dir).unwrap();

        let mut tally = ScoreTally::default();
        tally.add(Score::from_int(20), true);
        tally.add(Score::from_int(5), false);
        let tool = Tool::new("minimap2".to_string(), 2);
        let reports: Vec<TallyReport> = ToolTallies::keys()
            .map(|(correctness, representation)| TallyReport {
                tool: tool.clone(),
                correctness,
                representation,
                summary: CalibrationSummary::from_tally(&tally)
            })
            .collect();
        write_evaluation_outputs(&out_dir, &reports).unwrap();

        for report in reports.iter() {
            assert!(roc_table_path(&out_dir, report).exists());
            assert!(tally_summary_path(&out_dir, report).exists());
        }
        let strict_orig = reports.iter()
            .find(|r| r.correctness == Correctness::Strict && r.representation == ScoreRepresentation::Original)
            .unwrap();
        assert_eq!(tally_summary_path(&out_dir, strict_orig), out_dir.join("minimap2_strict_orig_summ.csv"));
        assert_eq!(std::fs::read_to_string(tally_summary_path(&out_dir, strict_orig)).unwrap(), "1.000000,0.000000\n");

        let joint = std::fs::read_to_string(out_dir.join(JOINT_SUMMARY_FILENAME)).unwrap();
        assert_eq!(joint.lines().count(), 7);
    }
}
