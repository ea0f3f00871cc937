/*!
# Pipeline
Glue between the validated CLI settings and the core components.
Each step is exposed separately so that the binary can map failures to specific exit codes.
*/
use anyhow::Context;
use log::info;
use std::io;

use crate::cli::evaluate::EvaluateSettings;
use crate::consensus_solver::{EvaluationConfig, EvaluationConfigBuilder};
use crate::data_types::score::ScoreError;
use crate::evaluator::{ConsensusEvaluator, RunStatistics, TallyReport};
use crate::parsing::lockstep::{LockstepError, LockstepReader};
use crate::parsing::record_source::RecordSource;
use crate::parsing::sam_source::{RecordError, SamRecordSource};
use crate::writers::evaluation_outputs::write_evaluation_outputs;
use crate::writers::read_consensus::ReadConsensusWriter;

/// Opens every input SAM and wraps them in a lock-step reader
/// # Errors
/// * if any input cannot be opened or has a bad header
pub fn open_inputs(settings: &EvaluateSettings) -> anyhow::Result<LockstepReader> {
    let score_tags = settings.score_tags()?;
    let mut sources: Vec<Box<dyn RecordSource>> = Vec::with_capacity(settings.input_filenames.len());
    for (input_fn, name) in settings.input_filenames.iter().zip(settings.tool_names.iter()) {
        info!("Opening {name} input {input_fn:?}...");
        let source = SamRecordSource::from_path(name.clone(), input_fn, score_tags)?;
        sources.push(Box::new(source));
    }
    Ok(LockstepReader::new(sources)?)
}

/// Builds the comparison configuration from the settings
/// # Errors
/// * if the builder fails
pub fn build_config(settings: &EvaluateSettings) -> anyhow::Result<EvaluationConfig> {
    let config = EvaluationConfigBuilder::default()
        .wiggle(settings.wiggle)
        .build()?;
    Ok(config)
}

/// Streams every input, solves the consensus per read, and finalizes the tallies.
/// # Arguments
/// * `settings` - validated settings
/// * `reader` - lock-step reader over the inputs, see `open_inputs(...)`
/// # Errors
/// * if reading fails, a record is malformed, or the inputs desync
/// * if the per-read output fails to write
pub fn evaluate_inputs(settings: &EvaluateSettings, reader: &mut LockstepReader) -> anyhow::Result<(RunStatistics, Vec<TallyReport>)> {
    let config = build_config(settings)?;
    let mut evaluator = ConsensusEvaluator::new(settings.tools()?, config);

    let mut read_writer = match settings.output_reads.as_deref() {
        Some(reads_fn) => {
            info!("Opening per-read output at {reads_fn:?}...");
            Some(ReadConsensusWriter::new(reads_fn)?)
        },
        None => None
    };

    info!("Evaluating consensus...");
    evaluator.run(reader, read_writer.as_mut())?;
    if let Some(writer) = read_writer {
        writer.finish()
            .with_context(|| "Error while finishing per-read output:")?;
    }

    info!("Finalizing {} tallies...", 6 * evaluator.tools().len());
    let reports = evaluator.finalize();
    Ok((evaluator.statistics().clone(), reports))
}

/// Runs the whole evaluation, from opening the inputs to writing the outputs.
/// The output folder must already exist.
/// # Errors
/// * see `open_inputs(...)`, `evaluate_inputs(...)`, and `write_evaluation_outputs(...)`
pub fn run_evaluation(settings: &EvaluateSettings) -> anyhow::Result<(RunStatistics, Vec<TallyReport>)> {
    let mut reader = open_inputs(settings)?;
    let (statistics, reports) = evaluate_inputs(settings, &mut reader)?;
    write_evaluation_outputs(&settings.output_folder, &reports)?;
    Ok((statistics, reports))
}

/// Returns true if the error was caused by bad input data rather than I/O.
/// Malformed SAM fields surface from noodles as `io::ErrorKind::InvalidData`.
pub fn is_data_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause.is::<RecordError>() || cause.is::<LockstepError>() || cause.is::<ScoreError>()
            || cause.downcast_ref::<io::Error>().is_some_and(|e| e.kind() == io::ErrorKind::InvalidData)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;
    use std::path::PathBuf;

    use crate::data_types::consensus_result::Correctness;
    use crate::data_types::score_tally::ScoreRepresentation;

    fn example_settings(output_folder: PathBuf) -> EvaluateSettings {
        EvaluateSettings {
            input_filenames: vec![
                PathBuf::from("test_data/example_sams/tool_a.sam"),
                PathBuf::from("test_data/example_sams/tool_b.sam"),
                PathBuf::from("test_data/example_sams/tool_c.sam"),
            ],
            tool_names: vec!["tool_a".to_string(), "tool_b".to_string(), "tool_c".to_string()],
            tiers: vec![1, 2, 2],
            output_folder,
            ..Default::default()
        }
    }

    fn find<'a>(reports: &'a [TallyReport], label: &str) -> &'a TallyReport {
        reports.iter().find(|r| r.label() == label).unwrap()
    }

    #[test]
    fn test_run_evaluation() {
        let out_dir = std::env::temp_dir().join("tiercon_test_run_evaluation");
        std::fs::create_dir_all(&out_dir).unwrap();
        let mut settings = example_settings(out_dir.clone());
        settings.output_reads = Some(out_dir.join("reads.tsv"));

        let (statistics, reports) = run_evaluation(&settings).unwrap();
        assert_eq!(statistics, RunStatistics {
            cycles: 4,
            evaluated: 3,
            skipped_unmapped: 1,
            name_mismatches: 0,
            unmapped_per_tool: vec![0, 1, 0]
        });
        assert_eq!(reports.len(), 18);

        // the most trusted tool is always correct
        for r in reports.iter().filter(|r| r.tool.name() == "tool_a") {
            assert_eq!(r.summary.total_correct, 3);
            assert_eq!(r.summary.total_incorrect, 0);
        }

        // tool_b: read1 correct at 42, read2 wrong chromosome at 3, read4 exactly 10 bp off at 5
        let b_loose = find(&reports, "tool_b_loose_int");
        assert_eq!((b_loose.correctness, b_loose.representation), (Correctness::Loose, ScoreRepresentation::PredictedInteger));
        assert_eq!(b_loose.summary.total_correct, 1);
        assert_eq!(b_loose.summary.total_incorrect, 2);
        assert_approx_eq!(b_loose.summary.auc, 2.0);
        assert_approx_eq!(b_loose.summary.ranking_error, 1.0);

        // tool_c: loosely correct everywhere, strictly correct only on read1
        let c_loose = find(&reports, "tool_c_loose_int");
        assert_eq!(c_loose.summary.total_correct, 3);
        assert_eq!(c_loose.summary.auc, 0.0);
        let c_strict = find(&reports, "tool_c_strict_int");
        assert_eq!(c_strict.summary.total_correct, 1);
        assert_eq!(c_strict.summary.total_incorrect, 2);

        // files on disk
        assert_eq!(std::fs::read_to_string(out_dir.join("tool_b_loose_int_summ.csv")).unwrap(), "2.000000,1.000000\n");
        assert_eq!(std::fs::read_to_string(out_dir.join("tool_c_strict_int_summ.csv")).unwrap(), "2.000000,1.000000\n");
        assert_eq!(std::fs::read_to_string(out_dir.join("tool_c_loose_int_summ.csv")).unwrap(), "0.000000,0.000000\n");
        assert_eq!(
            std::fs::read_to_string(out_dir.join("tool_c_strict_orig_roc.csv")).unwrap(),
            "score,cor,incor,cum_cor,cum_incor\n33,1,0,1,0\n22,0,1,1,1\n14,0,1,1,2\n"
        );

        // header plus 3 evaluated reads x 3 tools
        let reads_text = std::fs::read_to_string(out_dir.join("reads.tsv")).unwrap();
        assert_eq!(reads_text.lines().count(), 10);
        assert!(reads_text.lines().all(|l| !l.starts_with("read3")));
    }

    #[test]
    fn test_desync_is_data_error() {
        let out_dir = std::env::temp_dir().join("tiercon_test_run_evaluation_desync");
        std::fs::create_dir_all(&out_dir).unwrap();

        // tool_a has one more primary record than the truncated input
        let truncated = out_dir.join("truncated.sam");
        let full_text = std::fs::read_to_string("test_data/example_sams/tool_b.sam").unwrap();
        let keep: Vec<&str> = full_text.lines().take(5).collect();
        std::fs::write(&truncated, keep.join("\n") + "\n").unwrap();

        let mut settings = example_settings(out_dir.clone());
        settings.input_filenames[1] = truncated;
        let error = run_evaluation(&settings).unwrap_err();
        assert!(is_data_error(&error));
    }

    #[test]
    fn test_io_error_is_not_data_error() {
        let mut settings = example_settings(PathBuf::from("unused"));
        settings.input_filenames[2] = PathBuf::from("test_data/example_sams/does_not_exist.sam");
        let Err(error) = open_inputs(&settings) else {
            panic!("opening a missing input should fail");
        };
        assert!(!is_data_error(&error));
    }

    #[test]
    fn test_malformed_record_is_data_error() {
        let out_dir = std::env::temp_dir().join("tiercon_test_run_evaluation_malformed");
        std::fs::create_dir_all(&out_dir).unwrap();

        // non-numeric FLAG on the first record
        let malformed = out_dir.join("malformed.sam");
        let full_text = std::fs::read_to_string("test_data/example_sams/tool_b.sam").unwrap();
        let broken: Vec<String> = full_text.lines()
            .map(|l| {
                if l.starts_with("read1\t") {
                    let mut fields: Vec<&str> = l.split('\t').collect();
                    fields[1] = "zero";
                    fields.join("\t")
                } else {
                    l.to_string()
                }
            })
            .collect();
        std::fs::write(&malformed, broken.join("\n") + "\n").unwrap();

        let mut settings = example_settings(out_dir.clone());
        settings.input_filenames[1] = malformed;
        let error = run_evaluation(&settings).unwrap_err();
        assert!(is_data_error(&error));
        assert!(!error.chain().any(|c| c.is::<RecordError>()));
    }

    #[test]
    fn test_headerless_inputs() {
        let out_dir = std::env::temp_dir().join("tiercon_test_run_evaluation_headerless");
        std::fs::create_dir_all(&out_dir).unwrap();

        // same records as the examples, without @ lines
        let mut settings = example_settings(out_dir.clone());
        for input_fn in settings.input_filenames.iter_mut() {
            let text = std::fs::read_to_string(&*input_fn).unwrap();
            let body: Vec<&str> = text.lines().filter(|l| !l.starts_with('@')).collect();
            let stripped = out_dir.join(input_fn.file_name().unwrap());
            std::fs::write(&stripped, body.join("\n") + "\n").unwrap();
            *input_fn = stripped;
        }

        let (statistics, reports) = run_evaluation(&settings).unwrap();
        assert_eq!(statistics.evaluated, 3);
        assert_eq!(statistics.skipped_unmapped, 1);
        assert_eq!(find(&reports, "tool_b_loose_int").summary.total_correct, 1);
        assert_eq!(find(&reports, "tool_c_strict_int").summary.total_correct, 1);
    }
}
