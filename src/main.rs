use log::{LevelFilter, error, info};
use std::time::Instant;

use tiercon::cli::core::{Commands, get_cli};
use tiercon::cli::evaluate::{EvaluateSettings, check_evaluate_settings};
use tiercon::pipeline::{evaluate_inputs, is_data_error, open_inputs};
use tiercon::util::output::save_json;
use tiercon::writers::evaluation_outputs::{write_evaluation_outputs, JOINT_SUMMARY_FILENAME};

fn run_evaluate(settings: EvaluateSettings) {
    // start the timer
    let start_time = Instant::now();

    // set up logging before we check the other settings
    let filter_level: LevelFilter = match settings.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();

    let settings = match check_evaluate_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };

    // set up the number of threads for rayon
    match rayon::ThreadPoolBuilder::new().num_threads(settings.threads).build_global() {
        Ok(()) => {},
        Err(e) => {
            error!("Error while building thread pool: {e}");
            std::process::exit(exitcode::OSERR);
        }
    };

    // create the primary output folder
    info!("Creating output folder at {:?}...", settings.output_folder);
    match std::fs::create_dir_all(&settings.output_folder) {
        Ok(()) => {},
        Err(e) => {
            error!("Error while creating output folder: {e}");
            std::process::exit(exitcode::IOERR);
        }
    }

    // save the CLI options
    let cli_json = settings.output_folder.join("cli_settings.json");
    info!("Saving CLI options to {cli_json:?}...");
    if let Err(e) = save_json(&settings, &cli_json) {
        error!("Error while saving CLI options: {e:#}");
        std::process::exit(exitcode::IOERR);
    }

    let mut reader = match open_inputs(&settings) {
        Ok(r) => r,
        Err(e) => {
            error!("Error while opening inputs: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };

    let (statistics, reports) = match evaluate_inputs(&settings, &mut reader) {
        Ok(r) => r,
        Err(e) => {
            error!("Error while evaluating inputs: {e:#}");
            let code = if is_data_error(&e) { exitcode::DATAERR } else { exitcode::IOERR };
            std::process::exit(code);
        }
    };

    info!("Saving ROC tables and summaries to {:?}...", settings.output_folder);
    if let Err(e) = write_evaluation_outputs(&settings.output_folder, &reports) {
        error!("Error while saving output files: {e:#}");
        std::process::exit(exitcode::IOERR);
    }
    info!("Joint summary saved to {:?}", settings.output_folder.join(JOINT_SUMMARY_FILENAME));

    info!("Evaluated:skipped reads: {} : {}", statistics.evaluated, statistics.skipped_unmapped);
    for report in reports.iter() {
        info!("{}: AUC = {:.6}, ranking error = {:.6}", report.label(), report.summary.auc, report.summary.ranking_error);
    }

    info!("Evaluation completed in {} seconds.", start_time.elapsed().as_secs_f64());
}

fn main() {
    let cli = get_cli();
    match cli.command {
        Commands::Evaluate(settings) => {
            run_evaluate(*settings);
        }
    }

    info!("Process finished successfully.");
}
