use anyhow::{bail, ensure};
use clap::Args;
use indexmap::IndexSet;
use log::{info, warn};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::core::{check_input_file, check_output_file, check_output_folder, AFTER_HELP, FULL_VERSION};
use crate::consensus_solver::DEFAULT_WIGGLE;
use crate::data_types::tools::Tool;
use crate::parsing::sam_source::{ScoreTags, DEFAULT_DEC_MAPQ_TAG, DEFAULT_ORIG_MAPQ_TAG};

#[derive(Args, Clone, Debug, Serialize)]
#[clap(author, about,
    after_help = &**AFTER_HELP
)]
pub struct EvaluateSettings {
    #[clap(default_value = "")]
    #[clap(hide = true)]
    pub tiercon_version: String,

    /// Input alignment file (SAM), one per tool and all with the reads in the same order
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input")]
    #[clap(value_name = "SAM")]
    #[clap(help_heading = Some("Input/Output"))]
    pub input_filenames: Vec<PathBuf>,

    /// Name for the corresponding input, used in output file names
    #[clap(required = true)]
    #[clap(short = 'n')]
    #[clap(long = "name")]
    #[clap(value_name = "NAME")]
    #[clap(help_heading = Some("Input/Output"))]
    pub tool_names: Vec<String>,

    /// Trust tier for the corresponding input, lower is more trusted
    #[clap(required = true)]
    #[clap(short = 't')]
    #[clap(long = "tier")]
    #[clap(value_name = "INT")]
    #[clap(allow_negative_numbers = true)]
    #[clap(help_heading = Some("Input/Output"))]
    pub tiers: Vec<i64>,

    /// Output folder for ROC tables and summaries
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-folder")]
    #[clap(value_name = "DIR")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_folder: PathBuf,

    /// Optional per-read consensus output (CSV/TSV)
    #[clap(long = "output-reads")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_reads: Option<PathBuf>,

    /// Alignments closer than this many bases are considered the same
    #[clap(short = 'w')]
    #[clap(long = "wiggle")]
    #[clap(value_name = "BP")]
    #[clap(default_value_t = DEFAULT_WIGGLE)]
    #[clap(help_heading = Some("Consensus parameters"))]
    pub wiggle: u64,

    /// SAM tag holding the original integer MAPQ
    #[clap(long = "orig-mapq-tag")]
    #[clap(value_name = "TAG")]
    #[clap(default_value = DEFAULT_ORIG_MAPQ_TAG)]
    #[clap(help_heading = Some("Score parameters"))]
    pub orig_mapq_tag: String,

    /// SAM tag holding the predicted decimal MAPQ
    #[clap(long = "dec-mapq-tag")]
    #[clap(value_name = "TAG")]
    #[clap(default_value = DEFAULT_DEC_MAPQ_TAG)]
    #[clap(help_heading = Some("Score parameters"))]
    pub dec_mapq_tag: String,

    /// Number of threads to use in the finalization step
    #[clap(long = "threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    pub threads: usize,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl Default for EvaluateSettings {
    fn default() -> Self {
        Self {
            tiercon_version: Default::default(),
            input_filenames: Default::default(),
            tool_names: Default::default(),
            tiers: Default::default(),
            output_folder: Default::default(),
            output_reads: Default::default(),
            wiggle: DEFAULT_WIGGLE,
            orig_mapq_tag: DEFAULT_ORIG_MAPQ_TAG.to_string(),
            dec_mapq_tag: DEFAULT_DEC_MAPQ_TAG.to_string(),
            threads: 1,
            verbosity: 0
        }
    }
}

impl EvaluateSettings {
    /// The tools in input order, assumes the settings were already checked
    pub fn tools(&self) -> anyhow::Result<Vec<Tool>> {
        Tool::from_parallel(&self.tool_names, &self.tiers)
    }

    /// The parsed score tags
    pub fn score_tags(&self) -> anyhow::Result<ScoreTags> {
        ScoreTags::new(&self.orig_mapq_tag, &self.dec_mapq_tag)
    }
}

pub fn check_evaluate_settings(mut settings: EvaluateSettings) -> anyhow::Result<EvaluateSettings> {
    // hard code the version in
    settings.tiercon_version = FULL_VERSION.clone();
    info!("tiercon version: {:?}", &settings.tiercon_version);
    info!("Sub-command: evaluate");
    info!("Inputs:");

    // all three lists are parallel
    let num_inputs = settings.input_filenames.len();
    ensure!(num_inputs > 0, "At least one input file is required");
    ensure!(
        settings.tool_names.len() == num_inputs,
        "Number of tool names ({}) must match number of inputs ({num_inputs})", settings.tool_names.len()
    );
    ensure!(
        settings.tiers.len() == num_inputs,
        "Number of tiers ({}) must match number of inputs ({num_inputs})", settings.tiers.len()
    );

    // names end up in file names, so they must be unique and usable as such
    let mut unique_names: IndexSet<&str> = IndexSet::with_capacity(num_inputs);
    for name in settings.tool_names.iter() {
        ensure!(!name.is_empty(), "Tool names cannot be empty");
        ensure!(
            !name.contains(std::path::is_separator),
            "Tool name \"{name}\" cannot contain a path separator"
        );
        if !unique_names.insert(name.as_str()) {
            bail!("Tool name \"{name}\" was provided more than once");
        }
    }

    for (i, ((input_fn, name), tier)) in settings.input_filenames.iter()
        .zip(settings.tool_names.iter())
        .zip(settings.tiers.iter())
        .enumerate() {
        check_input_file(input_fn, format!("Input SAM #{i}").as_str())?;
        info!("\tInput #{i}: {input_fn:?}");
        info!("\t\tName: {name:?}");
        info!("\t\tTier: {tier}");
    }

    // outputs
    info!("Outputs:");
    check_output_folder(&settings.output_folder, "Output folder")?;
    info!("\tOutput folder: {:?}", &settings.output_folder);
    if let Some(reads_fn) = settings.output_reads.as_ref() {
        check_output_file(reads_fn, &settings.input_filenames, "Per-read output")?;
        info!("\tPer-read output: {reads_fn:?}");
    }

    info!("Consensus parameters:");
    if settings.wiggle == 0 {
        warn!("--wiggle is 0, no two tools can agree on a read");
    }
    info!("\tWiggle: {}", settings.wiggle);

    info!("Score parameters:");
    settings.score_tags()?;
    info!("\tOriginal MAPQ tag: {}", settings.orig_mapq_tag);
    info!("\tDecimal MAPQ tag: {}", settings.dec_mapq_tag);

    if settings.threads == 0 {
        settings.threads = 1;
    }
    info!("Processing threads: {}", settings.threads);

    Ok(settings)
}
