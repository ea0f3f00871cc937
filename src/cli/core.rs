use anyhow::bail;
use clap::{Parser, Subcommand};
use chrono::Datelike;
use lazy_static::lazy_static;
use std::path::Path;

use crate::cli::evaluate::EvaluateSettings;

lazy_static! {
    /// Package version joined with the git description from build.rs, e.g. `0.1.0-6bb9635-dirty`
    pub static ref FULL_VERSION: String = format!("{}-{}", env!("CARGO_PKG_VERSION"), env!("VERGEN_GIT_DESCRIBE"));

    /// Footer printed under every help page
    pub static ref AFTER_HELP: String = format!(
        "Copyright (C) 2024-{} tiercon developers\n\
        Scores are only as trustworthy as the tools placed in the lowest tier.\n\
        Provided as is, without warranty of any kind.",
        chrono::Utc::now().year()
    );
}

/// tiercon, a tool for scoring aligner confidence against a tiered consensus of other aligners.
#[derive(Parser)]
#[clap(author,
    version = &**FULL_VERSION,
    about,
    after_help = &**AFTER_HELP)]
#[command(propagate_version = true, arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluates MAPQ calibration of each aligner relative to the more trusted aligners
    Evaluate(Box<EvaluateSettings>)
}

pub fn get_cli() -> Cli {
    Cli::parse()
}

/// Makes sure an input path is an existing regular file
/// # Arguments
/// * `filename` - the input path
/// * `label` - how the input is described in the error
/// # Errors
/// * if the path is missing or is not a file
pub fn check_input_file(filename: &Path, label: &str) -> anyhow::Result<()> {
    if !filename.exists() {
        bail!("{label} does not exist: {filename:?}");
    }
    if !filename.is_file() {
        bail!("{label} is not a regular file: {filename:?}");
    }
    Ok(())
}

/// Makes sure an output folder can be created, i.e. the path is either missing or already a folder
/// # Errors
/// * if something other than a folder is already at the path
pub fn check_output_folder(folder: &Path, label: &str) -> anyhow::Result<()> {
    if folder.exists() && !folder.is_dir() {
        bail!("{label} already exists and is not a folder: {folder:?}");
    }
    Ok(())
}

/// Makes sure an output file will not clobber a folder or one of the inputs
/// # Errors
/// * if the path is a folder or matches an input path
pub fn check_output_file(filename: &Path, inputs: &[impl AsRef<Path>], label: &str) -> anyhow::Result<()> {
    if filename.is_dir() {
        bail!("{label} is a folder: {filename:?}");
    }
    if inputs.iter().any(|input| input.as_ref() == filename) {
        bail!("{label} would overwrite an input: {filename:?}");
    }
    Ok(())
}
