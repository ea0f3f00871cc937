/*!
# Writers module
Contains the logic for writing the output files of an evaluation.
*/
/// Writes every per-tally output in parallel, plus the joint summary
pub mod evaluation_outputs;
/// Writes the optional per-read consensus table
pub mod read_consensus;
/// Writes a single ROC table
pub mod roc_table;
/// Writes the per-tally and joint summary statistics
pub mod summary;
