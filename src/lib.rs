/// Converts tally counts into ROC tables, AUC, and ranking error
pub mod calibration;
/// Command line interface functionality
pub mod cli;
/// Contains the core logic for the tiered consensus on a single read
pub mod consensus_solver;
/// Contains various shared data types
pub mod data_types;
/// Drives the lock-step evaluation and accumulates tallies
pub mod evaluator;
/// Tooling for parsing input files into meaningful structs / data
pub mod parsing;
/// Wires the settings to the core components
pub mod pipeline;
/// Various utility functions that tend to be very generic
pub mod util;
/// All output writers
pub mod writers;
