/// Helper functions for output files, JSON, and table delimiters
pub mod output;
/// Helper functions for generating the progress bars
pub mod progress_bar;
