/*!
# Parsing module
Contains the logic for parsing input files into meaningful structs / data.
*/
/// Advances every record source together, one read at a time
pub mod lockstep;
/// The per-tool record stream abstraction
pub mod record_source;
/// SAM-backed record source
pub mod sam_source;
