/// Pairwise same-locus agreement between tools for one read
pub mod agreement_matrix;
/// A single tool's alignment of a read, or the lack of one
pub mod alignment_record;
/// Per-tool outcome of the tiered consensus
pub mod consensus_result;
/// Totally ordered confidence score
pub mod score;
/// Correct/incorrect counts per score, and the six tallies kept per tool
pub mod score_tally;
/// Tool definitions and the better/equal tier sets
pub mod tools;
