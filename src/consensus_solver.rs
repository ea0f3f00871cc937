/*!
# Consensus Solver
Contains the logic for deciding, per read, which tools placed the read "correctly" according to the more trusted tools.
Each tool has a tier, with lower tiers being more trusted.
A tool is loosely correct if it agrees with every tool in a better tier, and strictly correct if it additionally agrees with every tool in its own tier.

## Example usage
```rust
use tiercon::consensus_solver::{solve_consensus, EvaluationConfigBuilder};
use tiercon::data_types::alignment_record::AlignmentRecord;
use tiercon::data_types::consensus_result::ConsensusResult;
use tiercon::data_types::score::Score;
use tiercon::data_types::tools::TierPartition;

// three equally trusted tools, the first one is 529 bp away from the other two
let records: Vec<AlignmentRecord> = [1639199, 1639728, 1639728].iter()
    .map(|&p| AlignmentRecord::new("1".to_string(), p, 41, 27, Score::from_int(40)))
    .collect();
let partition = TierPartition::new(&[1, 1, 1]);

// default wiggle of 10 bp; nobody agrees with the first tool
let config = EvaluationConfigBuilder::default().build().unwrap();
let results = solve_consensus(&records, &partition, config);
assert_eq!(results[0], ConsensusResult::new(0, 1, 1, true, false));
assert_eq!(results[1], ConsensusResult::new(0, 2, 2, true, false));

// with a wider wiggle, they all agree
let config = EvaluationConfigBuilder::default()
    .wiggle(1000)
    .build().unwrap();
let results = solve_consensus(&records, &partition, config);
assert!(results.iter().all(|r| *r == ConsensusResult::new(0, 3, 3, true, true)));
```
*/
use derive_builder::Builder;

use crate::data_types::agreement_matrix::AgreementMatrix;
use crate::data_types::alignment_record::AlignmentRecord;
use crate::data_types::consensus_result::ConsensusResult;
use crate::data_types::tools::TierPartition;

/// Default number of bases two alignments can differ by and still be considered the same
pub const DEFAULT_WIGGLE: u64 = 10;

/// Controls how alignments get compared
#[derive(Builder, Clone, Copy, Debug)]
#[builder(default)]
pub struct EvaluationConfig {
    /// Exclusive upper bound on the position difference between two agreeing alignments
    wiggle: u64
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            wiggle: DEFAULT_WIGGLE
        }
    }
}

impl EvaluationConfig {
    pub fn wiggle(&self) -> u64 {
        self.wiggle
    }
}

/// Evaluates the tiered consensus for every tool given a pre-built agreement matrix.
/// # Arguments
/// * `matrix` - the agreement matrix for a single read
/// * `partition` - the better/equal tier sets for each tool
/// # Panics
/// * if the matrix and partition have a different number of tools
pub fn evaluate_consensus(matrix: &AgreementMatrix, partition: &TierPartition) -> Vec<ConsensusResult> {
    assert_eq!(matrix.num_tools(), partition.num_tools());
    (0..matrix.num_tools())
        .map(|i| {
            let better = partition.better_tiers(i);
            let equal = partition.equal_tiers(i);

            let num_agree_better = matrix.count_in(i, better);
            let num_agree_equal = matrix.count_in(i, equal);
            let num_agree_total = matrix.count_row(i);

            // vacuously true when there are no better tiers
            let correct_loose = num_agree_better == better.len();
            let correct_strict = correct_loose && num_agree_equal == equal.len();
            ConsensusResult::new(num_agree_better, num_agree_equal, num_agree_total, correct_loose, correct_strict)
        })
        .collect()
}

/// Entry point for solving the consensus on a single read where every tool produced an alignment.
/// # Arguments
/// * `records` - one alignment per tool, in tool order
/// * `partition` - the better/equal tier sets for each tool
/// * `config` - comparison settings
pub fn solve_consensus(records: &[AlignmentRecord], partition: &TierPartition, config: EvaluationConfig) -> Vec<ConsensusResult> {
    let record_refs: Vec<&AlignmentRecord> = records.iter().collect();
    solve_consensus_refs(&record_refs, partition, config)
}

/// Same as `solve_consensus(...)`, but for borrowed alignments from multiple sources.
pub fn solve_consensus_refs(records: &[&AlignmentRecord], partition: &TierPartition, config: EvaluationConfig) -> Vec<ConsensusResult> {
    let matrix = AgreementMatrix::build(records, config.wiggle());
    evaluate_consensus(&matrix, partition)
}
