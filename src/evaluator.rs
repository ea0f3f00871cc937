/*!
# Evaluator
Drives a full evaluation run: pulls one read from every tool per cycle, solves the tiered consensus, and accumulates the score tallies.
Once the inputs are exhausted, `finalize()` converts every tally into ROC tables and summary statistics.
*/
use indicatif::ParallelProgressIterator;
use itertools::Itertools;
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::calibration::CalibrationSummary;
use crate::consensus_solver::{solve_consensus_refs, EvaluationConfig};
use crate::data_types::alignment_record::{AlignmentRecord, SourceRead};
use crate::data_types::consensus_result::{ConsensusResult, Correctness};
use crate::data_types::score_tally::{ScoreRepresentation, ScoreTally, ToolTallies};
use crate::data_types::tools::{TierPartition, Tool};
use crate::parsing::lockstep::LockstepReader;
use crate::util::progress_bar::{get_progress_style, get_spinner};
use crate::writers::read_consensus::ReadConsensusWriter;

/// Counters describing what happened to each cycle
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RunStatistics {
    /// Total number of lock-step cycles read
    pub cycles: u64,
    /// Cycles where every tool aligned the read and the consensus was evaluated
    pub evaluated: u64,
    /// Cycles skipped because at least one tool left the read unmapped
    pub skipped_unmapped: u64,
    /// Cycles where the read names did not all match
    pub name_mismatches: u64,
    /// Per-tool count of unmapped reads, in tool order
    pub unmapped_per_tool: Vec<u64>
}

/// Finalized statistics for one tally of one tool
#[derive(Clone, Debug)]
pub struct TallyReport {
    /// The tool this tally belongs to
    pub tool: Tool,
    /// Which definition of correct was used
    pub correctness: Correctness,
    /// Which score was tallied
    pub representation: ScoreRepresentation,
    /// The ROC table and summary statistics
    pub summary: CalibrationSummary
}

impl TallyReport {
    /// The label used for file names, e.g. "bwa_loose_int"
    pub fn label(&self) -> String {
        format!("{}_{}_{}", self.tool.name(), self.correctness, self.representation)
    }
}

/// Accumulates the per-tool score tallies over a run
pub struct ConsensusEvaluator {
    /// The tools, in input order
    tools: Vec<Tool>,
    /// Pre-computed better/equal tier sets
    partition: TierPartition,
    /// Comparison settings
    config: EvaluationConfig,
    /// Six tallies per tool, in tool order
    tallies: Vec<ToolTallies>,
    /// Run counters
    statistics: RunStatistics
}

impl ConsensusEvaluator {
    /// Constructor
    /// # Arguments
    /// * `tools` - the tools, in the same order as the record sources
    /// * `config` - comparison settings
    pub fn new(tools: Vec<Tool>, config: EvaluationConfig) -> Self {
        let partition = TierPartition::from_tools(&tools);
        let tallies = vec![ToolTallies::new(); tools.len()];
        let statistics = RunStatistics {
            unmapped_per_tool: vec![0; tools.len()],
            ..Default::default()
        };
        Self {
            tools,
            partition,
            config,
            tallies,
            statistics
        }
    }

    /// Processes a single lock-step cycle.
    /// Returns the consensus results, or None if the cycle was skipped because some tool did not align the read.
    /// # Arguments
    /// * `reads` - one read per tool, in tool order
    /// # Errors
    /// * if the number of reads does not match the number of tools
    pub fn process_cycle(&mut self, reads: &[SourceRead]) -> anyhow::Result<Option<Vec<ConsensusResult>>> {
        anyhow::ensure!(
            reads.len() == self.tools.len(),
            "Expected {} reads in cycle, found {}", self.tools.len(), reads.len()
        );
        self.statistics.cycles += 1;

        // sanity check only, the inputs are assumed to be in the same order
        if !reads.iter().map(|r| r.read_name()).all_equal() {
            warn!(
                "Read names do not match on cycle #{}: {:?}",
                self.statistics.cycles,
                reads.iter().map(|r| r.read_name()).collect::<Vec<_>>()
            );
            self.statistics.name_mismatches += 1;
        }

        let alignments: Option<Vec<&AlignmentRecord>> = reads.iter()
            .map(|r| r.alignment())
            .collect();
        let Some(alignments) = alignments else {
            for (count, read) in self.statistics.unmapped_per_tool.iter_mut().zip(reads.iter()) {
                if read.is_unmapped() {
                    *count += 1;
                }
            }
            debug!("Skipping cycle #{} ({}), at least one tool left it unmapped", self.statistics.cycles, reads[0].read_name());
            self.statistics.skipped_unmapped += 1;
            return Ok(None);
        };

        let results = solve_consensus_refs(&alignments, &self.partition, self.config);
        for ((tally, alignment), consensus) in self.tallies.iter_mut().zip(alignments.iter()).zip(results.iter()) {
            tally.add(alignment, consensus);
        }
        self.statistics.evaluated += 1;
        Ok(Some(results))
    }

    /// Consumes every cycle from the reader.
    /// # Arguments
    /// * `reader` - the lock-step reader over all tool inputs
    /// * `read_writer` - optional writer for the per-read consensus table
    /// # Errors
    /// * if any input fails to read or the inputs fall out of sync
    /// * if the per-read writer fails
    pub fn run(&mut self, reader: &mut LockstepReader, mut read_writer: Option<&mut ReadConsensusWriter>) -> anyhow::Result<()> {
        anyhow::ensure!(
            reader.num_sources() == self.tools.len(),
            "Number of record sources ({}) does not match number of tools ({})", reader.num_sources(), self.tools.len()
        );

        let spinner = get_spinner();
        while let Some(reads) = reader.next_cycle()? {
            if let Some(results) = self.process_cycle(&reads)? {
                if let Some(writer) = read_writer.as_mut() {
                    writer.write_cycle(&reads, &self.tools, &results)?;
                }
            }
            spinner.inc(1);
        }
        spinner.finish_and_clear();

        info!(
            "Processed {} reads: {} evaluated, {} skipped as unmapped, {} with mismatched names",
            self.statistics.cycles, self.statistics.evaluated, self.statistics.skipped_unmapped, self.statistics.name_mismatches
        );
        for (tool, count) in self.tools.iter().zip(self.statistics.unmapped_per_tool.iter()) {
            debug!("\t{}: {count} unmapped reads", tool.name());
        }
        Ok(())
    }

    /// Converts every tally into its ROC table and summary statistics.
    /// Reports are ordered by tool, then correctness, then score representation.
    pub fn finalize(&self) -> Vec<TallyReport> {
        let jobs: Vec<(&Tool, Correctness, ScoreRepresentation, &ScoreTally)> = self.tools.iter()
            .zip(self.tallies.iter())
            .flat_map(|(tool, tool_tallies)| {
                tool_tallies.iter().map(move |(&(correctness, representation), tally)| (tool, correctness, representation, tally))
            })
            .collect();

        let style = get_progress_style();
        jobs.into_par_iter()
            .map(|(tool, correctness, representation, tally)| TallyReport {
                tool: tool.clone(),
                correctness,
                representation,
                summary: CalibrationSummary::from_tally(tally)
            })
            .progress_with_style(style)
            .collect()
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn partition(&self) -> &TierPartition {
        &self.partition
    }

    pub fn tallies(&self) -> &[ToolTallies] {
        &self.tallies
    }

    pub fn statistics(&self) -> &RunStatistics {
        &self.statistics
    }
}
