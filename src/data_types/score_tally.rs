use std::collections::BTreeMap;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::data_types::alignment_record::AlignmentRecord;
use crate::data_types::consensus_result::{ConsensusResult, Correctness};
use crate::data_types::score::Score;

/// Which of the per-alignment scores is getting evaluated
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, EnumIter, strum_macros::Display, strum_macros::AsRefStr)]
pub enum ScoreRepresentation {
    /// The predicted MAPQ as written in the MAPQ field
    #[strum(serialize = "int")]
    PredictedInteger,
    /// The aligner's original MAPQ
    #[strum(serialize = "orig")]
    Original,
    /// The predicted MAPQ at full precision
    #[strum(serialize = "dec")]
    PredictedDecimal
}

impl ScoreRepresentation {
    /// Pulls the matching score out of an alignment
    pub fn score(&self, record: &AlignmentRecord) -> Score {
        match self {
            ScoreRepresentation::PredictedInteger => Score::from_int(record.mapq_int()),
            ScoreRepresentation::Original => Score::from_int(record.mapq_orig()),
            ScoreRepresentation::PredictedDecimal => record.mapq_dec()
        }
    }

    /// Formats a score for output.
    /// Integer representations never carry a fractional part; decimal ones always do, so 40 is written as "40.0".
    pub fn format_score(&self, score: Score) -> String {
        match self {
            ScoreRepresentation::PredictedInteger |
            ScoreRepresentation::Original => format!("{:.0}", score.value()),
            ScoreRepresentation::PredictedDecimal => {
                let value = score.value();
                if value.fract() == 0.0 {
                    format!("{value:.1}")
                } else {
                    value.to_string()
                }
            }
        }
    }
}

/// Running counts of correct and incorrect alignments for each observed score value
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ScoreTally {
    /// score -> (correct, incorrect)
    buckets: BTreeMap<Score, (u64, u64)>
}

impl ScoreTally {
    /// Adds a single observation; ties share a bucket
    /// # Arguments
    /// * `score` - the confidence score
    /// * `correct` - whether the alignment was deemed correct
    pub fn add(&mut self, score: Score, correct: bool) {
        let entry = self.buckets.entry(score).or_default();
        if correct {
            entry.0 += 1;
        } else {
            entry.1 += 1;
        }
    }

    /// Iterates the (score, correct, incorrect) buckets from the highest score to the lowest
    pub fn iter_descending(&self) -> impl Iterator<Item = (Score, u64, u64)> + '_ {
        self.buckets.iter().rev().map(|(&s, &(c, i))| (s, c, i))
    }

    /// Iterates the (score, correct, incorrect) buckets from the lowest score to the highest
    pub fn iter_ascending(&self) -> impl Iterator<Item = (Score, u64, u64)> + '_ {
        self.buckets.iter().map(|(&s, &(c, i))| (s, c, i))
    }

    pub fn total_correct(&self) -> u64 {
        self.buckets.values().map(|(c, _i)| c).sum()
    }

    pub fn total_incorrect(&self) -> u64 {
        self.buckets.values().map(|(_c, i)| i).sum()
    }

    /// Number of distinct score values observed
    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// The six tallies tracked for a single tool, one per (correctness, score representation)
#[derive(Clone, Debug)]
pub struct ToolTallies {
    /// Keyed by correctness and then score representation
    tallies: BTreeMap<(Correctness, ScoreRepresentation), ScoreTally>
}

impl Default for ToolTallies {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolTallies {
    /// Creates the full set of empty tallies
    pub fn new() -> Self {
        let tallies = Self::keys()
            .map(|k| (k, ScoreTally::default()))
            .collect();
        Self { tallies }
    }

    /// All (correctness, score representation) combinations in output order
    pub fn keys() -> impl Iterator<Item = (Correctness, ScoreRepresentation)> {
        Correctness::iter()
            .flat_map(|c| ScoreRepresentation::iter().map(move |s| (c, s)))
    }

    /// Feeds one alignment and its consensus into all six tallies
    pub fn add(&mut self, record: &AlignmentRecord, consensus: &ConsensusResult) {
        for ((correctness, representation), tally) in self.tallies.iter_mut() {
            tally.add(representation.score(record), consensus.is_correct(*correctness));
        }
    }

    pub fn get(&self, correctness: Correctness, representation: ScoreRepresentation) -> Option<&ScoreTally> {
        self.tallies.get(&(correctness, representation))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(Correctness, ScoreRepresentation), &ScoreTally)> {
        self.tallies.iter()
    }
}
