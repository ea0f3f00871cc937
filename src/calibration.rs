/*!
# Calibration
Finalizers that turn a `ScoreTally` into the statistics describing how well a confidence score separates correct from incorrect alignments.
All three are computed from the same tally and are independent of each other:
* `build_roc_table(...)` - the cumulative correct/incorrect counts at each score threshold
* `auc(...)` - area under the correct vs. incorrect staircase, with ties spread evenly
* `ranking_error(...)` - a rank-weighted penalty for incorrect alignments with high scores
*/
use crate::data_types::score::Score;
use crate::data_types::score_tally::ScoreTally;

/// A single row of a ROC table
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RocRow {
    /// The score for this bucket
    pub score: Score,
    /// Number of correct alignments with exactly this score
    pub correct: u64,
    /// Number of incorrect alignments with exactly this score
    pub incorrect: u64,
    /// Number of correct alignments with a score >= this one
    pub cumulative_correct: u64,
    /// Number of incorrect alignments with a score >= this one
    pub cumulative_incorrect: u64
}

/// Builds the ROC table, sorted from the most confident score to the least.
/// # Arguments
/// * `tally` - the accumulated score tally
pub fn build_roc_table(tally: &ScoreTally) -> Vec<RocRow> {
    let mut cumulative_correct = 0;
    let mut cumulative_incorrect = 0;
    tally.iter_descending()
        .map(|(score, correct, incorrect)| {
            cumulative_correct += correct;
            cumulative_incorrect += incorrect;
            RocRow {
                score, correct, incorrect,
                cumulative_correct, cumulative_incorrect
            }
        })
        .collect()
}

/// Calculates the area under the curve traced by the cumulative correct (y) and incorrect (x) counts.
/// Within a group of tied scores, the trapezoid rule spreads the correct mass evenly across the incorrect ones.
/// The result is in the range [0, total_correct * total_incorrect], and 0 if nothing is incorrect.
/// # Arguments
/// * `tally` - the accumulated score tally
pub fn auc(tally: &ScoreTally) -> f64 {
    let mut area = 0.0;
    let mut tot_cor: u64 = 0;
    let mut tot_incor: u64 = 0;
    let mut last_cor: u64 = 0;
    let mut last_incor: u64 = 0;
    for (_score, correct, incorrect) in tally.iter_descending() {
        tot_cor += correct;
        tot_incor += incorrect;
        let cor_diff = tot_cor - last_cor;
        let incor_diff = tot_incor - last_incor;
        if incor_diff > 0 {
            area += 0.5 * cor_diff as f64 * incor_diff as f64;
            area += last_cor as f64 * incor_diff as f64;
        }
        last_cor = tot_cor;
        last_incor = tot_incor;
    }
    area
}

/// Calculates the ranking error.
/// Alignments are ranked from least confident (rank 0) to most confident; each incorrect alignment contributes its rank.
/// Ties share the error evenly: a bucket occupying ranks [sofar, sofar+n) with k incorrect contributes (k/n) * sum(ranks).
/// # Arguments
/// * `tally` - the accumulated score tally
pub fn ranking_error(tally: &ScoreTally) -> f64 {
    let mut err = 0.0;
    let mut sofar: u128 = 0;
    for (_score, correct, incorrect) in tally.iter_ascending() {
        let ntot = (correct + incorrect) as u128;
        if incorrect > 0 {
            // sum(range(sofar, sofar + ntot))
            let rank_sum = ntot * sofar + ntot * (ntot - 1) / 2;
            let frac = incorrect as f64 / ntot as f64;
            err += frac * rank_sum as f64;
        }
        sofar += ntot;
    }
    err
}

/// The finalized statistics for one tally
#[derive(Clone, Debug, PartialEq)]
pub struct CalibrationSummary {
    /// ROC table, most confident first
    pub roc_table: Vec<RocRow>,
    /// Total correct observations
    pub total_correct: u64,
    /// Total incorrect observations
    pub total_incorrect: u64,
    /// Area under the curve
    pub auc: f64,
    /// Ranking error
    pub ranking_error: f64
}

impl CalibrationSummary {
    /// Runs all of the finalizers on a tally
    pub fn from_tally(tally: &ScoreTally) -> Self {
        Self {
            roc_table: build_roc_table(tally),
            total_correct: tally.total_correct(),
            total_incorrect: tally.total_incorrect(),
            auc: auc(tally),
            ranking_error: ranking_error(tally)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;

    fn tally_from(observations: &[(i64, bool)]) -> ScoreTally {
        let mut tally = ScoreTally::default();
        for &(s, c) in observations.iter() {
            tally.add(Score::from_int(s), c);
        }
        tally
    }

    #[test]
    fn test_roc_table() {
        let tally = tally_from(&[
            (40, true), (40, true), (30, false), (30, true), (10, false), (0, false)
        ]);
        let roc = build_roc_table(&tally);
        let values: Vec<(f64, u64, u64, u64, u64)> = roc.iter()
            .map(|r| (r.score.value(), r.correct, r.incorrect, r.cumulative_correct, r.cumulative_incorrect))
            .collect();
        assert_eq!(values, vec![
            (40.0, 2, 0, 2, 0),
            (30.0, 1, 1, 3, 1),
            (10.0, 0, 1, 3, 2),
            (0.0, 0, 1, 3, 3),
        ]);

        // cumulative columns never decrease
        for pair in roc.windows(2) {
            assert!(pair[0].score > pair[1].score);
            assert!(pair[0].cumulative_correct <= pair[1].cumulative_correct);
            assert!(pair[0].cumulative_incorrect <= pair[1].cumulative_incorrect);
        }
    }

    #[test]
    fn test_roc_table_empty() {
        assert!(build_roc_table(&ScoreTally::default()).is_empty());
    }

    #[test]
    fn test_auc_perfect_separation() {
        // all correct above all incorrect; area = correct * incorrect
        let tally = tally_from(&[(40, true), (40, true), (30, true), (10, false), (0, false)]);
        assert_approx_eq!(auc(&tally), 6.0);
    }

    #[test]
    fn test_auc_inverted() {
        // all incorrect above all correct; area = 0
        let tally = tally_from(&[(40, false), (30, false), (10, true), (0, true)]);
        assert_eq!(auc(&tally), 0.0);
    }

    #[test]
    fn test_auc_ties() {
        // a single tied bucket gets half the area
        let tally = tally_from(&[(5, true), (5, true), (5, false), (5, false)]);
        assert_approx_eq!(auc(&tally), 2.0);

        // mixed: 40 -> (1, 0), 30 -> (1, 1), 10 -> (0, 1)
        // bucket 30: 0.5 * 1 * 1 + 1 * 1 = 1.5
        // bucket 10: 0.5 * 0 * 1 + 2 * 1 = 2.0
        let tally = tally_from(&[(40, true), (30, true), (30, false), (10, false)]);
        assert_approx_eq!(auc(&tally), 3.5);
    }

    #[test]
    fn test_auc_no_incorrect() {
        let tally = tally_from(&[(40, true), (30, true), (1, true)]);
        assert_eq!(auc(&tally), 0.0);
        assert_eq!(auc(&ScoreTally::default()), 0.0);
    }

    #[test]
    fn test_auc_bounds() {
        let tally = tally_from(&[
            (60, true), (60, false), (42, true), (42, true), (11, false),
            (11, true), (3, false), (3, false), (1, true), (0, false)
        ]);
        let area = auc(&tally);
        let max_area = (tally.total_correct() * tally.total_incorrect()) as f64;
        assert!(area >= 0.0);
        assert!(area <= max_area);
    }

    #[test]
    fn test_ranking_error() {
        // ascending: 0 -> (0, 1) rank 0, 10 -> (1, 1) ranks 1..3, 40 -> (1, 0) rank 3
        // error = 1.0 * 0 + 0.5 * (1 + 2) = 1.5
        let tally = tally_from(&[(0, false), (10, true), (10, false), (40, true)]);
        assert_approx_eq!(ranking_error(&tally), 1.5);

        // incorrect at the top is penalized the most
        let tally = tally_from(&[(0, true), (10, true), (40, false)]);
        assert_approx_eq!(ranking_error(&tally), 2.0);

        // nothing incorrect, no error
        let tally = tally_from(&[(0, true), (10, true), (40, true)]);
        assert_eq!(ranking_error(&tally), 0.0);
    }

    #[test]
    fn test_ranking_error_ties() {
        // one bucket of 4 with 1 incorrect: 0.25 * (0 + 1 + 2 + 3)
        let tally = tally_from(&[(7, true), (7, true), (7, false), (7, true)]);
        assert_approx_eq!(ranking_error(&tally), 1.5);
    }

    #[test]
    fn test_summary() {
        let tally = tally_from(&[(40, true), (30, true), (30, false), (10, false)]);
        let summary = CalibrationSummary::from_tally(&tally);
        assert_eq!(summary.roc_table.len(), 3);
        assert_eq!(summary.total_correct, 2);
        assert_eq!(summary.total_incorrect, 2);
        assert_approx_eq!(summary.auc, 3.5);
        // ascending: 10 -> (0, 1) rank 0, 30 -> (1, 1) ranks 1..3, 40 -> (1, 0)
        assert_approx_eq!(summary.ranking_error, 1.5);
    }
}
