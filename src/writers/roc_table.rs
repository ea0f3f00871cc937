use anyhow::Context;
use serde::Serialize;
use std::path::Path;

use crate::calibration::RocRow;
use crate::data_types::score_tally::ScoreRepresentation;
use crate::util::output::open_output;

/// Contains all the data written to each row of a ROC table
#[derive(Serialize)]
struct RocTableRow {
    /// The score for this bucket, formatted for the representation
    score: String,
    /// Correct alignments with exactly this score
    cor: u64,
    /// Incorrect alignments with exactly this score
    incor: u64,
    /// Correct alignments with a score >= this one
    cum_cor: u64,
    /// Incorrect alignments with a score >= this one
    cum_incor: u64
}

impl RocTableRow {
    fn new(row: &RocRow, representation: ScoreRepresentation) -> Self {
        Self {
            score: representation.format_score(row.score),
            cor: row.correct,
            incor: row.incorrect,
            cum_cor: row.cumulative_correct,
            cum_incor: row.cumulative_incorrect
        }
    }
}

/// Writes a ROC table as comma-separated values with a header row.
/// An empty table still gets the header.
/// # Arguments
/// * `filename` - the output path
/// * `representation` - controls how the scores get formatted
/// * `roc_table` - the rows, most confident first
/// # Errors
/// * if the file cannot be created or written
pub fn write_roc_table(filename: &Path, representation: ScoreRepresentation, roc_table: &[RocRow]) -> anyhow::Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .from_writer(open_output(filename)?);

    // written explicitly so that empty tables have a header too
    csv_writer.write_record(["score", "cor", "incor", "cum_cor", "cum_incor"])
        .with_context(|| format!("Error while writing header to {filename:?}:"))?;
    for row in roc_table.iter() {
        csv_writer.serialize(RocTableRow::new(row, representation))
            .with_context(|| format!("Error while writing row to {filename:?}:"))?;
    }
    csv_writer.flush()
        .with_context(|| format!("Error while flushing {filename:?}:"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::build_roc_table;
    use crate::data_types::score::Score;
    use crate::data_types::score_tally::ScoreTally;

    #[test]
    fn test_write_roc_table() {
        let mut tally = ScoreTally::default();
        tally.add(Score::from_int(40), true);
        tally.add(Score::from_int(40), true);
        tally.add(Score::from_int(3), false);
        let roc = build_roc_table(&tally);

        let out_dir = std::env::temp_dir().join("tiercon_test_roc_table");
        std::fs::create_dir_all(&out_dir).unwrap();
        let filename = out_dir.join("bt2_loose_int_roc.csv");
        write_roc_table(&filename, ScoreRepresentation::PredictedInteger, &roc).unwrap();

        let text = std::fs::read_to_string(&filename).unwrap();
        assert_eq!(text, "score,cor,incor,cum_cor,cum_incor\n40,2,0,2,0\n3,0,1,2,1\n");
    }

    #[test]
    fn test_write_decimal_roc_table() {
        let mut tally = ScoreTally::default();
        tally.add(Score::parse("40").unwrap(), true);
        tally.add(Score::parse("5.088").unwrap(), false);
        let roc = build_roc_table(&tally);

        let out_dir = std::env::temp_dir().join("tiercon_test_roc_table");
        std::fs::create_dir_all(&out_dir).unwrap();
        let filename = out_dir.join("bt2_loose_dec_roc.csv");
        write_roc_table(&filename, ScoreRepresentation::PredictedDecimal, &roc).unwrap();

        let text = std::fs::read_to_string(&filename).unwrap();
        assert_eq!(text, "score,cor,incor,cum_cor,cum_incor\n40.0,1,0,1,0\n5.088,0,1,1,1\n");
    }

    #[test]
    fn test_write_empty_roc_table() {
        let out_dir = std::env::temp_dir().join("tiercon_test_roc_table");
        std::fs::create_dir_all(&out_dir).unwrap();
        let filename = out_dir.join("empty_strict_dec_roc.csv");
        write_roc_table(&filename, ScoreRepresentation::PredictedDecimal, &[]).unwrap();

        let text = std::fs::read_to_string(&filename).unwrap();
        assert_eq!(text, "score,cor,incor,cum_cor,cum_incor\n");
    }
}
