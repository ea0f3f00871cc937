use anyhow::Context;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::data_types::alignment_record::SourceRead;
use crate::data_types::consensus_result::ConsensusResult;
use crate::data_types::tools::Tool;
use crate::util::output::{open_output, table_delimiter};

/// Writes the consensus outcome of every evaluated read, one row per tool
pub struct ReadConsensusWriter {
    /// Handle on the writer
    csv_writer: csv::Writer<Box<dyn Write>>,
}

/// Contains all the data written to each row of the per-read file
#[derive(Serialize)]
struct ReadConsensusRow<'a> {
    read_name: &'a str,
    tool_index: usize,
    tool_name: &'a str,
    num_agree_better: usize,
    num_agree_equal: usize,
    num_agree_total: usize,
    correct_loose: bool,
    correct_strict: bool,
    mapq_int: i64,
    mapq_orig: i64,
    mapq_dec: f64
}

impl ReadConsensusWriter {
    /// Creates a new writer
    /// # Arguments
    /// * `filename` - path to the filename that will get opened, .csv is comma-delimited, anything else gets tabs
    pub fn new(filename: &Path) -> anyhow::Result<Self> {
        let csv_writer = csv::WriterBuilder::new()
            .delimiter(table_delimiter(filename))
            .from_writer(open_output(filename)?);
        Ok(Self {
            csv_writer
        })
    }

    /// Writes one row per tool for a single evaluated read
    /// # Arguments
    /// * `reads` - the reads for this cycle, all of which must be mapped
    /// * `tools` - the tool definitions, in the same order
    /// * `results` - the consensus results, in the same order
    /// # Errors
    /// * if a read is unmapped
    /// * if writing fails
    pub fn write_cycle(&mut self, reads: &[SourceRead], tools: &[Tool], results: &[ConsensusResult]) -> anyhow::Result<()> {
        for (tool_index, ((read, tool), consensus)) in reads.iter().zip(tools.iter()).zip(results.iter()).enumerate() {
            let alignment = read.alignment()
                .with_context(|| format!("Read {} is unmapped for tool {}", read.read_name(), tool.name()))?;
            let row = ReadConsensusRow {
                read_name: read.read_name(),
                tool_index,
                tool_name: tool.name(),
                num_agree_better: consensus.num_agree_better,
                num_agree_equal: consensus.num_agree_equal,
                num_agree_total: consensus.num_agree_total,
                correct_loose: consensus.correct_loose,
                correct_strict: consensus.correct_strict,
                mapq_int: alignment.mapq_int(),
                mapq_orig: alignment.mapq_orig(),
                mapq_dec: alignment.mapq_dec().value()
            };
            self.csv_writer.serialize(&row)?;
        }
        Ok(())
    }

    /// Flushes everything to disk, also happens on drop but errors are lost there
    pub fn finish(mut self) -> anyhow::Result<()> {
        self.csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::alignment_record::AlignmentRecord;
    use crate::data_types::score::Score;

    #[test]
    fn test_write_cycle() {
        let out_dir = std::env::temp_dir().join("tiercon_test_read_consensus");
        std::fs::create_dir_all(&out_dir).unwrap();
        let filename = out_dir.join("reads.csv");

        let tools = vec![Tool::new("bt2".to_string(), 0), Tool::new("bwa".to_string(), 1)];
        let reads = vec![
            SourceRead::mapped("r1".to_string(), AlignmentRecord::new("1".to_string(), 100, 42, 40, Score::parse("41.5").unwrap())),
            SourceRead::mapped("r1".to_string(), AlignmentRecord::new("1".to_string(), 101, 12, 10, Score::parse("11.25").unwrap())),
        ];
        let results = vec![
            ConsensusResult::new(0, 1, 2, true, true),
            ConsensusResult::new(1, 1, 2, true, true),
        ];

        let mut writer = ReadConsensusWriter::new(&filename).unwrap();
        writer.write_cycle(&reads, &tools, &results).unwrap();
        writer.finish().unwrap();

        let text = std::fs::read_to_string(&filename).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![
            "read_name,tool_index,tool_name,num_agree_better,num_agree_equal,num_agree_total,correct_loose,correct_strict,mapq_int,mapq_orig,mapq_dec",
            "r1,0,bt2,0,1,2,true,true,42,40,41.5",
            "r1,1,bwa,1,1,2,true,true,12,10,11.25"
        ]);
    }

    #[test]
    fn test_unmapped_is_error() {
        let out_dir = std::env::temp_dir().join("tiercon_test_read_consensus");
        std::fs::create_dir_all(&out_dir).unwrap();
        let mut writer = ReadConsensusWriter::new(&out_dir.join("unmapped.tsv")).unwrap();
        let tools = vec![Tool::new("bt2".to_string(), 0)];
        let reads = vec![SourceRead::unmapped("r1".to_string())];
        let results = vec![ConsensusResult::default()];
        assert!(writer.write_cycle(&reads, &tools, &results).is_err());
    }
}
