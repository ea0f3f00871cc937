use crate::data_types::alignment_record::SourceRead;

/// A stream of per-read results from a single tool.
/// Sources are read in lock-step, so every source must report the reads in the same order.
pub trait RecordSource {
    /// Label used in log and error messages, typically the tool name
    fn label(&self) -> &str;

    /// Returns the next read, or None once the source is exhausted
    /// # Errors
    /// * if the underlying input fails to read or a record is malformed
    fn next_read(&mut self) -> anyhow::Result<Option<SourceRead>>;
}

/// A pre-loaded source, handy when reads have already been parsed by some other means
#[derive(Clone, Debug)]
pub struct VecRecordSource {
    /// Source label
    label: String,
    /// Remaining reads, in order
    reads: std::collections::VecDeque<SourceRead>
}

impl VecRecordSource {
    /// Constructor
    /// # Arguments
    /// * `label` - label for messages
    /// * `reads` - the reads to emit, in order
    pub fn new(label: String, reads: Vec<SourceRead>) -> Self {
        Self {
            label,
            reads: reads.into()
        }
    }
}

impl RecordSource for VecRecordSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn next_read(&mut self) -> anyhow::Result<Option<SourceRead>> {
        Ok(self.reads.pop_front())
    }
}
