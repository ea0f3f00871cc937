use anyhow::Context;
use log::trace;

use crate::data_types::alignment_record::SourceRead;
use crate::parsing::record_source::RecordSource;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum LockstepError {
    #[error("inputs ended at different reads on cycle #{cycle}; exhausted: {exhausted:?}, still reading: {remaining:?}")]
    StreamDesync { cycle: u64, exhausted: Vec<String>, remaining: Vec<String> },
    #[error("at least one record source is required")]
    NoSources
}

/// Pulls exactly one read from every source per cycle.
/// All sources must run out on the same cycle; anything else means the inputs are not aligned read-for-read.
pub struct LockstepReader {
    /// One source per tool, in tool order
    sources: Vec<Box<dyn RecordSource>>,
    /// Number of complete cycles returned so far
    cycles: u64
}

impl LockstepReader {
    /// Constructor
    /// # Errors
    /// * if `sources` is empty
    pub fn new(sources: Vec<Box<dyn RecordSource>>) -> Result<Self, LockstepError> {
        if sources.is_empty() {
            return Err(LockstepError::NoSources);
        }
        Ok(Self {
            sources,
            cycles: 0
        })
    }

    /// Returns the next read from every source, in source order, or None if all sources are exhausted.
    /// # Errors
    /// * if any source fails to read
    /// * if some, but not all, sources are exhausted
    pub fn next_cycle(&mut self) -> anyhow::Result<Option<Vec<SourceRead>>> {
        let mut reads: Vec<Option<SourceRead>> = Vec::with_capacity(self.sources.len());
        for source in self.sources.iter_mut() {
            let read = source.next_read()
                .with_context(|| format!("Error while reading from {}:", source.label()))?;
            reads.push(read);
        }

        let num_exhausted = reads.iter().filter(|r| r.is_none()).count();
        if num_exhausted == reads.len() {
            trace!("All {} sources exhausted after {} cycles", reads.len(), self.cycles);
            return Ok(None);
        }

        if num_exhausted > 0 {
            let (exhausted, remaining): (Vec<_>, Vec<_>) = self.sources.iter()
                .zip(reads.iter())
                .partition(|(_s, r)| r.is_none());
            return Err(LockstepError::StreamDesync {
                cycle: self.cycles + 1,
                exhausted: exhausted.into_iter().map(|(s, _r)| s.label().to_string()).collect(),
                remaining: remaining.into_iter().map(|(s, _r)| s.label().to_string()).collect()
            }.into());
        }

        self.cycles += 1;
        Ok(Some(reads.into_iter().flatten().collect()))
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn num_sources(&self) -> usize {
        self.sources.len()
    }
}
