use anyhow::{bail, Context};
use log::{debug, trace};
use noodles::sam;
use noodles::sam::alignment::record::Data as _;
use noodles::sam::alignment::record::cigar::op::Kind;
use noodles::sam::alignment::record::data::field::{Tag, Value};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::data_types::alignment_record::{AlignmentRecord, SourceRead};
use crate::data_types::score::Score;
use crate::parsing::record_source::RecordSource;

/// Default tag holding the aligner's original MAPQ
pub const DEFAULT_ORIG_MAPQ_TAG: &str = "Zm";
/// Default tag holding the predicted MAPQ at decimal precision
pub const DEFAULT_DEC_MAPQ_TAG: &str = "Zp";

/// MAPQ value SAM uses for "unavailable", which noodles reports as missing
const MAPQ_UNAVAILABLE: i64 = 255;

#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    #[error("read {read_name:?} is missing the {tag} tag")]
    MissingTag { read_name: String, tag: String },
    #[error("read {read_name:?} has an unparseable {tag} tag value: {value}")]
    InvalidTag { read_name: String, tag: String, value: String },
    #[error("read {read_name:?} has an invalid {field} field: {message}")]
    InvalidField { read_name: String, field: &'static str, message: String },
    #[error("read {read_name:?} is mapped but has no reference sequence")]
    MissingReference { read_name: String },
    #[error("read {read_name:?} is mapped but has no alignment start")]
    MissingPosition { read_name: String }
}

/// The SAM tags that carry the non-standard MAPQ values
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScoreTags {
    /// Tag holding the original integer MAPQ
    original: [u8; 2],
    /// Tag holding the predicted decimal MAPQ
    decimal: [u8; 2]
}

impl Default for ScoreTags {
    fn default() -> Self {
        Self {
            original: *b"Zm",
            decimal: *b"Zp"
        }
    }
}

impl ScoreTags {
    /// Constructor from user strings
    /// # Errors
    /// * if either tag is not exactly two ASCII characters
    pub fn new(original: &str, decimal: &str) -> anyhow::Result<Self> {
        Ok(Self {
            original: parse_tag(original)?,
            decimal: parse_tag(decimal)?
        })
    }

    pub fn original(&self) -> Tag {
        Tag::new(self.original[0], self.original[1])
    }

    pub fn decimal(&self) -> Tag {
        Tag::new(self.decimal[0], self.decimal[1])
    }

    pub fn original_label(&self) -> String {
        String::from_utf8_lossy(&self.original).to_string()
    }

    pub fn decimal_label(&self) -> String {
        String::from_utf8_lossy(&self.decimal).to_string()
    }
}

/// Converts a two character string into the raw tag bytes
fn parse_tag(tag: &str) -> anyhow::Result<[u8; 2]> {
    match tag.as_bytes() {
        &[a, b] if a.is_ascii_alphabetic() && b.is_ascii_alphanumeric() => Ok([a, b]),
        _ => bail!("SAM tag must be two characters ([A-Za-z][A-Za-z0-9]), found {tag:?}")
    }
}

/// Reads alignments for one tool out of a SAM file.
/// The header is optional; reference names come straight from the RNAME column, so `samtools view` output without `-h` works.
/// Secondary and supplementary records are skipped so that each read yields exactly one result.
pub struct SamRecordSource {
    /// Label for messages
    label: String,
    /// The SAM reader
    reader: sam::io::Reader<Box<dyn BufRead>>,
    /// Re-usable lazy record, fields are only decoded on access
    record: sam::Record,
    /// Which tags carry the extra scores
    score_tags: ScoreTags,
    /// Number of raw records consumed, including skipped ones
    records_read: u64
}

impl SamRecordSource {
    /// Opens a SAM file, which may be gzip compressed if it ends with ".gz"
    /// # Arguments
    /// * `label` - label for messages
    /// * `filename` - the SAM file path
    /// * `score_tags` - which tags carry the extra scores
    /// # Errors
    /// * if the file cannot be opened or the header cannot be parsed
    pub fn from_path(label: String, filename: &Path, score_tags: ScoreTags) -> anyhow::Result<Self> {
        let file = File::open(filename)
            .with_context(|| format!("Error while opening {filename:?}:"))?;
        let inner: Box<dyn BufRead> = if filename.extension().unwrap_or_default() == "gz" {
            Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        Self::from_reader(label, inner, score_tags)
            .with_context(|| format!("Error while reading header of {filename:?}:"))
    }

    /// Wraps an already opened SAM stream, consuming any header lines
    /// # Errors
    /// * if the header is present but cannot be parsed
    pub fn from_reader(label: String, inner: Box<dyn BufRead>, score_tags: ScoreTags) -> anyhow::Result<Self> {
        let mut reader = sam::io::Reader::new(inner);
        let header = reader.read_header()?;
        if header.is_empty() {
            debug!("{label}: no SAM header found");
        } else {
            debug!("{label}: found {} reference sequences in header", header.reference_sequences().len());
        }
        Ok(Self {
            label,
            reader,
            record: sam::Record::default(),
            score_tags,
            records_read: 0
        })
    }

    /// Converts the current record into a SourceRead
    fn convert_record(&self) -> Result<SourceRead, RecordError> {
        let record = &self.record;
        let read_name = record.name()
            .map(|n| n.to_string())
            .unwrap_or_default();
        let invalid = |field: &'static str, message: String| RecordError::InvalidField {
            read_name: read_name.clone(), field, message
        };

        let flags = record.flags()
            .map_err(|e| invalid("FLAG", e.to_string()))?;
        if flags.is_unmapped() {
            return Ok(SourceRead::unmapped(read_name));
        }

        let reference_name = record.reference_sequence_name()
            .map(|name| name.to_string())
            .ok_or_else(|| RecordError::MissingReference { read_name: read_name.clone() })?;

        // soft-clip adjusted leftmost position
        let alignment_start = record.alignment_start()
            .ok_or_else(|| RecordError::MissingPosition { read_name: read_name.clone() })?
            .map(usize::from)
            .map_err(|e| invalid("POS", e.to_string()))?;
        let left_clip = match record.cigar().iter().next() {
            Some(Ok(op)) if op.kind() == Kind::SoftClip => op.len(),
            Some(Err(e)) => return Err(invalid("CIGAR", e.to_string())),
            _ => 0
        };
        let position = alignment_start as i64 - left_clip as i64;

        let mapq_int = match record.mapping_quality() {
            Some(Ok(mq)) => i64::from(u8::from(mq)),
            Some(Err(e)) => return Err(invalid("MAPQ", e.to_string())),
            None => MAPQ_UNAVAILABLE
        };

        let data = record.data();
        let mapq_orig = match data.get(&self.score_tags.original()) {
            Some(Ok(value)) => integer_value(&value).ok_or_else(|| RecordError::InvalidTag {
                read_name: read_name.clone(),
                tag: self.score_tags.original_label(),
                value: format!("{value:?}")
            })?,
            Some(Err(e)) => return Err(invalid("optional", e.to_string())),
            None => return Err(RecordError::MissingTag { read_name, tag: self.score_tags.original_label() })
        };

        let mapq_dec = match data.get(&self.score_tags.decimal()) {
            Some(Ok(value)) => decimal_value(&value).ok_or_else(|| RecordError::InvalidTag {
                read_name: read_name.clone(),
                tag: self.score_tags.decimal_label(),
                value: format!("{value:?}")
            })?,
            Some(Err(e)) => return Err(invalid("optional", e.to_string())),
            None => return Err(RecordError::MissingTag { read_name, tag: self.score_tags.decimal_label() })
        };

        let alignment = AlignmentRecord::new(reference_name, position, mapq_int, mapq_orig, mapq_dec);
        Ok(SourceRead::mapped(read_name, alignment))
    }

    pub fn records_read(&self) -> u64 {
        self.records_read
    }
}

impl RecordSource for SamRecordSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn next_read(&mut self) -> anyhow::Result<Option<SourceRead>> {
        loop {
            let bytes_read = self.reader.read_record(&mut self.record)
                .with_context(|| format!("Error while reading record #{} from {}:", self.records_read + 1, self.label))?;
            if bytes_read == 0 {
                return Ok(None);
            }
            self.records_read += 1;

            let flags = self.record.flags()
                .with_context(|| format!("Error while parsing FLAG of record #{} from {}:", self.records_read, self.label))?;
            if flags.is_secondary() || flags.is_supplementary() {
                trace!("{}: skipping secondary/supplementary record #{}", self.label, self.records_read);
                continue;
            }

            let read = self.convert_record()
                .with_context(|| format!("Error while parsing record #{} from {}:", self.records_read, self.label))?;
            return Ok(Some(read));
        }
    }
}

/// Integer interpretation of a tag, which some pipelines write as a string (Z) and some as an integer (i)
fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Int8(v) => Some(i64::from(*v)),
        Value::UInt8(v) => Some(i64::from(*v)),
        Value::Int16(v) => Some(i64::from(*v)),
        Value::UInt16(v) => Some(i64::from(*v)),
        Value::Int32(v) => Some(i64::from(*v)),
        Value::UInt32(v) => Some(i64::from(*v)),
        Value::String(s) => s.to_string().trim().parse().ok(),
        _ => None
    }
}

/// Decimal interpretation of a tag, written as a string (Z), float (f), or integer
fn decimal_value(value: &Value) -> Option<Score> {
    match value {
        Value::Float(v) => Score::new(f64::from(*v)).ok(),
        Value::String(s) => Score::parse(&s.to_string()).ok(),
        other => integer_value(other).map(Score::from_int)
    }
}
