use crate::data_types::score::Score;

/// The parsed result of one tool aligning one read
#[derive(Clone, Debug, PartialEq)]
pub struct AlignmentRecord {
    /// Reference sequence (contig) name
    reference_name: String,
    /// Leftmost coordinate, adjusted left by any leading soft clip
    position: i64,
    /// Predicted integer MAPQ; the MAPQ field of the record
    mapq_int: i64,
    /// Original MAPQ reported by the aligner before prediction
    mapq_orig: i64,
    /// Predicted MAPQ at full decimal precision
    mapq_dec: Score,
}

impl AlignmentRecord {
    /// Constructor
    /// # Arguments
    /// * `reference_name` - the contig the read aligned to
    /// * `position` - the soft-clip adjusted leftmost position
    /// * `mapq_int` - predicted integer MAPQ
    /// * `mapq_orig` - original integer MAPQ
    /// * `mapq_dec` - predicted decimal MAPQ
    pub fn new(reference_name: String, position: i64, mapq_int: i64, mapq_orig: i64, mapq_dec: Score) -> Self {
        Self {
            reference_name,
            position,
            mapq_int,
            mapq_orig,
            mapq_dec
        }
    }

    /// Returns true if the two alignments appear to be at the same locus.
    /// The positions must be strictly less than `wiggle` apart; a difference of exactly `wiggle` is not a match.
    /// # Arguments
    /// * `other` - the alignment to compare against
    /// * `wiggle` - exclusive upper bound on the position difference
    pub fn same_locus(&self, other: &Self, wiggle: u64) -> bool {
        self.reference_name == other.reference_name &&
            self.position.abs_diff(other.position) < wiggle
    }

    // getters
    pub fn reference_name(&self) -> &str {
        &self.reference_name
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn mapq_int(&self) -> i64 {
        self.mapq_int
    }

    pub fn mapq_orig(&self) -> i64 {
        self.mapq_orig
    }

    pub fn mapq_dec(&self) -> Score {
        self.mapq_dec
    }
}

/// One cycle's worth of output from a single record source
#[derive(Clone, Debug, PartialEq)]
pub struct SourceRead {
    /// Name of the read, used for the lock-step sanity check
    read_name: String,
    /// The alignment, or None if the tool left the read unmapped
    alignment: Option<AlignmentRecord>
}

impl SourceRead {
    /// Creates a read with a mapped alignment
    pub fn mapped(read_name: String, alignment: AlignmentRecord) -> Self {
        Self {
            read_name,
            alignment: Some(alignment)
        }
    }

    /// Creates a read that the tool did not align
    pub fn unmapped(read_name: String) -> Self {
        Self {
            read_name,
            alignment: None
        }
    }

    pub fn read_name(&self) -> &str {
        &self.read_name
    }

    pub fn alignment(&self) -> Option<&AlignmentRecord> {
        self.alignment.as_ref()
    }

    pub fn is_unmapped(&self) -> bool {
        self.alignment.is_none()
    }
}
