use strum_macros::EnumIter;

/// The two definitions of a "correct" alignment
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, EnumIter, strum_macros::Display, strum_macros::AsRefStr)]
pub enum Correctness {
    /// Agrees with every strictly more trusted tool
    #[strum(serialize = "loose")]
    Loose,
    /// Agrees with every more trusted tool and every equally trusted tool
    #[strum(serialize = "strict")]
    Strict
}

/// Result of the tiered consensus for one tool on one read
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ConsensusResult {
    /// Number of more trusted tools that agree
    pub num_agree_better: usize,
    /// Number of equally trusted tools that agree, including the tool itself
    pub num_agree_equal: usize,
    /// Number of tools that agree overall, including the tool itself
    pub num_agree_total: usize,
    /// True if this tool agrees with all more trusted tools
    pub correct_loose: bool,
    /// True if `correct_loose` and this tool also agrees with all equally trusted tools
    pub correct_strict: bool
}

impl ConsensusResult {
    /// Constructor
    pub fn new(num_agree_better: usize, num_agree_equal: usize, num_agree_total: usize, correct_loose: bool, correct_strict: bool) -> Self {
        Self {
            num_agree_better, num_agree_equal, num_agree_total,
            correct_loose, correct_strict
        }
    }

    /// Returns the correctness flag for the requested definition
    pub fn is_correct(&self, correctness: Correctness) -> bool {
        match correctness {
            Correctness::Loose => self.correct_loose,
            Correctness::Strict => self.correct_strict
        }
    }
}
