use serde::Serialize;
use std::cmp::Ordering;

/// Errors that can occur when constructing a score
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ScoreError {
    #[error("score must be a finite number, found {value}")]
    NonFinite { value: f64 },
    #[error("unable to parse score from {text:?}")]
    Unparseable { text: String },
}

/// A confidence score (MAPQ-like) with a total order so it can key an ordered map.
///
/// Precision contract:
/// * integer scores are stored exactly; every integer below 2^53 is representable
/// * decimal scores are parsed from text to the nearest `f64`, and two scores share a bucket only if they are bit-identical
/// * `-0.0` is normalized to `0.0`
/// * NaN and infinities are rejected
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Score(f64);

impl Score {
    /// Constructor
    /// # Arguments
    /// * `value` - the raw score value
    /// # Errors
    /// * if `value` is NaN or infinite
    pub fn new(value: f64) -> Result<Self, ScoreError> {
        if !value.is_finite() {
            return Err(ScoreError::NonFinite { value });
        }
        // adding 0.0 collapses -0.0 into +0.0
        Ok(Self(value + 0.0))
    }

    /// Creates a score from an integer value, which is always exact in our supported range
    pub fn from_int(value: i64) -> Self {
        Self(value as f64)
    }

    /// Parses a score from text, e.g. a SAM tag value like "4.399"
    /// # Errors
    /// * if the text is not a number, or is not finite
    pub fn parse(text: &str) -> Result<Self, ScoreError> {
        let value: f64 = text.trim().parse()
            .map_err(|_| ScoreError::Unparseable { text: text.to_string() })?;
        Self::new(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        // values are always finite and never -0.0, so this matches numeric order
        self.0.total_cmp(&other.0)
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
