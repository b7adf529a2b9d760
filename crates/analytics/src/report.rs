use core_types::ConfidenceLevel;
use serde::{Deserialize, Serialize};

pub const MIN_CONFIDENCE: i32 = 10;
pub const MAX_CONFIDENCE: i32 = 90;

/// An explainable confidence score.
///
/// This struct is the final output of the `ConfidenceCalculator`. Every adjustment
/// applied to the base score is recorded in `factors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceReport {
    pub score: u8,
    pub level: ConfidenceLevel,
    pub factors: Vec<String>,
}

impl ConfidenceReport {
    /// Clamps a raw score into the reportable range and derives the level.
    pub fn new(raw_score: i32, factors: Vec<String>) -> Self {
        let score = raw_score.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE) as u8;
        Self {
            score,
            level: ConfidenceLevel::from_score(score),
            factors,
        }
    }
}
