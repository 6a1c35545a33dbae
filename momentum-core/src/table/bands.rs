//! Score color bands.

use serde::{Deserialize, Serialize};

/// Color class of a score cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreClass {
    Negative,
    /// Number of thresholds at or below the score. `Level(0)` is the weakest
    /// non-negative band.
    Level(usize),
}

/// Ascending thresholds splitting non-negative scores into levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBands {
    thresholds: Vec<f64>,
}

impl Default for ScoreBands {
    fn default() -> Self {
        Self {
            thresholds: vec![2.0, 5.0],
        }
    }
}

impl ScoreBands {
    /// Thresholds are sorted on construction; non-finite values are dropped.
    pub fn new(mut thresholds: Vec<f64>) -> Self {
        thresholds.retain(|t| t.is_finite());
        thresholds.sort_by(f64::total_cmp);
        thresholds.dedup();
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Highest level `classify` can return.
    pub fn max_level(&self) -> usize {
        self.thresholds.len()
    }

    pub fn classify(&self, score: f64) -> ScoreClass {
        if score < 0.0 {
            return ScoreClass::Negative;
        }
        ScoreClass::Level(self.thresholds.iter().filter(|&&t| t <= score).count())
    }
}
