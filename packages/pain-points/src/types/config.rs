//! Configuration for the analysis pipeline.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PainPointError, Result};
use crate::scoring::similarity::DUPLICATE_THRESHOLD;

/// Configuration for duplicate detection and batch analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Minimum title similarity for a merge. A match needs strictly more.
    /// Always within [0, 1]; set it through
    /// [`PipelineConfig::with_similarity_threshold`].
    ///
    /// Default: 0.7.
    #[serde(deserialize_with = "deserialize_threshold")]
    similarity_threshold: f64,

    /// Recorded as `extracted_by` when the extractor does not name itself.
    pub extracted_by: String,

    /// Comments forwarded to the extractor per thread.
    ///
    /// Default: 50.
    pub max_comments: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DUPLICATE_THRESHOLD,
            extracted_by: "pain-points".to_string(),
            max_comments: 50,
        }
    }
}

impl PipelineConfig {
    /// Set the merge threshold. Fails unless it is a finite value in [0, 1].
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Result<Self> {
        self.similarity_threshold = check_threshold(threshold)?;
        Ok(self)
    }

    pub fn with_max_comments(mut self, max_comments: usize) -> Self {
        self.max_comments = max_comments;
        self
    }

    pub fn similarity_threshold(&self) -> f64 {
        self.similarity_threshold
    }
}

// NaN fails the range check, which would otherwise disable every merge
fn check_threshold(threshold: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(PainPointError::Config(
            format!("similarity threshold must be within [0, 1], got {threshold}").into(),
        ))
    }
}

fn deserialize_threshold<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let threshold = f64::deserialize(deserializer)?;
    check_threshold(threshold).map_err(serde::de::Error::custom)
}
