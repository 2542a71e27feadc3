//! Batch analysis and rerank reports.

use serde::{Deserialize, Serialize};

use crate::types::pain_point::PainPoint;

/// Per-thread outcome of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Success,
    Error,
}

/// One entry of a batch report. There is exactly one per requested thread id.
///
/// On a persistence failure the entry is `Error`, and `pain_points` still
/// lists the records saved for that thread before the failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadAnalysis {
    pub thread_id: String,
    pub status: AnalysisStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pain_points: Vec<PainPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ThreadAnalysis {
    pub fn success(thread_id: impl Into<String>, pain_points: Vec<PainPoint>) -> Self {
        Self {
            thread_id: thread_id.into(),
            status: AnalysisStatus::Success,
            pain_points,
            error: None,
        }
    }

    pub fn error(thread_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            status: AnalysisStatus::Error,
            pain_points: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// Error entry that keeps the records persisted before the failure.
    pub fn partial(
        thread_id: impl Into<String>,
        saved: Vec<PainPoint>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            pain_points: saved,
            ..Self::error(thread_id, error)
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == AnalysisStatus::Success
    }
}

/// Summary of a rerank pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RerankSummary {
    pub examined: usize,
    pub updated: usize,
    pub failed: usize,
}
