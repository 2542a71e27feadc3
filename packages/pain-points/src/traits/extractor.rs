//! Extractor trait for LLM pain-point extraction.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{candidate::ExtractedPainPoint, thread::ExtractionInput};

/// Turns a thread into raw pain-point candidates.
///
/// Implementations wrap a specific LLM provider. Output is untrusted and is
/// validated by [`crate::types::candidate::Candidate::from_extracted`] before
/// it reaches the store. Retry policy, if any, belongs to the implementation.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Identifier recorded as `extracted_by` on new records.
    fn name(&self) -> &str;

    /// Extract candidate pain points from a thread.
    async fn extract(&self, input: &ExtractionInput) -> Result<Vec<ExtractedPainPoint>>;
}
