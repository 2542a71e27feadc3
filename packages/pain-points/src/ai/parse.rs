//! Parsing of raw model output into [`ExtractedPainPoint`]s.

use serde::Deserialize;

use crate::error::Result;
use crate::types::candidate::ExtractedPainPoint;

/// Accepted top-level shapes. Models return either a bare array or an
/// object wrapping one.
#[derive(Deserialize)]
#[serde(untagged)]
enum ExtractionResponse {
    List(Vec<ExtractedPainPoint>),
    Wrapped {
        #[serde(alias = "painPoints")]
        pain_points: Vec<ExtractedPainPoint>,
    },
}

/// Parse an extraction response, tolerating a Markdown code fence.
pub fn parse_extraction_response(raw: &str) -> Result<Vec<ExtractedPainPoint>> {
    let response: ExtractionResponse = serde_json::from_str(strip_code_fence(raw))?;
    Ok(match response {
        ExtractionResponse::List(items) => items,
        ExtractionResponse::Wrapped { pain_points } => pain_points,
    })
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
