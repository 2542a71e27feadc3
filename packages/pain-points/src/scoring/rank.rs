//! Rank score formulas.
//!
//! Two independent formulas live here and are not interchangeable:
//!
//! - [`calculate_rank_score`] is the ingestion formula. The merge/insert
//!   orchestrator calls it on every create and every merge.
//! - [`calculate_batch_rank_score`] is the richer reranking formula used only
//!   by [`crate::pipeline::rerank`].
//!
//! Both are pure, deterministic, and bounded to [0, 100].

use crate::types::pain_point::{Level, PainPoint};

const MAX_SCORE: f64 = 100.0;

/// Points for a level, or zero when absent.
fn level_points(level: Option<Level>, [low, medium, high]: [f64; 3]) -> f64 {
    match level {
        Some(Level::Low) => low,
        Some(Level::Medium) => medium,
        Some(Level::High) => high,
        None => 0.0,
    }
}

fn clamp_to_score(total: f64) -> u8 {
    if !total.is_finite() {
        return 0;
    }
    total.round().clamp(0.0, MAX_SCORE) as u8
}

// ============================================================================
// Ingestion formula
// ============================================================================

/// Ingestion rank score.
///
/// - frequency: `min(frequency * 10, 40)`
/// - intensity: Low 10, Medium 20, High 30
/// - urgency: Low 5, Medium 15, High 20
/// - confidence: `llm_confidence_score * 10`
///
/// The sum is rounded and capped at 100.
pub fn calculate_rank_score(pain_point: &PainPoint) -> u8 {
    let frequency = f64::from(pain_point.frequency.saturating_mul(10).min(40));
    let intensity = level_points(Some(pain_point.intensity), [10.0, 20.0, 30.0]);
    let urgency = level_points(Some(pain_point.urgency), [5.0, 15.0, 20.0]);
    let confidence = pain_point.llm_confidence_score * 10.0;

    clamp_to_score(frequency + intensity + urgency + confidence)
}

// ============================================================================
// Batch reranking formula
// ============================================================================

const FREQUENCY_WEIGHT: f64 = 0.30;
const INTENSITY_WEIGHT: f64 = 0.25;
const URGENCY_WEIGHT: f64 = 0.20;
const MARKET_SIZE_WEIGHT: f64 = 0.15;
const CONFIDENCE_WEIGHT: f64 = 0.10;

const LEVEL_SUBSCORES: [f64; 3] = [30.0, 60.0, 100.0];

const MAX_QUOTE_BONUS: usize = 4;
const KEYWORDS_PER_BONUS_POINT: usize = 3;
const MAX_KEYWORD_BONUS: usize = 3;
const MAX_VALIDATION_BONUS: f64 = 3.0;
const MAX_BONUS: u32 = 10;

/// Weighted part of the batch formula, in [0, 100] before the bonus.
fn weighted_batch_score(pain_point: &PainPoint) -> f64 {
    let frequency = f64::from(pain_point.frequency.min(10)) * 10.0;
    let intensity = level_points(Some(pain_point.intensity), LEVEL_SUBSCORES);
    let urgency = level_points(Some(pain_point.urgency), LEVEL_SUBSCORES);
    let market_size = level_points(pain_point.market_size, LEVEL_SUBSCORES);
    let confidence = pain_point.llm_confidence_score.clamp(0.0, 1.0) * 100.0;

    frequency * FREQUENCY_WEIGHT
        + intensity * INTENSITY_WEIGHT
        + urgency * URGENCY_WEIGHT
        + market_size * MARKET_SIZE_WEIGHT
        + confidence * CONFIDENCE_WEIGHT
}

/// Evidence bonus, capped at 10 points.
fn batch_bonus(pain_point: &PainPoint) -> u32 {
    let quotes = pain_point.quotes.len().min(MAX_QUOTE_BONUS);
    let keywords = (pain_point.keywords.len() / KEYWORDS_PER_BONUS_POINT).min(MAX_KEYWORD_BONUS);
    let validation = match (pain_point.is_validated, pain_point.validation_score) {
        (Some(true), Some(score)) if score.is_finite() => {
            (score.clamp(0.0, 1.0) * MAX_VALIDATION_BONUS).round() as u32
        }
        _ => 0,
    };

    ((quotes + keywords) as u32 + validation).min(MAX_BONUS)
}

/// Batch reranking score.
///
/// Weighted sub-scores (each 0-100): frequency 30%, intensity 25%,
/// urgency 20%, market size 15%, LLM confidence 10%. A bonus of up to 10
/// points rewards quotes, keyword coverage, and a positive validation. The
/// total is capped at 100.
pub fn calculate_batch_rank_score(pain_point: &PainPoint) -> u8 {
    let weighted = weighted_batch_score(pain_point).round();
    clamp_to_score(weighted + f64::from(batch_bonus(pain_point)))
}
