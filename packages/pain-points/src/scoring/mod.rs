//! Pure scoring functions: title similarity and rank scores.

pub mod rank;
pub mod similarity;

pub use rank::{calculate_batch_rank_score, calculate_rank_score};
pub use similarity::{similarity, DUPLICATE_THRESHOLD};
