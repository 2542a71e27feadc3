//! Jaccard similarity over whitespace-separated title words.
//!
//! This is a pure function with no side effects.

use std::collections::HashSet;

/// Titles must score strictly above this to be treated as the same pain point.
pub const DUPLICATE_THRESHOLD: f64 = 0.7;

/// Jaccard index of the lower-cased word sets of `a` and `b`, in [0, 1].
///
/// Repeated words collapse. Two empty inputs score 0.
///
/// # Examples
/// ```
/// use pain_points::scoring::similarity;
///
/// assert_eq!(similarity("Rent is too high", "rent is TOO high"), 1.0);
/// assert_eq!(similarity("", ""), 0.0);
/// ```
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let words_a: HashSet<&str> = a.split_whitespace().collect();
    let words_b: HashSet<&str> = b.split_whitespace().collect();

    let union = words_a.union(&words_b).count();
    if union == 0 {
        return 0.0;
    }

    let intersection = words_a.intersection(&words_b).count();
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn identical_titles_score_one() {
        assert_eq!(similarity("slow bank transfers", "slow bank transfers"), 1.0);
    }

    #[test]
    fn empty_inputs_score_zero() {
        assert_eq!(similarity("", ""), 0.0);
        assert_eq!(similarity("   ", "\t"), 0.0);
        assert_eq!(similarity("word", ""), 0.0);
    }

    #[test]
    fn repeated_words_collapse() {
        assert_eq!(similarity("help help help", "help"), 1.0);
    }

    #[test]
    fn apostrophe_variant_clears_threshold() {
        // 6 shared words out of 8 distinct
        let score = similarity(
            "I can't find a good expense tracker",
            "i cant find a good expense tracker",
        );
        assert_eq!(score, 0.75);
        assert!(score > DUPLICATE_THRESHOLD);
    }

    #[test]
    fn loosely_related_titles_stay_below_threshold() {
        let score = similarity(
            "expense tracker apps are too expensive",
            "expense tracker apps lack bank sync",
        );
        assert!(score <= DUPLICATE_THRESHOLD, "score was {score}");
    }

    proptest! {
        #[test]
        fn symmetric(a in "[a-zA-Z ]{0,40}", b in "[a-zA-Z ]{0,40}") {
            prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
        }

        #[test]
        fn bounded(a in ".{0,40}", b in ".{0,40}") {
            let score = similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&score));
        }

        #[test]
        fn reflexive_for_non_blank(a in "[a-z]{1,10}( [a-z]{1,10}){0,5}") {
            prop_assert_eq!(similarity(&a, &a), 1.0);
        }
    }
}
