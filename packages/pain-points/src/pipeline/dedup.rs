//! Duplicate detection for incoming candidates.
//!
//! Best-effort: a failed lookup is logged and reported as "no duplicate" so
//! ingestion never blocks on it. The cost is an occasional redundant record.

use tracing::{debug, warn};

use crate::scoring::similarity;
use crate::traits::store::{DuplicateQuery, PainPointStore};
use crate::types::candidate::Candidate;
use crate::types::pain_point::PainPoint;

/// Find an existing record that `candidate` duplicates.
///
/// Looks at records sharing the candidate's category and at least one
/// keyword or tag, highest rank first, and returns the first whose title
/// similarity is strictly greater than `threshold`.
pub async fn find_duplicate<S>(candidate: &Candidate, store: &S, threshold: f64) -> Option<PainPoint>
where
    S: PainPointStore + ?Sized,
{
    // Matches need keyword/tag overlap, so a category alone can never match
    if candidate.keywords.is_empty() {
        debug!(title = %candidate.title, "No keywords, skipping duplicate search");
        return None;
    }

    let query = DuplicateQuery::new(candidate.category, candidate.keywords.iter().cloned());
    let existing = match store.find_duplicate_candidates(&query).await {
        Ok(existing) => existing,
        Err(e) => {
            warn!(
                title = %candidate.title,
                error = %e,
                "Duplicate lookup failed, treating as new pain point"
            );
            return None;
        }
    };

    let found = existing.into_iter().find(|p| {
        let score = similarity(&p.title, &candidate.title);
        debug!(existing = %p.title, candidate = %candidate.title, score, "Title similarity");
        score > threshold
    });

    if let Some(p) = &found {
        debug!(id = %p.id, title = %p.title, "Duplicate found");
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::DUPLICATE_THRESHOLD;
    use crate::stores::MemoryStore;
    use crate::testing::FailingStore;
    use crate::types::pain_point::{Category, Level};
    use crate::types::thread::Thread;

    async fn seeded(title: &str, category: Category, keywords: &[&str], urgency: Level) -> (MemoryStore, PainPoint) {
        let store = MemoryStore::new();
        let p = PainPoint::from_candidate(
            Candidate::new(title)
                .with_category(category)
                .with_urgency(urgency)
                .with_keywords(keywords.iter().copied()),
            &Thread::new("t1", "title", "body"),
            "test",
        );
        store.insert(&p).await.unwrap();
        (store, p)
    }

    #[tokio::test]
    async fn matches_case_variant_title() {
        let (store, existing) =
            seeded("I can't find a good expense tracker", Category::Wealth, &["expense tracker"], Level::Medium).await;

        let candidate = Candidate::new("i cant find a good expense tracker")
            .with_category(Category::Wealth)
            .with_keywords(["expense tracker"]);

        let found = find_duplicate(&candidate, &store, DUPLICATE_THRESHOLD).await;
        assert_eq!(found.map(|p| p.id), Some(existing.id));
    }

    #[tokio::test]
    async fn similar_title_below_threshold_is_not_a_match() {
        let (store, _) =
            seeded("expense tracker apps are too expensive", Category::Wealth, &["budget"], Level::Medium).await;

        let candidate = Candidate::new("expense tracker apps lack bank sync")
            .with_category(Category::Wealth)
            .with_keywords(["budget"]);

        assert!(find_duplicate(&candidate, &store, DUPLICATE_THRESHOLD).await.is_none());
    }

    #[tokio::test]
    async fn other_category_is_not_searched() {
        let (store, _) = seeded("cannot sleep at night", Category::Health, &["sleep"], Level::Medium).await;

        let candidate = Candidate::new("cannot sleep at night")
            .with_category(Category::Entertainment)
            .with_keywords(["sleep"]);

        assert!(find_duplicate(&candidate, &store, DUPLICATE_THRESHOLD).await.is_none());
    }

    #[tokio::test]
    async fn missing_category_searches_everywhere() {
        let (store, existing) = seeded("cannot sleep at night", Category::Health, &["sleep"], Level::Medium).await;

        let candidate = Candidate::new("cannot sleep at night").with_keywords(["sleep"]);

        let found = find_duplicate(&candidate, &store, DUPLICATE_THRESHOLD).await;
        assert_eq!(found.map(|p| p.id), Some(existing.id));
    }

    #[tokio::test]
    async fn category_without_keywords_is_not_a_match() {
        let (store, _) = seeded("x y z", Category::Other, &["x"], Level::Medium).await;

        let candidate = Candidate::new("x y z").with_category(Category::Other);
        assert!(find_duplicate(&candidate, &store, DUPLICATE_THRESHOLD).await.is_none());

        let with_keyword = candidate.with_keywords(["x"]);
        assert!(find_duplicate(&with_keyword, &store, DUPLICATE_THRESHOLD).await.is_some());
    }

    #[tokio::test]
    async fn no_signal_short_circuits() {
        let (store, _) = seeded("x y z", Category::Other, &["x"], Level::Medium).await;
        assert!(find_duplicate(&Candidate::new("x y z"), &store, DUPLICATE_THRESHOLD).await.is_none());
    }

    #[tokio::test]
    async fn highest_rank_match_wins() {
        let store = MemoryStore::new();
        let thread = Thread::new("t1", "title", "body");
        let mut ids = Vec::new();
        for urgency in [Level::Low, Level::High] {
            let p = PainPoint::from_candidate(
                Candidate::new("meal prep takes all sunday")
                    .with_category(Category::Health)
                    .with_urgency(urgency)
                    .with_keywords(["meal prep"]),
                &thread,
                "test",
            );
            store.insert(&p).await.unwrap();
            ids.push(p.id);
        }

        let candidate = Candidate::new("meal prep takes all sunday")
            .with_category(Category::Health)
            .with_keywords(["meal prep"]);
        let found = find_duplicate(&candidate, &store, DUPLICATE_THRESHOLD).await;
        assert_eq!(found.map(|p| p.id), Some(ids[1]));
    }

    #[tokio::test]
    async fn lookup_failure_is_treated_as_no_duplicate() {
        let store = FailingStore::new().fail_lookups();
        let candidate = Candidate::new("anything")
            .with_category(Category::Other)
            .with_keywords(["x"]);

        assert!(find_duplicate(&candidate, &store, DUPLICATE_THRESHOLD).await.is_none());
    }
}
