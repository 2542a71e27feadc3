//! Merge-or-insert for a single candidate.

use tracing::{debug, info};

use crate::error::Result;
use crate::pipeline::dedup::find_duplicate;
use crate::traits::store::PainPointStore;
use crate::types::candidate::Candidate;
use crate::types::pain_point::PainPoint;
use crate::types::thread::Thread;

/// Fold `candidate` into an existing duplicate, or insert it as new.
///
/// On a hit the existing record's frequency goes up by one, quotes are
/// appended, keywords and tags are unioned, and the rank score is recomputed
/// before the update. On a miss a new record is built from the candidate and
/// `thread`, scored, and inserted. Returns the persisted record.
///
/// Persistence failures propagate; duplicate lookup failures do not.
pub async fn upsert<S>(
    candidate: Candidate,
    thread: &Thread,
    store: &S,
    similarity_threshold: f64,
    extracted_by: &str,
) -> Result<PainPoint>
where
    S: PainPointStore + ?Sized,
{
    let candidate = candidate.normalized();

    match find_duplicate(&candidate, store, similarity_threshold).await {
        Some(mut existing) => {
            existing.absorb(candidate);
            let saved = store.update(&existing).await?;
            info!(
                id = %saved.id,
                title = %saved.title,
                frequency = saved.frequency,
                rank_score = saved.rank_score(),
                "Merged duplicate pain point"
            );
            Ok(saved)
        }
        None => {
            let pain_point = PainPoint::from_candidate(candidate, thread, extracted_by);
            let saved = store.insert(&pain_point).await?;
            debug!(
                id = %saved.id,
                title = %saved.title,
                rank_score = saved.rank_score(),
                "Created pain point"
            );
            Ok(saved)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PainPointError;
    use crate::scoring::DUPLICATE_THRESHOLD;
    use crate::stores::MemoryStore;
    use crate::testing::FailingStore;
    use crate::types::candidate::UNTITLED;
    use crate::types::pain_point::{Category, Level, Quote};

    fn thread() -> Thread {
        Thread::new("t3_tracker", "Expense trackers", "None of them work")
            .with_source("personalfinance")
            .with_url("https://reddit.com/r/personalfinance/t3_tracker")
    }

    fn expense_candidate(title: &str) -> Candidate {
        Candidate::new(title)
            .with_category(Category::Wealth)
            .with_intensity(Level::High)
            .with_urgency(Level::Medium)
            .with_confidence(0.8)
            .with_keywords(["expense tracker", "budgeting"])
            .with_quote(Quote::new("I have tried every app").with_author("u/saver"))
    }

    #[tokio::test]
    async fn miss_inserts_new_scored_record() {
        let store = MemoryStore::new();

        let saved = upsert(
            expense_candidate("I can't find a good expense tracker"),
            &thread(),
            &store,
            DUPLICATE_THRESHOLD,
            "gpt-4o-mini",
        )
        .await
        .unwrap();

        assert_eq!(saved.rank_score(), 63);
        assert_eq!(saved.frequency, 1);
        assert_eq!(saved.extracted_by, "gpt-4o-mini");
        assert_eq!(saved.url.as_deref(), Some("https://reddit.com/r/personalfinance/t3_tracker"));
        assert_eq!(store.pain_point_count(), 1);
    }

    #[tokio::test]
    async fn hit_merges_into_existing() {
        let store = MemoryStore::new();
        let first = upsert(
            expense_candidate("I can't find a good expense tracker"),
            &thread(),
            &store,
            DUPLICATE_THRESHOLD,
            "test",
        )
        .await
        .unwrap();

        let merged = upsert(
            expense_candidate("i cant find a good expense tracker").with_keywords(["apps"]),
            &thread(),
            &store,
            DUPLICATE_THRESHOLD,
            "test",
        )
        .await
        .unwrap();

        assert_eq!(merged.id, first.id);
        assert_eq!(merged.frequency, 2);
        assert_eq!(merged.quotes.len(), 2);
        assert!(merged.keywords.contains("apps"));
        assert_eq!(merged.rank_score(), 73);
        assert_eq!(store.pain_point_count(), 1);
    }

    #[tokio::test]
    async fn repeated_merges_increment_by_one_each() {
        let store = MemoryStore::new();
        for expected in 1..=5u32 {
            let saved = upsert(
                expense_candidate("I can't find a good expense tracker"),
                &thread(),
                &store,
                DUPLICATE_THRESHOLD,
                "test",
            )
            .await
            .unwrap();
            assert_eq!(saved.frequency, expected);
            assert_eq!(saved.rank_score(), crate::scoring::calculate_rank_score(&saved));
        }
        assert_eq!(store.pain_point_count(), 1);
    }

    #[tokio::test]
    async fn blank_title_is_defaulted() {
        let store = MemoryStore::new();
        let saved = upsert(Candidate::new(""), &thread(), &store, DUPLICATE_THRESHOLD, "test")
            .await
            .unwrap();
        assert_eq!(saved.title, UNTITLED);
        assert_eq!(saved.category, Category::Other);
    }

    #[tokio::test]
    async fn lookup_failure_still_inserts() {
        let store = FailingStore::new().fail_lookups();
        let saved = upsert(expense_candidate("x"), &thread(), &store, DUPLICATE_THRESHOLD, "test")
            .await
            .unwrap();
        assert_eq!(store.inner().pain_point_count(), 1);
        assert_eq!(saved.frequency, 1);
    }

    #[tokio::test]
    async fn insert_failure_propagates() {
        let store = FailingStore::new().fail_writes();
        let err = upsert(expense_candidate("x"), &thread(), &store, DUPLICATE_THRESHOLD, "test")
            .await
            .unwrap_err();
        assert!(matches!(err, PainPointError::Storage(_)));
    }

    #[tokio::test]
    async fn update_failure_on_merge_propagates() {
        let store = FailingStore::new().fail_writes();
        let existing = PainPoint::from_candidate(
            expense_candidate("I can't find a good expense tracker"),
            &thread(),
            "test",
        );
        store.inner().insert(&existing).await.unwrap();

        let err = upsert(
            expense_candidate("i cant find a good expense tracker"),
            &thread(),
            &store,
            DUPLICATE_THRESHOLD,
            "test",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PainPointError::Storage(_)));
        let stored = store.inner().get(existing.id).await.unwrap().unwrap();
        assert_eq!(stored.frequency, 1);
        assert_eq!(store.inner().pain_point_count(), 1);
    }
}

