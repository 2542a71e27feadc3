//! Storage trait for pain-point records.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::types::pain_point::{Category, PainPoint, PainPointId};

/// Lookup used by duplicate detection.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateQuery {
    /// Restrict to this category. `None` searches every category.
    pub category: Option<Category>,

    /// Records whose keywords or tags share at least one of these match.
    pub keywords: Vec<String>,
}

impl DuplicateQuery {
    pub fn new(category: Option<Category>, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            category,
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    /// True if `pain_point` satisfies the category and keyword/tag overlap.
    pub fn matches(&self, pain_point: &PainPoint) -> bool {
        if let Some(category) = self.category {
            if pain_point.category != category {
                return false;
            }
        }

        self.keywords
            .iter()
            .any(|k| pain_point.keywords.contains(k) || pain_point.tags.contains(k))
    }
}

/// Persistence for pain points.
///
/// `insert` and `update` return the record as persisted, including any
/// fields the backend assigns.
#[async_trait]
pub trait PainPointStore: Send + Sync {
    /// Existing records matching `query`, highest `rank_score` first.
    ///
    /// Ties keep the backend's natural order, which is stable but not part
    /// of the contract.
    async fn find_duplicate_candidates(&self, query: &DuplicateQuery) -> Result<Vec<PainPoint>>;

    /// Insert a new record.
    async fn insert(&self, pain_point: &PainPoint) -> Result<PainPoint>;

    /// Replace an existing record by id.
    ///
    /// Fails with `NotFound` when no record has this id.
    async fn update(&self, pain_point: &PainPoint) -> Result<PainPoint>;

    /// Get a record by id.
    async fn get(&self, id: PainPointId) -> Result<Option<PainPoint>>;

    /// Records ordered by `rank_score` descending, optionally limited.
    async fn list_ranked(&self, limit: Option<usize>) -> Result<Vec<PainPoint>>;
}

// Shared handles delegate, so one store can back several components.
#[async_trait]
impl<T: PainPointStore + ?Sized> PainPointStore for Arc<T> {
    async fn find_duplicate_candidates(&self, query: &DuplicateQuery) -> Result<Vec<PainPoint>> {
        (**self).find_duplicate_candidates(query).await
    }

    async fn insert(&self, pain_point: &PainPoint) -> Result<PainPoint> {
        (**self).insert(pain_point).await
    }

    async fn update(&self, pain_point: &PainPoint) -> Result<PainPoint> {
        (**self).update(pain_point).await
    }

    async fn get(&self, id: PainPointId) -> Result<Option<PainPoint>> {
        (**self).get(id).await
    }

    async fn list_ranked(&self, limit: Option<usize>) -> Result<Vec<PainPoint>> {
        (**self).list_ranked(limit).await
    }
}
