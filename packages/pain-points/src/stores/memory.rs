//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{PainPointError, Result};
use crate::traits::store::{DuplicateQuery, PainPointStore};
use crate::traits::threads::ThreadSource;
use crate::types::pain_point::{PainPoint, PainPointId};
use crate::types::thread::Thread;

/// In-memory storage for threads and pain points.
///
/// Records keep insertion order, which is the tie-break order for equal rank
/// scores. Not suitable for production as data is lost on restart.
pub struct MemoryStore {
    pain_points: RwLock<IndexMap<PainPointId, PainPoint>>,
    threads: RwLock<HashMap<String, Thread>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self {
            pain_points: RwLock::new(IndexMap::new()),
            threads: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store pre-loaded with threads.
    pub fn with_threads(threads: impl IntoIterator<Item = Thread>) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.threads.write() {
            map.extend(threads.into_iter().map(|t| (t.id.clone(), t)));
        }
        store
    }

    /// Get the number of stored pain points.
    pub fn pain_point_count(&self) -> usize {
        self.pain_points.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Snapshot of every stored pain point in insertion order.
    pub fn all_pain_points(&self) -> Vec<PainPoint> {
        self.pain_points
            .read()
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default()
    }

    fn read_pain_points(&self) -> Result<RwLockReadGuard<'_, IndexMap<PainPointId, PainPoint>>> {
        self.pain_points.read().map_err(PainPointError::storage)
    }

    fn write_pain_points(&self) -> Result<RwLockWriteGuard<'_, IndexMap<PainPointId, PainPoint>>> {
        self.pain_points.write().map_err(PainPointError::storage)
    }
}

/// Highest rank first; `sort_by` is stable so ties keep insertion order.
fn by_rank_desc(mut pain_points: Vec<PainPoint>) -> Vec<PainPoint> {
    pain_points.sort_by(|a, b| b.rank_score.cmp(&a.rank_score));
    pain_points
}

#[async_trait]
impl PainPointStore for MemoryStore {
    async fn find_duplicate_candidates(&self, query: &DuplicateQuery) -> Result<Vec<PainPoint>> {
        let matches = self
            .read_pain_points()?
            .values()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
        Ok(by_rank_desc(matches))
    }

    async fn insert(&self, pain_point: &PainPoint) -> Result<PainPoint> {
        self.write_pain_points()?
            .insert(pain_point.id, pain_point.clone());
        Ok(pain_point.clone())
    }

    async fn update(&self, pain_point: &PainPoint) -> Result<PainPoint> {
        let mut pain_points = self.write_pain_points()?;
        match pain_points.get_mut(&pain_point.id) {
            Some(existing) => {
                *existing = pain_point.clone();
                Ok(existing.clone())
            }
            None => Err(PainPointError::NotFound { id: pain_point.id }),
        }
    }

    async fn get(&self, id: PainPointId) -> Result<Option<PainPoint>> {
        Ok(self.read_pain_points()?.get(&id).cloned())
    }

    async fn list_ranked(&self, limit: Option<usize>) -> Result<Vec<PainPoint>> {
        let all = self.read_pain_points()?.values().cloned().collect();
        let mut ranked = by_rank_desc(all);
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }
        Ok(ranked)
    }
}

#[async_trait]
impl ThreadSource for MemoryStore {
    async fn get_thread(&self, id: &str) -> Result<Option<Thread>> {
        Ok(self
            .threads
            .read()
            .map_err(PainPointError::storage)?
            .get(id)
            .cloned())
    }

    async fn store_thread(&self, thread: &Thread) -> Result<()> {
        self.threads
            .write()
            .map_err(PainPointError::storage)?
            .insert(thread.id.clone(), thread.clone());
        Ok(())
    }
}
