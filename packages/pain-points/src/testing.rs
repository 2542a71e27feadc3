//! Testing utilities including mock implementations.
//!
//! These are useful for testing code that uses the pain-point pipeline
//! without making real LLM calls or running a database.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::{PainPointError, Result};
use crate::stores::MemoryStore;
use crate::traits::{
    extractor::Extractor,
    store::{DuplicateQuery, PainPointStore},
    threads::ThreadSource,
};
use crate::types::{
    candidate::ExtractedPainPoint,
    pain_point::{PainPoint, PainPointId},
    thread::{ExtractionInput, Thread},
};

// ============================================================================
// MockExtractor
// ============================================================================

/// A mock extractor with canned responses keyed by thread title.
///
/// Titles without a canned response extract nothing.
pub struct MockExtractor {
    name: String,
    responses: Arc<RwLock<HashMap<String, Vec<ExtractedPainPoint>>>>,
    failures: Arc<RwLock<HashMap<String, String>>>,
    calls: Arc<RwLock<Vec<ExtractionInput>>>,
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExtractor {
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            responses: Default::default(),
            failures: Default::default(),
            calls: Default::default(),
        }
    }

    /// Set the name recorded as `extracted_by`.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Return `pain_points` for threads with this title.
    pub fn with_response(self, title: impl Into<String>, pain_points: Vec<ExtractedPainPoint>) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(title.into(), pain_points);
        self
    }

    /// Fail extraction for threads with this title.
    pub fn with_failure(self, title: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures
            .write()
            .unwrap()
            .insert(title.into(), message.into());
        self
    }

    /// Every input this mock was called with, in order.
    pub fn calls(&self) -> Vec<ExtractionInput> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn extract(&self, input: &ExtractionInput) -> Result<Vec<ExtractedPainPoint>> {
        self.calls.write().unwrap().push(input.clone());

        if let Some(message) = self.failures.read().unwrap().get(&input.title) {
            return Err(PainPointError::extraction(message));
        }

        Ok(self
            .responses
            .read()
            .unwrap()
            .get(&input.title)
            .cloned()
            .unwrap_or_default())
    }
}

// ============================================================================
// FailingStore
// ============================================================================

/// A `MemoryStore` wrapper that injects storage failures.
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_lookups: bool,
    fail_thread_lookups: bool,
    /// Writes allowed before every later write fails. `None` never fails.
    writes_before_failure: Option<usize>,
    writes: AtomicUsize,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make duplicate lookups fail.
    pub fn fail_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    /// Make thread lookups fail.
    pub fn fail_thread_lookups(mut self) -> Self {
        self.fail_thread_lookups = true;
        self
    }

    /// Make every insert and update fail.
    pub fn fail_writes(self) -> Self {
        self.fail_writes_after(0)
    }

    /// Let `count` writes succeed, then fail the rest.
    pub fn fail_writes_after(mut self, count: usize) -> Self {
        self.writes_before_failure = Some(count);
        self
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn check_write(&self) -> Result<()> {
        let attempt = self.writes.fetch_add(1, Ordering::SeqCst);
        match self.writes_before_failure {
            Some(limit) if attempt >= limit => {
                Err(PainPointError::storage("injected write failure"))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl PainPointStore for FailingStore {
    async fn find_duplicate_candidates(&self, query: &DuplicateQuery) -> Result<Vec<PainPoint>> {
        if self.fail_lookups {
            return Err(PainPointError::storage("injected lookup failure"));
        }
        self.inner.find_duplicate_candidates(query).await
    }

    async fn insert(&self, pain_point: &PainPoint) -> Result<PainPoint> {
        self.check_write()?;
        self.inner.insert(pain_point).await
    }

    async fn update(&self, pain_point: &PainPoint) -> Result<PainPoint> {
        self.check_write()?;
        self.inner.update(pain_point).await
    }

    async fn get(&self, id: PainPointId) -> Result<Option<PainPoint>> {
        self.inner.get(id).await
    }

    async fn list_ranked(&self, limit: Option<usize>) -> Result<Vec<PainPoint>> {
        self.inner.list_ranked(limit).await
    }
}

#[async_trait]
impl ThreadSource for FailingStore {
    async fn get_thread(&self, id: &str) -> Result<Option<Thread>> {
        if self.fail_thread_lookups {
            return Err(PainPointError::storage("injected thread lookup failure"));
        }
        self.inner.get_thread(id).await
    }

    async fn store_thread(&self, thread: &Thread) -> Result<()> {
        self.inner.store_thread(thread).await
    }
}
