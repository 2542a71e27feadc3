//! Batch analysis driver.
//!
//! Threads are processed one at a time, and candidates within a thread one at
//! a time. Duplicate detection is read-then-write without isolation, so
//! running upserts for the same pain point concurrently could lose
//! increments. Keep this sequential unless upserts get serialized per
//! category/keyword key.

use tracing::{debug, info, instrument, warn};

use crate::error::{PainPointError, Result};
use crate::pipeline::upsert::upsert;
use crate::traits::{extractor::Extractor, store::PainPointStore, threads::ThreadSource};
use crate::types::{
    analysis::ThreadAnalysis,
    candidate::{Candidate, ExtractedPainPoint},
    config::PipelineConfig,
    pain_point::PainPoint,
    thread::Thread,
};

/// Drives extraction and merge/insert over batches of thread ids.
///
/// Construct once at startup with its collaborators and share by reference.
///
/// # Example
///
/// ```rust,ignore
/// let analyzer = BatchAnalyzer::new(store, threads, extractor);
/// let report = analyzer.analyze(&["t3_abc", "t3_def"]).await;
/// assert_eq!(report.len(), 2);
/// ```
pub struct BatchAnalyzer<S: PainPointStore, T: ThreadSource, E: Extractor> {
    store: S,
    threads: T,
    extractor: E,
    config: PipelineConfig,
}

impl<S: PainPointStore, T: ThreadSource, E: Extractor> BatchAnalyzer<S, T, E> {
    /// Create an analyzer with the default configuration.
    pub fn new(store: S, threads: T, extractor: E) -> Self {
        Self::with_config(store, threads, extractor, PipelineConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(store: S, threads: T, extractor: E, config: PipelineConfig) -> Self {
        Self {
            store,
            threads,
            extractor,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    fn extracted_by(&self) -> &str {
        match self.extractor.name() {
            "" => &self.config.extracted_by,
            name => name,
        }
    }

    /// Analyze every thread id, in order.
    ///
    /// Always returns exactly one entry per input id, in input order. A
    /// failure on one thread never stops the others.
    #[instrument(skip_all, fields(threads = thread_ids.len()))]
    pub async fn analyze<I: AsRef<str>>(&self, thread_ids: &[I]) -> Vec<ThreadAnalysis> {
        let mut results = Vec::with_capacity(thread_ids.len());

        for thread_id in thread_ids {
            results.push(self.analyze_thread(thread_id.as_ref()).await);
        }

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        info!(
            total = results.len(),
            succeeded,
            failed = results.len() - succeeded,
            "Batch analysis complete"
        );
        results
    }

    /// Analyze a single thread and report the outcome.
    ///
    /// If saving a candidate fails, the thread is reported as an error and
    /// the candidates after it are skipped. Records saved before the failure
    /// are listed in the error entry.
    pub async fn analyze_thread(&self, thread_id: &str) -> ThreadAnalysis {
        let thread = match self.load_thread(thread_id).await {
            Ok(thread) => thread,
            Err(e) => {
                warn!(thread_id, error = %e, "Skipping thread");
                return ThreadAnalysis::error(thread_id, e.to_string());
            }
        };

        let extracted = match self.extract(&thread).await {
            Ok(extracted) => extracted,
            Err(e) => {
                warn!(thread_id, error = %e, "Extraction failed");
                return ThreadAnalysis::error(thread_id, e.to_string());
            }
        };

        let mut saved = Vec::with_capacity(extracted.len());
        for raw in extracted {
            match self.upsert(Candidate::from_extracted(raw), &thread).await {
                Ok(pain_point) => saved.push(pain_point),
                Err(e) => {
                    warn!(
                        thread_id,
                        saved = saved.len(),
                        error = %e,
                        "Saving pain point failed, marking thread as failed"
                    );
                    return ThreadAnalysis::partial(thread_id, saved, e.to_string());
                }
            }
        }

        info!(thread_id, pain_points = saved.len(), "Thread analyzed");
        ThreadAnalysis::success(thread_id, saved)
    }

    /// Merge or insert one candidate extracted from `thread`.
    pub async fn upsert(&self, candidate: Candidate, thread: &Thread) -> Result<PainPoint> {
        upsert(
            candidate,
            thread,
            &self.store,
            self.config.similarity_threshold(),
            self.extracted_by(),
        )
        .await
    }

    async fn load_thread(&self, thread_id: &str) -> Result<Thread> {
        self.threads
            .get_thread(thread_id)
            .await?
            .ok_or_else(|| PainPointError::ThreadNotFound {
                thread_id: thread_id.to_string(),
            })
    }

    async fn extract(&self, thread: &Thread) -> Result<Vec<ExtractedPainPoint>> {
        let input = thread.extraction_input(self.config.max_comments);
        let extracted = self.extractor.extract(&input).await.map_err(|e| match e {
            e @ PainPointError::Extraction(_) => e,
            other => PainPointError::extraction(other),
        })?;

        debug!(thread_id = %thread.id, candidates = extracted.len(), "Extraction returned");
        Ok(extracted)
    }
}
