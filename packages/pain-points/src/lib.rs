//! Pain-Point Deduplication and Ranking
//!
//! Turns social-media threads into a ranked catalogue of user pain points.
//! An LLM extracts candidate pain points from each thread; each candidate is
//! either merged into a near-identical existing record (same category,
//! overlapping keywords, title similarity above 0.7) or stored as a new one.
//! Every record carries a 0-100 rank score driven by frequency, intensity,
//! urgency, and extraction confidence.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pain_points::{BatchAnalyzer, MemoryStore};
//! use pain_points::testing::MockExtractor;
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryStore::new());
//! let analyzer = BatchAnalyzer::new(store.clone(), store, MockExtractor::new());
//!
//! // One report entry per thread id, in input order
//! let report = analyzer.analyze(&["t3_abc", "t3_def"]).await;
//! ```
//!
//! # Modules
//!
//! - [`types`] - Pain points, candidates, threads, and batch reports
//! - [`scoring`] - Title similarity and the two rank formulas
//! - [`traits`] - Store, thread source, and extractor abstractions
//! - [`pipeline`] - Duplicate detection, merge/insert, batch analysis, rerank
//! - [`stores`] - Storage implementations (MemoryStore, PostgresStore)
//! - [`ai`] - Extraction prompts, response parsing, OpenAI extractor
//! - [`testing`] - Mock implementations for testing

pub mod ai;
pub mod error;
pub mod pipeline;
pub mod scoring;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{PainPointError, Result};
pub use pipeline::{find_duplicate, rerank_all, upsert, BatchAnalyzer};
pub use scoring::{calculate_batch_rank_score, calculate_rank_score, similarity, DUPLICATE_THRESHOLD};
pub use stores::MemoryStore;
pub use traits::{
    extractor::Extractor,
    store::{DuplicateQuery, PainPointStore},
    threads::ThreadSource,
};
pub use types::{
    analysis::{AnalysisStatus, RerankSummary, ThreadAnalysis},
    candidate::{Candidate, ExtractedPainPoint, ExtractedQuote},
    config::PipelineConfig,
    pain_point::{Category, Level, PainPoint, PainPointId, PainPointStatus, Quote},
    thread::{Comment, ExtractionInput, Thread},
};

#[cfg(feature = "postgres")]
pub use stores::PostgresStore;

#[cfg(feature = "openai")]
pub use ai::OpenAiExtractor;
