//! The ingestion pipeline: duplicate detection, merge/insert, batch
//! analysis, and the rerank job.

pub mod analyze;
pub mod dedup;
pub mod rerank;
pub mod upsert;

pub use analyze::BatchAnalyzer;
pub use dedup::find_duplicate;
pub use rerank::rerank_all;
pub use upsert::upsert;
