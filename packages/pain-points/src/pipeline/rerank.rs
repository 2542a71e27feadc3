//! Periodic reranking with the batch formula.
//!
//! The ingestion path scores with [`crate::scoring::calculate_rank_score`];
//! this job rescores everything with
//! [`crate::scoring::calculate_batch_rank_score`], which also weighs market
//! size, quotes, keyword coverage, and validation. The next merge into a
//! record rescored here goes back to the ingestion formula.

use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::traits::store::PainPointStore;
use crate::types::analysis::RerankSummary;

/// Recompute every record's rank score with the batch formula.
///
/// Only records whose score changed are written. A failed write is logged
/// and counted, and the job moves on to the next record.
#[instrument(skip_all)]
pub async fn rerank_all<S>(store: &S) -> Result<RerankSummary>
where
    S: PainPointStore + ?Sized,
{
    let pain_points = store.list_ranked(None).await?;
    let mut summary = RerankSummary {
        examined: pain_points.len(),
        ..Default::default()
    };

    for mut pain_point in pain_points {
        let previous = pain_point.rank_score();
        if !pain_point.apply_batch_rank_score() {
            continue;
        }

        match store.update(&pain_point).await {
            Ok(_) => summary.updated += 1,
            Err(e) => {
                warn!(
                    id = %pain_point.id,
                    previous,
                    next = pain_point.rank_score(),
                    error = %e,
                    "Failed to persist reranked score"
                );
                summary.failed += 1;
            }
        }
    }

    info!(
        examined = summary.examined,
        updated = summary.updated,
        failed = summary.failed,
        "Rerank complete"
    );
    Ok(summary)
}
