//! # Sync Engine
//!
//! Runs one full pass over the external collection.
//!
//! ## Run Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                             SyncEngine::run                             │
//! │                                                                         │
//! │  cursor = start(properties_url)                                         │
//! │  loop {                                                                 │
//! │      page_attempted()                                                   │
//! │      fetch_next(cursor) ──error──► abort → Err(SyncFailure)             │
//! │      for record in page {                                               │
//! │          record_fetched()                                               │
//! │          seen before? ──► record_duplicate(), next                      │
//! │          reconcile(record)                                              │
//! │              Skipped    → record_skipped()                              │
//! │              Committed  → record_synced()                               │
//! │              Failed(e)  → record_failed(id, e)                          │
//! │      }                                                                  │
//! │      no next cursor? ──► break                                          │
//! │  }                                                                      │
//! │  finish → Ok(SyncReport)                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything is sequential: one page, then one record, then one
//! transaction at a time. There is no retry and no cancellation.

use chrono::Utc;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;
use valuations_db::Database;

use crate::aggregator::{RunAggregator, SyncReport};
use crate::config::SyncConfig;
use crate::dedup::DedupGuard;
use crate::error::SyncFailure;
use crate::fetcher::{fetch_next, PageCursor};
use crate::reconciler::{Reconciler, RecordOutcome};
use crate::source::PropertySource;

/// Drives the fetcher, dedup guard, reconciler and aggregator for one run.
///
/// # Example
///
/// ```ignore
/// let config = SyncConfig::load(None)?;
/// let db = Database::new(DbConfig::new(&config.database.path)).await?;
/// let source = HttpPropertySource::from_config(&config)?;
///
/// let report = SyncEngine::new(&config, source, db).run().await?;
/// println!("{} synced", report.synced_count);
/// ```
pub struct SyncEngine<S> {
    start_url: String,
    source: S,
    reconciler: Reconciler,
}

impl<S: PropertySource> SyncEngine<S> {
    pub fn new(config: &SyncConfig, source: S, db: Database) -> Self {
        Self {
            start_url: config.source.properties_url.clone(),
            source,
            reconciler: Reconciler::new(db),
        }
    }

    /// Runs a sync under a fresh run ID.
    ///
    /// A fetch error aborts the run and comes back as [`SyncFailure`], with
    /// the counts gathered before it.
    pub async fn run(&self) -> Result<SyncReport, SyncFailure> {
        let run_id = Uuid::new_v4();
        self.run_inner(run_id)
            .instrument(info_span!("sync_run", %run_id))
            .await
    }

    async fn run_inner(&self, run_id: Uuid) -> Result<SyncReport, SyncFailure> {
        info!(url = %self.start_url, "Sync run starting");

        let mut aggregator = RunAggregator::new(run_id);
        let mut dedup = DedupGuard::new();
        let mut cursor = PageCursor::start(self.start_url.clone());

        loop {
            aggregator.page_attempted();

            let page = match fetch_next(&self.source, &cursor).await {
                Ok(page) => page,
                Err(e) => {
                    error!(page = cursor.page_number, url = %cursor.url, error = %e, "Fetch failed, aborting run");
                    let report = aggregator.abort(&e);
                    return Err(SyncFailure { report, error: e });
                }
            };

            if let Some(total) = page.declared_total {
                aggregator.declared_total(total);
            }

            for record in &page.records {
                aggregator.record_fetched();

                if !dedup.first_sighting(record.id) {
                    debug!(property_id = record.id, "Duplicate in this run, ignoring");
                    aggregator.record_duplicate();
                    continue;
                }

                match self.reconciler.reconcile(record, Utc::now()).await {
                    RecordOutcome::Skipped => aggregator.record_skipped(),
                    RecordOutcome::Committed => aggregator.record_synced(),
                    RecordOutcome::Failed(e) => {
                        error!(property_id = record.id, error = %e, "Failed to sync property");
                        aggregator.record_failed(record.id, &e);
                    }
                }
            }

            let progress = aggregator.snapshot();
            info!(
                page = page.number,
                records = page.records.len(),
                synced = progress.synced_count,
                skipped = progress.skipped_count,
                errors = progress.error_count,
                "Page processed"
            );

            match page.next {
                Some(next) => cursor = next,
                None => break,
            }
        }

        let report = aggregator.finish();
        info!(
            status = %report.status,
            pages = report.total_pages_fetched,
            fetched = report.fetched_count,
            synced = report.synced_count,
            skipped = report.skipped_count,
            duplicates = report.duplicate_count,
            errors = report.error_count,
            distinct_ids = dedup.len(),
            "Sync run finished"
        );
        Ok(report)
    }
}
