//! # Run Aggregator
//!
//! Accumulates page and record counts into the final run report.
//!
//! ## Counting Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  page_attempted()   every page request, including the one that fails   │
//! │  declared_total()   meta.total from the first page                     │
//! │                                                                         │
//! │  record_fetched() ─┬─► record_duplicate()   already seen this run      │
//! │                    ├─► record_skipped()     already persisted          │
//! │                    ├─► record_synced()      committed                  │
//! │                    └─► record_failed()      rolled back, error kept    │
//! │                                                                         │
//! │  fetched == synced + skipped + errors + duplicates                     │
//! │                                                                         │
//! │  finish() → completed | completed_with_errors                          │
//! │  abort()  → failed, abortReason set (not counted in errorCount)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SyncError;

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    InProgress,
    Completed,
    CompletedWithErrors,
    Failed,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::InProgress => write!(f, "in_progress"),
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::CompletedWithErrors => write!(f, "completed_with_errors"),
            RunStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Result of one sync run, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub status: RunStatus,
    pub run_id: Uuid,
    pub total_pages_fetched: u64,
    /// Collection size declared by the source on the first page.
    pub total_properties: i64,
    pub fetched_count: u64,
    pub synced_count: u64,
    pub skipped_count: u64,
    pub duplicate_count: u64,
    pub error_count: u64,
    /// One entry per failed record, in processing order.
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort_reason: Option<String>,
}

impl SyncReport {
    /// True when every fetched record is accounted for exactly once.
    pub fn is_balanced(&self) -> bool {
        self.fetched_count
            == self.synced_count + self.skipped_count + self.error_count + self.duplicate_count
    }
}

/// Mutable run state. Consumed by [`RunAggregator::finish`] or
/// [`RunAggregator::abort`].
#[derive(Debug)]
pub struct RunAggregator {
    report: SyncReport,
}

impl RunAggregator {
    pub fn new(run_id: Uuid) -> Self {
        Self {
            report: SyncReport {
                status: RunStatus::InProgress,
                run_id,
                total_pages_fetched: 0,
                total_properties: 0,
                fetched_count: 0,
                synced_count: 0,
                skipped_count: 0,
                duplicate_count: 0,
                error_count: 0,
                errors: Vec::new(),
                abort_reason: None,
            },
        }
    }

    pub fn page_attempted(&mut self) {
        self.report.total_pages_fetched += 1;
    }

    pub fn declared_total(&mut self, total: i64) {
        self.report.total_properties = total;
    }

    pub fn record_fetched(&mut self) {
        self.report.fetched_count += 1;
    }

    pub fn record_duplicate(&mut self) {
        self.report.duplicate_count += 1;
    }

    pub fn record_skipped(&mut self) {
        self.report.skipped_count += 1;
    }

    pub fn record_synced(&mut self) {
        self.report.synced_count += 1;
    }

    pub fn record_failed(&mut self, property_id: u64, error: &SyncError) {
        self.report.error_count += 1;
        self.report
            .errors
            .push(format!("Failed to sync property ID {property_id}: {error}"));
    }

    /// Current counts, status still `in_progress`.
    pub fn snapshot(&self) -> &SyncReport {
        &self.report
    }

    /// Closes a run whose fetch loop ran to the end.
    pub fn finish(mut self) -> SyncReport {
        self.report.status = if self.report.error_count == 0 {
            RunStatus::Completed
        } else {
            RunStatus::CompletedWithErrors
        };
        self.report
    }

    /// Closes a run cut short by a fetch error. Counts so far are kept.
    pub fn abort(mut self, error: &SyncError) -> SyncReport {
        self.report.status = RunStatus::Failed;
        self.report.abort_reason = Some(error.to_string());
        self.report
    }
}
