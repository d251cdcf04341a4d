//! # Sync Error Types
//!
//! Error types for sync runs.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sync Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌──────────────────────┐  ┌───────────────────┐  │
//! │  │  Configuration  │  │  Fetch (FATAL)       │  │  Record (ISOLATED)│  │
//! │  │                 │  │                      │  │                   │  │
//! │  │  Config         │  │  Transport           │  │  Mapping          │  │
//! │  │                 │  │  HttpStatus          │  │  Database         │  │
//! │  │                 │  │  Decode              │  │                   │  │
//! │  │                 │  │  Timeout             │  │                   │  │
//! │  └─────────────────┘  └──────────────────────┘  └───────────────────┘  │
//! │                                                                         │
//! │  Fetch errors abort the run; the partial report travels with them     │
//! │  in SyncFailure. Record errors are absorbed into the report.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use valuations_core::MapError;
use valuations_db::DbError;

use crate::aggregator::SyncReport;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Every way a sync run or a single record can fail.
#[derive(Debug, Error)]
pub enum SyncError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid or unreadable configuration.
    #[error("Invalid sync configuration: {0}")]
    Config(String),

    // =========================================================================
    // Fetch Errors (fatal to the run)
    // =========================================================================
    /// Connection refused, DNS failure, reset mid-body.
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The source answered with a non-success status.
    #[error("Source returned HTTP {status} for {url}: {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    /// The response body is not a properties page.
    #[error("Malformed page from {url}: {message}")]
    Decode { url: String, message: String },

    /// The request did not complete within the configured timeout.
    #[error("Request to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    // =========================================================================
    // Record Errors (isolated to one record)
    // =========================================================================
    #[error("Mapping failed: {0}")]
    Mapping(#[from] MapError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl SyncError {
    /// True for errors raised while fetching a page. These abort the run.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            SyncError::Transport { .. }
                | SyncError::HttpStatus { .. }
                | SyncError::Decode { .. }
                | SyncError::Timeout { .. }
        )
    }
}

/// A run aborted by a fatal error, with everything counted up to that point.
#[derive(Debug, Error)]
#[error("Sync run {} failed: {error}", .report.run_id)]
pub struct SyncFailure {
    pub report: SyncReport,
    #[source]
    pub error: SyncError,
}
