//! # valuations-sync: Property Sync Engine
//!
//! Pulls the external paginated property collection and reconciles every
//! record into the local store.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Sync Run Pipeline                              │
//! │                                                                         │
//! │  ┌────────────────┐   pages    ┌────────────────┐                       │
//! │  │ PropertySource │──────────►│    Fetcher     │  cursor in, page out   │
//! │  │ (HTTP or mock) │            └───────┬────────┘                       │
//! │  └────────────────┘                    │ records                        │
//! │                                        ▼                                │
//! │                                ┌────────────────┐                       │
//! │                                │  Dedup Guard   │  first sighting only  │
//! │                                └───────┬────────┘                       │
//! │                                        ▼                                │
//! │  ┌────────────────┐            ┌────────────────┐                       │
//! │  │ valuations-core│◄───────────│   Reconciler   │  exists? map, upsert  │
//! │  │ map_record     │            │                │  one tx per record    │
//! │  └────────────────┘            └───────┬────────┘                       │
//! │                                        │ outcome                        │
//! │                                        ▼                                │
//! │                                ┌────────────────┐                       │
//! │                                │ RunAggregator  │──► SyncReport         │
//! │                                └────────────────┘                       │
//! │                                                                         │
//! │  SyncEngine owns the loop. A fetch error ends the run with a           │
//! │  SyncFailure; a record error is counted and the run carries on.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Source URL, timeout and database settings (TOML + env)
//! - [`source`] - `PropertySource` trait, reqwest client, mock
//! - [`fetcher`] - Cursor-threaded page walk
//! - [`dedup`] - In-run seen set
//! - [`reconciler`] - Per-record transaction
//! - [`aggregator`] - Counts and the final report
//! - [`engine`] - The run loop
//! - [`error`] - Sync error types

pub mod aggregator;
pub mod config;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod reconciler;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::{RunAggregator, RunStatus, SyncReport};
pub use config::SyncConfig;
pub use dedup::DedupGuard;
pub use engine::SyncEngine;
pub use error::{SyncError, SyncFailure, SyncResult};
pub use fetcher::{fetch_next, Page, PageCursor};
pub use reconciler::{Reconciler, RecordOutcome};
pub use source::{HttpPropertySource, MockPropertySource, MockResponse, PropertySource};
