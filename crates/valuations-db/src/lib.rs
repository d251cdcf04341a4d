//! # valuations-db: Database Layer for the Property Sync
//!
//! This crate provides database access for the synced property graph.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Property Sync Data Flow                          │
//! │                                                                         │
//! │  valuations-sync reconciler                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  valuations-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)  │   │   │
//! │  │   │               │    │ PropertyRepo   │   │ 001_property │   │   │
//! │  │   │ SqlitePool    │◄───│ SyncTransaction│   │   _graph.sql │   │   │
//! │  │   │ WAL + FKs     │    │                │   │              │   │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   users · agents · cover_photos · properties · locations        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Read repository and per-record write transaction
//!
//! ## Usage
//!
//! ```rust,ignore
//! use valuations_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("valuations.db")).await?;
//!
//! if !db.properties().exists(42).await? {
//!     let mut tx = db.begin_sync().await?;
//!     tx.insert_property(&property).await?;
//!     tx.commit().await?;
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::property::{
    EntityCounts, PageRequest, PropertyFilter, PropertyPage, PropertyRepository,
};
pub use repository::sync::SyncTransaction;
