//! # Repository Module
//!
//! Database access for the synced property graph.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Read Side / Write Side                               │
//! │                                                                         │
//! │  Sync engine / operator tooling                                        │
//! │       │                                                                 │
//! │       │  db.properties().exists(42)                                    │
//! │       │  db.begin_sync() → SyncTransaction                             │
//! │       ▼                                                                 │
//! │  PropertyRepository (read)        SyncTransaction (write)              │
//! │  ├── exists / get_by_id           ├── upsert_user / upsert_agent       │
//! │  ├── list(filter, page)           ├── upsert_cover_photo               │
//! │  └── counts                       ├── insert_property                  │
//! │                                   └── upsert_location / commit         │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Column lists live in one place (columns.rs) so the INSERT, the        │
//! │  ON CONFLICT allow-list and the SELECT never drift apart.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`PropertyRepository`](property::PropertyRepository) - Existence checks, detail loads, listing
//! - [`SyncTransaction`](sync::SyncTransaction) - Per-record upsert transaction

mod columns;
pub mod property;
pub mod sync;

#[cfg(test)]
pub(crate) mod fixtures;
