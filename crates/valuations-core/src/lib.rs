//! # valuations-core: Pure Mapping Logic for the Property Sync
//!
//! This crate holds the shapes that cross the sync boundary and the pure
//! function that translates between them. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Property Sync Data Flow                          │
//! │                                                                         │
//! │  External API (JSON pages)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             ★ valuations-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌───────────────┐    │   │
//! │  │   │     wire      │   │    mapper     │   │   entities    │    │   │
//! │  │   │ ExternalProp  │──►│ map_record()  │──►│ Property      │    │   │
//! │  │   │ ExternalAgent │   │ parse_time()  │   │ Agent / User  │    │   │
//! │  │   │ PropertiesPage│   │ warnings      │   │ Location ...  │    │   │
//! │  │   └───────────────┘   └───────────────┘   └───────────────┘    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  valuations-db (upserts)  ◄──  valuations-sync (reconciler)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`wire`] - Structs mirroring the external API response exactly
//! - [`entities`] - Canonical, strictly-typed persisted entities
//! - [`mapper`] - Wire → canonical translation with non-fatal warnings
//! - [`error`] - Mapping error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use valuations_core::mapper::map_record;
//! use valuations_core::wire::ExternalProperty;
//!
//! let record: ExternalProperty = serde_json::from_str(r#"{
//!     "id": 42,
//!     "owner_name": "J. Banda",
//!     "attributes": "{\"attributes\":[{\"name\":\"Garage\"}]}",
//!     "created_at": "2025-04-01T11:44:25.000000Z",
//!     "updated_at": "2025-04-01 12:31:28",
//!     "is_approved": "1"
//! }"#).unwrap();
//!
//! let mapped = map_record(&record, Utc::now()).unwrap();
//! assert_eq!(mapped.property.id, 42);
//! assert_eq!(mapped.property.is_approved, "1");
//! assert!(mapped.warnings.is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod entities;
pub mod error;
pub mod mapper;
pub mod wire;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use entities::*;
pub use error::{MapError, MapResult};
pub use mapper::{map_record, parse_timestamp, MapWarning, MappedRecord};
pub use wire::{ExternalProperty, PropertiesPage};
