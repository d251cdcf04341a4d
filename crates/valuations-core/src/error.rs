//! # Error Types
//!
//! Mapping errors for valuations-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  valuations-core (this file)                                           │
//! │  └── MapError      - Record cannot be translated at all                │
//! │                                                                         │
//! │  valuations-db                                                         │
//! │  └── DbError       - Database operation failures                       │
//! │                                                                         │
//! │  valuations-sync                                                       │
//! │  └── SyncError     - Fetch (fatal) and record (isolated) failures      │
//! │                                                                         │
//! │  Flow: MapError → SyncError::Mapping → record marked Failed            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Recoverable oddities (bad timestamps, owner ID mismatch) are NOT errors;
//! they are reported as [`crate::mapper::MapWarning`] values.

use thiserror::Error;

/// Errors that prevent a record from being mapped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    /// An external ID does not fit the canonical signed 64-bit ID.
    #[error("{entity} id {value} is out of range")]
    IdOutOfRange { entity: &'static str, value: u64 },

    /// The attributes string is not JSON.
    #[error("attributes for property {property_id} are not valid JSON: {reason}")]
    InvalidAttributes { property_id: u64, reason: String },
}

/// Convenience type alias for Results with MapError.
pub type MapResult<T> = Result<T, MapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MapError::IdOutOfRange {
            entity: "property",
            value: u64::MAX,
        };
        assert_eq!(
            err.to_string(),
            "property id 18446744073709551615 is out of range"
        );
    }
}
