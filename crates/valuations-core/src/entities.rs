//! # Canonical Entities
//!
//! Strictly-typed entities persisted by the sync.
//!
//! ## Entity Graph
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────────┐  1     n  ┌──────────┐  1     n  ┌──────────────┐      │
//! │   │   User   │◄──────────│  Agent   │◄──────────│   Property   │      │
//! │   └──────────┘  user_id  └──────────┘  agent_id └──────┬───────┘      │
//! │                                                        │   ▲           │
//! │                                   cover_photo_id       │   │ 1:1       │
//! │                          ┌──────────────┐◄─────────────┘   │           │
//! │                          │  CoverPhoto  │          ┌───────┴──────┐    │
//! │                          └──────────────┘          │   Location   │    │
//! │                                                    │ property_id  │    │
//! │                                                    └──────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity is keyed by the external system's natural numeric ID. IDs
//! are never generated locally, which is what makes re-runs idempotent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// External natural ID, narrowed to what the database can store.
pub type EntityId = i64;

// =============================================================================
// User
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    /// Unique across users.
    pub email: String,
    pub status: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub phone: String,
    pub password_last_updated_at: Option<DateTime<Utc>>,
    pub financial_institution_id: Option<EntityId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub role: String,
    pub signature_storage_url: Option<String>,
    pub profile_image_storage_url: Option<String>,
}

// =============================================================================
// Agent
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: EntityId,
    /// Owning user. Always the nested user's ID.
    pub user_id: EntityId,
    pub phone1: String,
    pub phone2: Option<String>,
    pub headline1: Option<String>,
    pub headline2: Option<String>,
    pub about: Option<String>,
    pub is_agreement_signed: String,
    pub agent_type: String,
    pub bank_name: Option<String>,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub account_type: Option<String>,
    pub account_branch: Option<String>,
    pub linkedin: Option<String>,
    pub address: Option<String>,
    pub coverage_area: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Location
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: EntityId,
    /// Always equal to the owning property's ID.
    pub property_id: EntityId,
    pub region: String,
    pub district: String,
    pub area: String,
    pub postcode: Option<String>,
    pub sub_area: Option<String>,
    pub google_map_link: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub zone_category: String,
    pub zoning: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Cover Photo
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverPhoto {
    pub id: EntityId,
    pub url: String,
    pub description: String,
}

// =============================================================================
// Property
// =============================================================================

/// A property listing or valuation. Insert-only from the sync's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: EntityId,
    pub valuer_id: Option<EntityId>,
    pub property_number: Option<String>,
    pub parent_valuation: Option<EntityId>,
    pub project_id: Option<EntityId>,
    pub owner_name: String,
    pub property_type: Option<String>,
    pub property_design: String,
    pub construction_stage: String,
    pub year_built: Option<String>,
    pub age: Option<i64>,
    pub eul: Option<i64>,
    pub rel: Option<i64>,
    pub measurements: String,
    pub no_rooms: Option<i64>,
    pub no_of_bathrooms: Option<i64>,
    pub occupancy: Option<String>,
    /// Opaque structured payload; `Null` when the source sent nothing.
    pub attributes: serde_json::Value,
    pub title_deeds_available: String,
    pub certificate_of_search_available: Option<String>,
    pub encumbrances_available: Option<String>,
    pub defects: Option<String>,
    pub description: String,
    pub master_bedroom_ensuite: String,
    pub building_size: Option<f64>,
    pub building_size_unit: String,
    pub land_size: Option<f64>,
    pub land_size_unit: String,
    pub entry_type: String,
    pub price: Option<f64>,
    pub listing_type: String,
    pub created_by: Option<EntityId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // Flag-like fields are free-form upstream ("0", "1", "yes").
    pub is_approved: String,
    pub is_submitted: String,
    pub is_sale_completed: String,
    pub has_accepted_offer: String,
    pub is_referred: String,
    pub approved_at: Option<DateTime<Utc>>,
    pub visibility: String,
    pub views: i64,
    pub agent_id: Option<EntityId>,
    pub cover_photo_id: Option<EntityId>,
}

// =============================================================================
// Read Models
// =============================================================================

/// Agent together with its owning user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentWithUser {
    #[serde(flatten)]
    pub agent: Agent,
    pub user: User,
}

/// A property with its whole persisted subgraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDetails {
    #[serde(flatten)]
    pub property: Property,
    pub location: Option<Location>,
    pub agent: Option<AgentWithUser>,
    pub cover_photo: Option<CoverPhoto>,
}
