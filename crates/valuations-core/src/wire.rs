//! # Wire Types
//!
//! Structs mirroring the external property API response exactly.
//!
//! ## Response Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PropertiesPage                                                         │
//! │  ├── data: [ExternalProperty]                                          │
//! │  │          ├── agent?: ExternalAgent                                  │
//! │  │          │           └── user?: ExternalUser                        │
//! │  │          ├── location?: ExternalLocation                            │
//! │  │          └── cover_photo?: ExternalCoverPhoto                       │
//! │  └── meta: PageMeta                                                     │
//! │             current_page, last_page, per_page, total,                   │
//! │             next_page_url?, prev_page_url?                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Loose Typing Stays Here
//! The upstream API is loosely typed. Flags such as `is_approved` are
//! free-form strings (`"0"`, `"1"`, `"yes"`), textual fields may be `null`,
//! the agent's `user_id` may be a string or a number, and `attributes` is
//! JSON encoded inside a string. All of that is absorbed by these structs
//! and the [`crate::mapper`]; canonical entities never see it.
//!
//! Field names are kept verbatim, including the upstream misspellings
//! `bulding_size_unit`, `phone_1` and `phone_2`.

use serde::{Deserialize, Serialize};

// =============================================================================
// Page Envelope
// =============================================================================

/// One page of the external property collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertiesPage {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub data: Vec<ExternalProperty>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub meta: PageMeta,
}

/// Pagination metadata attached to every page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub current_page: i64,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub last_page: i64,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub per_page: i64,
    /// Total number of records in the collection, as declared by the source.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub total: i64,
    #[serde(default)]
    pub next_page_url: Option<String>,
    #[serde(default)]
    pub prev_page_url: Option<String>,
}

// =============================================================================
// Records
// =============================================================================

/// The owning user nested inside an agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalUser {
    pub id: u64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,
    #[serde(default)]
    pub email_verified_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(default)]
    pub password_last_updated_at: Option<String>,
    #[serde(default)]
    pub financial_institution_id: Option<u64>,
    #[serde(default)]
    pub deleted_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_at: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub updated_at: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub role: String,
    #[serde(default)]
    pub signature_storage_url: Option<String>,
    #[serde(default)]
    pub profile_image_storage_url: Option<String>,
}

/// The agent attached to a property.
///
/// `user_id` duplicates `user.id`; see [`crate::mapper`] for which one wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalAgent {
    pub id: u64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub user_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone_1: String,
    #[serde(default)]
    pub phone_2: Option<String>,
    #[serde(default)]
    pub headline1: Option<String>,
    #[serde(default)]
    pub headline2: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub is_agreement_signed: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub agent_type: String,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub account_branch: Option<String>,
    /// Convenience copy of the user's phone. Not persisted on the agent.
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
    /// Convenience copy of the user's email. Not persisted on the agent.
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_at: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub updated_at: String,
    #[serde(default)]
    pub coverage_area: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default)]
    pub user: Option<ExternalUser>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalLocation {
    pub id: u64,
    /// Ignored on write; the location is always linked to its parent record.
    #[serde(default)]
    pub property_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub region: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub district: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub area: String,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub sub_area: Option<String>,
    #[serde(default)]
    pub google_map_link: Option<String>,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub zone_category: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub zoning: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_at: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalCoverPhoto {
    pub id: u64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
}

/// One property record exactly as delivered by the upstream source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalProperty {
    pub id: u64,
    #[serde(default)]
    pub valuer_id: Option<u64>,
    #[serde(default)]
    pub property_number: Option<String>,
    #[serde(default)]
    pub parent_valuation: Option<u64>,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub owner_name: String,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub property_design: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub construction_stage: String,
    #[serde(default)]
    pub year_built: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    /// Estimated useful life.
    #[serde(default)]
    pub eul: Option<i64>,
    /// Remaining economic life.
    #[serde(default)]
    pub rel: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub measurements: String,
    #[serde(default)]
    pub no_rooms: Option<i64>,
    #[serde(default)]
    pub no_of_bathrooms: Option<i64>,
    #[serde(default)]
    pub occupancy: Option<String>,
    /// JSON document encoded as a string.
    #[serde(default, deserialize_with = "lenient::string")]
    pub attributes: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title_deeds_available: String,
    #[serde(default)]
    pub certificate_of_search_available: Option<String>,
    #[serde(default)]
    pub encumbrances_available: Option<String>,
    #[serde(default)]
    pub defects: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub master_bedroom_ensuite: String,
    #[serde(default)]
    pub building_size: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub bulding_size_unit: String,
    #[serde(default)]
    pub land_size: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub land_size_unit: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub entry_type: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub listing_type: String,
    #[serde(default)]
    pub created_by: Option<u64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_at: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub updated_at: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub is_approved: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub is_submitted: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub is_sale_completed: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub has_accepted_offer: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub is_referred: String,
    #[serde(default)]
    pub approved_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub visibility: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub views: i64,
    #[serde(default)]
    pub location: Option<ExternalLocation>,
    #[serde(default)]
    pub agent: Option<ExternalAgent>,
    #[serde(default)]
    pub cover_photo: Option<ExternalCoverPhoto>,
    /// Present upstream, not synced.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub open_houses: Vec<serde_json::Value>,
}

// =============================================================================
// Lenient Decoders
// =============================================================================

pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Decodes a textual field that may arrive as a string, a number, a
    /// boolean or `null`. `null` becomes the empty string.
    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "expected a string, found {other}"
            ))),
        }
    }

    /// Decodes a field whose `null` means the type's default: `0` for
    /// counters, an empty list, an empty meta block.
    pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}
