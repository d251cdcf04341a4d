//! # Mapper
//!
//! Pure translation from [`crate::wire`] records to [`crate::entities`].
//!
//! ## What It Does
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ExternalProperty ──► map_record(record, now) ──► MappedRecord          │
//! │                                                   ├── user?             │
//! │                                                   ├── agent?            │
//! │                                                   ├── cover_photo?      │
//! │                                                   ├── property          │
//! │                                                   ├── location?         │
//! │                                                   └── warnings          │
//! │                                                                         │
//! │  Recoverable:  bad timestamp, owner ID mismatch, agent without user     │
//! │                → substitute a default, push a MapWarning                │
//! │  Fatal:        ID out of range, attributes not JSON                     │
//! │                → MapError, the record fails                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The clock is an argument so the output only depends on the inputs.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::entities::{Agent, CoverPhoto, EntityId, Location, Property, User};
use crate::error::{MapError, MapResult};
use crate::wire::{
    ExternalAgent, ExternalCoverPhoto, ExternalLocation, ExternalProperty, ExternalUser,
};

/// Secondary timestamp layout, interpreted as UTC.
const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Output Types
// =============================================================================

/// Everything one external record maps to.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRecord {
    /// Owning user of the agent. Present only when `agent` is.
    pub user: Option<User>,
    pub agent: Option<Agent>,
    pub cover_photo: Option<CoverPhoto>,
    pub property: Property,
    pub location: Option<Location>,
    pub warnings: Vec<MapWarning>,
}

/// A recoverable oddity found while mapping. The record still proceeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapWarning {
    /// A timestamp matched none of the accepted layouts.
    ///
    /// Creation and update timestamps were replaced by the current time,
    /// optional ones were dropped.
    InvalidTimestamp {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// The agent's declared `user_id` disagrees with its nested user, or is
    /// not a number. The nested user's ID was used.
    AgentUserMismatch {
        agent_id: u64,
        declared: String,
        user_id: u64,
    },

    /// The agent has no nested user, so its owner is unknown. It was dropped.
    AgentWithoutUser { agent_id: u64 },
}

impl fmt::Display for MapWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapWarning::InvalidTimestamp {
                entity,
                field,
                value,
            } => write!(f, "unparseable {entity}.{field} timestamp {value:?}"),
            MapWarning::AgentUserMismatch {
                agent_id,
                declared,
                user_id,
            } => write!(
                f,
                "agent {agent_id} declares user_id {declared:?} but nests user {user_id}"
            ),
            MapWarning::AgentWithoutUser { agent_id } => {
                write!(f, "agent {agent_id} has no nested user and was dropped")
            }
        }
    }
}

// =============================================================================
// Entry Point
// =============================================================================

/// Maps one external record to its canonical entity set.
///
/// The location, when present, is linked to the record's own ID regardless
/// of the `property_id` the source sent.
pub fn map_record(record: &ExternalProperty, now: DateTime<Utc>) -> MapResult<MappedRecord> {
    let mut mapper = Mapper {
        now,
        warnings: Vec::new(),
    };

    let (user, agent) = match &record.agent {
        Some(external) => match &external.user {
            Some(external_user) => {
                let user = mapper.user(external_user)?;
                let agent = mapper.agent(external, external_user)?;
                (Some(user), Some(agent))
            }
            None => {
                mapper.warn(MapWarning::AgentWithoutUser {
                    agent_id: external.id,
                });
                (None, None)
            }
        },
        None => (None, None),
    };

    let cover_photo = record
        .cover_photo
        .as_ref()
        .map(|photo| mapper.cover_photo(photo))
        .transpose()?;

    let property = mapper.property(
        record,
        agent.as_ref().map(|a| a.id),
        cover_photo.as_ref().map(|c| c.id),
    )?;

    let location = record
        .location
        .as_ref()
        .map(|location| mapper.location(location, property.id))
        .transpose()?;

    Ok(MappedRecord {
        user,
        agent,
        cover_photo,
        property,
        location,
        warnings: mapper.warnings,
    })
}

/// Parses an external timestamp against the accepted layouts, in order.
///
/// 1. RFC 3339 with optional fractional seconds
/// 2. `YYYY-MM-DD HH:MM:SS` as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, NAIVE_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

// =============================================================================
// Mapper State
// =============================================================================

struct Mapper {
    now: DateTime<Utc>,
    warnings: Vec<MapWarning>,
}

impl Mapper {
    fn warn(&mut self, warning: MapWarning) {
        self.warnings.push(warning);
    }

    /// Creation/update timestamps: fall back to `now`.
    fn required_ts(&mut self, entity: &'static str, field: &'static str, raw: &str) -> DateTime<Utc> {
        match parse_timestamp(raw) {
            Some(ts) => ts,
            None => {
                self.warn(MapWarning::InvalidTimestamp {
                    entity,
                    field,
                    value: raw.to_string(),
                });
                self.now
            }
        }
    }

    /// Optional timestamps: absence is normal, garbage is dropped with a warning.
    fn optional_ts(
        &mut self,
        entity: &'static str,
        field: &'static str,
        raw: Option<&str>,
    ) -> Option<DateTime<Utc>> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
        let parsed = parse_timestamp(raw);
        if parsed.is_none() {
            self.warn(MapWarning::InvalidTimestamp {
                entity,
                field,
                value: raw.to_string(),
            });
        }
        parsed
    }

    fn user(&mut self, user: &ExternalUser) -> MapResult<User> {
        Ok(User {
            id: to_id("user", user.id)?,
            name: user.name.clone(),
            email: user.email.clone(),
            status: user.status.clone(),
            email_verified_at: self.optional_ts(
                "user",
                "email_verified_at",
                user.email_verified_at.as_deref(),
            ),
            phone: user.phone.clone(),
            password_last_updated_at: self.optional_ts(
                "user",
                "password_last_updated_at",
                user.password_last_updated_at.as_deref(),
            ),
            financial_institution_id: to_opt_id(
                "financial_institution",
                user.financial_institution_id,
            )?,
            created_at: self.required_ts("user", "created_at", &user.created_at),
            updated_at: self.required_ts("user", "updated_at", &user.updated_at),
            role: user.role.clone(),
            signature_storage_url: user.signature_storage_url.clone(),
            profile_image_storage_url: user.profile_image_storage_url.clone(),
        })
    }

    fn agent(&mut self, agent: &ExternalAgent, owner: &ExternalUser) -> MapResult<Agent> {
        match agent.user_id.trim().parse::<u64>() {
            Ok(declared) if declared == owner.id => {}
            _ => self.warn(MapWarning::AgentUserMismatch {
                agent_id: agent.id,
                declared: agent.user_id.clone(),
                user_id: owner.id,
            }),
        }

        Ok(Agent {
            id: to_id("agent", agent.id)?,
            user_id: to_id("user", owner.id)?,
            phone1: agent.phone_1.clone(),
            phone2: agent.phone_2.clone(),
            headline1: agent.headline1.clone(),
            headline2: agent.headline2.clone(),
            about: agent.about.clone(),
            is_agreement_signed: agent.is_agreement_signed.clone(),
            agent_type: agent.agent_type.clone(),
            bank_name: agent.bank_name.clone(),
            account_name: agent.account_name.clone(),
            account_number: agent.account_number.clone(),
            account_type: agent.account_type.clone(),
            account_branch: agent.account_branch.clone(),
            linkedin: agent.linkedin.clone(),
            address: agent.address.clone(),
            coverage_area: agent.coverage_area.clone(),
            created_at: self.required_ts("agent", "created_at", &agent.created_at),
            updated_at: self.required_ts("agent", "updated_at", &agent.updated_at),
        })
    }

    fn cover_photo(&mut self, photo: &ExternalCoverPhoto) -> MapResult<CoverPhoto> {
        Ok(CoverPhoto {
            id: to_id("cover_photo", photo.id)?,
            url: photo.url.clone(),
            description: photo.description.clone(),
        })
    }

    fn location(&mut self, location: &ExternalLocation, property_id: EntityId) -> MapResult<Location> {
        Ok(Location {
            id: to_id("location", location.id)?,
            property_id,
            region: location.region.clone(),
            district: location.district.clone(),
            area: location.area.clone(),
            postcode: location.postcode.clone(),
            sub_area: location.sub_area.clone(),
            google_map_link: location.google_map_link.clone(),
            latitude: location.latitude.clone(),
            longitude: location.longitude.clone(),
            zone_category: location.zone_category.clone(),
            zoning: location.zoning.clone(),
            created_at: self.required_ts("location", "created_at", &location.created_at),
            updated_at: self.required_ts("location", "updated_at", &location.updated_at),
        })
    }

    fn property(
        &mut self,
        record: &ExternalProperty,
        agent_id: Option<EntityId>,
        cover_photo_id: Option<EntityId>,
    ) -> MapResult<Property> {
        Ok(Property {
            id: to_id("property", record.id)?,
            valuer_id: to_opt_id("valuer", record.valuer_id)?,
            property_number: record.property_number.clone(),
            parent_valuation: to_opt_id("parent_valuation", record.parent_valuation)?,
            project_id: to_opt_id("project", record.project_id)?,
            owner_name: record.owner_name.clone(),
            property_type: record.property_type.clone(),
            property_design: record.property_design.clone(),
            construction_stage: record.construction_stage.clone(),
            year_built: record.year_built.clone(),
            age: record.age,
            eul: record.eul,
            rel: record.rel,
            measurements: record.measurements.clone(),
            no_rooms: record.no_rooms,
            no_of_bathrooms: record.no_of_bathrooms,
            occupancy: record.occupancy.clone(),
            attributes: parse_attributes(record.id, &record.attributes)?,
            title_deeds_available: record.title_deeds_available.clone(),
            certificate_of_search_available: record.certificate_of_search_available.clone(),
            encumbrances_available: record.encumbrances_available.clone(),
            defects: record.defects.clone(),
            description: record.description.clone(),
            master_bedroom_ensuite: record.master_bedroom_ensuite.clone(),
            building_size: record.building_size,
            building_size_unit: record.bulding_size_unit.clone(),
            land_size: record.land_size,
            land_size_unit: record.land_size_unit.clone(),
            entry_type: record.entry_type.clone(),
            price: record.price,
            listing_type: record.listing_type.clone(),
            created_by: to_opt_id("created_by", record.created_by)?,
            created_at: self.required_ts("property", "created_at", &record.created_at),
            updated_at: self.required_ts("property", "updated_at", &record.updated_at),
            is_approved: record.is_approved.clone(),
            is_submitted: record.is_submitted.clone(),
            is_sale_completed: record.is_sale_completed.clone(),
            has_accepted_offer: record.has_accepted_offer.clone(),
            is_referred: record.is_referred.clone(),
            approved_at: self.optional_ts("property", "approved_at", record.approved_at.as_deref()),
            visibility: record.visibility.clone(),
            views: record.views,
            agent_id,
            cover_photo_id,
        })
    }
}

// =============================================================================
// Coercions
// =============================================================================

fn to_id(entity: &'static str, value: u64) -> MapResult<EntityId> {
    EntityId::try_from(value).map_err(|_| MapError::IdOutOfRange { entity, value })
}

fn to_opt_id(entity: &'static str, value: Option<u64>) -> MapResult<Option<EntityId>> {
    value.map(|v| to_id(entity, v)).transpose()
}

/// Decodes the string-encoded attributes. Empty means `null`.
fn parse_attributes(property_id: u64, raw: &str) -> MapResult<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(raw).map_err(|e| MapError::InvalidAttributes {
        property_id,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 8, 0, 0).unwrap()
    }

    fn record(value: Value) -> ExternalProperty {
        serde_json::from_value(value).unwrap()
    }

    fn full_record() -> ExternalProperty {
        record(json!({
            "id": 101,
            "owner_name": "Grace Phiri",
            "property_type": "Residential",
            "bulding_size_unit": "sqm",
            "building_size": 180,
            "price": 95000000,
            "attributes": "{\"attributes\":[{\"name\":\"Borehole\"}]}",
            "is_approved": "1",
            "created_at": "2025-04-01T11:44:25.000000Z",
            "updated_at": "2025-04-01 12:31:28",
            "approved_at": null,
            "views": 12,
            "agent": {
                "id": 7,
                "user_id": "55",
                "phone_1": "0999000111",
                "phone_2": null,
                "is_agreement_signed": "1",
                "agent_type": "individual",
                "created_at": "2024-12-01 09:00:00",
                "updated_at": "2024-12-01 09:00:00",
                "user": {
                    "id": 55,
                    "name": "Grace Phiri",
                    "email": "grace@example.com",
                    "status": "active",
                    "created_at": "2024-11-30T10:00:00Z",
                    "updated_at": "2024-11-30T10:00:00Z",
                    "role": "agent"
                }
            },
            "location": {
                "id": 900,
                "property_id": 1,
                "region": "Southern",
                "district": "Blantyre",
                "area": "Namiwawa",
                "zone_category": "Residential",
                "zoning": "Low density",
                "created_at": "2025-04-01T11:44:25Z",
                "updated_at": "2025-04-01T11:44:25Z"
            },
            "cover_photo": {"id": 300, "url": "https://cdn/p/101.jpg", "description": "Front"}
        }))
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let rfc = parse_timestamp("2025-04-01T11:44:25.000000Z").unwrap();
        assert_eq!(rfc, Utc.with_ymd_and_hms(2025, 4, 1, 11, 44, 25).unwrap());

        let naive = parse_timestamp("2025-04-01 12:31:28").unwrap();
        assert_eq!(naive, Utc.with_ymd_and_hms(2025, 4, 1, 12, 31, 28).unwrap());

        let offset = parse_timestamp("2025-04-01T14:00:00+02:00").unwrap();
        assert_eq!(offset, Utc.with_ymd_and_hms(2025, 4, 1, 12, 0, 0).unwrap());

        assert!(parse_timestamp("not-a-date").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_full_record_maps_cleanly() {
        let mapped = map_record(&full_record(), now()).unwrap();
        assert!(mapped.warnings.is_empty(), "{:?}", mapped.warnings);

        let user = mapped.user.unwrap();
        let agent = mapped.agent.unwrap();
        assert_eq!(user.id, 55);
        assert_eq!(agent.id, 7);
        assert_eq!(agent.user_id, 55);
        assert_eq!(agent.phone1, "0999000111");
        assert!(agent.phone2.is_none());

        let property = mapped.property;
        assert_eq!(property.id, 101);
        assert_eq!(property.agent_id, Some(7));
        assert_eq!(property.cover_photo_id, Some(300));
        assert_eq!(property.building_size_unit, "sqm");
        assert_eq!(property.building_size, Some(180.0));
        assert_eq!(property.is_approved, "1");
        assert!(property.approved_at.is_none());
        assert_eq!(
            property.attributes,
            json!({"attributes": [{"name": "Borehole"}]})
        );
        assert_eq!(
            property.updated_at,
            Utc.with_ymd_and_hms(2025, 4, 1, 12, 31, 28).unwrap()
        );

        // Location is re-linked to the record it arrived with.
        assert_eq!(mapped.location.unwrap().property_id, 101);
        assert_eq!(mapped.cover_photo.unwrap().url, "https://cdn/p/101.jpg");
    }

    #[test]
    fn test_bad_timestamps_fall_back() {
        let rec = record(json!({
            "id": 5,
            "created_at": "not-a-date",
            "updated_at": "not-a-date",
            "approved_at": "not-a-date"
        }));
        let mapped = map_record(&rec, now()).unwrap();

        assert_eq!(mapped.property.created_at, now());
        assert_eq!(mapped.property.updated_at, now());
        assert!(mapped.property.approved_at.is_none());
        assert_eq!(mapped.warnings.len(), 3);
        assert!(mapped.warnings.contains(&MapWarning::InvalidTimestamp {
            entity: "property",
            field: "approved_at",
            value: "not-a-date".to_string(),
        }));
    }

    #[test]
    fn test_absent_optional_timestamp_is_silent() {
        let rec = record(json!({
            "id": 5,
            "created_at": "2025-04-01 12:31:28",
            "updated_at": "2025-04-01 12:31:28",
            "approved_at": ""
        }));
        let mapped = map_record(&rec, now()).unwrap();
        assert!(mapped.property.approved_at.is_none());
        assert!(mapped.warnings.is_empty());
    }

    #[test]
    fn test_agent_user_mismatch_prefers_nested_user() {
        let mut rec = full_record();
        rec.agent.as_mut().unwrap().user_id = "56".to_string();

        let mapped = map_record(&rec, now()).unwrap();
        assert_eq!(mapped.agent.unwrap().user_id, 55);
        assert_eq!(
            mapped.warnings,
            vec![MapWarning::AgentUserMismatch {
                agent_id: 7,
                declared: "56".to_string(),
                user_id: 55,
            }]
        );
    }

    #[test]
    fn test_agent_user_id_garbage_is_warning() {
        let mut rec = full_record();
        rec.agent.as_mut().unwrap().user_id = "abc".to_string();

        let mapped = map_record(&rec, now()).unwrap();
        assert_eq!(mapped.agent.unwrap().user_id, 55);
        assert_eq!(mapped.warnings.len(), 1);
    }

    #[test]
    fn test_agent_without_user_is_dropped() {
        let mut rec = full_record();
        rec.agent.as_mut().unwrap().user = None;

        let mapped = map_record(&rec, now()).unwrap();
        assert!(mapped.agent.is_none());
        assert!(mapped.user.is_none());
        assert!(mapped.property.agent_id.is_none());
        assert_eq!(
            mapped.warnings,
            vec![MapWarning::AgentWithoutUser { agent_id: 7 }]
        );
    }

    #[test]
    fn test_empty_attributes_map_to_null() {
        let mut rec = full_record();
        rec.attributes = String::new();
        let mapped = map_record(&rec, now()).unwrap();
        assert_eq!(mapped.property.attributes, Value::Null);
    }

    #[test]
    fn test_invalid_attributes_fail_record() {
        let mut rec = full_record();
        rec.attributes = "{broken".to_string();
        let err = map_record(&rec, now()).unwrap_err();
        assert!(matches!(
            err,
            MapError::InvalidAttributes { property_id: 101, .. }
        ));
    }

    #[test]
    fn test_id_out_of_range_fails_record() {
        let rec = record(json!({"id": u64::MAX}));
        let err = map_record(&rec, now()).unwrap_err();
        assert_eq!(
            err,
            MapError::IdOutOfRange {
                entity: "property",
                value: u64::MAX
            }
        );
    }

    #[test]
    fn test_warning_display() {
        let warning = MapWarning::AgentWithoutUser { agent_id: 9 };
        assert_eq!(warning.to_string(), "agent 9 has no nested user and was dropped");
    }
}
