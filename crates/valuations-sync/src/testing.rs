//! External record builders shared by the unit tests.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use valuations_core::wire::PageMeta;
use valuations_core::{ExternalProperty, PropertiesPage};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 8, 0, 0).unwrap()
}

/// A property with a cover photo (`id * 1000`, saturating) and, when given, an agent
/// `(agent_id, user_id, email)` nesting its user.
pub fn external(id: u64, agent: Option<(u64, u64, &str)>) -> ExternalProperty {
    let agent = agent.map(|(agent_id, user_id, email)| {
        json!({
            "id": agent_id,
            "user_id": user_id.to_string(),
            "phone_1": "0999000111",
            "is_agreement_signed": "1",
            "agent_type": "individual",
            "created_at": "2024-12-01 09:00:00",
            "updated_at": "2024-12-01 09:00:00",
            "user": {
                "id": user_id,
                "name": format!("User {user_id}"),
                "email": email,
                "status": "active",
                "created_at": "2024-11-30T10:00:00Z",
                "updated_at": "2024-11-30T10:00:00Z",
                "role": "agent"
            }
        })
    });

    serde_json::from_value(json!({
        "id": id,
        "owner_name": format!("Owner {id}"),
        "property_type": "Residential",
        "bulding_size_unit": "sqm",
        "price": 95000000,
        "listing_type": "sale",
        "attributes": "{\"attributes\":[]}",
        "created_at": "2025-04-01T11:44:25.000000Z",
        "updated_at": "2025-04-01 12:31:28",
        "agent": agent,
        "cover_photo": {"id": id.saturating_mul(1000), "url": format!("https://cdn/p/{id}.jpg"), "description": "Front"}
    }))
    .unwrap()
}

/// Adds a location with the given ID and a stale `property_id`.
pub fn with_location(mut record: ExternalProperty, location_id: u64) -> ExternalProperty {
    record.location = Some(
        serde_json::from_value(json!({
            "id": location_id,
            "property_id": 1,
            "region": "Southern",
            "district": "Blantyre",
            "area": "Namiwawa",
            "zone_category": "Residential",
            "zoning": "Low density",
            "created_at": "2025-04-01T11:44:25Z",
            "updated_at": "2025-04-01T11:44:25Z"
        }))
        .unwrap(),
    );
    record
}

pub fn page(records: Vec<ExternalProperty>, total: i64, next: Option<&str>) -> PropertiesPage {
    PropertiesPage {
        data: records,
        meta: PageMeta {
            total,
            next_page_url: next.map(str::to_string),
            ..Default::default()
        },
    }
}
