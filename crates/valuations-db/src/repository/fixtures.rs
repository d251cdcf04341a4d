//! Canonical entity builders for database tests.

use chrono::{DateTime, TimeZone, Utc};
use valuations_core::{Agent, CoverPhoto, EntityId, Location, Property, User};

pub fn ts() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 1, 11, 44, 25).unwrap()
}

pub fn user(id: EntityId, email: &str) -> User {
    User {
        id,
        name: format!("User {id}"),
        email: email.to_string(),
        status: "active".to_string(),
        email_verified_at: None,
        phone: "0999000000".to_string(),
        password_last_updated_at: None,
        financial_institution_id: None,
        created_at: ts(),
        updated_at: ts(),
        role: "agent".to_string(),
        signature_storage_url: None,
        profile_image_storage_url: None,
    }
}

pub fn agent(id: EntityId, user_id: EntityId) -> Agent {
    Agent {
        id,
        user_id,
        phone1: "0888000000".to_string(),
        phone2: None,
        headline1: Some("Residential specialist".to_string()),
        headline2: None,
        about: None,
        is_agreement_signed: "1".to_string(),
        agent_type: "individual".to_string(),
        bank_name: None,
        account_name: None,
        account_number: None,
        account_type: None,
        account_branch: None,
        linkedin: None,
        address: None,
        coverage_area: Some("Central".to_string()),
        created_at: ts(),
        updated_at: ts(),
    }
}

pub fn cover_photo(id: EntityId) -> CoverPhoto {
    CoverPhoto {
        id,
        url: format!("https://cdn.example.com/{id}.jpg"),
        description: "Front view".to_string(),
    }
}

pub fn location(id: EntityId, property_id: EntityId) -> Location {
    Location {
        id,
        property_id,
        region: "Central".to_string(),
        district: "Dedza".to_string(),
        area: "Boma".to_string(),
        postcode: None,
        sub_area: None,
        google_map_link: None,
        latitude: Some("-14.37".to_string()),
        longitude: Some("34.33".to_string()),
        zone_category: "Residential".to_string(),
        zoning: "Medium density".to_string(),
        created_at: ts(),
        updated_at: ts(),
    }
}

pub fn property(
    id: EntityId,
    agent_id: Option<EntityId>,
    cover_photo_id: Option<EntityId>,
) -> Property {
    Property {
        id,
        valuer_id: None,
        property_number: Some(format!("P-{id}")),
        parent_valuation: None,
        project_id: None,
        owner_name: "Owner".to_string(),
        property_type: Some("Residential".to_string()),
        property_design: "Bungalow".to_string(),
        construction_stage: "Complete".to_string(),
        year_built: Some("2010".to_string()),
        age: Some(15),
        eul: Some(60),
        rel: Some(45),
        measurements: String::new(),
        no_rooms: Some(3),
        no_of_bathrooms: Some(2),
        occupancy: None,
        attributes: serde_json::Value::Null,
        title_deeds_available: "1".to_string(),
        certificate_of_search_available: None,
        encumbrances_available: None,
        defects: None,
        description: String::new(),
        master_bedroom_ensuite: "0".to_string(),
        building_size: Some(120.0),
        building_size_unit: "sqm".to_string(),
        land_size: None,
        land_size_unit: String::new(),
        entry_type: "sync".to_string(),
        price: None,
        listing_type: "sale".to_string(),
        created_by: None,
        created_at: ts(),
        updated_at: ts(),
        is_approved: "0".to_string(),
        is_submitted: "0".to_string(),
        is_sale_completed: "0".to_string(),
        has_accepted_offer: "0".to_string(),
        is_referred: "0".to_string(),
        approved_at: None,
        visibility: "public".to_string(),
        views: 0,
        agent_id,
        cover_photo_id,
    }
}
