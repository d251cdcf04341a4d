//! # Property Repository
//!
//! Read side of the synced property graph.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  exists(id)              ← "already synced?" check used by the engine   │
//! │  get_by_id(id)           → PropertyDetails (location, agent+user, photo)│
//! │  list(filter, page)      → PropertyPage (newest first)                  │
//! │  get_user / get_agent / get_location / get_cover_photo                  │
//! │  location_for_property(property_id)                                     │
//! │  counts()                → rows per table                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::debug;
use valuations_core::{
    Agent, AgentWithUser, CoverPhoto, EntityId, Location, Property, PropertyDetails, User,
};

use super::columns::{
    select_list, AGENT_COLUMNS, COVER_PHOTO_COLUMNS, LOCATION_COLUMNS, PROPERTY_COLUMNS,
    USER_COLUMNS,
};
use crate::error::{DbError, DbResult};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

// =============================================================================
// Query Types
// =============================================================================

/// Optional listing filters. Every `Some` narrows the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilter {
    /// Case-insensitive substring of the owner name.
    pub owner_name: Option<String>,
    pub property_type: Option<String>,
    pub construction_stage: Option<String>,
    pub listing_type: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Case-insensitive substring of the location district.
    pub district: Option<String>,
    /// Case-insensitive substring of the location area.
    pub area: Option<String>,
    pub agent_id: Option<EntityId>,
}

/// 1-based page request. Out-of-range values are clamped, not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        let page = page.max(1);
        let page_size = match page_size {
            0 => DEFAULT_PAGE_SIZE,
            n => n.min(MAX_PAGE_SIZE),
        };
        PageRequest { page, page_size }
    }

    fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest::new(1, DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyPage {
    pub items: Vec<PropertyDetails>,
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub total_pages: i64,
}

/// Row count per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub users: i64,
    pub agents: i64,
    pub cover_photos: i64,
    pub properties: i64,
    pub locations: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for reading properties and their associations.
#[derive(Debug, Clone)]
pub struct PropertyRepository {
    pool: SqlitePool,
}

impl PropertyRepository {
    /// Creates a new PropertyRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PropertyRepository { pool }
    }

    /// True if a property with this ID is persisted.
    pub async fn exists(&self, id: EntityId) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM properties WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// Loads a property with its location, agent (and user) and cover photo.
    pub async fn get_by_id(&self, id: EntityId) -> DbResult<PropertyDetails> {
        let sql = format!(
            "SELECT {} FROM properties p WHERE p.id = ?1",
            select_list("p", PROPERTY_COLUMNS)
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Property", id))?;

        self.load_details(property_from_row(&row)?).await
    }

    /// Lists properties matching `filter`, newest first.
    pub async fn list(&self, filter: &PropertyFilter, page: PageRequest) -> DbResult<PropertyPage> {
        let mut count = QueryBuilder::<Sqlite>::new(
            "SELECT COUNT(*) FROM properties p LEFT JOIN locations l ON l.property_id = p.id",
        );
        push_filters(&mut count, filter);
        let total_items: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM properties p LEFT JOIN locations l ON l.property_id = p.id",
            select_list("p", PROPERTY_COLUMNS)
        ));
        push_filters(&mut select, filter);
        select.push(" ORDER BY p.created_at DESC, p.id DESC LIMIT ");
        select.push_bind(i64::from(page.page_size));
        select.push(" OFFSET ");
        select.push_bind(page.offset());

        let rows = select.build().fetch_all(&self.pool).await?;

        debug!(total_items, returned = rows.len(), page = page.page, "Listed properties");

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            items.push(self.load_details(property_from_row(row)?).await?);
        }

        let page_size = i64::from(page.page_size);
        Ok(PropertyPage {
            items,
            page: page.page,
            page_size: page.page_size,
            total_items,
            total_pages: (total_items + page_size - 1) / page_size,
        })
    }

    pub async fn get_user(&self, id: EntityId) -> DbResult<User> {
        let sql = format!("SELECT {} FROM users u WHERE u.id = ?1", select_list("u", USER_COLUMNS));
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))?;
        user_from_row(&row)
    }

    pub async fn get_agent(&self, id: EntityId) -> DbResult<Agent> {
        let sql = format!("SELECT {} FROM agents a WHERE a.id = ?1", select_list("a", AGENT_COLUMNS));
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Agent", id))?;
        agent_from_row(&row)
    }

    pub async fn get_location(&self, id: EntityId) -> DbResult<Location> {
        let sql = format!(
            "SELECT {} FROM locations l WHERE l.id = ?1",
            select_list("l", LOCATION_COLUMNS)
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Location", id))?;
        location_from_row(&row)
    }

    /// The location linked to a property, if any.
    pub async fn location_for_property(&self, property_id: EntityId) -> DbResult<Option<Location>> {
        let sql = format!(
            "SELECT {} FROM locations l WHERE l.property_id = ?1",
            select_list("l", LOCATION_COLUMNS)
        );
        let row = sqlx::query(&sql)
            .bind(property_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(location_from_row).transpose()
    }

    pub async fn get_cover_photo(&self, id: EntityId) -> DbResult<CoverPhoto> {
        let sql = format!(
            "SELECT {} FROM cover_photos c WHERE c.id = ?1",
            select_list("c", COVER_PHOTO_COLUMNS)
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("CoverPhoto", id))?;
        cover_photo_from_row(&row)
    }

    /// Row counts for every table in the graph.
    pub async fn counts(&self) -> DbResult<EntityCounts> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users)        AS users,
                (SELECT COUNT(*) FROM agents)       AS agents,
                (SELECT COUNT(*) FROM cover_photos) AS cover_photos,
                (SELECT COUNT(*) FROM properties)   AS properties,
                (SELECT COUNT(*) FROM locations)    AS locations
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(EntityCounts {
            users: row.try_get("users")?,
            agents: row.try_get("agents")?,
            cover_photos: row.try_get("cover_photos")?,
            properties: row.try_get("properties")?,
            locations: row.try_get("locations")?,
        })
    }

    async fn load_details(&self, property: Property) -> DbResult<PropertyDetails> {
        let location = self.location_for_property(property.id).await?;

        let agent = match property.agent_id {
            Some(agent_id) => {
                let agent = self.get_agent(agent_id).await?;
                let user = self.get_user(agent.user_id).await?;
                Some(AgentWithUser { agent, user })
            }
            None => None,
        };

        let cover_photo = match property.cover_photo_id {
            Some(photo_id) => Some(self.get_cover_photo(photo_id).await?),
            None => None,
        };

        Ok(PropertyDetails {
            property,
            location,
            agent,
            cover_photo,
        })
    }
}

// =============================================================================
// Filters
// =============================================================================

fn push_filters(query: &mut QueryBuilder<'_, Sqlite>, filter: &PropertyFilter) {
    query.push(" WHERE 1 = 1");

    if let Some(owner) = &filter.owner_name {
        query.push(" AND p.owner_name LIKE ");
        query.push_bind(contains_pattern(owner));
        query.push(" ESCAPE '\\'");
    }
    if let Some(property_type) = &filter.property_type {
        query.push(" AND p.property_type = ");
        query.push_bind(property_type.clone());
    }
    if let Some(stage) = &filter.construction_stage {
        query.push(" AND p.construction_stage = ");
        query.push_bind(stage.clone());
    }
    if let Some(listing_type) = &filter.listing_type {
        query.push(" AND p.listing_type = ");
        query.push_bind(listing_type.clone());
    }
    if let Some(min) = filter.min_price {
        query.push(" AND p.price >= ");
        query.push_bind(min);
    }
    if let Some(max) = filter.max_price {
        query.push(" AND p.price <= ");
        query.push_bind(max);
    }
    if let Some(agent_id) = filter.agent_id {
        query.push(" AND p.agent_id = ");
        query.push_bind(agent_id);
    }
    if let Some(district) = &filter.district {
        query.push(" AND l.district LIKE ");
        query.push_bind(contains_pattern(district));
        query.push(" ESCAPE '\\'");
    }
    if let Some(area) = &filter.area {
        query.push(" AND l.area LIKE ");
        query.push_bind(contains_pattern(area));
        query.push(" ESCAPE '\\'");
    }
}

/// `LIKE` pattern matching `needle` anywhere, with its own wildcards taken
/// literally. Pair with `ESCAPE '\'`.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// =============================================================================
// Row Mapping
// =============================================================================

fn property_from_row(row: &SqliteRow) -> DbResult<Property> {
    let attributes: Option<String> = row.try_get("attributes")?;
    let attributes = match attributes {
        Some(text) => serde_json::from_str(&text).map_err(|e| DbError::Decode {
            column: "attributes".to_string(),
            message: e.to_string(),
        })?,
        None => serde_json::Value::Null,
    };

    Ok(Property {
        id: row.try_get("id")?,
        valuer_id: row.try_get("valuer_id")?,
        property_number: row.try_get("property_number")?,
        parent_valuation: row.try_get("parent_valuation")?,
        project_id: row.try_get("project_id")?,
        owner_name: row.try_get("owner_name")?,
        property_type: row.try_get("property_type")?,
        property_design: row.try_get("property_design")?,
        construction_stage: row.try_get("construction_stage")?,
        year_built: row.try_get("year_built")?,
        age: row.try_get("age")?,
        eul: row.try_get("eul")?,
        rel: row.try_get("rel")?,
        measurements: row.try_get("measurements")?,
        no_rooms: row.try_get("no_rooms")?,
        no_of_bathrooms: row.try_get("no_of_bathrooms")?,
        occupancy: row.try_get("occupancy")?,
        attributes,
        title_deeds_available: row.try_get("title_deeds_available")?,
        certificate_of_search_available: row.try_get("certificate_of_search_available")?,
        encumbrances_available: row.try_get("encumbrances_available")?,
        defects: row.try_get("defects")?,
        description: row.try_get("description")?,
        master_bedroom_ensuite: row.try_get("master_bedroom_ensuite")?,
        building_size: row.try_get("building_size")?,
        building_size_unit: row.try_get("building_size_unit")?,
        land_size: row.try_get("land_size")?,
        land_size_unit: row.try_get("land_size_unit")?,
        entry_type: row.try_get("entry_type")?,
        price: row.try_get("price")?,
        listing_type: row.try_get("listing_type")?,
        created_by: row.try_get("created_by")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        is_approved: row.try_get("is_approved")?,
        is_submitted: row.try_get("is_submitted")?,
        is_sale_completed: row.try_get("is_sale_completed")?,
        has_accepted_offer: row.try_get("has_accepted_offer")?,
        is_referred: row.try_get("is_referred")?,
        approved_at: row.try_get("approved_at")?,
        visibility: row.try_get("visibility")?,
        views: row.try_get("views")?,
        agent_id: row.try_get("agent_id")?,
        cover_photo_id: row.try_get("cover_photo_id")?,
    })
}

fn user_from_row(row: &SqliteRow) -> DbResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        status: row.try_get("status")?,
        email_verified_at: row.try_get("email_verified_at")?,
        phone: row.try_get("phone")?,
        password_last_updated_at: row.try_get("password_last_updated_at")?,
        financial_institution_id: row.try_get("financial_institution_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        role: row.try_get("role")?,
        signature_storage_url: row.try_get("signature_storage_url")?,
        profile_image_storage_url: row.try_get("profile_image_storage_url")?,
    })
}

fn agent_from_row(row: &SqliteRow) -> DbResult<Agent> {
    Ok(Agent {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        phone1: row.try_get("phone1")?,
        phone2: row.try_get("phone2")?,
        headline1: row.try_get("headline1")?,
        headline2: row.try_get("headline2")?,
        about: row.try_get("about")?,
        is_agreement_signed: row.try_get("is_agreement_signed")?,
        agent_type: row.try_get("agent_type")?,
        bank_name: row.try_get("bank_name")?,
        account_name: row.try_get("account_name")?,
        account_number: row.try_get("account_number")?,
        account_type: row.try_get("account_type")?,
        account_branch: row.try_get("account_branch")?,
        linkedin: row.try_get("linkedin")?,
        address: row.try_get("address")?,
        coverage_area: row.try_get("coverage_area")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn location_from_row(row: &SqliteRow) -> DbResult<Location> {
    Ok(Location {
        id: row.try_get("id")?,
        property_id: row.try_get("property_id")?,
        region: row.try_get("region")?,
        district: row.try_get("district")?,
        area: row.try_get("area")?,
        postcode: row.try_get("postcode")?,
        sub_area: row.try_get("sub_area")?,
        google_map_link: row.try_get("google_map_link")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        zone_category: row.try_get("zone_category")?,
        zoning: row.try_get("zoning")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn cover_photo_from_row(row: &SqliteRow) -> DbResult<CoverPhoto> {
    Ok(CoverPhoto {
        id: row.try_get("id")?,
        url: row.try_get("url")?,
        description: row.try_get("description")?,
    })
}
