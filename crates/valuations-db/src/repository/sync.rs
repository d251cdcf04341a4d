//! # Sync Transaction
//!
//! One transaction per external record, holding every upsert for its graph.
//!
//! ## Write Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Per-Record Transaction                               │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ├── 1. upsert_user         ON CONFLICT (id) → USER_UPDATE_COLUMNS    │
//! │    ├── 2. upsert_agent        ON CONFLICT (id) → AGENT_UPDATE_COLUMNS   │
//! │    │        (user row already written, FK satisfied)                    │
//! │    ├── 3. upsert_cover_photo  ON CONFLICT (id) → url, description       │
//! │    ├── 4. insert_property     plain INSERT, never updated               │
//! │    └── 5. upsert_location     property_id forced to the new property    │
//! │    │                                                                    │
//! │  COMMIT  ← all five or nothing                                          │
//! │                                                                         │
//! │  Any error: the caller drops the handle or calls rollback().            │
//! │  sqlx rolls back an uncommitted transaction on drop.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The order above is the caller's responsibility; this type only exposes
//! the statements. The sync reconciler drives it.

use sqlx::{Sqlite, Transaction};
use tracing::debug;
use valuations_core::{Agent, CoverPhoto, EntityId, Location, Property, User};

use super::columns::{
    insert_sql, upsert_sql, AGENT_COLUMNS, AGENT_UPDATE_COLUMNS, COVER_PHOTO_COLUMNS,
    COVER_PHOTO_UPDATE_COLUMNS, LOCATION_COLUMNS, LOCATION_UPDATE_COLUMNS, PROPERTY_COLUMNS,
    USER_COLUMNS, USER_UPDATE_COLUMNS,
};
use crate::error::{DbError, DbResult};

/// Write handle for one record's subgraph.
///
/// Obtained from [`crate::Database::begin_sync`].
pub struct SyncTransaction {
    tx: Transaction<'static, Sqlite>,
}

impl SyncTransaction {
    pub(crate) fn new(tx: Transaction<'static, Sqlite>) -> Self {
        SyncTransaction { tx }
    }

    /// Inserts the user or overwrites its mutable columns.
    pub async fn upsert_user(&mut self, user: &User) -> DbResult<()> {
        debug!(user_id = user.id, "Upserting user");

        sqlx::query(&upsert_sql("users", USER_COLUMNS, USER_UPDATE_COLUMNS))
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.status)
            .bind(user.email_verified_at)
            .bind(&user.phone)
            .bind(user.password_last_updated_at)
            .bind(user.financial_institution_id)
            .bind(user.created_at)
            .bind(user.updated_at)
            .bind(&user.role)
            .bind(&user.signature_storage_url)
            .bind(&user.profile_image_storage_url)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    /// Inserts the agent or overwrites its mutable columns.
    ///
    /// The owning user must already be written in this transaction.
    pub async fn upsert_agent(&mut self, agent: &Agent) -> DbResult<()> {
        debug!(agent_id = agent.id, user_id = agent.user_id, "Upserting agent");

        sqlx::query(&upsert_sql("agents", AGENT_COLUMNS, AGENT_UPDATE_COLUMNS))
            .bind(agent.id)
            .bind(agent.user_id)
            .bind(&agent.phone1)
            .bind(&agent.phone2)
            .bind(&agent.headline1)
            .bind(&agent.headline2)
            .bind(&agent.about)
            .bind(&agent.is_agreement_signed)
            .bind(&agent.agent_type)
            .bind(&agent.bank_name)
            .bind(&agent.account_name)
            .bind(&agent.account_number)
            .bind(&agent.account_type)
            .bind(&agent.account_branch)
            .bind(&agent.linkedin)
            .bind(&agent.address)
            .bind(&agent.coverage_area)
            .bind(agent.created_at)
            .bind(agent.updated_at)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    pub async fn upsert_cover_photo(&mut self, photo: &CoverPhoto) -> DbResult<()> {
        debug!(cover_photo_id = photo.id, "Upserting cover photo");

        sqlx::query(&upsert_sql(
            "cover_photos",
            COVER_PHOTO_COLUMNS,
            COVER_PHOTO_UPDATE_COLUMNS,
        ))
        .bind(photo.id)
        .bind(&photo.url)
        .bind(&photo.description)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    /// Inserts a new property row. Fails if the ID is already taken.
    pub async fn insert_property(&mut self, property: &Property) -> DbResult<()> {
        debug!(property_id = property.id, "Inserting property");

        let attributes = attributes_text(property)?;

        sqlx::query(&insert_sql("properties", PROPERTY_COLUMNS))
            .bind(property.id)
            .bind(property.valuer_id)
            .bind(&property.property_number)
            .bind(property.parent_valuation)
            .bind(property.project_id)
            .bind(&property.owner_name)
            .bind(&property.property_type)
            .bind(&property.property_design)
            .bind(&property.construction_stage)
            .bind(&property.year_built)
            .bind(property.age)
            .bind(property.eul)
            .bind(property.rel)
            .bind(&property.measurements)
            .bind(property.no_rooms)
            .bind(property.no_of_bathrooms)
            .bind(&property.occupancy)
            .bind(attributes)
            .bind(&property.title_deeds_available)
            .bind(&property.certificate_of_search_available)
            .bind(&property.encumbrances_available)
            .bind(&property.defects)
            .bind(&property.description)
            .bind(&property.master_bedroom_ensuite)
            .bind(property.building_size)
            .bind(&property.building_size_unit)
            .bind(property.land_size)
            .bind(&property.land_size_unit)
            .bind(&property.entry_type)
            .bind(property.price)
            .bind(&property.listing_type)
            .bind(property.created_by)
            .bind(property.created_at)
            .bind(property.updated_at)
            .bind(&property.is_approved)
            .bind(&property.is_submitted)
            .bind(&property.is_sale_completed)
            .bind(&property.has_accepted_offer)
            .bind(&property.is_referred)
            .bind(property.approved_at)
            .bind(&property.visibility)
            .bind(property.views)
            .bind(property.agent_id)
            .bind(property.cover_photo_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    /// Inserts the location or overwrites its mutable columns.
    ///
    /// `property_id` is written from the argument, not from `location`.
    pub async fn upsert_location(
        &mut self,
        property_id: EntityId,
        location: &Location,
    ) -> DbResult<()> {
        debug!(location_id = location.id, property_id, "Upserting location");

        sqlx::query(&upsert_sql(
            "locations",
            LOCATION_COLUMNS,
            LOCATION_UPDATE_COLUMNS,
        ))
        .bind(location.id)
        .bind(property_id)
        .bind(&location.region)
        .bind(&location.district)
        .bind(&location.area)
        .bind(&location.postcode)
        .bind(&location.sub_area)
        .bind(&location.google_map_link)
        .bind(&location.latitude)
        .bind(&location.longitude)
        .bind(&location.zone_category)
        .bind(&location.zoning)
        .bind(location.created_at)
        .bind(location.updated_at)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    /// Commits every statement issued through this handle.
    pub async fn commit(self) -> DbResult<()> {
        self.tx.commit().await.map_err(DbError::transaction)
    }

    /// Discards every statement issued through this handle.
    pub async fn rollback(self) -> DbResult<()> {
        self.tx.rollback().await.map_err(DbError::transaction)
    }
}

/// `Null` is stored as SQL NULL, everything else as JSON text.
fn attributes_text(property: &Property) -> DbResult<Option<String>> {
    if property.attributes.is_null() {
        return Ok(None);
    }
    serde_json::to_string(&property.attributes)
        .map(Some)
        .map_err(|e| DbError::Internal(format!("attributes encode: {e}")))
}
