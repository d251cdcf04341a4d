//! # Reconciler
//!
//! Brings one external record into the store, or decides it is already there.
//!
//! ## Record States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Unchecked ──exists?──► yes ──► Skipped                                │
//! │       │                                                                 │
//! │       no                                                                │
//! │       ▼                                                                 │
//! │   map_record (pure, before any transaction)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │   InProgress  BEGIN                                                     │
//! │       ├── user        (only with an agent that nests one)               │
//! │       ├── agent                                                         │
//! │       ├── cover photo                                                   │
//! │       ├── property    insert-only                                       │
//! │       └── location    linked to the new property                        │
//! │       │                                                                 │
//! │       ├── COMMIT ok ──────────────────────────────► Committed           │
//! │       └── any error ── ROLLBACK ──────────────────► Failed(error)       │
//! │                                                                         │
//! │   A failed existence check or mapping error is also Failed.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Errors never leave this module as `Err`; they come back inside
//! [`RecordOutcome::Failed`] so the run can carry on with the next record.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use valuations_core::{map_record, EntityId, ExternalProperty, MappedRecord};
use valuations_db::{Database, SyncTransaction};

use crate::error::{SyncError, SyncResult};

/// Terminal state of one record.
#[derive(Debug)]
pub enum RecordOutcome {
    /// A property with this ID is already persisted.
    Skipped,
    /// The whole subgraph was written in one transaction.
    Committed,
    /// Nothing from this record was written.
    Failed(SyncError),
}

/// Per-record upsert driver over a [`Database`].
#[derive(Clone)]
pub struct Reconciler {
    db: Database,
}

impl Reconciler {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Reconciles one record. `now` substitutes for unparseable timestamps.
    pub async fn reconcile(&self, record: &ExternalProperty, now: DateTime<Utc>) -> RecordOutcome {
        let property_id = record.id;
        debug!(property_id, "Checking property");

        // An ID too large for the store cannot exist there; mapping rejects it.
        if let Ok(id) = EntityId::try_from(property_id) {
            match self.db.properties().exists(id).await {
                Ok(true) => {
                    debug!(property_id, "Property already synced, skipping");
                    return RecordOutcome::Skipped;
                }
                Ok(false) => {}
                Err(e) => return RecordOutcome::Failed(e.into()),
            }
        }

        let mapped = match map_record(record, now) {
            Ok(mapped) => mapped,
            Err(e) => return RecordOutcome::Failed(e.into()),
        };

        for warning in &mapped.warnings {
            warn!(property_id, %warning, "Mapping warning");
        }

        let mut tx = match self.db.begin_sync().await {
            Ok(tx) => tx,
            Err(e) => return RecordOutcome::Failed(e.into()),
        };
        debug!(property_id, "Transaction open");

        match write_graph(&mut tx, &mapped).await {
            Ok(()) => match tx.commit().await {
                Ok(()) => {
                    debug!(property_id, "Committed");
                    RecordOutcome::Committed
                }
                Err(e) => RecordOutcome::Failed(e.into()),
            },
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(property_id, error = %rollback_err, "Rollback failed");
                }
                debug!(property_id, "Rolled back");
                RecordOutcome::Failed(e)
            }
        }
    }
}

async fn write_graph(tx: &mut SyncTransaction, mapped: &MappedRecord) -> SyncResult<()> {
    if let (Some(user), Some(agent)) = (&mapped.user, &mapped.agent) {
        tx.upsert_user(user).await?;
        tx.upsert_agent(agent).await?;
    }

    if let Some(photo) = &mapped.cover_photo {
        tx.upsert_cover_photo(photo).await?;
    }

    tx.insert_property(&mapped.property).await?;

    if let Some(location) = &mapped.location {
        tx.upsert_location(mapped.property.id, location).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{external, now, with_location};
    use valuations_core::MapError;
    use valuations_db::{DbConfig, DbError};

    async fn reconciler() -> (Reconciler, Database) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        (Reconciler::new(db.clone()), db)
    }

    #[tokio::test]
    async fn test_new_record_commits_whole_graph() {
        let (reconciler, db) = reconciler().await;
        let record = with_location(external(10, Some((7, 55, "a@example.com"))), 900);

        let outcome = reconciler.reconcile(&record, now()).await;
        assert!(matches!(outcome, RecordOutcome::Committed), "{outcome:?}");

        let details = db.properties().get_by_id(10).await.unwrap();
        let agent = details.agent.unwrap();
        assert_eq!(agent.agent.id, 7);
        assert_eq!(agent.user.id, 55);
        assert_eq!(details.location.unwrap().property_id, 10);
        assert_eq!(details.cover_photo.unwrap().id, 10_000);
    }

    #[tokio::test]
    async fn test_existing_property_is_skipped() {
        let (reconciler, db) = reconciler().await;
        let record = external(10, None);

        assert!(matches!(
            reconciler.reconcile(&record, now()).await,
            RecordOutcome::Committed
        ));
        assert!(matches!(
            reconciler.reconcile(&record, now()).await,
            RecordOutcome::Skipped
        ));
        assert_eq!(db.properties().counts().await.unwrap().properties, 1);
    }

    #[tokio::test]
    async fn test_mapping_error_fails_without_writes() {
        let (reconciler, db) = reconciler().await;
        let mut record = external(10, Some((7, 55, "a@example.com")));
        record.attributes = "{not json".to_string();

        match reconciler.reconcile(&record, now()).await {
            RecordOutcome::Failed(SyncError::Mapping(MapError::InvalidAttributes {
                property_id,
                ..
            })) => assert_eq!(property_id, 10),
            other => panic!("expected mapping failure, got {other:?}"),
        }

        let counts = db.properties().counts().await.unwrap();
        assert_eq!(counts.users, 0);
        assert_eq!(counts.properties, 0);
    }

    #[tokio::test]
    async fn test_out_of_range_id_fails() {
        let (reconciler, _db) = reconciler().await;
        let record = external(u64::MAX, None);

        assert!(matches!(
            reconciler.reconcile(&record, now()).await,
            RecordOutcome::Failed(SyncError::Mapping(MapError::IdOutOfRange { .. }))
        ));
    }

    #[tokio::test]
    async fn test_constraint_failure_rolls_back_user_and_agent() {
        let (reconciler, db) = reconciler().await;
        assert!(matches!(
            reconciler
                .reconcile(&external(10, Some((7, 55, "taken@example.com"))), now())
                .await,
            RecordOutcome::Committed
        ));

        // Different user, same email: the user upsert violates the unique index.
        let clash = external(11, Some((8, 56, "taken@example.com")));
        match reconciler.reconcile(&clash, now()).await {
            RecordOutcome::Failed(SyncError::Database(DbError::UniqueViolation { field })) => {
                assert_eq!(field, "users.email")
            }
            other => panic!("expected unique violation, got {other:?}"),
        }

        let repo = db.properties();
        assert!(!repo.exists(11).await.unwrap());
        assert!(repo.get_user(56).await.is_err());
        assert!(repo.get_agent(8).await.is_err());
    }
}
