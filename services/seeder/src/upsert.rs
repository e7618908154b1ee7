//! Idempotent upserts against the document store

use common::{
    error::StoreResult,
    store::{DocumentStore, SetOptions},
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

use crate::{
    error::SeedError,
    models::{Collection, RoomStatus},
    seed::{SeedPlan, SeedRecord},
};

/// How an upsert treats an existing document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Write only when no document exists at the key
    CreateIfAbsent,
    /// Always write, merging fields into any existing document
    Merge,
}

/// What an upsert did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Skipped,
    Merged,
}

/// Per-collection outcome counts of a seeding run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub created: BTreeMap<Collection, usize>,
    pub skipped: BTreeMap<Collection, usize>,
}

impl SeedReport {
    pub fn record(&mut self, collection: Collection, outcome: UpsertOutcome) {
        let counts = match outcome {
            UpsertOutcome::Created | UpsertOutcome::Merged => &mut self.created,
            UpsertOutcome::Skipped => &mut self.skipped,
        };
        *counts.entry(collection).or_insert(0) += 1;
    }

    pub fn total_created(&self) -> usize {
        self.created.values().sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }
}

impl fmt::Display for SeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for collection in Collection::ALL {
            let created = self.created.get(&collection).copied().unwrap_or(0);
            let skipped = self.skipped.get(&collection).copied().unwrap_or(0);
            if created + skipped == 0 {
                continue;
            }
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{}: {} created/{} skipped", collection, created, skipped)?;
        }
        Ok(())
    }
}

/// Writes records through a document store without clobbering existing ones
pub struct Upserter<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> Upserter<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Upsert a single document
    pub async fn upsert(
        &self,
        collection: Collection,
        id: &str,
        document: &Value,
        mode: WriteMode,
    ) -> StoreResult<UpsertOutcome> {
        match mode {
            WriteMode::CreateIfAbsent => {
                if self.store.get(collection.as_str(), id).await?.is_some() {
                    debug!("{}/{} already exists, skipping", collection, id);
                    return Ok(UpsertOutcome::Skipped);
                }

                self.store
                    .set(collection.as_str(), id, document, SetOptions::replace())
                    .await?;
                debug!("Created {}/{}", collection, id);
                Ok(UpsertOutcome::Created)
            }
            WriteMode::Merge => {
                self.store
                    .set(collection.as_str(), id, document, SetOptions::merge())
                    .await?;
                debug!("Merged {}/{}", collection, id);
                Ok(UpsertOutcome::Merged)
            }
        }
    }

    /// Whether the stored room exists and is in progress
    async fn room_in_progress(&self, room_id: &str) -> StoreResult<bool> {
        let status = self
            .store
            .get(Collection::Rooms.as_str(), room_id)
            .await?
            .and_then(|room| room.get("status").cloned())
            .and_then(|status| serde_json::from_value::<RoomStatus>(status).ok());

        Ok(status == Some(RoomStatus::InProgress))
    }

    /// Write every record of the plan in order, stopping at the first
    /// store failure. Records written before the failure stay in place.
    ///
    /// A game session is only written while its stored room is in progress,
    /// so a room that moved on keeps no session.
    pub async fn apply(&self, plan: &SeedPlan) -> Result<SeedReport, SeedError> {
        let mut report = SeedReport::default();

        for record in plan.records() {
            if let SeedRecord::GameSession(session) = record {
                if !self.room_in_progress(&session.room_id).await? {
                    warn!(
                        "Room {} is not in progress, not seeding session {}",
                        session.room_id, session.id
                    );
                    report.record(record.collection(), UpsertOutcome::Skipped);
                    continue;
                }
            }

            let document = record.to_document().map_err(common::error::StoreError::from)?;
            let outcome = self
                .upsert(
                    record.collection(),
                    record.id(),
                    &document,
                    WriteMode::CreateIfAbsent,
                )
                .await?;
            report.record(record.collection(), outcome);
        }

        Ok(report)
    }
}
