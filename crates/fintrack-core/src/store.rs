//! Owner-scoped record storage.
//!
//! Calculators never touch storage; callers load a record through a
//! [`RecordStore`], compute, and hand the result back to their transport.
//! Every operation takes the owner's id, and records belonging to another
//! owner behave exactly like missing ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::error::FinTrackError;
use crate::types::UserId;
use crate::FinTrackResult;

/// A record together with its id, owner and insertion time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stored<T> {
    pub id: u64,
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
    pub record: T,
}

/// Storage for one record type.
pub trait RecordStore<T>: Send + Sync {
    fn insert(&self, owner: UserId, record: T) -> FinTrackResult<Stored<T>>;
    /// All records of `owner`, newest first.
    fn list(&self, owner: UserId) -> FinTrackResult<Vec<Stored<T>>>;
    fn get(&self, owner: UserId, id: u64) -> FinTrackResult<Stored<T>>;
    fn update(&self, owner: UserId, id: u64, record: T) -> FinTrackResult<Stored<T>>;
    fn delete(&self, owner: UserId, id: u64) -> FinTrackResult<()>;
}

/// Process-local [`RecordStore`]. Ids are unique across owners.
pub struct InMemoryStore<T> {
    kind: &'static str,
    next_id: AtomicU64,
    records: RwLock<BTreeMap<u64, Stored<T>>>,
}

impl<T> InMemoryStore<T> {
    /// `kind` names the record type in `NotFound` errors and logs.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            next_id: AtomicU64::new(1),
            records: RwLock::new(BTreeMap::new()),
        }
    }

    fn not_found(&self, id: u64) -> FinTrackError {
        FinTrackError::NotFound {
            kind: self.kind.to_string(),
            id,
        }
    }
}

fn poisoned<E>(_: E) -> FinTrackError {
    FinTrackError::Storage("record store lock poisoned".into())
}

impl<T> RecordStore<T> for InMemoryStore<T>
where
    T: Clone + Send + Sync,
{
    fn insert(&self, owner: UserId, record: T) -> FinTrackResult<Stored<T>> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let stored = Stored {
            id,
            owner,
            created_at: Utc::now(),
            record,
        };
        self.records
            .write()
            .map_err(poisoned)?
            .insert(id, stored.clone());
        tracing::info!(kind = self.kind, id, owner, "record inserted");
        Ok(stored)
    }

    fn list(&self, owner: UserId) -> FinTrackResult<Vec<Stored<T>>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records
            .values()
            .rev()
            .filter(|s| s.owner == owner)
            .cloned()
            .collect())
    }

    fn get(&self, owner: UserId, id: u64) -> FinTrackResult<Stored<T>> {
        let records = self.records.read().map_err(poisoned)?;
        records
            .get(&id)
            .filter(|s| s.owner == owner)
            .cloned()
            .ok_or_else(|| self.not_found(id))
    }

    fn update(&self, owner: UserId, id: u64, record: T) -> FinTrackResult<Stored<T>> {
        let mut records = self.records.write().map_err(poisoned)?;
        match records.get_mut(&id) {
            Some(stored) if stored.owner == owner => {
                stored.record = record;
                tracing::info!(kind = self.kind, id, owner, "record updated");
                Ok(stored.clone())
            }
            _ => Err(self.not_found(id)),
        }
    }

    fn delete(&self, owner: UserId, id: u64) -> FinTrackResult<()> {
        let mut records = self.records.write().map_err(poisoned)?;
        match records.get(&id) {
            Some(stored) if stored.owner == owner => {
                records.remove(&id);
                tracing::info!(kind = self.kind, id, owner, "record deleted");
                Ok(())
            }
            _ => Err(self.not_found(id)),
        }
    }
}
