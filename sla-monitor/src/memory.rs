//! In-memory store and sink implementations
//!
//! Used for tests and local wiring. The store supports injected update
//! failures and an artificial fetch latency so failure isolation and the
//! single-flight guard can be exercised deterministically.

use crate::error::{Error, Result};
use crate::sink::{AuditRecord, AuditSink, NotificationSink};
use crate::store::{RequestStore, SlaFieldUpdate};
use async_trait::async_trait;
use parking_lot::RwLock;
use sla_core::{RequestSnapshot, SlaEvent};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use uuid::Uuid;

/// In-memory [`RequestStore`]
#[derive(Default)]
pub struct MemoryRequestStore {
    requests: RwLock<HashMap<Uuid, RequestSnapshot>>,
    fail_updates: RwLock<HashSet<Uuid>>,
    fail_fetch: RwLock<bool>,
    fetch_latency: RwLock<Option<Duration>>,
}

impl MemoryRequestStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a request record
    pub fn insert(&self, snapshot: RequestSnapshot) {
        self.requests.write().insert(snapshot.id, snapshot);
    }

    /// Read a record back (test inspection)
    pub fn get(&self, id: Uuid) -> Option<RequestSnapshot> {
        self.requests.read().get(&id).cloned()
    }

    /// Make every `update_sla_fields` call for `id` fail
    pub fn fail_updates_for(&self, id: Uuid) {
        self.fail_updates.write().insert(id);
    }

    /// Make the next fetches fail wholesale (tick-abort path)
    pub fn set_fetch_failure(&self, fail: bool) {
        *self.fail_fetch.write() = fail;
    }

    /// Delay every fetch, keeping a tick in flight long enough for
    /// concurrency tests
    pub fn set_fetch_latency(&self, latency: Duration) {
        *self.fetch_latency.write() = Some(latency);
    }
}

#[async_trait]
impl RequestStore for MemoryRequestStore {
    async fn fetch_non_terminal(&self) -> Result<Vec<RequestSnapshot>> {
        let latency = *self.fetch_latency.read();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if *self.fail_fetch.read() {
            return Err(Error::Store("injected fetch failure".to_string()));
        }

        Ok(self
            .requests
            .read()
            .values()
            .filter(|r| !r.status.is_terminal())
            .cloned()
            .collect())
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<RequestSnapshot>> {
        Ok(self.requests.read().get(&id).cloned())
    }

    async fn update_sla_fields(
        &self,
        id: Uuid,
        expected_version: u64,
        update: SlaFieldUpdate,
    ) -> Result<()> {
        if self.fail_updates.read().contains(&id) {
            return Err(Error::Store(format!("injected update failure for {}", id)));
        }

        let mut requests = self.requests.write();
        let request = requests.get_mut(&id).ok_or(Error::NotFound(id))?;

        if request.version != expected_version {
            return Err(Error::Conflict(id));
        }

        if let Some(deadline) = update.sla_deadline {
            request.sla_deadline = deadline;
        }
        if let Some(is_overdue) = update.is_overdue {
            request.is_overdue = is_overdue;
        }
        request.version += 1;

        Ok(())
    }
}

/// In-memory [`NotificationSink`] that records delivered events
#[derive(Default)]
pub struct MemoryNotificationSink {
    delivered: RwLock<Vec<(SlaEvent, Option<Uuid>)>>,
}

impl MemoryNotificationSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All delivered events with their targets
    pub fn delivered(&self) -> Vec<(SlaEvent, Option<Uuid>)> {
        self.delivered.read().clone()
    }
}

#[async_trait]
impl NotificationSink for MemoryNotificationSink {
    async fn deliver(&self, event: &SlaEvent, target: Option<Uuid>) -> Result<()> {
        self.delivered.write().push((event.clone(), target));
        Ok(())
    }
}

/// In-memory [`AuditSink`] that records appended entries
#[derive(Default)]
pub struct MemoryAuditSink {
    records: RwLock<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded entries
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.read().clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, record: AuditRecord) -> Result<()> {
        self.records.write().push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sla_core::RequestStatus;

    fn snapshot(status: RequestStatus) -> RequestSnapshot {
        RequestSnapshot {
            id: Uuid::new_v4(),
            status,
            sla_deadline: Some(Utc::now()),
            is_overdue: false,
            assigned_user_id: None,
            version: 0,
        }
    }

    #[tokio::test]
    async fn test_fetch_skips_terminal_requests() {
        let store = MemoryRequestStore::new();
        store.insert(snapshot(RequestStatus::New));
        store.insert(snapshot(RequestStatus::Completed));
        store.insert(snapshot(RequestStatus::InProgress));

        let open = store.fetch_non_terminal().await.unwrap();
        assert_eq!(open.len(), 2);
    }

    #[tokio::test]
    async fn test_conditional_update_rejects_stale_version() {
        let store = MemoryRequestStore::new();
        let request = snapshot(RequestStatus::New);
        let id = request.id;
        store.insert(request);

        store
            .update_sla_fields(id, 0, SlaFieldUpdate::mark_overdue())
            .await
            .unwrap();

        // Second writer holding the stale version loses the race
        let result = store
            .update_sla_fields(id, 0, SlaFieldUpdate::extend_to(Utc::now()))
            .await;
        assert!(matches!(result, Err(Error::Conflict(_))));

        let stored = store.get(id).unwrap();
        assert!(stored.is_overdue);
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn test_update_missing_request_is_not_found() {
        let store = MemoryRequestStore::new();
        let result = store
            .update_sla_fields(Uuid::new_v4(), 0, SlaFieldUpdate::mark_overdue())
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
