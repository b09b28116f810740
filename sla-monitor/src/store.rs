//! Request store boundary
//!
//! The CRM database owns request records; the monitor only reads the SLA
//! projection and patches the two deadline fields. Updates are conditional
//! on the record version so a concurrent tick and an operator extension
//! cannot silently overwrite each other.

use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sla_core::RequestSnapshot;
use uuid::Uuid;

/// Patch for the SLA-owned fields of a request.
///
/// Outer `Option` = "leave unchanged"; the inner `Option` on the deadline
/// distinguishes clearing it from setting it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlaFieldUpdate {
    /// New deadline value, if the deadline should change
    pub sla_deadline: Option<Option<DateTime<Utc>>>,

    /// New overdue flag, if the flag should change
    pub is_overdue: Option<bool>,
}

impl SlaFieldUpdate {
    /// Patch that marks a request overdue
    pub fn mark_overdue() -> Self {
        Self { sla_deadline: None, is_overdue: Some(true) }
    }

    /// Patch applied by a deadline extension: new deadline, flag cleared
    pub fn extend_to(deadline: DateTime<Utc>) -> Self {
        Self { sla_deadline: Some(Some(deadline)), is_overdue: Some(false) }
    }
}

/// Source of truth for request records
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Fetch the SLA projection of every non-terminal request
    async fn fetch_non_terminal(&self) -> Result<Vec<RequestSnapshot>>;

    /// Fetch a single request by id
    async fn fetch(&self, id: Uuid) -> Result<Option<RequestSnapshot>>;

    /// Conditionally patch the SLA fields of one request.
    ///
    /// Fails with [`crate::Error::Conflict`] when `expected_version` no
    /// longer matches the stored record, and with
    /// [`crate::Error::NotFound`] when the record is gone.
    async fn update_sla_fields(
        &self,
        id: Uuid,
        expected_version: u64,
        update: SlaFieldUpdate,
    ) -> Result<()>;
}
