//! Operator-invoked SLA actions
//!
//! Synchronous single-request operations invoked from the API layer.
//! Authorization (only administrators extend deadlines) is the caller's
//! precondition; this component trusts its caller.

use crate::error::{Error, Result};
use crate::sink::{AuditRecord, AuditSink, NotificationSink};
use crate::store::{RequestStore, SlaFieldUpdate};
use chrono::{DateTime, Duration, Utc};
use sla_core::SlaEvent;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Handles deadline extensions and manual reminders
pub struct SlaActionHandler {
    store: Arc<dyn RequestStore>,
    notifications: Arc<dyn NotificationSink>,
    audit: Arc<dyn AuditSink>,
}

impl SlaActionHandler {
    /// Create a handler over the given boundary implementations
    pub fn new(
        store: Arc<dyn RequestStore>,
        notifications: Arc<dyn NotificationSink>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self { store, notifications, audit }
    }

    /// Grant a request a new deadline of `now + extension`.
    ///
    /// The extension is anchored to the moment it is granted, not to the
    /// old deadline, and always clears `is_overdue`. Fails with
    /// [`Error::NotFound`] for missing requests and
    /// [`Error::InvalidState`] for terminal ones. The update is
    /// conditional on the record version, so a concurrent monitor tick
    /// cannot overwrite the extension with a stale overdue flag.
    pub async fn extend_deadline(
        &self,
        request_id: Uuid,
        actor_id: Uuid,
        extension: Duration,
    ) -> Result<DateTime<Utc>> {
        if extension <= Duration::zero() {
            return Err(Error::Validation(format!(
                "Extension must be positive, got {}",
                extension
            )));
        }

        let request = self
            .store
            .fetch(request_id)
            .await?
            .ok_or(Error::NotFound(request_id))?;

        if request.status.is_terminal() {
            return Err(Error::InvalidState { id: request_id, status: request.status });
        }

        let now = Utc::now();
        let new_deadline = now + extension;

        self.store
            .update_sla_fields(request_id, request.version, SlaFieldUpdate::extend_to(new_deadline))
            .await?;

        info!(
            "Operator {} extended request {} deadline to {}",
            actor_id, request_id, new_deadline
        );

        let event = SlaEvent::extended(request_id, actor_id, new_deadline, now);
        if let Err(e) = self
            .notifications
            .deliver(&event, request.assigned_user_id)
            .await
        {
            warn!("Notification delivery failed for request {}: {}", request_id, e);
        }
        if let Err(e) = self
            .audit
            .record(AuditRecord::extended(actor_id, request_id, new_deadline, now))
            .await
        {
            warn!("Audit write failed for request {}: {}", request_id, e);
        }

        Ok(new_deadline)
    }

    /// Send a manual reminder to the request's assigned operator.
    ///
    /// Mutates neither the deadline nor the overdue flag; the only side
    /// effect is the emitted event. Fails with [`Error::Unassigned`] when
    /// the request has no assignee.
    pub async fn send_reminder(&self, request_id: Uuid, actor_id: Uuid) -> Result<()> {
        let request = self
            .store
            .fetch(request_id)
            .await?
            .ok_or(Error::NotFound(request_id))?;

        let assignee = request.assigned_user_id.ok_or(Error::Unassigned(request_id))?;

        let now = Utc::now();
        let event = SlaEvent::reminder_sent(request_id, actor_id, now);

        info!(
            "Operator {} sent reminder for request {} to {}",
            actor_id, request_id, assignee
        );

        if let Err(e) = self.notifications.deliver(&event, Some(assignee)).await {
            warn!("Reminder delivery failed for request {}: {}", request_id, e);
        }

        Ok(())
    }
}
