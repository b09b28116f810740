//! Notification and audit sinks
//!
//! Both sinks are fire-and-forget from the monitor's perspective: delivery
//! and retry policy belong to the sink, and a failed delivery never rolls
//! back an SLA state change that was already persisted.

use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sla_core::SlaEvent;
use uuid::Uuid;

/// Immutable audit trail entry for a deadline mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Acting operator; `None` for scheduler-originated transitions
    pub actor_id: Option<Uuid>,

    /// Audited entity type, always `"request"` for SLA records
    pub entity_type: String,

    /// Request identifier
    pub entity_id: Uuid,

    /// Action name, e.g. `"sla_became_overdue"`
    pub action: String,

    /// Field values after the mutation
    pub new_values: serde_json::Value,

    /// When the mutation was recorded
    pub recorded_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Scheduler marked a request overdue
    pub fn became_overdue(entity_id: Uuid, deadline: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            actor_id: None,
            entity_type: "request".to_string(),
            entity_id,
            action: "sla_became_overdue".to_string(),
            new_values: json!({ "is_overdue": true, "sla_deadline": deadline }),
            recorded_at: now,
        }
    }

    /// Operator extended a deadline
    pub fn extended(
        actor_id: Uuid,
        entity_id: Uuid,
        new_deadline: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            actor_id: Some(actor_id),
            entity_type: "request".to_string(),
            entity_id,
            action: "sla_deadline_extended".to_string(),
            new_values: json!({ "is_overdue": false, "sla_deadline": new_deadline }),
            recorded_at: now,
        }
    }
}

/// Delivers SLA events to assigned operators
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one event, optionally targeted at a specific operator
    async fn deliver(&self, event: &SlaEvent, target: Option<Uuid>) -> Result<()>;
}

/// Receives an immutable record of every deadline mutation
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append one audit record
    async fn record(&self, record: AuditRecord) -> Result<()>;
}
