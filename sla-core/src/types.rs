//! Core types for SLA tracking
//!
//! All types are designed for:
//! - Explicit time handling (`now` is always a parameter, never read inline)
//! - Exact arithmetic (Decimal for amounts)
//! - Serde round-tripping with the CRM's wire representation

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use uuid::Uuid;

/// Lifecycle status of an exchange request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    /// Freshly created, not yet picked up
    New,
    /// Assigned to an operator
    Assigned,
    /// Operator is working the request
    InProgress,
    /// Waiting on the client
    AwaitingClient,
    /// Waiting on payment confirmation
    AwaitingConfirmation,
    /// Completed successfully (terminal)
    Completed,
    /// Canceled by client or operator (terminal)
    Canceled,
    /// Rejected by the desk (terminal)
    Rejected,
}

impl RequestStatus {
    /// Terminal statuses never transition again; SLA evaluation stops
    /// permanently once a request reaches one.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestStatus::Completed | RequestStatus::Canceled | RequestStatus::Rejected
        )
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestStatus::New => "NEW",
            RequestStatus::Assigned => "ASSIGNED",
            RequestStatus::InProgress => "IN_PROGRESS",
            RequestStatus::AwaitingClient => "AWAITING_CLIENT",
            RequestStatus::AwaitingConfirmation => "AWAITING_CONFIRMATION",
            RequestStatus::Completed => "COMPLETED",
            RequestStatus::Canceled => "CANCELED",
            RequestStatus::Rejected => "REJECTED",
        };
        write!(f, "{}", s)
    }
}

/// Transfer direction of an exchange request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferDirection {
    /// Crypto to crypto (on-chain both sides)
    CryptoToCrypto,
    /// Crypto sold for cash pickup
    CryptoToCash,
    /// Cash deposited for crypto
    CashToCrypto,
    /// Crypto sold to a card payout
    CryptoToCard,
    /// Card payment for crypto
    CardToCrypto,
    /// Cash converted to a card payout
    CashToCard,
}

impl TransferDirection {
    /// Directions with a physical-cash leg get longer base windows (an
    /// office visit is involved on at least one side).
    pub fn involves_cash(&self) -> bool {
        matches!(
            self,
            TransferDirection::CryptoToCash
                | TransferDirection::CashToCrypto
                | TransferDirection::CashToCard
        )
    }

    /// All six directions, in declaration order
    pub fn all() -> [TransferDirection; 6] {
        [
            TransferDirection::CryptoToCrypto,
            TransferDirection::CryptoToCash,
            TransferDirection::CashToCrypto,
            TransferDirection::CryptoToCard,
            TransferDirection::CardToCrypto,
            TransferDirection::CashToCard,
        ]
    }
}

/// Client priority tier, scales the SLA window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientPriority {
    /// Walk-in / unverified client
    Low,
    /// Regular client
    Normal,
    /// High-volume client
    High,
    /// VIP desk client, tightest window
    Vip,
}

/// SLA classification of a single request at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlaState {
    /// Deadline comfortably in the future
    OnTrack,
    /// Deadline within the configured warning window
    Upcoming,
    /// Deadline reached or passed
    Overdue,
    /// Terminal status or no deadline assigned
    Exempt,
}

/// Deadline-relevant inputs captured at request creation.
///
/// Consumed only by the deadline calculator; a request's deadline is fixed
/// at creation and never re-derived from the classification afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Transfer direction
    pub direction: TransferDirection,
    /// Source currency code (free-form: fiat or ticker)
    pub from_currency: String,
    /// Source amount, must be positive
    pub from_amount: Decimal,
    /// Client priority tier
    pub priority: ClientPriority,
}

/// The SLA-relevant projection of a stored request.
///
/// `is_overdue` is a snapshot written by the monitor, not a live-computed
/// value; it may lag the true state between ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSnapshot {
    /// Request identifier
    pub id: Uuid,
    /// Current lifecycle status
    pub status: RequestStatus,
    /// Absolute deadline; `None` means no SLA applies
    pub sla_deadline: Option<DateTime<Utc>>,
    /// Cached overdue flag, mutated only by the SLA engine
    pub is_overdue: bool,
    /// Operator the request is routed to, if any
    pub assigned_user_id: Option<Uuid>,
    /// Record version for conditional updates
    pub version: u64,
}

/// Kind of an SLA event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlaEventKind {
    /// Request crossed its deadline (false -> true transition)
    BecameOverdue,
    /// Deadline falls within the warning window; emitted once per deadline
    ApproachingDeadline,
    /// Operator extended the deadline
    Extended,
    /// Operator sent a manual reminder
    ReminderSent,
}

/// Ephemeral event produced by the SLA engine for the notification and
/// audit sinks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlaEvent {
    /// Event kind
    pub kind: SlaEventKind,
    /// Request the event refers to
    pub request_id: Uuid,
    /// Acting operator; `None` for scheduler-originated events
    pub actor_id: Option<Uuid>,
    /// When the transition was observed
    pub occurred_at: DateTime<Utc>,
    /// Kind-specific details
    pub payload: serde_json::Value,
}

impl SlaEvent {
    /// Scheduler observed a request crossing its deadline
    pub fn became_overdue(request_id: Uuid, deadline: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            kind: SlaEventKind::BecameOverdue,
            request_id,
            actor_id: None,
            occurred_at: now,
            payload: json!({ "deadline": deadline }),
        }
    }

    /// Scheduler observed a deadline inside the warning window
    pub fn approaching_deadline(
        request_id: Uuid,
        deadline: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: SlaEventKind::ApproachingDeadline,
            request_id,
            actor_id: None,
            occurred_at: now,
            payload: json!({ "deadline": deadline }),
        }
    }

    /// Operator granted a new deadline
    pub fn extended(
        request_id: Uuid,
        actor_id: Uuid,
        new_deadline: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: SlaEventKind::Extended,
            request_id,
            actor_id: Some(actor_id),
            occurred_at: now,
            payload: json!({ "new_deadline": new_deadline }),
        }
    }

    /// Operator sent a manual reminder to the assignee
    pub fn reminder_sent(request_id: Uuid, actor_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            kind: SlaEventKind::ReminderSent,
            request_id,
            actor_id: Some(actor_id),
            occurred_at: now,
            payload: json!({}),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(RequestStatus::Completed.is_terminal());
        assert!(RequestStatus::Canceled.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
        assert!(!RequestStatus::New.is_terminal());
        assert!(!RequestStatus::AwaitingConfirmation.is_terminal());
    }

    #[test]
    fn test_cash_involving_directions() {
        assert!(TransferDirection::CashToCrypto.involves_cash());
        assert!(TransferDirection::CryptoToCash.involves_cash());
        assert!(TransferDirection::CashToCard.involves_cash());
        assert!(!TransferDirection::CryptoToCrypto.involves_cash());
        assert!(!TransferDirection::CardToCrypto.involves_cash());
    }

    #[test]
    fn test_status_serde_matches_crm_wire_format() {
        let json = serde_json::to_string(&RequestStatus::AwaitingClient).unwrap();
        assert_eq!(json, "\"AWAITING_CLIENT\"");

        let status: RequestStatus = serde_json::from_str("\"IN_PROGRESS\"").unwrap();
        assert_eq!(status, RequestStatus::InProgress);
    }
}
