//! Error types for the SLA monitor

use sla_core::RequestStatus;
use thiserror::Error;
use uuid::Uuid;

/// Result type for monitor operations
pub type Result<T> = std::result::Result<T, Error>;

/// SLA monitor errors
#[derive(Error, Debug)]
pub enum Error {
    /// Request does not exist in the store
    #[error("Request not found: {0}")]
    NotFound(Uuid),

    /// Operation not valid for the request's current status
    #[error("Request {id} is in status {status}, operation not allowed")]
    InvalidState {
        /// Request identifier
        id: Uuid,
        /// Status that blocked the operation
        status: RequestStatus,
    },

    /// Reminder requested for a request without an assigned operator
    #[error("Request {0} has no assigned operator")]
    Unassigned(Uuid),

    /// A tick is already running; manual trigger rejected
    #[error("SLA tick already in progress")]
    TickInProgress,

    /// Conditional update lost the race against a concurrent writer
    #[error("Concurrent update conflict on request {0}")]
    Conflict(Uuid),

    /// Request store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Sink delivery failure
    #[error("Sink error: {0}")]
    Sink(String),

    /// Invalid operation input
    #[error("Validation error: {0}")]
    Validation(String),

    /// SLA core error
    #[error("Core error: {0}")]
    Core(#[from] sla_core::Error),
}
