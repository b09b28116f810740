//! SLA Monitor
//!
//! Recurring SLA compliance monitoring and operator actions for exchange
//! requests.
//!
//! # Architecture
//!
//! The monitor runs a tick loop over all open requests:
//!
//! 1. **Fetch**: pull the non-terminal candidate set from the request store
//! 2. **Evaluate**: classify every candidate against one captured `now`
//! 3. **Transition**: persist newly-overdue flags, emit warning events
//! 4. **Report**: per-request failures are isolated and surfaced, never
//!    allowed to abort the remaining candidates
//!
//! Ticks are single-flight: a manual trigger while a scheduled tick is
//! running gets a clear busy rejection instead of interleaving writes.
//! The [`SlaActionHandler`] applies operator extensions and reminders
//! against the same store and sinks.
//!
//! # Example
//!
//! ```no_run
//! use sla_core::MonitorConfig;
//! use sla_monitor::{MemoryAuditSink, MemoryNotificationSink, MemoryRequestStore, SlaMonitor};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> sla_monitor::Result<()> {
//!     let store = Arc::new(MemoryRequestStore::new());
//!     let notifications = Arc::new(MemoryNotificationSink::new());
//!     let audit = Arc::new(MemoryAuditSink::new());
//!
//!     let monitor = SlaMonitor::new(&MonitorConfig::default(), store, notifications, audit)?;
//!     let report = monitor.run_tick().await?;
//!     println!("{} candidates, {} newly overdue", report.candidates, report.became_overdue);
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod actions;
pub mod error;
pub mod memory;
pub mod monitor;
pub mod sink;
pub mod store;

// Re-exports
pub use actions::SlaActionHandler;
pub use error::{Error, Result};
pub use memory::{MemoryAuditSink, MemoryNotificationSink, MemoryRequestStore};
pub use monitor::{SlaMonitor, TickFailure, TickReport};
pub use sink::{AuditRecord, AuditSink, NotificationSink};
pub use store::{RequestStore, SlaFieldUpdate};
