//! SLA Core
//!
//! Deadline calculation and SLA state evaluation for exchange requests.
//!
//! # Architecture
//!
//! Every exchange request receives an absolute deadline at creation time:
//!
//! 1. **Classification**: transfer direction, amount, client priority tier
//! 2. **Deadline**: `base(direction) * amount_tier * priority`, clamped
//! 3. **Evaluation**: open requests are classified against their deadline
//!    into on-track / upcoming / overdue / exempt
//!
//! Both components are pure: identical inputs always produce identical
//! output, and the reference instant (`now`) is threaded as a parameter so
//! evaluations can be replayed for auditing. The recurring monitor and the
//! operator actions that consume these components live in `sla-monitor`.
//!
//! # Example
//!
//! ```
//! use sla_core::{Classification, ClientPriority, DeadlineCalculator,
//!                DeadlineConfig, TransferDirection};
//! use rust_decimal::Decimal;
//!
//! let calculator = DeadlineCalculator::new(DeadlineConfig::default()).unwrap();
//! let classification = Classification {
//!     direction: TransferDirection::CashToCrypto,
//!     from_currency: "USD".to_string(),
//!     from_amount: Decimal::from(500),
//!     priority: ClientPriority::Normal,
//! };
//! let created_at = chrono::Utc::now();
//! let deadline = calculator.compute(&classification, created_at);
//! assert!(deadline > created_at);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod config;
pub mod deadline;
pub mod error;
pub mod evaluator;
pub mod types;

// Re-exports
pub use config::{DeadlineConfig, MonitorConfig, SlaConfig};
pub use deadline::DeadlineCalculator;
pub use error::{Error, Result};
pub use evaluator::SlaEvaluator;
pub use types::*;
