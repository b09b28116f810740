//! SLA state evaluation
//!
//! Pure classification of a request against its deadline. The evaluator
//! never reads the clock and never touches the cached `is_overdue` flag;
//! translating its output into state mutation and events is the monitor's
//! job.

use crate::types::{RequestStatus, SlaState};
use chrono::{DateTime, Duration, Utc};

/// Classifies a request's SLA state at a given instant
#[derive(Debug, Clone, Copy)]
pub struct SlaEvaluator {
    upcoming_window: Duration,
}

impl SlaEvaluator {
    /// Create an evaluator with the configured warning window
    pub fn new(upcoming_window: Duration) -> Self {
        Self { upcoming_window }
    }

    /// The configured warning window
    pub fn upcoming_window(&self) -> Duration {
        self.upcoming_window
    }

    /// Classify a request against its deadline at instant `now`.
    ///
    /// The deadline boundary is inclusive of OVERDUE: at exactly
    /// `now == deadline` the request is already late.
    pub fn evaluate(
        &self,
        status: RequestStatus,
        deadline: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> SlaState {
        if status.is_terminal() {
            return SlaState::Exempt;
        }

        let deadline = match deadline {
            Some(deadline) => deadline,
            None => return SlaState::Exempt,
        };

        if now >= deadline {
            SlaState::Overdue
        } else if deadline - now <= self.upcoming_window {
            SlaState::Upcoming
        } else {
            SlaState::OnTrack
        }
    }
}
