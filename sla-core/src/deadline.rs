//! Deadline calculation
//!
//! Runs exactly once per request, at creation. The deadline is fixed from
//! then on; only an explicit operator extension can move it.

use crate::config::DeadlineConfig;
use crate::types::Classification;
use crate::Result;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

/// Computes the SLA deadline for a freshly created request.
///
/// Deterministic and side-effect free: identical inputs (including the
/// `created_at` instant) always yield the identical deadline, so the
/// calculation can be replayed for auditing.
#[derive(Debug, Clone)]
pub struct DeadlineCalculator {
    config: DeadlineConfig,
}

impl DeadlineCalculator {
    /// Create a calculator from validated tables.
    ///
    /// Fails fast on an inconsistent table set; a silently defaulted SLA
    /// window is worse than a visible configuration error.
    pub fn new(config: DeadlineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Compute the absolute deadline for a request created at `created_at`.
    ///
    /// Window = `base(direction) * amount_tier * priority`, floored to
    /// whole minutes and clamped to the configured floor/ceiling bounds.
    pub fn compute(&self, classification: &Classification, created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + self.window(classification)
    }

    /// The SLA window itself, without anchoring to an instant
    pub fn window(&self, classification: &Classification) -> Duration {
        let base = self.config.base.minutes_for(classification.direction) as f64;
        let amount_mult = self.amount_multiplier(classification.from_amount);
        let priority_mult = self.config.priority.for_priority(classification.priority);

        let minutes = (base * amount_mult * priority_mult).floor() as u64;
        let minutes = minutes.clamp(self.config.floor_minutes, self.config.ceiling_minutes);

        Duration::minutes(minutes as i64)
    }

    fn amount_multiplier(&self, amount: Decimal) -> f64 {
        // Validation guarantees ascending thresholds and an open-ended
        // last tier, so this always matches.
        self.config
            .amount_tiers
            .iter()
            .find(|tier| tier.up_to.map_or(true, |threshold| amount < threshold))
            .map(|tier| tier.multiplier)
            .unwrap_or(1.0)
    }
}
