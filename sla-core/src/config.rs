//! Configuration for the SLA engine

use crate::types::{ClientPriority, TransferDirection};
use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Top-level SLA engine configuration
///
/// Loaded once at process start and treated as immutable for the process
/// lifetime. A wrong SLA is a compliance issue, so nothing here is ever
/// silently defaulted at use sites: `validate` runs at load and any
/// inconsistency is fatal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlaConfig {
    /// Deadline calculation tables
    pub deadline: DeadlineConfig,

    /// Monitoring scheduler settings
    pub monitor: MonitorConfig,
}

impl SlaConfig {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SlaConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load defaults with environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = SlaConfig::default();

        if let Ok(secs) = std::env::var("SLA_TICK_INTERVAL_SECS") {
            config.monitor.tick_interval_secs = secs
                .parse()
                .map_err(|_| Error::Config(format!("Invalid SLA_TICK_INTERVAL_SECS: {}", secs)))?;
        }

        if let Ok(mins) = std::env::var("SLA_UPCOMING_WINDOW_MINS") {
            config.monitor.upcoming_window_minutes = mins.parse().map_err(|_| {
                Error::Config(format!("Invalid SLA_UPCOMING_WINDOW_MINS: {}", mins))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the full parameter set
    pub fn validate(&self) -> Result<()> {
        self.deadline.validate()?;
        self.monitor.validate()
    }
}

/// Deadline calculation tables: per-direction base windows, amount tiers,
/// priority multipliers and the floor/ceiling bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadlineConfig {
    /// Base window per transfer direction
    pub base: BaseWindows,

    /// Amount tiers, ascending by threshold; the last tier must be
    /// open-ended (`up_to` absent)
    pub amount_tiers: Vec<AmountTier>,

    /// Priority multipliers
    pub priority: PriorityMultipliers,

    /// Minimum deadline window in minutes
    pub floor_minutes: u64,

    /// Maximum deadline window in minutes
    pub ceiling_minutes: u64,
}

impl Default for DeadlineConfig {
    fn default() -> Self {
        Self {
            base: BaseWindows::default(),
            amount_tiers: vec![
                AmountTier { up_to: Some(Decimal::from(1_000)), multiplier: 1.0 },
                AmountTier { up_to: Some(Decimal::from(10_000)), multiplier: 1.25 },
                AmountTier { up_to: Some(Decimal::from(100_000)), multiplier: 1.5 },
                AmountTier { up_to: None, multiplier: 2.0 },
            ],
            priority: PriorityMultipliers::default(),
            floor_minutes: 15,
            ceiling_minutes: 72 * 60,
        }
    }
}

impl DeadlineConfig {
    /// Validate duration tables
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;

        if self.amount_tiers.is_empty() {
            return Err(Error::Config("No amount tiers configured".to_string()));
        }

        let mut previous: Option<Decimal> = None;
        for (idx, tier) in self.amount_tiers.iter().enumerate() {
            if tier.multiplier <= 0.0 || !tier.multiplier.is_finite() {
                return Err(Error::Config(format!(
                    "Amount tier {} has invalid multiplier {}",
                    idx, tier.multiplier
                )));
            }
            match (previous, tier.up_to) {
                (Some(prev), Some(threshold)) if threshold <= prev => {
                    return Err(Error::Config(format!(
                        "Amount tier thresholds must be ascending: {} after {}",
                        threshold, prev
                    )));
                }
                (_, Some(threshold)) => previous = Some(threshold),
                (_, None) => {
                    if idx != self.amount_tiers.len() - 1 {
                        return Err(Error::Config(
                            "Open-ended amount tier must be last".to_string(),
                        ));
                    }
                }
            }
        }
        if self.amount_tiers.last().and_then(|t| t.up_to).is_some() {
            return Err(Error::Config(
                "Last amount tier must be open-ended".to_string(),
            ));
        }

        self.priority.validate()?;

        if self.floor_minutes == 0 {
            return Err(Error::Config("floor_minutes must be positive".to_string()));
        }
        if self.ceiling_minutes < self.floor_minutes {
            return Err(Error::Config(format!(
                "ceiling_minutes {} below floor_minutes {}",
                self.ceiling_minutes, self.floor_minutes
            )));
        }

        Ok(())
    }
}

/// Base deadline window in minutes for each transfer direction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseWindows {
    /// Crypto to crypto
    pub crypto_to_crypto: u64,
    /// Crypto to cash pickup
    pub crypto_to_cash: u64,
    /// Cash deposit to crypto
    pub cash_to_crypto: u64,
    /// Crypto to card payout
    pub crypto_to_card: u64,
    /// Card payment to crypto
    pub card_to_crypto: u64,
    /// Cash to card payout
    pub cash_to_card: u64,
}

impl Default for BaseWindows {
    fn default() -> Self {
        // Cash legs need an office visit, card legs need acquirer
        // confirmation, on-chain both sides is the fastest path.
        Self {
            crypto_to_crypto: 60,
            crypto_to_cash: 180,
            cash_to_crypto: 180,
            crypto_to_card: 90,
            card_to_crypto: 90,
            cash_to_card: 180,
        }
    }
}

impl BaseWindows {
    /// Base window in minutes for a direction
    pub fn minutes_for(&self, direction: TransferDirection) -> u64 {
        match direction {
            TransferDirection::CryptoToCrypto => self.crypto_to_crypto,
            TransferDirection::CryptoToCash => self.crypto_to_cash,
            TransferDirection::CashToCrypto => self.cash_to_crypto,
            TransferDirection::CryptoToCard => self.crypto_to_card,
            TransferDirection::CardToCrypto => self.card_to_crypto,
            TransferDirection::CashToCard => self.cash_to_card,
        }
    }

    fn validate(&self) -> Result<()> {
        for direction in TransferDirection::all() {
            if self.minutes_for(direction) == 0 {
                return Err(Error::Config(format!(
                    "Base window for {:?} must be positive",
                    direction
                )));
            }
        }
        Ok(())
    }
}

/// One amount tier: requests with `from_amount < up_to` (and above all
/// previous tiers) get this multiplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountTier {
    /// Exclusive upper bound; absent for the open-ended last tier
    pub up_to: Option<Decimal>,

    /// Window multiplier, larger transfers get more time
    pub multiplier: f64,
}

/// Window multiplier per client priority tier
///
/// Higher priority shortens the window, so the multipliers must be
/// non-increasing from LOW down to VIP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityMultipliers {
    /// LOW tier
    pub low: f64,
    /// NORMAL tier
    pub normal: f64,
    /// HIGH tier
    pub high: f64,
    /// VIP tier, tightest bound
    pub vip: f64,
}

impl Default for PriorityMultipliers {
    fn default() -> Self {
        Self { low: 1.5, normal: 1.0, high: 0.75, vip: 0.5 }
    }
}

impl PriorityMultipliers {
    /// Multiplier for a priority tier
    pub fn for_priority(&self, priority: ClientPriority) -> f64 {
        match priority {
            ClientPriority::Low => self.low,
            ClientPriority::Normal => self.normal,
            ClientPriority::High => self.high,
            ClientPriority::Vip => self.vip,
        }
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("low", self.low),
            ("normal", self.normal),
            ("high", self.high),
            ("vip", self.vip),
        ] {
            if value <= 0.0 || !value.is_finite() {
                return Err(Error::Config(format!(
                    "Priority multiplier {} has invalid value {}",
                    name, value
                )));
            }
        }
        if !(self.vip <= self.high && self.high <= self.normal && self.normal <= self.low) {
            return Err(Error::Config(
                "Priority multipliers must be non-increasing from LOW to VIP".to_string(),
            ));
        }
        Ok(())
    }
}

/// Monitoring scheduler settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between scheduled ticks
    pub tick_interval_secs: u64,

    /// Minutes before the deadline at which a request counts as UPCOMING
    pub upcoming_window_minutes: i64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self { tick_interval_secs: 300, upcoming_window_minutes: 60 }
    }
}

impl MonitorConfig {
    /// Validate scheduler settings
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_secs == 0 {
            return Err(Error::Config("tick_interval_secs must be positive".to_string()));
        }
        if self.upcoming_window_minutes <= 0 {
            return Err(Error::Config(
                "upcoming_window_minutes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
