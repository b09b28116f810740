//! Property-based tests for deadline calculation invariants
//!
//! These tests use proptest to verify critical invariants:
//! - Determinism: same classification + instant -> same deadline
//! - Bounds: floor <= window <= ceiling for all inputs
//! - Priority monotonicity: higher tiers never get a longer window
//! - Amount monotonicity: larger transfers never get a shorter window

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use sla_core::{
    Classification, ClientPriority, DeadlineCalculator, DeadlineConfig, TransferDirection,
};

/// Strategy for generating transfer directions
fn direction_strategy() -> impl Strategy<Value = TransferDirection> {
    prop_oneof![
        Just(TransferDirection::CryptoToCrypto),
        Just(TransferDirection::CryptoToCash),
        Just(TransferDirection::CashToCrypto),
        Just(TransferDirection::CryptoToCard),
        Just(TransferDirection::CardToCrypto),
        Just(TransferDirection::CashToCard),
    ]
}

/// Strategy for generating priority tiers
fn priority_strategy() -> impl Strategy<Value = ClientPriority> {
    prop_oneof![
        Just(ClientPriority::Low),
        Just(ClientPriority::Normal),
        Just(ClientPriority::High),
        Just(ClientPriority::Vip),
    ]
}

/// Strategy for generating positive amounts (cents granularity)
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1u64..1_000_000_000_00u64).prop_map(|cents| Decimal::new(cents as i64, 2))
}

/// Strategy for generating creation instants
fn created_at_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_000_000_000i64).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

fn currency_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("USD".to_string()),
        Just("EUR".to_string()),
        Just("BTC".to_string()),
        Just("USDT".to_string()),
    ]
}

fn calculator() -> DeadlineCalculator {
    DeadlineCalculator::new(DeadlineConfig::default()).unwrap()
}

fn priority_rank(priority: ClientPriority) -> u8 {
    match priority {
        ClientPriority::Low => 0,
        ClientPriority::Normal => 1,
        ClientPriority::High => 2,
        ClientPriority::Vip => 3,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: identical inputs always produce identical deadlines
    #[test]
    fn prop_compute_is_deterministic(
        direction in direction_strategy(),
        amount in amount_strategy(),
        currency in currency_strategy(),
        priority in priority_strategy(),
        created_at in created_at_strategy(),
    ) {
        let calc = calculator();
        let classification = Classification {
            direction,
            from_currency: currency,
            from_amount: amount,
            priority,
        };

        let first = calc.compute(&classification, created_at);
        let second = calc.compute(&classification, created_at);
        prop_assert_eq!(first, second);
    }

    /// Property: the window always lands within the configured bounds
    #[test]
    fn prop_window_within_bounds(
        direction in direction_strategy(),
        amount in amount_strategy(),
        priority in priority_strategy(),
    ) {
        let config = DeadlineConfig::default();
        let floor = Duration::minutes(config.floor_minutes as i64);
        let ceiling = Duration::minutes(config.ceiling_minutes as i64);
        let calc = DeadlineCalculator::new(config).unwrap();

        let classification = Classification {
            direction,
            from_currency: "USD".to_string(),
            from_amount: amount,
            priority,
        };

        let window = calc.window(&classification);
        prop_assert!(window >= floor, "window {} below floor", window);
        prop_assert!(window <= ceiling, "window {} above ceiling", window);
    }

    /// Property: a higher-priority tier never yields a longer window than a
    /// lower-priority tier for otherwise identical inputs
    #[test]
    fn prop_priority_monotonicity(
        direction in direction_strategy(),
        amount in amount_strategy(),
        a in priority_strategy(),
        b in priority_strategy(),
    ) {
        let calc = calculator();
        let make = |priority| Classification {
            direction,
            from_currency: "USD".to_string(),
            from_amount: amount,
            priority,
        };

        let window_a = calc.window(&make(a));
        let window_b = calc.window(&make(b));

        if priority_rank(a) >= priority_rank(b) {
            prop_assert!(window_a <= window_b);
        }
    }

    /// Property: a larger transfer never gets a shorter window
    #[test]
    fn prop_amount_monotonicity(
        direction in direction_strategy(),
        priority in priority_strategy(),
        small in amount_strategy(),
        large in amount_strategy(),
    ) {
        let (small, large) = if small <= large { (small, large) } else { (large, small) };
        let calc = calculator();
        let make = |amount| Classification {
            direction,
            from_currency: "USD".to_string(),
            from_amount: amount,
            priority,
        };

        prop_assert!(calc.window(&make(small)) <= calc.window(&make(large)));
    }

    /// Property: the deadline is always strictly after creation
    #[test]
    fn prop_deadline_after_creation(
        direction in direction_strategy(),
        amount in amount_strategy(),
        priority in priority_strategy(),
        created_at in created_at_strategy(),
    ) {
        let calc = calculator();
        let classification = Classification {
            direction,
            from_currency: "USD".to_string(),
            from_amount: amount,
            priority,
        };

        prop_assert!(calc.compute(&classification, created_at) > created_at);
    }
}
