//! Tests for accrual arithmetic and the expense projection.

use chrono::{Duration, Utc};
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::AccrualError;
use super::projection::project;
use super::schedule::{AccrualSchedule, sum_consumed};

#[rstest]
#[case(Duration::hours(400), 400)]
#[case(Duration::hours(400) + Duration::minutes(54), 400)]
#[case(Duration::minutes(30), 0)]
#[case(Duration::hours(-2) - Duration::minutes(30), -2)]
fn hours_since_start_truncates_toward_zero(#[case] elapsed: Duration, #[case] expected: i64) {
    let now = Utc::now();
    let schedule = AccrualSchedule::new(1, dec!(100), now - elapsed).unwrap();
    assert_eq!(schedule.hours_since_start(now), expected);
}

#[test]
fn rate_is_exact_hourly_division() {
    let cases = [
        (dec!(100), 30_u32, dec!(100) / dec!(720)),
        (dec!(100), 1_u32, dec!(100) / dec!(24)),
        (dec!(240), 1_u32, dec!(10)),
    ];

    for (amount, interval_days, expected) in cases {
        let schedule = AccrualSchedule::new(interval_days, amount, Utc::now()).unwrap();
        assert_eq!(schedule.rate(), expected);
    }
}

#[test]
fn accumulation_scenarios() {
    let cases = [
        (Duration::hours(24), dec!(100), 1_u32, dec!(100)),
        (Duration::hours(1), dec!(240), 1_u32, dec!(10)),
    ];

    for (elapsed, amount, interval_days, expected) in cases {
        let now = Utc::now();
        let schedule = AccrualSchedule::new(interval_days, amount, now - elapsed).unwrap();
        assert_eq!(schedule.accumulation(now), expected);
    }
}

#[test]
fn accumulation_is_exact_at_full_interval_boundaries() {
    // Intervals like 7 days give non-terminating hourly rates (100/168);
    // a full elapsed interval must still accrue the full amount.
    let cases = [
        (Duration::hours(168), dec!(100), 7_u32, dec!(100)),
        (Duration::hours(72), dec!(10), 3_u32, dec!(10)),
        (Duration::hours(336), dec!(100), 7_u32, dec!(200)),
    ];

    for (elapsed, amount, interval_days, expected) in cases {
        let now = Utc::now();
        let schedule = AccrualSchedule::new(interval_days, amount, now - elapsed).unwrap();
        assert_eq!(schedule.accumulation(now), expected);
    }
}

#[test]
fn accumulation_uses_unrounded_hours() {
    // 90 minutes at rate 10/h is 15; truncating the hour count first would
    // lose the 5 from the fractional half hour.
    let now = Utc::now();
    let schedule = AccrualSchedule::new(1, dec!(240), now - Duration::minutes(90)).unwrap();
    assert_eq!(schedule.accumulation(now), dec!(15));
}

#[test]
fn accumulation_is_negative_before_start() {
    let now = Utc::now();
    let schedule = AccrualSchedule::new(1, dec!(240), now + Duration::hours(1)).unwrap();
    assert_eq!(schedule.accumulation(now), dec!(-10));
    assert_eq!(schedule.remaining(now, Decimal::ZERO), dec!(-10));
}

#[test]
fn zero_interval_is_rejected() {
    assert_eq!(
        AccrualSchedule::new(0, dec!(100), Utc::now()),
        Err(AccrualError::ZeroInterval)
    );
}

#[test]
fn remaining_subtracts_consumed() {
    let now = Utc::now();
    let schedule = AccrualSchedule::new(1, dec!(10), now - Duration::hours(240)).unwrap();
    assert_eq!(schedule.remaining(now, dec!(80)), dec!(20));
}

#[test]
fn remaining_may_go_negative() {
    let now = Utc::now();
    let schedule = AccrualSchedule::new(1, dec!(10), now - Duration::hours(24)).unwrap();
    assert_eq!(schedule.remaining(now, dec!(25)), dec!(-15));
}

#[test]
fn sum_consumed_adds_exactly() {
    assert_eq!(
        sum_consumed([dec!(10), dec!(20), dec!(30), dec!(40)]),
        dec!(100)
    );
    assert_eq!(sum_consumed([]), Decimal::ZERO);
    // Negative consumption amounts are not rejected anywhere.
    assert_eq!(sum_consumed([dec!(10), dec!(-4)]), dec!(6));
}

#[test]
fn projection_maps_fields_and_derives() {
    let now = Utc::now();
    let projection = project(
        7,
        "groceries".to_string(),
        1,
        dec!(10),
        now - Duration::hours(240),
        true,
        dec!(80),
        now,
    )
    .unwrap();

    assert_eq!(projection.id, 7);
    assert_eq!(projection.name, "groceries");
    assert_eq!(projection.interval, 1);
    assert_eq!(projection.amount, dec!(10));
    assert!(projection.rollover);
    assert_eq!(projection.consumed, dec!(80));
    assert_eq!(projection.remaining, dec!(20));
    assert_eq!(projection.rate, dec!(10) / dec!(24));
}

#[test]
fn projection_rollover_is_inert() {
    let now = Utc::now();
    let start = now - Duration::hours(48);
    let with = project(1, "a".into(), 2, dec!(50), start, true, dec!(5), now).unwrap();
    let without = project(1, "a".into(), 2, dec!(50), start, false, dec!(5), now).unwrap();

    assert_eq!(with.remaining, without.remaining);
    assert_eq!(with.consumed, without.consumed);
    assert_eq!(with.rate, without.rate);
}

#[test]
fn projection_serializes_expected_keys() {
    let now = Utc::now();
    let projection = project(
        1,
        "rent".to_string(),
        30,
        dec!(1200),
        now - Duration::hours(24),
        false,
        Decimal::ZERO,
        now,
    )
    .unwrap();

    let value = serde_json::to_value(&projection).unwrap();
    let object = value.as_object().unwrap();
    for key in [
        "id",
        "name",
        "interval",
        "amount",
        "rollover",
        "remaining",
        "consumed",
        "rate",
    ] {
        assert!(object.contains_key(key), "missing key {key}");
    }
    assert_eq!(object.len(), 8);
}

#[test]
fn projection_rejects_zero_interval() {
    let now = Utc::now();
    let result = project(
        1,
        "broken".to_string(),
        0,
        dec!(100),
        now,
        false,
        Decimal::ZERO,
        now,
    );
    assert_eq!(result, Err(AccrualError::ZeroInterval));
}

proptest! {
    #[test]
    fn remaining_equals_accumulation_minus_consumed(
        hours in -10_000_i64..10_000,
        amount_cents in 0_i64..10_000_000,
        consumed_cents in -1_000_000_i64..10_000_000,
        interval_days in 1_u32..3650,
    ) {
        let now = Utc::now();
        let amount = Decimal::new(amount_cents, 2);
        let consumed = Decimal::new(consumed_cents, 2);
        let schedule =
            AccrualSchedule::new(interval_days, amount, now - Duration::hours(hours)).unwrap();

        prop_assert_eq!(
            schedule.remaining(now, consumed),
            schedule.accumulation(now) - consumed
        );
    }

    #[test]
    fn accumulation_never_exceeds_unfloored_product(
        hours in 0_i64..10_000,
        amount_cents in 0_i64..10_000_000,
        interval_days in 1_u32..3650,
    ) {
        let now = Utc::now();
        let amount = Decimal::new(amount_cents, 2);
        let schedule =
            AccrualSchedule::new(interval_days, amount, now - Duration::hours(hours)).unwrap();

        let accumulation = schedule.accumulation(now);
        prop_assert!(accumulation <= Decimal::from(hours) * schedule.rate() + Decimal::ONE);
        prop_assert_eq!(accumulation, accumulation.floor());
    }
}
