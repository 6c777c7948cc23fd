//! Expense read-model projection.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::error::AccrualError;
use super::schedule::AccrualSchedule;

/// Output shape for an expense, with the derived accrual fields computed at
/// request time.
///
/// A pure, side-effect-free transformation: `consumed` is supplied by the
/// caller from a fresh store aggregation, never memoized across requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseProjection {
    /// Store-assigned identifier.
    pub id: i64,
    /// Display label.
    pub name: String,
    /// Days per accrual period.
    pub interval: u32,
    /// Value accrued per full interval.
    pub amount: Decimal,
    /// Stored flag, surfaced as-is; inert in all arithmetic.
    pub rollover: bool,
    /// Accrued value minus consumed total. May be negative.
    pub remaining: Decimal,
    /// Sum of all consumption amounts for this expense.
    pub consumed: Decimal,
    /// Value accrued per hour.
    pub rate: Decimal,
}

/// Projects an expense's stored fields plus its consumed total into the
/// output shape.
///
/// # Errors
///
/// Returns [`AccrualError::ZeroInterval`] if `interval_days` is zero. Rows
/// created through the validated write paths never carry one, so hitting
/// this on a stored row indicates an out-of-band write.
#[allow(clippy::too_many_arguments)]
pub fn project(
    id: i64,
    name: String,
    interval_days: u32,
    amount: Decimal,
    start_date: DateTime<Utc>,
    rollover: bool,
    consumed: Decimal,
    now: DateTime<Utc>,
) -> Result<ExpenseProjection, AccrualError> {
    let schedule = AccrualSchedule::new(interval_days, amount, start_date)?;

    Ok(ExpenseProjection {
        id,
        name,
        interval: interval_days,
        amount,
        rollover,
        remaining: schedule.remaining(now, consumed),
        consumed,
        rate: schedule.rate(),
    })
}
