//! Accrual schedule arithmetic.
//!
//! An expense accrues value continuously from its start date: `amount` per
//! `interval_days`, pro-rated by the hour. Every read recomputes from first
//! principles (start date, now, rate) - there is no scheduler, no background
//! job, and no cached state that could drift.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::error::AccrualError;

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// The accrual parameters of an expense, validated at construction.
///
/// All derived values take `now` as an explicit argument; the engine never
/// reads the wall clock itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualSchedule {
    interval_days: u32,
    amount: Decimal,
    start_date: DateTime<Utc>,
}

impl AccrualSchedule {
    /// Creates a schedule accruing `amount` per `interval_days`, starting at
    /// `start_date`.
    ///
    /// # Errors
    ///
    /// Returns [`AccrualError::ZeroInterval`] if `interval_days` is zero,
    /// which would divide by zero in [`Self::rate`].
    pub const fn new(
        interval_days: u32,
        amount: Decimal,
        start_date: DateTime<Utc>,
    ) -> Result<Self, AccrualError> {
        if interval_days == 0 {
            return Err(AccrualError::ZeroInterval);
        }

        Ok(Self {
            interval_days,
            amount,
            start_date,
        })
    }

    /// Days per accrual period.
    #[must_use]
    pub const fn interval_days(&self) -> u32 {
        self.interval_days
    }

    /// Value accrued per full interval.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// Timestamp from which accrual begins.
    #[must_use]
    pub const fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    /// Whole hours elapsed since the start date, truncated toward zero.
    ///
    /// Negative when `start_date` lies in the future - the expense has not
    /// begun accruing and callers must tolerate the sign.
    #[must_use]
    pub fn hours_since_start(&self, now: DateTime<Utc>) -> i64 {
        (now - self.start_date).num_hours()
    }

    /// Value accrued per hour: `amount / (interval_days * 24)`.
    ///
    /// Exact decimal division, no rounding.
    #[must_use]
    pub fn rate(&self) -> Decimal {
        self.amount / (Decimal::from(self.interval_days) * Decimal::from(24))
    }

    /// Total value accrued by `now`, floored to the unit of `amount`.
    ///
    /// The elapsed time used here is the unrounded real value, not the
    /// truncated integer from [`Self::hours_since_start`], and the whole
    /// expression is a single division followed by a single floor. Dividing
    /// earlier (e.g. going through [`Self::rate`]) would truncate repeating
    /// decimals and come out one unit low at exact interval boundaries.
    /// Negative for future start dates - clamping is a presentation
    /// decision, never done here.
    #[must_use]
    pub fn accumulation(&self, now: DateTime<Utc>) -> Decimal {
        let elapsed_millis = (now - self.start_date).num_milliseconds();
        let interval_millis =
            Decimal::from(self.interval_days) * Decimal::from(24) * Decimal::from(MILLIS_PER_HOUR);
        (self.amount * Decimal::from(elapsed_millis) / interval_millis).floor()
    }

    /// Accrued value minus the consumed total.
    ///
    /// May be negative; over-consumption is not prevented anywhere in the
    /// system.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>, consumed: Decimal) -> Decimal {
        self.accumulation(now) - consumed
    }
}

/// Exact sum of consumption amounts.
///
/// Callers are expected to pass amounts fetched fresh from the store, so the
/// total always reflects current state rather than a stale snapshot.
#[must_use]
pub fn sum_consumed<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().sum()
}
