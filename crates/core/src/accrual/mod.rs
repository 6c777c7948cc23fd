//! Hourly accrual schedules and the expense read-model.

pub mod error;
pub mod projection;
pub mod schedule;

#[cfg(test)]
mod tests;

pub use error::AccrualError;
pub use projection::{ExpenseProjection, project};
pub use schedule::{AccrualSchedule, sum_consumed};
