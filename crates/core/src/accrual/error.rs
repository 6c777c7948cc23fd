//! Accrual error types.

use thiserror::Error;

/// Accrual-related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccrualError {
    /// The accrual interval must cover at least one day.
    ///
    /// A zero interval would divide by zero in the hourly rate; it is
    /// rejected here, at construction, rather than surfacing as a
    /// computation fault later.
    #[error("Accrual interval must be at least one day")]
    ZeroInterval,
}
