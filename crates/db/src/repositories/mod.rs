//! Repository abstractions for data access.

pub mod consumption;
pub mod expense;

pub use consumption::{ConsumptionError, ConsumptionRepository};
pub use expense::{ExpenseError, ExpenseInput, ExpenseRepository};
