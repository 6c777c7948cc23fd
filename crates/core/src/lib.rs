//! Core business logic for Trickle.
//!
//! This crate contains pure accrual arithmetic with ZERO web or database
//! dependencies. Every function takes the clock and the consumed total as
//! explicit inputs, so the whole engine is testable without a store.
//!
//! # Modules
//!
//! - `accrual` - Hourly accrual schedules, consumption aggregation, and the
//!   expense read-model projection

pub mod accrual;
