//! Shared types, errors, and configuration for Trickle.
//!
//! This crate provides common pieces used across all other crates:
//! - Application-wide error taxonomy with HTTP status mapping
//! - Configuration management

pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
