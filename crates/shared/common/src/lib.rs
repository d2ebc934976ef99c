//! Common utilities shared across the CRM crates.
//!
//! This crate provides:
//! - Unified error handling for HTTP
//! - Configuration structures and CRM feature flags

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
