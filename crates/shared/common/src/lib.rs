//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - Unified error handling
//! - Configuration structures
//! - Tracing initialization
//! - Validation message formatting

pub mod config;
pub mod error;
pub mod telemetry;
pub mod validation;

pub use config::*;
pub use error::{AppError, AppResult};
pub use validation::{validate_input, validation_messages};
