//! Qualcode Core Library
//!
//! This crate provides the foundational utilities for the qualcode CLI:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management (provider credentials, runtime options)

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, AzureConfig};
pub use error::{AppError, AppResult};
