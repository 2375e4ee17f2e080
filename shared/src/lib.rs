//! Shared utilities and common types for the OTP Guard workspace
//!
//! This crate provides common functionality used across all modules:
//! - Configuration types (shared store, verification policy, logging)
//! - Utility functions (phone validation and masking)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, Environment, LogFormat, LoggingConfig, StoreBackendKind,
    VerificationConfig,
};
pub use utils::phone;
