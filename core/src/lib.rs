//! # OTP Guard Core
//!
//! Core logic for rate-limited, attempt-bounded one-time codes.
//! This crate contains the code record state machine, the `CodeStore`
//! capability implemented by the storage backends, the verification service
//! and the error types shared by every layer.

pub mod domain;
pub mod services;
pub mod errors;

// Re-export commonly used types for convenience
pub use domain::*;
pub use services::*;
pub use errors::*;
