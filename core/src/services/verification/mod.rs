//! Verification code workflow for SMS-based authentication
//!
//! This module provides:
//! - Code generation from the OS random source
//! - The `CodeStore` capability that both storage backends implement
//! - The delivery seam (`SmsServiceTrait`) owned by the caller
//! - `VerificationService`, which ties generation, storage and delivery together

mod config;
mod generator;
mod service;
mod traits;
mod types;


pub use config::VerificationServiceConfig;
pub use generator::{is_well_formed_code, CodeGenerator, SecureCodeGenerator};
pub use service::VerificationService;
pub use traits::{CodeStore, SmsServiceTrait, StorageBackend};
pub use types::{SendCodeResult, VerifyCodeResult};
