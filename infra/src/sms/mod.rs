//! SMS Service Module
//!
//! Delivery of issued codes. Real providers are out of scope for this crate;
//! callers plug their own `SmsServiceTrait` implementation into the
//! verification service. The mock here logs instead of sending.

use std::sync::Arc;

use otp_core::services::SmsServiceTrait;

pub mod mock_sms;

pub use mock_sms::MockSmsService;

#[cfg(test)]
mod tests;

/// Create an SMS service for the configured provider name
///
/// Only `mock` is built in; anything else falls back to it with a warning.
pub fn create_sms_service(provider: &str) -> Arc<dyn SmsServiceTrait> {
    match provider {
        "mock" => Arc::new(MockSmsService::new()),
        _ => {
            tracing::warn!(
                "Unknown SMS provider '{}', using mock implementation",
                provider
            );
            Arc::new(MockSmsService::new())
        }
    }
}
