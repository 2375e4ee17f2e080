//! Configuration for the verification service

use otp_shared::VerificationConfig;

use crate::domain::value_objects::CodePolicy;
use crate::errors::ValidationError;

/// Configuration for the verification service
#[derive(Debug, Clone, Default)]
pub struct VerificationServiceConfig {
    /// Timing and attempt policy, shared with the code store
    pub policy: CodePolicy,
}

impl TryFrom<&VerificationConfig> for VerificationServiceConfig {
    type Error = ValidationError;

    fn try_from(config: &VerificationConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            policy: CodePolicy::try_from(config)?,
        })
    }
}
