//! Main verification service implementation

use chrono::Utc;
use std::sync::Arc;

use crate::domain::entities::{VerifyOutcome, CODE_LENGTH};
use crate::domain::value_objects::CodeKey;
use crate::errors::{CodeError, DomainError, DomainResult, ValidationError};

use super::config::VerificationServiceConfig;
use super::generator::{is_well_formed_code, CodeGenerator, SecureCodeGenerator};
use super::traits::{CodeStore, SmsServiceTrait};
use super::types::{SendCodeResult, VerifyCodeResult};

/// Verification service for handling SMS verification codes
///
/// Generation, storage and delivery are separate seams. The store alone
/// decides throttling, expiry and attempt accounting; the service adds input
/// validation, delivery and logging around it.
pub struct VerificationService<S: SmsServiceTrait + ?Sized, C: CodeStore + ?Sized> {
    /// SMS service for sending messages
    sms_service: Arc<S>,
    /// Store holding the active code per key
    code_store: Arc<C>,
    /// Source of fresh codes
    generator: Arc<dyn CodeGenerator>,
    /// Service configuration
    config: VerificationServiceConfig,
}

impl<S: SmsServiceTrait + ?Sized, C: CodeStore + ?Sized> VerificationService<S, C> {
    /// Create a new verification service with the OS-backed code generator
    pub fn new(sms_service: Arc<S>, code_store: Arc<C>, config: VerificationServiceConfig) -> Self {
        Self::with_generator(sms_service, code_store, Arc::new(SecureCodeGenerator), config)
    }

    /// Create a service with a custom code generator
    pub fn with_generator(
        sms_service: Arc<S>,
        code_store: Arc<C>,
        generator: Arc<dyn CodeGenerator>,
        config: VerificationServiceConfig,
    ) -> Self {
        Self {
            sms_service,
            code_store,
            generator,
            config,
        }
    }

    /// Issue a new code for `(biz, phone)` and deliver it
    ///
    /// The code is stored before delivery. When delivery fails the record is
    /// kept, so the cooldown still applies to the next request.
    ///
    /// # Errors
    ///
    /// * `CodeError::Throttled` - a code was issued within the cooldown window
    /// * `DomainError::Delivery` - the SMS provider rejected the message
    /// * `CodeError::Storage` - the store could not be reached
    pub async fn send_code(&self, biz: &str, phone: &str) -> DomainResult<SendCodeResult> {
        let key = CodeKey::new(biz, phone)?;

        if !self.sms_service.is_valid_phone_number(key.subject()) {
            return Err(DomainError::Validation {
                message: format!("Invalid phone number format: {}", key.masked_subject()),
            });
        }

        let code = self.generator.generate();
        let issued_at = Utc::now();

        if let Err(e) = self.code_store.issue(&key, &code).await {
            self.log_store_error(&key, &e);
            return Err(e.into());
        }

        tracing::info!(
            biz = %key.biz(),
            phone = %key.masked_subject(),
            backend = %self.code_store.backend(),
            event = "otp_issued",
            "Verification code issued"
        );

        let message_id = self
            .sms_service
            .send_verification_code(key.subject(), &code)
            .await
            .map_err(|message| {
                tracing::error!(
                    biz = %key.biz(),
                    phone = %key.masked_subject(),
                    error = %message,
                    event = "otp_delivery_failed",
                    "Failed to deliver verification code"
                );
                DomainError::Delivery { message }
            })?;

        Ok(SendCodeResult {
            message_id,
            expires_at: issued_at + self.config.policy.code_ttl(),
            next_resend_at: issued_at + self.config.policy.resend_cooldown(),
        })
    }

    /// Check `candidate` against the active code for `(biz, phone)`
    ///
    /// A well-formed wrong candidate returns `success: false` and spends one
    /// attempt. Candidates that are not six digits are rejected up front and
    /// do not count as an attempt.
    pub async fn verify_code(&self, biz: &str, phone: &str, candidate: &str) -> DomainResult<VerifyCodeResult> {
        let key = CodeKey::new(biz, phone)?;
        let candidate = candidate.trim();

        if candidate.len() != CODE_LENGTH {
            return Err(ValidationError::InvalidLength {
                field: "code".to_string(),
                expected: CODE_LENGTH,
                actual: candidate.len(),
            }
            .into());
        }
        if !is_well_formed_code(candidate) {
            return Err(ValidationError::InvalidFormat {
                field: "code".to_string(),
            }
            .into());
        }

        match self.code_store.verify(&key, candidate).await {
            Ok(VerifyOutcome::Matched) => {
                tracing::info!(
                    biz = %key.biz(),
                    phone = %key.masked_subject(),
                    event = "otp_verified",
                    "Verification code accepted"
                );
                Ok(VerifyCodeResult {
                    success: true,
                    remaining_attempts: None,
                })
            }
            Ok(VerifyOutcome::Mismatched { attempts_remaining }) => {
                tracing::warn!(
                    biz = %key.biz(),
                    phone = %key.masked_subject(),
                    attempts_remaining = attempts_remaining,
                    event = "otp_mismatch",
                    "Verification code mismatch"
                );
                Ok(VerifyCodeResult {
                    success: false,
                    remaining_attempts: Some(attempts_remaining),
                })
            }
            Err(e) => {
                self.log_store_error(&key, &e);
                Err(e.into())
            }
        }
    }

    /// Attempts left for the active code, `None` when there is none
    pub async fn remaining_attempts(&self, biz: &str, phone: &str) -> DomainResult<Option<u32>> {
        let key = CodeKey::new(biz, phone)?;
        Ok(self.code_store.remaining_attempts(&key).await?)
    }

    /// Drop the code for `(biz, phone)`, lifting any cooldown
    pub async fn clear_code(&self, biz: &str, phone: &str) -> DomainResult<()> {
        let key = CodeKey::new(biz, phone)?;
        self.code_store.clear(&key).await?;
        tracing::debug!(biz = %key.biz(), phone = %key.masked_subject(), "Verification code cleared");
        Ok(())
    }

    /// Service configuration
    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    fn log_store_error(&self, key: &CodeKey, error: &CodeError) {
        match error {
            CodeError::Throttled { retry_after_seconds } => tracing::warn!(
                biz = %key.biz(),
                phone = %key.masked_subject(),
                retry_after_seconds = *retry_after_seconds,
                event = "otp_throttled",
                "Verification code request rate limit exceeded"
            ),
            CodeError::TooManyAttempts => tracing::warn!(
                biz = %key.biz(),
                phone = %key.masked_subject(),
                event = "otp_attempts_exhausted",
                "Verification attempts exhausted"
            ),
            CodeError::Expired => tracing::info!(
                biz = %key.biz(),
                phone = %key.masked_subject(),
                event = "otp_expired",
                "Verification code expired or already used"
            ),
            CodeError::NoActiveCode => tracing::info!(
                biz = %key.biz(),
                phone = %key.masked_subject(),
                event = "otp_not_found",
                "No active verification code"
            ),
            CodeError::Storage { message } => tracing::error!(
                biz = %key.biz(),
                phone = %key.masked_subject(),
                backend = %self.code_store.backend(),
                error = %message,
                event = "otp_storage_failure",
                "Code store failure"
            ),
        }
    }
}
