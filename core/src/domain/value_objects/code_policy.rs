//! Timing and attempt policy applied to every code record.

use chrono::Duration;
use otp_shared::VerificationConfig;

use crate::errors::ValidationError;

/// Default lifetime of an issued code (10 minutes)
pub const DEFAULT_CODE_TTL_SECONDS: i64 = 600;

/// Default minimum spacing between two issues for one key
pub const DEFAULT_RESEND_COOLDOWN_SECONDS: i64 = 60;

/// Default number of wrong guesses allowed per code
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default time an expired record keeps answering "expired"
pub const DEFAULT_EXPIRED_RETENTION_SECONDS: i64 = 600;

/// Upper bound for every configurable duration (one day)
const MAX_WINDOW_SECONDS: i64 = 86_400;

/// Upper bound for the attempt budget
const MAX_ATTEMPT_BUDGET: u32 = 100;

/// Validated code policy
///
/// Invariants: `code_ttl > 0`, `0 <= resend_cooldown <= code_ttl`,
/// `max_attempts >= 1`, `expired_retention >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodePolicy {
    code_ttl: Duration,
    resend_cooldown: Duration,
    max_attempts: u32,
    expired_retention: Duration,
}

impl CodePolicy {
    /// Build a policy from whole seconds, validating every bound
    pub fn from_seconds(
        code_ttl_seconds: i64,
        resend_cooldown_seconds: i64,
        max_attempts: u32,
        expired_retention_seconds: i64,
    ) -> Result<Self, ValidationError> {
        check_range("code_ttl_seconds", code_ttl_seconds, 1, MAX_WINDOW_SECONDS)?;
        check_range(
            "resend_cooldown_seconds",
            resend_cooldown_seconds,
            0,
            code_ttl_seconds,
        )?;
        check_range(
            "max_attempts",
            i64::from(max_attempts),
            1,
            i64::from(MAX_ATTEMPT_BUDGET),
        )?;
        check_range(
            "expired_retention_seconds",
            expired_retention_seconds,
            0,
            MAX_WINDOW_SECONDS,
        )?;

        Ok(Self {
            code_ttl: Duration::seconds(code_ttl_seconds),
            resend_cooldown: Duration::seconds(resend_cooldown_seconds),
            max_attempts,
            expired_retention: Duration::seconds(expired_retention_seconds),
        })
    }

    /// Lifetime of an issued code
    pub fn code_ttl(&self) -> Duration {
        self.code_ttl
    }

    /// Minimum spacing between two issues for one key
    pub fn resend_cooldown(&self) -> Duration {
        self.resend_cooldown
    }

    /// Wrong guesses allowed per code
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Time an expired record is retained before eviction
    pub fn expired_retention(&self) -> Duration {
        self.expired_retention
    }

    /// Total time a record occupies storage after it is issued
    pub fn storage_lifetime(&self) -> Duration {
        self.code_ttl + self.expired_retention
    }
}

impl Default for CodePolicy {
    fn default() -> Self {
        Self {
            code_ttl: Duration::seconds(DEFAULT_CODE_TTL_SECONDS),
            resend_cooldown: Duration::seconds(DEFAULT_RESEND_COOLDOWN_SECONDS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            expired_retention: Duration::seconds(DEFAULT_EXPIRED_RETENTION_SECONDS),
        }
    }
}

impl TryFrom<&VerificationConfig> for CodePolicy {
    type Error = ValidationError;

    fn try_from(config: &VerificationConfig) -> Result<Self, Self::Error> {
        Self::from_seconds(
            config.code_ttl_seconds,
            config.resend_cooldown_seconds,
            config.max_attempts,
            config.expired_retention_seconds,
        )
    }
}

fn check_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}
