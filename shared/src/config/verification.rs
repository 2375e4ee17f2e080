//! Verification code policy and store backend selection

use serde::{Deserialize, Serialize};

use super::env_or;

/// Which code store backend to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackendKind {
    /// Shared Redis store, safe across many processes
    #[default]
    Redis,
    /// In-process store for single-instance deployments
    Memory,
}

impl std::str::FromStr for StoreBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redis" => Ok(StoreBackendKind::Redis),
            "memory" | "local" => Ok(StoreBackendKind::Memory),
            _ => Err(format!("Invalid code store backend: {}", s)),
        }
    }
}

/// Verification code configuration
///
/// Durations are whole seconds. The core crate turns these into a validated
/// policy when a store is built.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Backend used to hold issued codes
    #[serde(default)]
    pub backend: StoreBackendKind,

    /// Build the in-process store when Redis cannot be reached at startup
    #[serde(default = "default_fallback")]
    pub fallback_to_memory: bool,

    /// Lifetime of an issued code
    pub code_ttl_seconds: i64,

    /// Minimum spacing between two issues for the same key
    pub resend_cooldown_seconds: i64,

    /// Wrong guesses allowed per issued code
    pub max_attempts: u32,

    /// How long an expired record keeps answering "expired" before eviction
    pub expired_retention_seconds: i64,

    /// Period of the in-process janitor
    pub cleanup_interval_seconds: u64,

    /// SMS provider name ("mock" is built in)
    pub sms_provider: String,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackendKind::Redis,
            fallback_to_memory: default_fallback(),
            code_ttl_seconds: 600,
            resend_cooldown_seconds: 60,
            max_attempts: 3,
            expired_retention_seconds: 600,
            cleanup_interval_seconds: 60,
            sms_provider: String::from("mock"),
        }
    }
}

impl VerificationConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend: env_or("OTP_BACKEND", defaults.backend),
            fallback_to_memory: env_or("OTP_FALLBACK_TO_MEMORY", defaults.fallback_to_memory),
            code_ttl_seconds: env_or("OTP_CODE_TTL_SECONDS", defaults.code_ttl_seconds),
            resend_cooldown_seconds: env_or(
                "OTP_RESEND_COOLDOWN_SECONDS",
                defaults.resend_cooldown_seconds,
            ),
            max_attempts: env_or("OTP_MAX_ATTEMPTS", defaults.max_attempts),
            expired_retention_seconds: env_or(
                "OTP_EXPIRED_RETENTION_SECONDS",
                defaults.expired_retention_seconds,
            ),
            cleanup_interval_seconds: env_or(
                "OTP_CLEANUP_INTERVAL_SECONDS",
                defaults.cleanup_interval_seconds,
            ),
            sms_provider: std::env::var("SMS_PROVIDER").unwrap_or(defaults.sms_provider),
        }
    }

    /// Use the in-process backend
    pub fn memory() -> Self {
        Self {
            backend: StoreBackendKind::Memory,
            ..Default::default()
        }
    }
}

fn default_fallback() -> bool {
    true
}
