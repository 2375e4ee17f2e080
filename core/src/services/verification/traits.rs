//! Traits for SMS delivery and code storage integration

use async_trait::async_trait;
use std::fmt;

use crate::domain::entities::VerifyOutcome;
use crate::domain::value_objects::CodeKey;
use crate::errors::CodeError;

/// Trait for SMS service integration
///
/// Delivery belongs to the caller; the service only hands over a code after
/// it was issued.
#[async_trait]
pub trait SmsServiceTrait: Send + Sync {
    /// Send a verification code via SMS, returning the provider message id
    async fn send_verification_code(&self, phone: &str, code: &str) -> Result<String, String>;
    /// Check if the phone number format is valid
    fn is_valid_phone_number(&self, phone: &str) -> bool;
}

/// Storage backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Shared Redis store
    Redis,
    /// In-process memory store
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Redis => write!(f, "redis"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Rate-limited, attempt-bounded code store
///
/// Every method is one atomic step with respect to concurrent callers on the
/// same key: implementations never expose a half-written record, and two
/// racing verifies can never both spend the same attempt.
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Issue `code` for `key`, overwriting any record older than the cooldown
    ///
    /// Fails with `Throttled` (and writes nothing) when the previous issue for
    /// the key is more recent than the cooldown window.
    async fn issue(&self, key: &CodeKey, code: &str) -> Result<(), CodeError>;

    /// Check `candidate` against the active code for `key`
    ///
    /// Errors: `NoActiveCode` when nothing was issued (or it was evicted),
    /// `Expired` when the code aged out or was already used, and
    /// `TooManyAttempts` once the attempt budget is spent.
    async fn verify(&self, key: &CodeKey, candidate: &str) -> Result<VerifyOutcome, CodeError>;

    /// Attempts left for the record under `key`, `None` when there is none
    async fn remaining_attempts(&self, key: &CodeKey) -> Result<Option<u32>, CodeError>;

    /// Remove the record under `key`
    async fn clear(&self, key: &CodeKey) -> Result<(), CodeError>;

    /// Backend kind, for logging
    fn backend(&self) -> StorageBackend;
}
