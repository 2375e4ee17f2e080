//! Per-key state of an issued one-time code and its two transitions.
//!
//! `check_reissue` and `verify` are the whole state machine. The in-process
//! store runs them under its lock; the Redis scripts mirror them step for step.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::CodePolicy;
use crate::errors::CodeError;

/// Length of a verification code
pub const CODE_LENGTH: usize = 6;

/// Result of a verify transition that reached the comparison step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerifyOutcome {
    /// Candidate matched; the record is now consumed
    Matched,
    /// Candidate did not match; one attempt was spent
    Mismatched { attempts_remaining: u32 },
}

impl VerifyOutcome {
    /// Whether the candidate matched
    pub fn matched(&self) -> bool {
        matches!(self, VerifyOutcome::Matched)
    }

    /// Attempts left after a mismatch
    pub fn attempts_remaining(&self) -> Option<u32> {
        match self {
            VerifyOutcome::Matched => None,
            VerifyOutcome::Mismatched { attempts_remaining } => Some(*attempts_remaining),
        }
    }
}

/// State record for one `(biz, subject)` key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRecord {
    /// The active code
    pub code: String,

    /// Wrong guesses still allowed; never increases within a record's life
    pub attempts_remaining: u32,

    /// When the code was (most recently) issued
    pub issued_at: DateTime<Utc>,

    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,

    /// Set once a verify succeeds
    pub used: bool,
}

impl CodeRecord {
    /// Fresh record for a newly issued code
    pub fn issue(code: impl Into<String>, policy: &CodePolicy, now: DateTime<Utc>) -> Self {
        Self {
            code: code.into(),
            attempts_remaining: policy.max_attempts(),
            issued_at: now,
            expires_at: now + policy.code_ttl(),
            used: false,
        }
    }

    /// Checks if the code has expired
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the record has outlived its retention window and should be
    /// treated as absent
    pub fn is_evictable(&self, policy: &CodePolicy, now: DateTime<Utc>) -> bool {
        now >= self.expires_at + policy.expired_retention()
    }

    /// Decide whether a new issue may overwrite this record
    ///
    /// The cooldown runs from the most recent issue, whether or not the code
    /// was consumed since.
    pub fn check_reissue(&self, policy: &CodePolicy, now: DateTime<Utc>) -> Result<(), CodeError> {
        let elapsed = now - self.issued_at;
        if elapsed < policy.resend_cooldown() {
            return Err(CodeError::Throttled {
                retry_after_seconds: retry_after_seconds(policy.resend_cooldown() - elapsed),
            });
        }
        Ok(())
    }

    /// Apply one verify attempt
    ///
    /// Order of checks: consumed or expired, then attempt budget, then the
    /// comparison. Only the last step mutates the record.
    pub fn verify(&mut self, candidate: &str, now: DateTime<Utc>) -> Result<VerifyOutcome, CodeError> {
        if self.used || self.is_expired(now) {
            return Err(CodeError::Expired);
        }

        if self.attempts_remaining == 0 {
            return Err(CodeError::TooManyAttempts);
        }

        if codes_match(&self.code, candidate) {
            self.used = true;
            return Ok(VerifyOutcome::Matched);
        }

        self.attempts_remaining -= 1;
        Ok(VerifyOutcome::Mismatched {
            attempts_remaining: self.attempts_remaining,
        })
    }
}

/// Whole seconds until a wait is over, rounded up, never below one
pub fn retry_after_seconds(wait: Duration) -> u64 {
    let millis = wait.num_milliseconds().max(0) as u64;
    ((millis + 999) / 1000).max(1)
}

fn codes_match(stored: &str, candidate: &str) -> bool {
    stored.len() == candidate.len() && constant_time_eq(stored.as_bytes(), candidate.as_bytes())
}
