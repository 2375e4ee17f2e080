//! Shared code store on Redis
//!
//! One hash per key at `[prefix:]code:{biz}:{subject}` with the fields
//! `code` (SHA-256 hex), `attempts`, `used`, `issued_at` and `expires_at`
//! (epoch ms, server clock). Issue and verify each run as a single Lua script,
//! so every decision and its write happen atomically on the server.

use async_trait::async_trait;
use chrono::Duration;
use redis::Script;
use sha2::{Digest, Sha256};
use tracing::{debug, error};

use otp_core::domain::entities::{retry_after_seconds, VerifyOutcome};
use otp_core::domain::value_objects::{CodeKey, CodePolicy};
use otp_core::errors::CodeError;
use otp_core::services::{CodeStore, StorageBackend};

use super::redis_client::RedisClient;

const ISSUE_SCRIPT: &str = include_str!("scripts/issue_code.lua");
const VERIFY_SCRIPT: &str = include_str!("scripts/verify_code.lua");

// Issue script replies
const ISSUE_OK: i64 = 0;
const ISSUE_THROTTLED: i64 = -1;
const ISSUE_CORRUPT_KEY: i64 = -2;

// Verify script replies
const VERIFY_MATCHED: i64 = 10;
const VERIFY_MISMATCHED: i64 = 11;
const VERIFY_EXHAUSTED: i64 = -10;
const VERIFY_EXPIRED: i64 = -11;
const VERIFY_NOT_FOUND: i64 = -12;
const VERIFY_MALFORMED: i64 = -13;

/// Redis-backed code store shared by every process using the same server
pub struct RedisCodeStore {
    client: RedisClient,
    policy: CodePolicy,
    issue_script: Script,
    verify_script: Script,
}

impl RedisCodeStore {
    /// Create a store over an already connected client
    pub fn new(client: RedisClient, policy: CodePolicy) -> Self {
        Self {
            client,
            policy,
            issue_script: Script::new(ISSUE_SCRIPT),
            verify_script: Script::new(VERIFY_SCRIPT),
        }
    }

    /// Redis key for a code key, with the configured prefix
    pub fn redis_key(&self, key: &CodeKey) -> String {
        self.client.config().make_key(&key.storage_key())
    }

    /// Policy the scripts are invoked with
    pub fn policy(&self) -> &CodePolicy {
        &self.policy
    }

    /// Check connectivity
    pub async fn health_check(&self) -> Result<bool, CodeError> {
        Ok(self.client.health_check().await?)
    }
}

#[async_trait]
impl CodeStore for RedisCodeStore {
    async fn issue(&self, key: &CodeKey, code: &str) -> Result<(), CodeError> {
        let redis_key = self.redis_key(key);
        let args = [
            hash_code(code),
            self.policy.max_attempts().to_string(),
            self.policy.code_ttl().num_milliseconds().to_string(),
            self.policy.resend_cooldown().num_milliseconds().to_string(),
            self.policy.storage_lifetime().num_milliseconds().to_string(),
        ];

        let reply: Vec<i64> = self
            .client
            .run_script(&self.issue_script, &[redis_key.as_str()], &args)
            .await?;

        debug!(key = %key, reply = ?reply, "Issue script finished");
        decode_issue_reply(&reply)
    }

    async fn verify(&self, key: &CodeKey, candidate: &str) -> Result<VerifyOutcome, CodeError> {
        let redis_key = self.redis_key(key);
        let reply: Vec<i64> = self
            .client
            .run_script(&self.verify_script, &[redis_key.as_str()], &[hash_code(candidate)])
            .await?;

        debug!(key = %key, reply = ?reply, "Verify script finished");
        decode_verify_reply(&reply)
    }

    async fn remaining_attempts(&self, key: &CodeKey) -> Result<Option<u32>, CodeError> {
        let redis_key = self.redis_key(key);
        match self.client.hget(&redis_key, "attempts").await? {
            Some(raw) => raw
                .parse::<u32>()
                .map(Some)
                .map_err(|_| CodeError::storage(format!("malformed attempts field: {}", raw))),
            None => Ok(None),
        }
    }

    async fn clear(&self, key: &CodeKey) -> Result<(), CodeError> {
        let redis_key = self.redis_key(key);
        self.client.delete(&redis_key).await?;
        Ok(())
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::Redis
    }
}

/// Hash a code the way it is stored
pub(crate) fn hash_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Map the issue script reply onto the store contract
pub(crate) fn decode_issue_reply(reply: &[i64]) -> Result<(), CodeError> {
    match reply {
        [ISSUE_OK, _] => Ok(()),
        [ISSUE_THROTTLED, retry_ms] => Err(CodeError::Throttled {
            retry_after_seconds: retry_after_seconds(Duration::milliseconds(*retry_ms)),
        }),
        [ISSUE_CORRUPT_KEY, _] => {
            error!("Code key exists without expiry or issue time");
            Err(CodeError::storage("code key has no expiry or issue time"))
        }
        other => Err(unexpected_reply("issue", other)),
    }
}

/// Map the verify script reply onto the store contract
pub(crate) fn decode_verify_reply(reply: &[i64]) -> Result<VerifyOutcome, CodeError> {
    match reply {
        [VERIFY_MATCHED, _] => Ok(VerifyOutcome::Matched),
        [VERIFY_MISMATCHED, remaining] => {
            let attempts_remaining = u32::try_from(*remaining)
                .map_err(|_| CodeError::storage(format!("negative attempts after mismatch: {}", remaining)))?;
            Ok(VerifyOutcome::Mismatched { attempts_remaining })
        }
        [VERIFY_EXHAUSTED, _] => Err(CodeError::TooManyAttempts),
        [VERIFY_EXPIRED, _] => Err(CodeError::Expired),
        [VERIFY_NOT_FOUND, _] => Err(CodeError::NoActiveCode),
        [VERIFY_MALFORMED, _] => {
            error!("Code record is missing fields");
            Err(CodeError::storage("code record is missing fields"))
        }
        other => Err(unexpected_reply("verify", other)),
    }
}

fn unexpected_reply(script: &str, reply: &[i64]) -> CodeError {
    error!(script = script, reply = ?reply, "Unexpected script reply");
    CodeError::storage(format!("unexpected {} script reply: {:?}", script, reply))
}
