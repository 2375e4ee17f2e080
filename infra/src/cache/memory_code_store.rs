//! In-process code store
//!
//! Records live in one map behind a mutex. The lock is only held for the
//! synchronous transition, never across an await. Expiry is read off
//! `expires_at`; records past the tombstone retention read as absent and are
//! dropped lazily or by the cleanup task.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use otp_core::domain::entities::{CodeRecord, VerifyOutcome};
use otp_core::domain::value_objects::{CodeKey, CodePolicy};
use otp_core::errors::CodeError;
use otp_core::services::{Clock, CodeStore, StorageBackend, SystemClock};

/// Code store for a single process
pub struct MemoryCodeStore {
    records: Mutex<HashMap<CodeKey, CodeRecord>>,
    policy: CodePolicy,
    clock: Arc<dyn Clock>,
}

impl MemoryCodeStore {
    /// Create a store on the wall clock
    pub fn new(policy: CodePolicy) -> Self {
        Self::with_clock(policy, Arc::new(SystemClock))
    }

    /// Create a store on a custom clock
    pub fn with_clock(policy: CodePolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            policy,
            clock,
        }
    }

    /// Policy records are issued with
    pub fn policy(&self) -> &CodePolicy {
        &self.policy
    }

    /// Number of records held, including tombstones not yet purged
    pub fn len(&self) -> usize {
        self.lock().map(|records| records.len()).unwrap_or(0)
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every record past its retention window
    pub fn purge_expired(&self) -> Result<usize, CodeError> {
        let now = self.clock.now();
        let mut records = self.lock()?;
        let before = records.len();
        records.retain(|_, record| !record.is_evictable(&self.policy, now));
        Ok(before - records.len())
    }

    /// Purge on a fixed interval until the returned handle is aborted
    pub fn start_cleanup_task(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "Code store cleanup started - will run every {} seconds",
                interval.as_secs()
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                match self.purge_expired() {
                    Ok(0) => {}
                    Ok(removed) => debug!(removed = removed, "Purged expired codes"),
                    Err(e) => tracing::error!("Code store cleanup failed: {}", e),
                }
            }
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<CodeKey, CodeRecord>>, CodeError> {
        self.records
            .lock()
            .map_err(|_| CodeError::storage("memory code store lock poisoned"))
    }

    /// Live record for `key`, dropping it first if it is past retention
    fn live_record<'a>(
        &self,
        records: &'a mut HashMap<CodeKey, CodeRecord>,
        key: &CodeKey,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Option<&'a mut CodeRecord> {
        if records
            .get(key)
            .is_some_and(|record| record.is_evictable(&self.policy, now))
        {
            records.remove(key);
        }
        records.get_mut(key)
    }
}

#[async_trait]
impl CodeStore for MemoryCodeStore {
    async fn issue(&self, key: &CodeKey, code: &str) -> Result<(), CodeError> {
        let now = self.clock.now();
        let mut records = self.lock()?;

        if let Some(existing) = self.live_record(&mut records, key, now) {
            existing.check_reissue(&self.policy, now)?;
        }

        records.insert(key.clone(), CodeRecord::issue(code, &self.policy, now));
        Ok(())
    }

    async fn verify(&self, key: &CodeKey, candidate: &str) -> Result<VerifyOutcome, CodeError> {
        let now = self.clock.now();
        let mut records = self.lock()?;

        match self.live_record(&mut records, key, now) {
            Some(record) => record.verify(candidate, now),
            None => Err(CodeError::NoActiveCode),
        }
    }

    async fn remaining_attempts(&self, key: &CodeKey) -> Result<Option<u32>, CodeError> {
        let now = self.clock.now();
        let mut records = self.lock()?;

        Ok(self
            .live_record(&mut records, key, now)
            .map(|record| record.attempts_remaining))
    }

    async fn clear(&self, key: &CodeKey) -> Result<(), CodeError> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
